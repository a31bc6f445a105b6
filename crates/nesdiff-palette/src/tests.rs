use super::*;

fn push(frame: &mut Vec<u8>, rgb: Rgb) {
    frame.extend_from_slice(&[rgb.r, rgb.g, rgb.b]);
}

#[test]
fn test_emphasis_zero_is_identity() {
    for index in 0..64u8 {
        assert_eq!(emphasized_color(index, 0), base_color(index));
    }
}

#[test]
fn test_grey_columns_ignore_emphasis() {
    for index in (0..64u8).filter(|i| (i & 0x0F) > 0x0D) {
        for emphasis in 0..EMPHASIS_COUNT {
            assert_eq!(emphasized_color(index, emphasis), base_color(index), "index {index:02X}");
        }
    }
}

#[test]
fn test_emphasis_attenuation_values() {
    // 0x16 = (B5, 31, 20); bit 0 dims green and blue.
    assert_eq!(emphasized_color(0x16, 1), Rgb::new(0xB5, 41, 26));
    // bit 1 dims red and blue.
    assert_eq!(emphasized_color(0x20, 2), Rgb::new(214, 0xFE, 214));
    // bits 0+1 compound on blue.
    assert_eq!(emphasized_color(0x20, 3), Rgb::new(214, 213, 179));
    // bit 2 dims red and green.
    assert_eq!(emphasized_color(0x20, 4), Rgb::new(214, 213, 0xFF));
    // All three bits: every channel dimmed twice.
    assert_eq!(emphasized_color(0x16, 7), Rgb::new(127, 34, 22));
    assert_eq!(emphasized_color(0x20, 7), Rgb::new(179, 179, 179));
    // Only the low three bits count.
    assert_eq!(emphasized_color(0x20, 0x0A), emphasized_color(0x20, 2));
    // 0x0D is not a grey column: black stays black under every mask.
    assert_eq!(emphasized_color(0x0D, 7), Rgb::new(0, 0, 0));
}

#[test]
fn test_reverse_map_round_trip() {
    let map = ReverseMap::build();
    for index in 0..64u8 {
        for emphasis in 0..EMPHASIS_COUNT {
            let rgb = emphasized_color(index, emphasis);
            assert!(
                map.candidates(rgb).contains(&Candidate { index, emphasis }),
                "({index:02X},{emphasis}) missing from {rgb}"
            );
        }
    }
    assert!(map.len() <= 64 * 8);
    assert!(!map.is_empty());
}

#[test]
fn test_reverse_map_ordering_and_ambiguity() {
    let map = ReverseMap::shared();
    let black = map.candidates(Rgb::new(0, 0, 0));
    assert_eq!(black.len(), 80);
    assert_eq!(black[0], Candidate { index: 0x0D, emphasis: 0 });
    assert!(black.windows(2).all(|w| w[0] < w[1]));
    assert!(map.candidates(Rgb::new(1, 2, 3)).is_empty());
}

#[test]
fn test_candidate_display() {
    let c = Candidate { index: 0x0A, emphasis: 5 };
    assert_eq!(c.to_string(), "(idx=0A,emph=5)");
    assert_eq!(Rgb::new(1, 22, 255).to_string(), "(1, 22, 255)");
}

#[test]
fn test_classify() {
    let candidates = [
        Candidate { index: 0x16, emphasis: 1 },
        Candidate { index: 0x27, emphasis: 4 },
    ];
    assert_eq!(classify(&candidates, Candidate { index: 0x16, emphasis: 1 }), None);
    assert_eq!(
        classify(&candidates, Candidate { index: 0x16, emphasis: 0 }),
        Some(MismatchReason::EmphasisBits)
    );
    assert_eq!(
        classify(&candidates, Candidate { index: 0x15, emphasis: 1 }),
        Some(MismatchReason::PaletteIndex)
    );
}

#[test]
fn test_scan_frame_counters() {
    let map = ReverseMap::shared();
    let unknown = Rgb::new(1, 2, 3);
    let mut rgb24 = Vec::new();
    let mut indices = Vec::new();
    let mut emphasis = Vec::new();
    let mut pixel = |rgb: Rgb, idx: u8, emph: u8| {
        push(&mut rgb24, rgb);
        indices.push(idx);
        emphasis.push(emph);
    };

    pixel(unknown, 0, 0);
    // High bits above the index/emphasis masks are ignored.
    pixel(emphasized_color(0x21, 0), 0x61, 0x08);
    pixel(unknown, 0, 0);
    pixel(emphasized_color(0x16, 1), 0x16, 0);
    pixel(emphasized_color(0x21, 0), 0x22, 0);
    pixel(unknown, 0, 0);

    let scan = scan_frame(60, 4, &rgb24, &indices, &emphasis, map);
    let first = scan.first.clone().expect("mismatch");
    assert_eq!((first.pixel_index, first.x, first.y), (3, 3, 0));
    assert_eq!(first.reason, MismatchReason::EmphasisBits);
    assert_eq!(first.actual, Candidate { index: 0x16, emphasis: 0 });
    assert!(first.candidates.contains(&Candidate { index: 0x16, emphasis: 1 }));
    assert_eq!(first.rgb, Rgb::new(0xB5, 41, 26));

    assert_eq!(
        scan.before_first,
        MismatchCounters {
            unknown_colors: 2,
            index_mismatches: 0,
            emphasis_mismatches: 0,
        }
    );
    assert_eq!(
        scan.totals,
        MismatchCounters {
            unknown_colors: 3,
            index_mismatches: 1,
            emphasis_mismatches: 1,
        }
    );
    assert_eq!(scan.totals.total(), 5);
    assert_eq!(
        scan.before_first.to_string(),
        "unknown_colors=2, idx_mismatches=0, emph_mismatches=0"
    );
}

#[test]
fn test_scan_frame_clean() {
    let map = ReverseMap::shared();
    let mut rgb24 = Vec::new();
    let mut indices = Vec::new();
    let mut emphasis = Vec::new();
    for index in 0..64u8 {
        let emph = index % EMPHASIS_COUNT;
        push(&mut rgb24, emphasized_color(index, emph));
        indices.push(index);
        emphasis.push(emph);
    }
    let scan = scan_frame(1, 8, &rgb24, &indices, &emphasis, map);
    assert!(scan.is_match());
    assert_eq!(scan.totals, MismatchCounters::default());
    assert_eq!(scan.before_first, scan.totals);
}

#[test]
fn test_palette_index_reason_and_ambiguity() {
    let map = ReverseMap::shared();
    let mut rgb24 = Vec::new();
    push(&mut rgb24, Rgb::new(0, 0, 0));
    let scan = scan_frame(0, 1, &rgb24, &[0x01], &[0], map);
    let first = scan.first.expect("mismatch");
    assert_eq!(first.reason, MismatchReason::PaletteIndex);
    assert!(first.is_ambiguous());
    assert_eq!(first.reason.to_string(), "palette_index");
}
