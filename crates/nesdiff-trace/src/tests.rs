use super::*;
use crate::report::{SideLabels, TraceReport, window_bounds, write_window};

fn ppu_line(cpu: u64, value: &str) -> String {
    format!("PPUREG|src=x|ev=write|cpu_cycle={cpu}|frame=0|scanline=0|dot=0|addr=2006|value={value}")
}

fn ppu_events(lines: &[String]) -> Vec<TraceEvent> {
    TraceLog::parse(&lines.join("\n"), TraceProfile::PpuReg).events
}

#[test]
fn test_ppu_value_mismatch_at_index_zero() {
    let reference = ppu_events(&[ppu_line(10, "3F")]);
    let test = ppu_events(&[ppu_line(10, "3E")]);
    let fields: FieldSet = "addr,value".parse().unwrap();

    let result = compare_events(&reference, &test, &fields);
    let div = result.divergence.expect("divergence");
    assert_eq!(div.index, 0);
    assert_eq!(div.kind, DivergenceKind::Fields);
    assert_eq!(div.fields, vec![Field::Value]);

    let r = div.reference.unwrap();
    let t = div.test.unwrap();
    assert_eq!(r.display(Field::Addr), "2006");
    assert_eq!(t.display(Field::Addr), "2006");
    assert_eq!(r.display(Field::Value), "3F");
    assert_eq!(t.display(Field::Value), "3E");
}

#[test]
fn test_identical_sequences_match_for_any_field_set() {
    let lines: Vec<String> = (0..5).map(|i| ppu_line(10 + i, "3F")).collect();
    let events = ppu_events(&lines);
    for fields in [
        FieldSet::strict_timing(),
        "addr".parse().unwrap(),
        "ev,cpu_cycle,x".parse().unwrap(),
    ] {
        let result = compare_events(&events, &events, &fields);
        assert!(result.is_match(), "fields {fields}");
        assert_eq!(result.matched, 5);
    }
}

#[test]
fn test_single_field_difference_located_or_ignored() {
    let reference_lines: Vec<String> = (0..6).map(|i| ppu_line(100 + i, "10")).collect();
    let mut test_lines = reference_lines.clone();
    test_lines[3] = ppu_line(999, "10");
    let reference = ppu_events(&reference_lines);
    let test = ppu_events(&test_lines);

    let only_cycle: FieldSet = "cpu_cycle".parse().unwrap();
    let result = compare_events(&reference, &test, &only_cycle);
    assert_eq!(result.divergence.map(|d| d.index), Some(3));

    let without_cycle: FieldSet = "addr,value,frame,scanline,dot".parse().unwrap();
    assert!(compare_events(&reference, &test, &without_cycle).is_match());
}

#[test]
fn test_length_mismatch_reported_at_shorter_length() {
    let lines: Vec<String> = (0..4).map(|i| ppu_line(i, "01")).collect();
    let long = ppu_events(&lines);
    let short = ppu_events(&lines[..2]);
    let fields = FieldSet::strict_timing();

    let result = compare_events(&long, &short, &fields);
    let div = result.divergence.unwrap();
    assert_eq!(div.index, 2);
    assert_eq!(div.kind, DivergenceKind::ReferenceTail);
    assert!(div.reference.is_some());
    assert!(div.test.is_none());
    assert_eq!(result.matched, 2);

    let div = compare_events(&short, &long, &fields).divergence.unwrap();
    assert_eq!(div.index, 2);
    assert_eq!(div.kind, DivergenceKind::TestTail);
    assert!(div.reference.is_none());
    assert_eq!(div.test.map(|e| e.ordinal), Some(2));
}

#[test]
fn test_empty_traces_match() {
    let result = compare_events(&[], &[], &FieldSet::strict_timing());
    assert!(result.is_match());
    assert_eq!(result.matched, 0);
}

#[test]
fn test_dropped_lines_do_not_consume_ordinals() {
    let text = "\
garbage line
PPUREG|ev=write|addr=2000|value=80
PPUREG|ev=read|addr=2002|value=00
APUTRACE|ev=write|addr=4015|value=0F
PPUREG|ev=write|addr=2001|value=1E
";
    let log = TraceLog::parse(text, TraceProfile::PpuReg);
    assert_eq!(log.lines, 5);
    assert_eq!(log.untagged, 2);
    assert_eq!(log.dropped, 1);
    let ordinals: Vec<usize> = log.events.iter().map(|e| e.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1]);
    assert_eq!(log.events[1].display(Field::Addr), "2001");
}

#[test]
fn test_fields_preserve_unknown_keys() {
    let log = TraceLog::parse(
        "PPUREG|src=nesium|ev=write|addr=2005|value=7|mystery=42",
        TraceProfile::PpuReg,
    );
    let event = &log.events[0];
    assert_eq!(event.fields.get("mystery"), Some("42"));
    assert_eq!(event.fields.get("src"), Some("nesium"));
    assert_eq!(event.raw, "PPUREG|src=nesium|ev=write|addr=2005|value=7|mystery=42");
}

#[test]
fn test_ppu_missing_or_malformed_fields_are_sentinel() {
    let log = TraceLog::parse("PPUREG|ev=write|addr=zz|frame=abc", TraceProfile::PpuReg);
    let event = &log.events[0];
    assert_eq!(event.numeric(Field::Addr), SENTINEL);
    assert_eq!(event.numeric(Field::Value), SENTINEL);
    assert_eq!(event.numeric(Field::Frame), SENTINEL);
    assert_eq!(event.display(Field::Addr), "----");
    assert_eq!(event.display(Field::Frame), "-1");
}

#[test]
fn test_hex_case_and_prefix_compare_equal() {
    let a = TraceLog::parse("PPUREG|ev=write|addr=0x2006|value=3f|v=0x23c0", TraceProfile::PpuReg);
    let b = TraceLog::parse("PPUREG|ev=write|addr=2006|value=3F|v=23C0", TraceProfile::PpuReg);
    let fields: FieldSet = "addr,value,v".parse().unwrap();
    assert!(compare_events(&a.events, &b.events, &fields).is_match());
}

#[test]
fn test_apu_profile_filters_kinds() {
    let text = "\
APUTRACE|ev=write|addr=4015|value=0F
APUTRACE|ev=read_mem|addr=C000|value=EA
APUTRACE|ev=read|addr=4015
APUTRACE|ev=write|addr=|value=01
APUTRACE|ev=clock|addr=4017|value=40
";
    let plain = TraceLog::parse(text, TraceProfile::Apu { include_read_mem: false });
    let kinds: Vec<EventKind> = plain.events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Write, EventKind::Read]);
    // Missing value defaults to 00.
    assert_eq!(plain.events[1].display(Field::Value), "00");

    let with_mem = TraceLog::parse(text, TraceProfile::Apu { include_read_mem: true });
    assert_eq!(with_mem.events.len(), 3);
    assert_eq!(with_mem.events[1].kind, EventKind::ReadMem);
    assert_eq!(with_mem.events[2].ordinal, 2);
}

#[test]
fn test_nmi_vocabularies_normalize_to_one_kind() {
    let mesen = "\
NMITRACE|src=mesen|ev=write|addr=2000|value=80
NMITRACE|src=mesen|ev=nmi_event|frame=1
NMITRACE|src=mesen|ev=nmi_take|frame=1
";
    let nesium = "\
NMITRACE|src=nesium|ev=write|addr=0x2000|value=0x80
NMITRACE|src=nesium|ev=nmi_take|frame=1
NMITRACE|src=nesium|ev=nmi_event|frame=1
";
    let a = TraceLog::parse(mesen, TraceProfile::Nmi);
    let b = TraceLog::parse(nesium, TraceProfile::Nmi);
    assert_eq!(a.events.len(), 2);
    assert_eq!(b.events.len(), 2);
    assert_eq!(a.events[1].kind, EventKind::NmiTake);
    assert_eq!(b.events[1].kind, EventKind::NmiTake);
    assert_eq!(a.events[1].numeric(Field::Addr), SENTINEL);

    let fields = TraceProfile::Nmi.default_fields();
    assert!(compare_events(&a.events, &b.events, &fields).is_match());
}

#[test]
fn test_nmi_drops_bus_events_without_payload() {
    let text = "\
NMITRACE|src=nesium|ev=write|addr=2000
NMITRACE|src=nesium|ev=read|value=10
NMITRACE|src=nesium|ev=read|addr=2002|value=90
";
    let log = TraceLog::parse(text, TraceProfile::Nmi);
    assert_eq!(log.events.len(), 1);
    assert_eq!(log.dropped, 2);
    assert_eq!(log.events[0].display(Field::Value), "90");
}

#[test]
fn test_nmi_empty_payload_reads_as_zero() {
    let text = "\
NMITRACE|src=mesen|ev=write|addr=|value=
NMITRACE|src=mesen|ev=write|addr=2000|value=80
NMITRACE|src=mesen|ev=read|addr=zz|value=00
";
    let log = TraceLog::parse(text, TraceProfile::Nmi);
    assert_eq!(log.events.len(), 2);
    assert_eq!(log.dropped, 1);
    assert_eq!(log.events[0].display(Field::Addr), "0000");
    assert_eq!(log.events[0].display(Field::Value), "00");
    assert_eq!(log.events[1].ordinal, 1);
    assert_eq!(log.events[1].display(Field::Addr), "2000");
}

#[test]
fn test_apu_empty_addr_is_dropped() {
    let profile = TraceProfile::Apu { include_read_mem: false };
    let log = TraceLog::parse("APUTRACE|ev=write|addr=|value=01\nAPUTRACE|ev=write|addr=4015|value=\n", profile);
    assert_eq!(log.events.len(), 1);
    assert_eq!(log.dropped, 1);
    assert_eq!(log.events[0].display(Field::Value), "00");
}

#[test]
fn test_kind_field_detects_event_kind_change() {
    let a = TraceLog::parse("NMITRACE|src=mesen|ev=read|addr=2002|value=80", TraceProfile::Nmi);
    let b = TraceLog::parse("NMITRACE|src=nesium|ev=write|addr=2002|value=80", TraceProfile::Nmi);
    let result = compare_events(&a.events, &b.events, &TraceProfile::Nmi.default_fields());
    assert_eq!(result.divergence.unwrap().fields, vec![Field::Kind]);
}

#[test]
fn test_field_set_parsing() {
    let set: FieldSet = " addr, value ,,addr ".parse().unwrap();
    assert_eq!(set.to_string(), "addr,value");
    assert!(matches!("".parse::<FieldSet>(), Err(TraceError::NoFields)));
    assert!(matches!(
        "addr,bogus".parse::<FieldSet>(),
        Err(TraceError::UnknownField(name)) if name == "bogus"
    ));
    assert_eq!(
        FieldSet::strict_timing().to_string(),
        "cpu_cycle,frame,scanline,dot,addr,value,v,t"
    );
}

#[test]
fn test_window_bounds_clamp() {
    assert_eq!(window_bounds(10, 0, 3), (0, 4));
    assert_eq!(window_bounds(10, 9, 3), (6, 10));
    assert_eq!(window_bounds(10, 5, 0), (5, 6));
    assert_eq!(window_bounds(2, 5, 1), (2, 2));
    assert_eq!(window_bounds(0, 0, 8), (0, 0));
}

#[test]
fn test_write_window_marks_center() {
    let lines: Vec<String> = (0..5).map(|i| ppu_line(i, "00")).collect();
    let events = ppu_events(&lines);
    let mut out = Vec::new();
    write_window(&mut out, "mesen", TraceProfile::PpuReg, &events, 2, 1).unwrap();
    let text = String::from_utf8(out).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows[0], "mesen window [1..3]:");
    assert_eq!(rows.len(), 4);
    assert!(rows[1].starts_with("  #000001"));
    assert!(rows[2].starts_with(">>#000002"));
    assert!(rows[3].starts_with("  #000003"));
}

#[test]
fn test_report_for_tail_divergence() {
    let text = "APUTRACE|ev=write|addr=4000|value=30\nAPUTRACE|ev=write|addr=4001|value=08\n";
    let profile = TraceProfile::Apu { include_read_mem: false };
    let reference = TraceLog::parse(text, profile);
    let test = TraceLog::parse(text.lines().next().unwrap(), profile);
    let fields = profile.default_fields();
    let comparison = compare_events(&reference.events, &test.events, &fields);

    let mut out = Vec::new();
    TraceReport {
        profile,
        labels: SideLabels::default(),
        reference: &reference,
        test: &test,
        fields: &fields,
        comparison: &comparison,
        radius: 3,
    }
    .write(&mut out)
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("first divergence at event #1: reference trace has extra tail"));
    assert!(text.contains("event count mismatch: mesen=2 nesium=1"));
    assert!(text.contains("nesium  : <end of stream>"));
    assert!(text.contains(">> #0001 write 4001=08 | APUTRACE|ev=write|addr=4001|value=08"));
    assert!(text.contains("mesen context [0:2):"));
    assert!(text.contains("nesium context [0:1):"));
}

#[test]
fn test_load_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.log");
    assert!(matches!(
        TraceLog::load(&path, TraceProfile::PpuReg),
        Err(TraceError::Missing(p)) if p == path
    ));
}

#[test]
fn test_load_zstd_trace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.log.zst");
    let text = format!("{}\n{}\n", ppu_line(1, "01"), ppu_line(2, "02"));
    let packed = zstd::encode_all(text.as_bytes(), 3).unwrap();
    std::fs::write(&path, packed).unwrap();

    let events = parse_trace_file(&path, TraceProfile::PpuReg).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].numeric(Field::CpuCycle), 2);
}

#[test]
fn test_load_tolerates_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.log");
    let mut bytes = b"\xff\xfe junk\r\n".to_vec();
    bytes.extend_from_slice(ppu_line(7, "AA").as_bytes());
    bytes.extend_from_slice(b"\r\n");
    std::fs::write(&path, bytes).unwrap();

    let log = TraceLog::load(&path, TraceProfile::PpuReg).unwrap();
    assert_eq!(log.events.len(), 1);
    assert_eq!(log.events[0].display(Field::Value), "AA");
    assert!(!log.events[0].raw.ends_with('\r'));
}
