use std::path::Path;

use nesdiff::{
    FrameGeometry, FrameList, PaletteConfig, compare_mask_files, compare_rgb_frames,
    scan_palette_frames,
};

use super::run_report;
use crate::cli::{DumpPrefixes, EXIT_FAILURE};
use crate::terminal;

fn parse_frames(frames: &str, min: usize) -> Option<FrameList> {
    match FrameList::parse(frames, min) {
        Ok(list) => Some(list),
        Err(err) => {
            terminal::error(&err.to_string());
            None
        }
    }
}

pub fn cmd_rgb(prefixes: &DumpPrefixes, frames: &str, geometry: FrameGeometry, silent: bool) -> i32 {
    let Some(frames) = parse_frames(frames, 2) else {
        return EXIT_FAILURE;
    };
    run_report("rgb24 frames", silent, |out| {
        compare_rgb_frames(
            out,
            &prefixes.reference_prefix,
            &prefixes.test_prefix,
            &frames,
            geometry,
        )
    })
}

pub fn cmd_palette(
    prefixes: &DumpPrefixes,
    frames: &str,
    candidates: usize,
    geometry: FrameGeometry,
    silent: bool,
) -> i32 {
    let Some(frames) = parse_frames(frames, 1) else {
        return EXIT_FAILURE;
    };
    let config = PaletteConfig {
        geometry,
        candidates,
    };
    run_report("palette planes", silent, |out| {
        scan_palette_frames(
            out,
            &prefixes.reference_prefix,
            &prefixes.test_prefix,
            &frames,
            config,
        )
    })
}

pub fn cmd_mask(a: &Path, b: &Path, top_rows: usize, geometry: FrameGeometry, silent: bool) -> i32 {
    run_report("masks", silent, |out| {
        compare_mask_files(out, a, b, geometry, top_rows)
    })
}
