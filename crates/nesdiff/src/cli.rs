//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nesdiff::FrameGeometry;

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for divergence or failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "nesdiff")]
#[command(about = "Differential testing for NES emulators - compares traces and frame dumps")]
#[command(version)]
pub struct Cli {
    /// Show metrics summary after execution
    #[arg(long, global = true)]
    pub metrics: bool,

    /// Enable verbose output (sets nesdiff=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress status output (only show reports and errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare PPU register-write traces (PPUREG lines)
    PpuReg {
        #[command(flatten)]
        inputs: TraceInputs,

        /// Comma-separated fields to compare [default: addr,value]
        #[arg(long, value_name = "CSV", conflicts_with = "strict_timing")]
        fields: Option<String>,

        /// Compare cpu_cycle,frame,scanline,dot,addr,value,v,t
        #[arg(long)]
        strict_timing: bool,

        /// Events of context around a divergence
        #[arg(long, default_value_t = 8)]
        window: usize,
    },
    /// Compare APU bus traces (APUTRACE lines)
    Apu {
        #[command(flatten)]
        inputs: TraceInputs,

        /// Comma-separated fields to compare [default: ev,addr,value]
        #[arg(long, value_name = "CSV")]
        fields: Option<String>,

        /// Events of context around a divergence
        #[arg(long, default_value_t = 3)]
        context: usize,

        /// Also compare read_mem events
        #[arg(long)]
        include_read_mem: bool,
    },
    /// Compare NMI timing traces (NMITRACE lines)
    Nmi {
        #[command(flatten)]
        inputs: TraceInputs,

        /// Comma-separated fields to compare [default: ev,addr,value]
        #[arg(long, value_name = "CSV")]
        fields: Option<String>,

        /// Events of context around a divergence
        #[arg(long, default_value_t = 4)]
        context: usize,
    },
    /// Compare RGB24 frame dumps pixel by pixel
    Rgb {
        #[command(flatten)]
        prefixes: DumpPrefixes,

        /// Comma-separated frame numbers (at least 2 distinct)
        #[arg(long, default_value = "60,180,360,600")]
        frames: String,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
    /// Find the first pixel whose palette index or emphasis bits disagree
    Palette {
        #[command(flatten)]
        prefixes: DumpPrefixes,

        /// Comma-separated frame numbers
        #[arg(long, default_value = "60")]
        frames: String,

        /// Candidate pairs listed per mismatch
        #[arg(long, default_value_t = 8)]
        candidates: usize,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
    /// Compare two 1bpp frame masks
    Mask {
        /// Mask A
        #[arg(long, value_name = "PATH")]
        a: PathBuf,

        /// Mask B
        #[arg(long, value_name = "PATH")]
        b: PathBuf,

        /// Rows with the most differences to list
        #[arg(long, default_value_t = 20)]
        top_rows: usize,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
}

/// Reference and test trace files.
#[derive(Args)]
pub struct TraceInputs {
    /// Reference emulator trace (.zst accepted)
    #[arg(long, visible_alias = "mesen", value_name = "PATH")]
    pub reference: PathBuf,

    /// Trace of the emulator under test (.zst accepted)
    #[arg(long, visible_alias = "nesium", value_name = "PATH")]
    pub test: PathBuf,
}

/// Dump prefixes; files are named `{prefix}_f{frame}.{ext}`.
#[derive(Args)]
pub struct DumpPrefixes {
    /// Reference emulator dump prefix
    #[arg(long, visible_alias = "mesen-prefix", value_name = "PREFIX")]
    pub reference_prefix: PathBuf,

    /// Dump prefix of the emulator under test
    #[arg(long, visible_alias = "nesium-prefix", value_name = "PREFIX")]
    pub test_prefix: PathBuf,
}

#[derive(Args, Clone, Copy)]
pub struct GeometryArgs {
    /// Frame width in pixels
    #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = 240, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,
}

impl From<GeometryArgs> for FrameGeometry {
    fn from(args: GeometryArgs) -> Self {
        Self::new(args.width as usize, args.height as usize)
    }
}
