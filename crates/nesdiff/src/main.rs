//! nesdiff CLI - emulator differential testing

mod cli;
mod commands;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let metrics_handle = if cli.metrics {
        nesdiff::metrics::CliRecorder::new().install()
    } else {
        None
    };
    nesdiff::metrics::init();

    let default_level = if cli.verbose {
        "nesdiff=debug"
    } else if cli.silent {
        "nesdiff=error"
    } else {
        "nesdiff=warn"
    };
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = default_level.parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = commands::run_command(&cli);

    if let Some(handle) = metrics_handle {
        handle.print_summary();
    }

    std::process::exit(exit_code);
}
