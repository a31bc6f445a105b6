//! Command implementations.
//!
//! Each handler builds a pipeline configuration from its arguments, runs the
//! pipeline into a buffer and prints the report only once every input has
//! loaded.

mod frame;
mod trace;

use std::io::{self, Write};

use nesdiff::Outcome;

use crate::cli::{Cli, Commands, EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal::{self, Spinner};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    let silent = cli.silent;
    match &cli.command {
        Commands::PpuReg {
            inputs,
            fields,
            strict_timing,
            window,
        } => trace::cmd_ppu_reg(inputs, fields.as_deref(), *strict_timing, *window, silent),
        Commands::Apu {
            inputs,
            fields,
            context,
            include_read_mem,
        } => trace::cmd_apu(inputs, fields.as_deref(), *context, *include_read_mem, silent),
        Commands::Nmi {
            inputs,
            fields,
            context,
        } => trace::cmd_nmi(inputs, fields.as_deref(), *context, silent),
        Commands::Rgb {
            prefixes,
            frames,
            geometry,
        } => frame::cmd_rgb(prefixes, frames, (*geometry).into(), silent),
        Commands::Palette {
            prefixes,
            frames,
            candidates,
            geometry,
        } => frame::cmd_palette(prefixes, frames, *candidates, (*geometry).into(), silent),
        Commands::Mask {
            a,
            b,
            top_rows,
            geometry,
        } => frame::cmd_mask(a, b, *top_rows, (*geometry).into(), silent),
    }
}

/// Run a pipeline into a buffer, print the report and map the outcome to an
/// exit code.
fn run_report<F>(what: &str, silent: bool, run: F) -> i32
where
    F: FnOnce(&mut Vec<u8>) -> nesdiff::Result<Outcome>,
{
    let spinner = (!silent).then(|| Spinner::new(format!("Comparing {what}...")));
    let mut report = Vec::new();
    let result = run(&mut report);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            terminal::error(&err.to_string());
            return EXIT_FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout.write_all(&report).and_then(|()| stdout.flush()) {
        terminal::error(&format!("failed to write report: {err}"));
        return EXIT_FAILURE;
    }

    if outcome.is_match() {
        if !silent {
            terminal::success(&format!("{what}: match"));
        }
        EXIT_SUCCESS
    } else {
        if !silent {
            terminal::warning(&format!("{what}: divergence found"));
        }
        EXIT_FAILURE
    }
}
