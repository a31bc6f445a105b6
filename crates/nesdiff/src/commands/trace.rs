use nesdiff::{FieldSet, TraceConfig, TraceProfile, compare_traces};

use super::run_report;
use crate::cli::{EXIT_FAILURE, TraceInputs};
use crate::terminal;

/// Build a config from the profile defaults and any overrides.
fn trace_config(
    profile: TraceProfile,
    fields: Option<&str>,
    context: usize,
) -> Result<TraceConfig, nesdiff::TraceError> {
    let config = TraceConfig::new(profile).with_context(context);
    match fields {
        Some(csv) => Ok(config.with_fields(csv.parse()?)),
        None => Ok(config),
    }
}

fn run_trace(inputs: &TraceInputs, config: Result<TraceConfig, nesdiff::TraceError>, silent: bool) -> i32 {
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            terminal::error(&err.to_string());
            return EXIT_FAILURE;
        }
    };
    let what = format!("{} traces", config.profile.name());
    run_report(&what, silent, |out| {
        compare_traces(out, &inputs.reference, &inputs.test, &config)
    })
}

pub fn cmd_ppu_reg(
    inputs: &TraceInputs,
    fields: Option<&str>,
    strict_timing: bool,
    window: usize,
    silent: bool,
) -> i32 {
    let config = trace_config(TraceProfile::PpuReg, fields, window).map(|config| {
        if strict_timing {
            config.with_fields(FieldSet::strict_timing())
        } else {
            config
        }
    });
    run_trace(inputs, config, silent)
}

pub fn cmd_apu(
    inputs: &TraceInputs,
    fields: Option<&str>,
    context: usize,
    include_read_mem: bool,
    silent: bool,
) -> i32 {
    let profile = TraceProfile::Apu { include_read_mem };
    run_trace(inputs, trace_config(profile, fields, context), silent)
}

pub fn cmd_nmi(inputs: &TraceInputs, fields: Option<&str>, context: usize, silent: bool) -> i32 {
    run_trace(inputs, trace_config(TraceProfile::Nmi, fields, context), silent)
}
