//! Comparison metrics on top of the `metrics` facade.
//!
//! Pipelines record through the global recorder; the CLI installs
//! [`CliRecorder`] with `--metrics` and prints a summary on exit.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit, counter,
    describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use parking_lot::RwLock;

use crate::{DiffFootprint, FrameDiffStats, PaletteScan, TraceComparison, TraceLog};

/// Which input a trace metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reference,
    Test,
}

impl Side {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Test => "test",
        }
    }
}

/// Register metric descriptions. Call once at startup.
pub fn init() {
    describe_counter!(
        "nesdiff_trace_lines_total",
        Unit::Count,
        "Trace lines read"
    );
    describe_counter!(
        "nesdiff_trace_events_total",
        Unit::Count,
        "Trace events kept after normalization"
    );
    describe_counter!(
        "nesdiff_events_compared_total",
        Unit::Count,
        "Event pairs that agreed before the first divergence"
    );
    describe_counter!(
        "nesdiff_pixels_compared_total",
        Unit::Count,
        "Pixels compared across frames and masks"
    );
    describe_counter!(
        "nesdiff_pixels_diff_total",
        Unit::Count,
        "Pixels that differed"
    );
    describe_counter!(
        "nesdiff_unknown_colors_total",
        Unit::Count,
        "Reference pixels no palette pair produces"
    );

    describe_gauge!(
        "nesdiff_frame_diff_pct",
        Unit::Percent,
        "Share of differing pixels in a frame"
    );

    describe_histogram!(
        "nesdiff_frame_diff_pct_dist",
        Unit::Percent,
        "Distribution of per-frame difference percentages"
    );
}

/// Record line and event counts for one loaded trace.
pub fn record_trace_load(side: Side, log: &TraceLog) {
    let labels = [("side", side.as_str())];
    counter!("nesdiff_trace_lines_total", &labels).increment(log.lines as u64);
    counter!("nesdiff_trace_events_total", &labels).increment(log.events.len() as u64);
}

pub fn record_trace_comparison(comparison: &TraceComparison) {
    counter!("nesdiff_events_compared_total").increment(comparison.matched as u64);
}

/// Record one RGB frame comparison.
pub fn record_frame_diff(stats: &FrameDiffStats) {
    record_footprint(&stats.footprint);
    let labels = [("frame", stats.frame.to_string())];
    gauge!("nesdiff_frame_diff_pct", &labels).set(stats.pct_diff());
    histogram!("nesdiff_frame_diff_pct_dist").record(stats.pct_diff());
}

/// Record a mask comparison.
pub fn record_footprint(footprint: &DiffFootprint) {
    counter!("nesdiff_pixels_compared_total").increment(footprint.pixels_total() as u64);
    counter!("nesdiff_pixels_diff_total").increment(footprint.pixels_diff as u64);
}

pub fn record_palette_scan(scan: &PaletteScan) {
    counter!("nesdiff_unknown_colors_total").increment(scan.totals.unknown_colors as u64);
}

// ============================================================================
// CLI Recorder for terminal output
// ============================================================================

#[derive(Default)]
struct CounterStorage {
    values: RwLock<HashMap<String, u64>>,
}

#[derive(Default)]
struct GaugeStorage {
    values: RwLock<HashMap<String, f64>>,
}

#[derive(Default)]
struct HistogramStorage {
    values: RwLock<HashMap<String, Vec<f64>>>,
}

struct CliCounter {
    key: String,
    storage: Arc<CounterStorage>,
}

impl metrics::CounterFn for CliCounter {
    fn increment(&self, value: u64) {
        *self.storage.values.write().entry(self.key.clone()).or_insert(0) += value;
    }

    fn absolute(&self, value: u64) {
        self.storage.values.write().insert(self.key.clone(), value);
    }
}

struct CliGauge {
    key: String,
    storage: Arc<GaugeStorage>,
}

impl metrics::GaugeFn for CliGauge {
    fn increment(&self, value: f64) {
        *self.storage.values.write().entry(self.key.clone()).or_insert(0.0) += value;
    }

    fn decrement(&self, value: f64) {
        *self.storage.values.write().entry(self.key.clone()).or_insert(0.0) -= value;
    }

    fn set(&self, value: f64) {
        self.storage.values.write().insert(self.key.clone(), value);
    }
}

struct CliHistogram {
    key: String,
    storage: Arc<HistogramStorage>,
}

impl metrics::HistogramFn for CliHistogram {
    fn record(&self, value: f64) {
        self.storage
            .values
            .write()
            .entry(self.key.clone())
            .or_default()
            .push(value);
    }
}

/// In-memory recorder whose contents are printed at exit.
#[derive(Default)]
pub struct CliRecorder {
    counters: Arc<CounterStorage>,
    gauges: Arc<GaugeStorage>,
    histograms: Arc<HistogramStorage>,
}

impl CliRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as the global recorder.
    ///
    /// Returns `None` if a recorder is already installed.
    pub fn install(self) -> Option<CliRecorderHandle> {
        let handle = CliRecorderHandle {
            counters: Arc::clone(&self.counters),
            gauges: Arc::clone(&self.gauges),
            histograms: Arc::clone(&self.histograms),
        };
        metrics::set_global_recorder(self).ok()?;
        Some(handle)
    }
}

fn key_to_string(key: &Key) -> String {
    let labels: Vec<String> = key
        .labels()
        .map(|l| format!("{}={}", l.key(), l.value()))
        .collect();
    if labels.is_empty() {
        key.name().to_string()
    } else {
        format!("{}{{{}}}", key.name(), labels.join(","))
    }
}

impl Recorder for CliRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(CliCounter {
            key: key_to_string(key),
            storage: Arc::clone(&self.counters),
        }))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Arc::new(CliGauge {
            key: key_to_string(key),
            storage: Arc::clone(&self.gauges),
        }))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(CliHistogram {
            key: key_to_string(key),
            storage: Arc::clone(&self.histograms),
        }))
    }
}

/// Read access to metrics collected by an installed [`CliRecorder`].
pub struct CliRecorderHandle {
    counters: Arc<CounterStorage>,
    gauges: Arc<GaugeStorage>,
    histograms: Arc<HistogramStorage>,
}

impl CliRecorderHandle {
    /// Print collected metrics to stderr, sorted by key.
    #[allow(clippy::cast_precision_loss)]
    pub fn print_summary(&self) {
        let counters = self.counters.values.read();
        let gauges = self.gauges.values.read();
        let histograms = self.histograms.values.read();

        if counters.is_empty() && gauges.is_empty() && histograms.is_empty() {
            eprintln!("No metrics collected.");
            return;
        }

        eprintln!();
        eprintln!("## Metrics Summary");

        if !counters.is_empty() {
            eprintln!();
            eprintln!("### Counters");
            for (key, value) in sorted(&counters) {
                eprintln!("  {key}: {value}");
            }
        }

        if !gauges.is_empty() {
            eprintln!();
            eprintln!("### Gauges");
            for (key, value) in sorted(&gauges) {
                eprintln!("  {key}: {value:.4}");
            }
        }

        if !histograms.is_empty() {
            eprintln!();
            eprintln!("### Histograms");
            for (key, values) in sorted(&histograms) {
                if values.is_empty() {
                    continue;
                }
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let avg = values.iter().sum::<f64>() / values.len() as f64;
                eprintln!(
                    "  {key}: count={}, min={min:.4}, max={max:.4}, avg={avg:.4}",
                    values.len()
                );
            }
        }
    }
}

fn sorted<V>(map: &HashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}
