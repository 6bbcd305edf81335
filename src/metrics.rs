//! Prometheus metrics for dice rolls and readiness.
//!
//! Every [`DiceMetrics`] owns its own recorder rather than installing a
//! global one, so separate service instances never share counters. The
//! `metrics` macros are evaluated against that recorder through
//! [`metrics::with_local_recorder`].

use std::fmt;
use std::sync::Arc;

use metrics::{counter, describe_counter, describe_gauge, gauge, with_local_recorder};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tracing::debug;

// === Metric Name Constants ===

/// Dice rolls counter metric name.
pub const METRIC_DICE_ROLLS: &str = "dice_rolls_total";
/// Readiness gauge metric name.
pub const METRIC_APP_READY: &str = "app_ready";

/// Content type of the text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Recorder and render handle for one service instance.
#[derive(Clone)]
pub struct DiceMetrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl DiceMetrics {
    /// Build a recorder and register all metric descriptions.
    ///
    /// The roll counter is registered at zero so it shows up in the very
    /// first scrape.
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let metrics = Self {
            recorder: Arc::new(recorder),
            handle,
        };

        metrics.scoped(|| {
            describe_counter!(METRIC_DICE_ROLLS, "Total dice rolls");
            describe_gauge!(METRIC_APP_READY, "1 if app is ready, 0 otherwise");
            counter!(METRIC_DICE_ROLLS).absolute(0);
        });

        debug!("Metrics initialized");
        metrics
    }

    fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        with_local_recorder(&*self.recorder, f)
    }

    /// Increment dice rolls counter.
    pub fn inc_dice_rolls(&self) {
        self.scoped(|| counter!(METRIC_DICE_ROLLS).increment(1));
    }

    /// Set the readiness gauge to 1 or 0.
    pub fn set_ready(&self, ready: bool) {
        let value = if ready { 1.0 } else { 0.0 };
        self.scoped(|| gauge!(METRIC_APP_READY).set(value));
    }

    /// Render the current state in the text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl Default for DiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiceMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceMetrics").finish_non_exhaustive()
    }
}

/// Find the value of an unlabelled sample in rendered exposition text.
pub fn sample_value(exposition: &str, name: &str) -> Option<f64> {
    exposition
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (metric, value) = line.split_once(' ')?;
            if metric == name {
                value.trim().parse().ok()
            } else {
                None
            }
        })
}
