use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    classifications_total: AtomicU64,
    persisted_total: AtomicU64,
    empty_defaults_total: AtomicU64,
    total_latency_micros: AtomicU64,
    patterns: Mutex<BTreeMap<&'static str, u64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub classifications_total: u64,
    pub persisted_total: u64,
    pub empty_defaults_total: u64,
    pub avg_latency_micros: f64,
    pub patterns: BTreeMap<&'static str, u64>,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_classification(&self, pattern: &'static str) {
        self.classifications_total.fetch_add(1, Ordering::Relaxed);
        *self.patterns.lock().entry(pattern).or_insert(0) += 1;
    }

    pub fn inc_persisted(&self) {
        self.persisted_total.fetch_add(1, Ordering::Relaxed);
    }

    /// An assessment arrived with no answers at all.
    pub fn inc_empty_default(&self) {
        self.empty_defaults_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            classifications_total: self.classifications_total.load(Ordering::Relaxed),
            persisted_total: self.persisted_total.load(Ordering::Relaxed),
            empty_defaults_total: self.empty_defaults_total.load(Ordering::Relaxed),
            avg_latency_micros: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
            patterns: self.patterns.lock().clone(),
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,dottie_api=info,dottie_service=info",
                service_name
            ))
        });

        // stdout is reserved for command output.
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tallies_patterns() {
        let metrics = AppMetrics::default();
        metrics.inc_request();
        metrics.inc_request();
        metrics.record_classification("heavy");
        metrics.record_classification("heavy");
        metrics.record_classification("pain");
        metrics.observe_latency(Duration::from_micros(300));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.classifications_total, 3);
        assert_eq!(snapshot.patterns.get("heavy"), Some(&2));
        assert_eq!(snapshot.patterns.get("pain"), Some(&1));
        assert_eq!(snapshot.avg_latency_micros, 150.0);
    }

    #[test]
    fn empty_snapshot_has_zero_latency() {
        assert_eq!(AppMetrics::default().snapshot().avg_latency_micros, 0.0);
    }
}
