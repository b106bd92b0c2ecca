use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Global metrics instance.
pub static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Metrics collector for the banking engine.
#[derive(Debug, Clone)]
pub struct Metrics {
    initialized: bool,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self { initialized: true }
    }

    pub fn record_ledger_operation(&self, operation: &str) {
        counter!("banking_ledger_operations_total", "operation" => operation.to_string())
            .increment(1);
    }

    pub fn record_ledger_failure(&self, operation: &str, reason: &str) {
        counter!("banking_ledger_failures_total", "operation" => operation.to_string(), "reason" => reason.to_string())
            .increment(1);
    }

    pub fn record_ledger_write_latency(&self, duration_ms: f64) {
        histogram!("banking_ledger_write_duration_ms").record(duration_ms);
    }

    pub fn record_application_submitted(&self, kind: &str) {
        counter!("banking_applications_submitted_total", "kind" => kind.to_string()).increment(1);
    }

    pub fn record_application_decided(&self, kind: &str, decision: &str) {
        counter!("banking_applications_decided_total", "kind" => kind.to_string(), "decision" => decision.to_string())
            .increment(1);
    }

    pub fn record_statement_query(&self, filtered: bool) {
        counter!("banking_statement_queries_total", "filtered" => filtered.to_string())
            .increment(1);
    }
}

/// Timer for measuring operation latency.
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for LatencyTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Initializes the metrics system and returns the Prometheus handle.
pub fn init_metrics() -> PrometheusHandle {
    let handle = METRICS_HANDLE.get_or_init(|| {
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        describe_metrics();
        handle
    });

    METRICS.get_or_init(Metrics::new);

    handle.clone()
}

/// Describes all metrics for Prometheus.
fn describe_metrics() {
    describe_counter!(
        "banking_ledger_operations_total",
        Unit::Count,
        "Committed ledger operations by kind"
    );
    describe_counter!(
        "banking_ledger_failures_total",
        Unit::Count,
        "Rejected or failed ledger operations by kind and reason"
    );
    describe_histogram!(
        "banking_ledger_write_duration_ms",
        Unit::Milliseconds,
        "Ledger write latency in milliseconds"
    );
    describe_counter!(
        "banking_applications_submitted_total",
        Unit::Count,
        "Deposit applications submitted by kind"
    );
    describe_counter!(
        "banking_applications_decided_total",
        Unit::Count,
        "Deposit applications decided by kind and decision"
    );
    describe_counter!(
        "banking_statement_queries_total",
        Unit::Count,
        "Account statement queries"
    );
}

/// Returns the global metrics instance.
pub fn get_metrics() -> &'static Metrics {
    METRICS.get_or_init(Metrics::new)
}
