//! Prometheus metrics for the keyring controller.
//!
//! All metrics follow the naming convention: `kv_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., kv_signatures_total)
//! - **Gauge**: Value that can go up or down (e.g., kv_accounts)

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Gauge, Opts, Registry, TextEncoder};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Controller operations by name and outcome
    pub static ref KEYRING_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("kv_keyring_operations_total", "Total keyring controller operations"),
        &["operation", "outcome"]  // outcome: ok / validation / crypto / not_found / state
    ).expect("metric creation failed");

    /// Failed unlock attempts
    pub static ref UNLOCK_FAILURES: Counter = Counter::new(
        "kv_unlock_failures_total",
        "Total failed password submissions"
    ).expect("metric creation failed");

    /// Signatures produced, by payload kind
    pub static ref SIGNATURES: CounterVec = CounterVec::new(
        Opts::new("kv_signatures_total", "Total signatures produced"),
        &["kind"]  // kind: message / personal / typed_v1 / typed_v3 / typed_v4 / transaction
    ).expect("metric creation failed");

    /// Accounts held by all unlocked controllers in the process
    pub static ref ACCOUNTS: Gauge = Gauge::new(
        "kv_accounts",
        "Number of accounts in the unlocked keyrings"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Fails if called twice.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(KEYRING_OPERATIONS.clone()),
        Box::new(UNLOCK_FAILURES.clone()),
        Box::new(SIGNATURES.clone()),
        Box::new(ACCOUNTS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Render the registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

pub fn record_operation(operation: &str, outcome: &str) {
    KEYRING_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
}

pub fn record_unlock_failure() {
    UNLOCK_FAILURES.inc();
}

pub fn record_signature(kind: &str) {
    SIGNATURES.with_label_values(&[kind]).inc();
}

/// One controller's contribution to an account gauge.
///
/// The gauge holds the sum over all live shares. Dropping a share withdraws
/// whatever it last reported.
#[derive(Debug)]
pub struct AccountShare {
    gauge: Gauge,
    reported: AtomicU64,
}

impl AccountShare {
    /// Share of the global [`ACCOUNTS`] gauge.
    pub fn new() -> Self {
        Self::with_gauge(ACCOUNTS.clone())
    }

    pub fn with_gauge(gauge: Gauge) -> Self {
        Self {
            gauge,
            reported: AtomicU64::new(0),
        }
    }

    /// Replace this share's count.
    pub fn set(&self, count: usize) {
        let count = count as u64;
        let previous = self.reported.swap(count, Ordering::SeqCst);
        self.gauge.add(count as f64 - previous as f64);
    }
}

impl Default for AccountShare {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AccountShare {
    fn drop(&mut self) {
        self.gauge.sub(*self.reported.get_mut() as f64);
    }
}
