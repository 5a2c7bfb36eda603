//! Prometheus metrics for the cloud migration service.
//!
//! Metrics are created unregistered so tests can build as many services as
//! they like; `register()` attaches them to a registry once at startup.

use prometheus::{opts, CounterVec, Encoder, Registry, TextEncoder};

const NAMESPACE: &str = "grafana";
const SUBSYSTEM: &str = "cloudmigrations";

#[derive(Clone)]
pub struct Metrics {
    access_token_created: CounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let access_token_created = CounterVec::new(
            opts!(
                "access_token_created_total",
                "Number of cloud migration access tokens created"
            )
            .namespace(NAMESPACE)
            .subsystem(SUBSYSTEM),
            &["slug"],
        )
        .expect("static metric definition is valid");

        Self {
            access_token_created,
        }
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.access_token_created.clone()))
    }

    pub fn record_access_token_created(&self, slug: &str) {
        self.access_token_created.with_label_values(&[slug]).inc();
    }

    pub fn access_tokens_created(&self, slug: &str) -> f64 {
        self.access_token_created.with_label_values(&[slug]).get()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode all metrics in the default registry as Prometheus text format.
/// Called by the `/metrics` HTTP handler.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap_or_default();
    String::from_utf8(buffer).unwrap_or_default()
}

// ── Tests ─────────────────────────────────────────────────────
