//! Metrics collection with Prometheus
//!
//! This module provides Prometheus metrics for Activist:
//! - Request counts by route context
//! - Render anomalies by kind
//! - Tenant store mutations and fallbacks
//! - Current tenant count

use prometheus::{CounterVec, Gauge, Opts, Registry};
use std::sync::Arc;

/// Metrics collector for Activist
#[derive(Clone)]
pub struct Metrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Requests by resolved route context
    pub requests_total: CounterVec,
    /// Blocks or theme values that rendered degraded
    pub render_anomalies_total: CounterVec,
    /// Store create/delete attempts by outcome
    pub store_mutations_total: CounterVec,
    /// Times the store fell back to built-in tenants or kept a stale view
    pub store_fallbacks_total: CounterVec,
    /// Tenants currently visible
    pub tenants: Gauge,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("activist_requests_total", "Total number of requests"),
            &["context"],
        )?;

        let render_anomalies_total = CounterVec::new(
            Opts::new(
                "activist_render_anomalies_total",
                "Non-fatal anomalies encountered while rendering",
            ),
            &["kind"],
        )?;

        let store_mutations_total = CounterVec::new(
            Opts::new(
                "activist_store_mutations_total",
                "Tenant store mutations by operation and outcome",
            ),
            &["op", "outcome"],
        )?;

        let store_fallbacks_total = CounterVec::new(
            Opts::new(
                "activist_store_fallbacks_total",
                "Tenant store fallbacks by reason",
            ),
            &["reason"],
        )?;

        let tenants = Gauge::with_opts(Opts::new(
            "activist_tenants",
            "Number of tenants currently loaded",
        ))?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(render_anomalies_total.clone()))?;
        registry.register(Box::new(store_mutations_total.clone()))?;
        registry.register(Box::new(store_fallbacks_total.clone()))?;
        registry.register(Box::new(tenants.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            render_anomalies_total,
            store_mutations_total,
            store_fallbacks_total,
            tenants,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_request(&self, context: &str) {
        self.requests_total.with_label_values(&[context]).inc();
    }

    pub fn record_render_anomaly(&self, kind: &str) {
        self.render_anomalies_total.with_label_values(&[kind]).inc();
    }

    /// `outcome` is `ok` or an error label such as `duplicate`.
    pub fn record_store_mutation(&self, op: &str, outcome: &str) {
        self.store_mutations_total
            .with_label_values(&[op, outcome])
            .inc();
    }

    pub fn record_store_fallback(&self, reason: &str) {
        self.store_fallbacks_total.with_label_values(&[reason]).inc();
    }

    pub fn set_tenant_count(&self, count: usize) {
        self.tenants.set(count as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
