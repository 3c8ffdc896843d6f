//! # Prometheus Metrics
//!
//! Counters and gauges describing how the simulation is being used. Scraped
//! at `/metrics` on the metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] under
//! the `ledgerlab` namespace.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the simulation.
#[derive(Clone)]
pub struct SimMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Transactions accepted and broadcast to every participant.
    pub transactions_broadcast_total: IntCounter,
    /// Submissions rejected for missing fields.
    pub submissions_rejected_total: IntCounter,
    /// Transaction field edits applied to a chain.
    pub field_edits_total: IntCounter,
    /// Chain verifications requested.
    pub verifications_total: IntCounter,
    /// Verifications that found a hash mismatch or broken link.
    pub tampered_verifications_total: IntCounter,
    /// Consensus checks requested.
    pub consensus_checks_total: IntCounter,
    /// Participants outside the majority after the last consensus check.
    pub dissenting_participants: IntGauge,
    /// Blocks on the active participant's chain.
    pub active_chain_height: IntGauge,
}

impl SimMetrics {
    /// Creates and registers all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("ledgerlab".into()), None)?;

        let counter = |name: &str, help: &str| -> Result<IntCounter, prometheus::Error> {
            let c = IntCounter::new(name, help)?;
            registry.register(Box::new(c.clone()))?;
            Ok(c)
        };
        let gauge = |name: &str, help: &str| -> Result<IntGauge, prometheus::Error> {
            let g = IntGauge::new(name, help)?;
            registry.register(Box::new(g.clone()))?;
            Ok(g)
        };

        Ok(Self {
            transactions_broadcast_total: counter(
                "transactions_broadcast_total",
                "Transactions broadcast to every participant",
            )?,
            submissions_rejected_total: counter(
                "submissions_rejected_total",
                "Transaction submissions rejected by validation",
            )?,
            field_edits_total: counter(
                "field_edits_total",
                "Transaction field edits applied to the active chain",
            )?,
            verifications_total: counter("verifications_total", "Chain verifications requested")?,
            tampered_verifications_total: counter(
                "tampered_verifications_total",
                "Chain verifications that detected tampering",
            )?,
            consensus_checks_total: counter(
                "consensus_checks_total",
                "Consensus evaluations requested",
            )?,
            dissenting_participants: gauge(
                "dissenting_participants",
                "Participants outside the majority group after the last consensus check",
            )?,
            active_chain_height: gauge(
                "active_chain_height",
                "Number of blocks on the active participant's chain",
            )?,
            registry,
        })
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<SimMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_are_namespaced() {
        let metrics = SimMetrics::new().unwrap();
        metrics.transactions_broadcast_total.inc();
        metrics.active_chain_height.set(3);

        let body = metrics.encode().unwrap();
        assert!(body.contains("ledgerlab_transactions_broadcast_total 1"));
        assert!(body.contains("ledgerlab_active_chain_height 3"));
    }
}
