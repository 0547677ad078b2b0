//! Prometheus metrics for relay observability.

use metrics::counter;

/// Initialize metrics exporter (Prometheus).
pub fn init_metrics() {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    if let Err(e) = builder.install() {
        tracing::warn!("Failed to install Prometheus exporter: {}", e);
    }
}

/// Record an inbound Jenkins notification.
pub fn webhook_received(phase: &str) {
    counter!("relay_webhooks_received_total", "phase" => phase.to_string()).increment(1);
}

/// Record the outcome of one relayed message (delivered, skipped, failed, suppressed, malformed).
pub fn message_outcome(outcome: &'static str) {
    counter!("relay_messages_total", "outcome" => outcome).increment(1);
}

/// Record a build triggered from chat.
pub fn build_triggered(source: &'static str) {
    counter!("relay_builds_triggered_total", "source" => source).increment(1);
}
