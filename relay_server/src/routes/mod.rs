//! Relay HTTP routes: Jenkins webhook, Slack command + action, health.

pub mod relay;
pub mod slack;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::RelayConfig;
use crate::services::chat_sink::ChatSink;
use crate::services::jenkins_service::BuildServer;

/// Shared, read-only state for route handlers.
#[derive(Clone)]
pub struct RelayState {
    pub config: Arc<RelayConfig>,
    pub sink: Arc<dyn ChatSink>,
    /// `None` when no Jenkins URL is configured.
    pub jenkins: Option<Arc<dyn BuildServer>>,
}

/// Build the relay's Axum router.
pub fn relay_router(state: RelayState) -> Router {
    let webhook_path = state.config.webhook_path();

    Router::new()
        // Jenkins Notification Plugin
        .route(&webhook_path, post(relay::jenkins_webhook))
        // Slack
        .route("/slack/command", post(slack::command_handler))
        .route("/slack/action", post(slack::action_handler))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
