//! Jenkins notification webhook: validate routing, accept, relay in the background.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::build_event::{BuildEvent, BuildPhase};
use crate::models::normalized::Normalized;
use crate::routes::RelayState;
use crate::error::SinkError;
use crate::services::chat_sink::DeliveryStatus;
use crate::services::{formatter, normalizer};

#[derive(Debug, Deserialize)]
pub struct RelayQuery {
    pub room: Option<String>,
    pub debug: Option<String>,
}

/// `POST /{service}/jenkins?room=<channel>[&debug=1]`
///
/// Answers 202 before the payload is even parsed; delivery happens in a
/// spawned task and its failures never reach the caller.
pub async fn jenkins_webhook(
    State(state): State<RelayState>,
    Query(query): Query<RelayQuery>,
    body: Bytes,
) -> Response {
    let Some(room) = query.room.filter(|r| !r.is_empty()) else {
        tracing::warn!("Jenkins notification without room parameter");
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };

    let debug = is_truthy(query.debug.as_deref());
    let delivery_id = Uuid::new_v4();

    tokio::spawn(relay_notification(state, room, debug, body, delivery_id));

    StatusCode::ACCEPTED.into_response()
}

async fn relay_notification(
    state: RelayState,
    room: String,
    debug: bool,
    body: Bytes,
    delivery_id: Uuid,
) {
    if debug {
        tracing::info!(
            %delivery_id,
            body = %String::from_utf8_lossy(&body),
            "Inbound Jenkins notification"
        );
    }

    let event: BuildEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(%delivery_id, "Dropping unparseable Jenkins notification: {e}");
            crate::metrics::message_outcome("malformed");
            return;
        }
    };

    let phase = event
        .build
        .as_ref()
        .and_then(|b| b.phase.as_ref())
        .map_or("none", BuildPhase::as_str);
    crate::metrics::webhook_received(phase);

    let normalized = match normalizer::normalize(&event, &state.config.colors) {
        Normalized::Relay(evt) => evt,
        Normalized::Suppressed(reason) => {
            tracing::debug!(%delivery_id, ?reason, "Notification suppressed");
            crate::metrics::message_outcome("suppressed");
            return;
        }
    };

    let message = formatter::format(&normalized);
    if debug {
        tracing::info!(
            %delivery_id,
            message = %serde_json::to_string(&message).unwrap_or_default(),
            "Relaying message"
        );
    }

    let channel = format!("#{room}");
    let result = state.sink.deliver(&channel, &message).await;
    crate::metrics::message_outcome(delivery_outcome(&result));

    match result {
        Ok(DeliveryStatus::Sent) => {
            tracing::info!(
                %delivery_id,
                channel = %channel,
                project = %normalized.project,
                phase,
                "Build notification relayed"
            );
        }
        Ok(DeliveryStatus::Skipped) => {
            tracing::debug!(
                %delivery_id,
                channel = %channel,
                "Chat sink not configured, message dropped"
            );
        }
        Err(e) => {
            if debug {
                tracing::warn!(%delivery_id, channel = %channel, "Chat delivery failed: {e}");
            } else {
                tracing::debug!(%delivery_id, channel = %channel, "Chat delivery failed: {e}");
            }
        }
    }
}

/// Metric label for a delivery attempt.
fn delivery_outcome(result: &Result<DeliveryStatus, SinkError>) -> &'static str {
    match result {
        Ok(DeliveryStatus::Sent) => "delivered",
        Ok(DeliveryStatus::Skipped) => "skipped",
        Err(_) => "failed",
    }
}

/// Query flag semantics: present and not `0`/`false`/`no`/`off`.
fn is_truthy(flag: Option<&str>) -> bool {
    match flag.map(str::trim) {
        None | Some("") => false,
        Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"),
    }
}
