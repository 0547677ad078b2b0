//! Slack slash command and interactive action endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::models::job::BuildCommand;
use crate::models::message::ChatMessage;
use crate::routes::RelayState;
use crate::services::command::{self, JOB_BUILD_CALLBACK};

const NOT_CONFIGURED: &str = "Jenkins is not configured";

/// Form body of a slash command invocation.
#[derive(Debug, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_name: String,
}

/// Interactive actions arrive as a form with one JSON-encoded `payload` field.
#[derive(Debug, Deserialize)]
pub struct ActionForm {
    pub payload: String,
}

#[derive(Debug, Deserialize)]
struct ActionPayload {
    callback_id: String,
    #[serde(default)]
    actions: Vec<PayloadAction>,
    #[serde(default)]
    user: Option<PayloadUser>,
    #[serde(default)]
    original_message: Option<Value>,
    #[serde(default)]
    response_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PayloadAction {
    #[serde(default)]
    selected_options: Vec<PayloadOption>,
}

#[derive(Debug, Deserialize)]
struct PayloadOption {
    value: String,
}

#[derive(Debug, Deserialize)]
struct PayloadUser {
    #[serde(default)]
    name: String,
}

/// `POST /slack/command`: `jenkins build` and `jenkins build <job>`.
pub async fn command_handler(
    State(state): State<RelayState>,
    Form(cmd): Form<SlashCommand>,
) -> Json<ChatMessage> {
    let Some(jenkins) = state.jenkins.as_ref() else {
        return Json(ChatMessage::text(NOT_CONFIGURED));
    };

    let reply = match command::parse_command(&cmd.text) {
        None => return Json(ChatMessage::text(command::usage())),
        Some(BuildCommand::ListJobs) => match jenkins.list_jobs().await {
            Ok(jobs) => command::job_menu(&jobs),
            Err(e) => {
                tracing::warn!("Jenkins job list failed: {e}");
                ChatMessage::text(format!("error: {e}"))
            }
        },
        Some(BuildCommand::Build { job, parameters }) => {
            match jenkins.build(&job, &parameters).await {
                Ok(()) => {
                    crate::metrics::build_triggered("command");
                    tracing::info!(job = %job, user = %cmd.user_name, "Build started from chat");
                    ChatMessage::text(command::started_reply(&job, &cmd.user_name))
                }
                Err(e) => {
                    tracing::warn!(job = %job, "Jenkins build failed: {e}");
                    ChatMessage::text(format!("error: {e}"))
                }
            }
        }
    };

    Json(reply.in_channel())
}

/// `POST /slack/action`: job picked from the menu.
///
/// Echoes the original message straight away; the build and the follow-up
/// post to `response_url` run in a spawned task.
pub async fn action_handler(
    State(state): State<RelayState>,
    Form(form): Form<ActionForm>,
) -> Response {
    let payload: ActionPayload = match serde_json::from_str(&form.payload) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("Malformed Slack action payload: {e}");
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };

    if payload.callback_id != JOB_BUILD_CALLBACK {
        tracing::debug!(callback_id = %payload.callback_id, "Ignoring Slack action");
        return StatusCode::OK.into_response();
    }

    let Some(job) = payload
        .actions
        .first()
        .and_then(|a| a.selected_options.first())
        .map(|o| o.value.clone())
    else {
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };

    let Some(jenkins) = state.jenkins.clone() else {
        return Json(ChatMessage::text(NOT_CONFIGURED)).into_response();
    };

    let user = payload.user.map(|u| u.name).unwrap_or_default();
    let response_url = payload.response_url;
    let sink = state.sink.clone();

    tokio::spawn(async move {
        let reply = match jenkins.build(&job, &[]).await {
            Ok(()) => {
                crate::metrics::build_triggered("action");
                tracing::info!(job = %job, user = %user, "Build started from menu");
                ChatMessage::text(command::started_reply(&job, &user))
            }
            Err(e) => {
                tracing::warn!(job = %job, "Jenkins build failed: {e}");
                ChatMessage::text(format!("error: {e}"))
            }
        };

        if let Some(url) = response_url {
            if let Err(e) = sink.respond(&url, &reply).await {
                tracing::warn!("Slack action follow-up failed: {e}");
            }
        }
    });

    let original = payload
        .original_message
        .unwrap_or_else(|| Value::Object(Default::default()));
    Json(original).into_response()
}
