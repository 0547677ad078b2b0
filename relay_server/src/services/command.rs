//! Chat command parsing and the interactive job menu.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::job::{BuildCommand, Job};
use crate::models::message::{Action, Attachment, ChatMessage, SelectOption};

/// Callback id tying menu selections back to the build action handler.
pub const JOB_BUILD_CALLBACK: &str = "jenkins.job.build";

static COMMAND_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:j(?:enkins)?\s+)?build(?:\s+([\w.\- ]+?))?\s*(?:,\s*(.*?))?\s*$")
        .unwrap()
});

/// Parse `[j|jenkins] build [job][, k=v&k2=v2]`.
pub fn parse_command(text: &str) -> Option<BuildCommand> {
    let caps = COMMAND_REGEX.captures(text)?;

    let job = caps
        .get(1)
        .map(|m| m.as_str().trim())
        .filter(|j| !j.is_empty());

    match job {
        None => Some(BuildCommand::ListJobs),
        Some(job) => Some(BuildCommand::Build {
            job: job.to_string(),
            parameters: caps
                .get(2)
                .map(|m| parse_parameters(m.as_str()))
                .unwrap_or_default(),
        }),
    }
}

fn parse_parameters(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
            None => (pair.to_string(), String::new()),
        })
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Job selection menu, or a plain notice when there is nothing to build.
pub fn job_menu(jobs: &[Job]) -> ChatMessage {
    if jobs.is_empty() {
        return ChatMessage::text("no job exists.");
    }

    let options = jobs
        .iter()
        .map(|job| SelectOption {
            text: format!("{} {}", job.name, job.state()),
            value: job.name.clone(),
        })
        .collect();

    ChatMessage {
        response_type: None,
        text: Some("Jenkins job list".to_string()),
        attachments: vec![Attachment {
            text: Some("Choose a job to build".to_string()),
            fallback: Some("You are unable to choose a job".to_string()),
            callback_id: Some(JOB_BUILD_CALLBACK.to_string()),
            color: Some("#3AA3E3".to_string()),
            attachment_type: Some("default".to_string()),
            actions: vec![Action {
                name: "jobs_list".to_string(),
                text: "Pick a job...".to_string(),
                kind: "select".to_string(),
                options,
            }],
            ..Default::default()
        }],
    }
}

pub fn started_reply(job: &str, user: &str) -> String {
    format!("{job} job is started by {user}")
}

pub fn usage() -> &'static str {
    "Usage: `jenkins build` lists jobs, `jenkins build <job>` starts one"
}
