//! Raw Jenkins notification → [`Normalized`].
//!
//! Only STARTED and FINALIZED produce a message. QUEUED and COMPLETED are
//! silent by design of the notification lifecycle, and any other phase is
//! dropped rather than rendered with half-built fields.

use crate::models::build_event::{BuildEvent, BuildInfo, BuildPhase};
use crate::models::normalized::{DisplayField, Normalized, NormalizedEvent, SuppressReason};
use crate::services::color_policy::ColorPolicy;

/// Color for STARTED builds, outside the status table.
pub const STARTED_COLOR: &str = "#e9f1ea";

pub fn normalize(raw: &BuildEvent, policy: &ColorPolicy) -> Normalized {
    let default_build = BuildInfo::default();
    let build = raw.build.as_ref().unwrap_or(&default_build);

    let project = raw.name.clone().unwrap_or_default();
    let url = build.full_url.clone().unwrap_or_default();

    let (phase, status, color, fields, pretext) = match &build.phase {
        None => return Normalized::Suppressed(SuppressReason::MissingPhase),
        Some(p @ (BuildPhase::Queued | BuildPhase::Completed)) => {
            return Normalized::Suppressed(SuppressReason::SilentPhase(p.clone()))
        }
        Some(BuildPhase::Other(other)) => {
            return Normalized::Suppressed(SuppressReason::UnknownPhase(other.clone()))
        }
        Some(BuildPhase::Finalized) => {
            let status = build.status.clone();
            let status_text = status.as_deref().unwrap_or_default();
            let fields = vec![
                DisplayField::short("Phase", BuildPhase::Finalized.as_str()),
                DisplayField::short("Status", status_text),
            ];
            let color = policy.color_for(status.as_deref()).to_string();
            let pretext = format!("{project} FINALIZED with {status_text} {url}");
            (BuildPhase::Finalized, status, color, fields, pretext)
        }
        Some(BuildPhase::Started) => {
            let mut fields = vec![
                DisplayField::short("Phase", BuildPhase::Started.as_str()),
                DisplayField::short_link("Build #", build.number_text(), url.as_str()),
            ];
            fields.extend(source_fields(build));
            let pretext = format!("{project} STARTED {url}");
            (BuildPhase::Started, None, STARTED_COLOR.to_string(), fields, pretext)
        }
    };

    Normalized::Relay(NormalizedEvent {
        project,
        phase,
        status,
        color,
        fields,
        pretext,
    })
}

/// Pull-request fields win over SCM commit fields; either group may be absent.
fn source_fields(build: &BuildInfo) -> Vec<DisplayField> {
    if let Some(pull_id) = build.parameter("ghprbPullId") {
        let param = |key: &str| build.parameter(key).unwrap_or_default();
        return vec![
            DisplayField::short("Source branch", param("ghprbSourceBranch")),
            DisplayField::short("Target branch", param("ghprbTargetBranch")),
            DisplayField::short(
                "Pull request",
                format!("{pull_id}: {}", param("ghprbPullTitle")),
            ),
            DisplayField::short("URL", param("ghprbPullLink")),
        ];
    }

    match build.commit() {
        Some(commit) => {
            let branch = build
                .scm
                .as_ref()
                .and_then(|scm| scm.branch.clone())
                .unwrap_or_default();
            vec![
                DisplayField::short("Commit SHA1", commit),
                DisplayField::short("Branch", branch),
            ]
        }
        None => Vec::new(),
    }
}
