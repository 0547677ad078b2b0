//! Normalized build event, ready for formatting.

use crate::models::build_event::BuildPhase;

/// Value shown in a display field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Hyperlink rendered with `label` as its visible text.
    Link { label: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayField {
    pub title: &'static str,
    pub value: FieldValue,
    pub short: bool,
}

impl DisplayField {
    pub fn short(title: &'static str, value: impl Into<String>) -> Self {
        Self {
            title,
            value: FieldValue::Text(value.into()),
            short: true,
        }
    }

    pub fn short_link(title: &'static str, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title,
            value: FieldValue::Link {
                label: label.into(),
                url: url.into(),
            },
            short: true,
        }
    }
}

/// A build event that should become a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub project: String,
    pub phase: BuildPhase,
    /// Only set once the build is FINALIZED.
    pub status: Option<String>,
    pub color: String,
    pub fields: Vec<DisplayField>,
    pub pretext: String,
}

#[cfg(test)]
impl NormalizedEvent {
    pub fn field_titles(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.title).collect()
    }
}

/// Why a payload produced no message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// QUEUED and COMPLETED are intentionally silent.
    SilentPhase(BuildPhase),
    UnknownPhase(String),
    MissingPhase,
}

/// Result of normalizing a raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Relay(NormalizedEvent),
    Suppressed(SuppressReason),
}
