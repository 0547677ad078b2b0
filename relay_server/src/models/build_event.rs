//! Raw payload posted by the Jenkins Notification Plugin.
//!
//! Every member is optional: producers differ in what they send, and a
//! missing field only means the corresponding display field is skipped.
//! A member of the wrong JSON type is treated as missing.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level notification body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildEvent {
    /// Job (project) name.
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub build: Option<BuildInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub full_url: Option<String>,
    #[serde(default)]
    pub number: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub phase: Option<BuildPhase>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub scm: Option<ScmInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub parameters: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScmInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub commit: Option<String>,
}

/// Lifecycle stage of a build: QUEUED → STARTED → (COMPLETED | FINALIZED).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum BuildPhase {
    Queued,
    Started,
    Completed,
    Finalized,
    Other(String),
}

impl BuildPhase {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "QUEUED",
            Self::Started => "STARTED",
            Self::Completed => "COMPLETED",
            Self::Finalized => "FINALIZED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for BuildPhase {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "QUEUED" => Self::Queued,
            "STARTED" => Self::Started,
            "COMPLETED" => Self::Completed,
            "FINALIZED" => Self::Finalized,
            _ => Self::Other(raw),
        }
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BuildInfo {
    /// Build number as display text (Jenkins sends a number, some proxies a string).
    pub fn number_text(&self) -> String {
        self.number.as_ref().map(value_text).unwrap_or_default()
    }

    /// A build parameter rendered as text, `None` when absent, null or empty.
    pub fn parameter(&self, key: &str) -> Option<String> {
        self.parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(value_text)
            .filter(|s| !s.is_empty())
    }

    /// Commit id from the SCM block, `None` when absent or empty.
    pub fn commit(&self) -> Option<&str> {
        self.scm
            .as_ref()
            .and_then(|scm| scm.commit.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// Deserialize through [`Value`] so a mistyped member becomes `None`
/// instead of failing the whole payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
