//! Jenkins job listing and the build commands accepted from chat.

use std::fmt;

use serde::Deserialize;

/// A job as returned by `/api/json?tree=jobs[name,color]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Job {
    pub fn state(&self) -> JobState {
        JobState::from_color(self.color.as_deref().unwrap_or_default())
    }
}

/// Display state derived from Jenkins' ball color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Fail,
    Aborted,
    Running,
    Pass,
}

impl JobState {
    pub fn from_color(color: &str) -> Self {
        match color {
            "red" => Self::Fail,
            "aborted" => Self::Aborted,
            "aborted_anime" | "red_anime" | "blue_anime" => Self::Running,
            _ => Self::Pass,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "FAIL",
            Self::Aborted => "ABORTED",
            Self::Running => "CURRENTLY RUNNING",
            Self::Pass => "PASS",
        })
    }
}

/// Command parsed from chat text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildCommand {
    ListJobs,
    Build {
        job: String,
        parameters: Vec<(String, String)>,
    },
}
