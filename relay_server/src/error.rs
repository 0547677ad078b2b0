//! Error types for outbound integrations (chat sink, build server).

/// Failure delivering a message to the chat platform.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("chat API rejected message: {0}")]
    Rejected(String),
}

/// Failure talking to the Jenkins JSON API.
#[derive(Debug, thiserror::Error)]
pub enum JenkinsError {
    #[error("invalid Jenkins URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Jenkins returned {status} for {path}")]
    Status { status: u16, path: String },
}
