//! Jenkins chat relay.
//!
//! Receives Jenkins Notification Plugin webhooks and relays STARTED and
//! FINALIZED builds to a Slack channel as colored attachments. Also serves
//! Slack slash commands and menu actions that list and start Jenkins jobs.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;
