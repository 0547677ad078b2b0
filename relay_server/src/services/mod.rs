//! Relay services: normalization, formatting, chat delivery, Jenkins API.

pub mod chat_sink;
pub mod color_policy;
pub mod command;
pub mod formatter;
pub mod jenkins_service;
pub mod normalizer;
