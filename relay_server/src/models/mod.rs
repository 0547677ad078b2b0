//! Relay data models: inbound payloads, normalized events, chat messages.

pub mod build_event;
pub mod job;
pub mod message;
pub mod normalized;
