//! Normalized event → chat message.

use crate::models::message::{Attachment, ChatMessage, Field};
use crate::models::normalized::{DisplayField, FieldValue, NormalizedEvent};

/// One attachment carrying color, pretext (doubling as fallback) and fields.
pub fn format(evt: &NormalizedEvent) -> ChatMessage {
    let attachment = Attachment {
        color: Some(evt.color.clone()),
        pretext: Some(evt.pretext.clone()),
        fallback: Some(evt.pretext.clone()),
        fields: evt.fields.iter().map(render_field).collect(),
        ..Default::default()
    };

    ChatMessage {
        attachments: vec![attachment],
        ..Default::default()
    }
}

fn render_field(field: &DisplayField) -> Field {
    Field {
        title: field.title.to_string(),
        value: render_value(&field.value),
        short: field.short,
    }
}

/// Slack link markup is `<url|label>`; a link without URL degrades to its label.
fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Link { label, url } if url.is_empty() => label.clone(),
        FieldValue::Link { label, url } => format!("<{url}|{label}>"),
    }
}
