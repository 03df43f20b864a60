//! Inbound WhatsApp Cloud API webhook payload.
//!
//! Only the fields the bot reads are modelled; everything else in the
//! delivery is ignored. Every level defaults to empty so that status
//! callbacks (which carry no `messages`) deserialize cleanly.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub value: WebhookValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundMessage {
    pub id: Option<String>,
    pub from: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextBody {
    pub body: Option<String>,
}

impl WebhookPayload {
    /// All messages of the delivery in array order (entry, change, message).
    pub fn messages(&self) -> impl Iterator<Item = &InboundMessage> {
        self.entry
            .iter()
            .flat_map(|e| e.changes.iter())
            .flat_map(|c| c.value.messages.iter())
    }
}

impl InboundMessage {
    /// Trimmed text body; non-text messages yield an empty string.
    pub fn text_body(&self) -> &str {
        self.text
            .as_ref()
            .and_then(|t| t.body.as_deref())
            .unwrap_or("")
            .trim()
    }
}
