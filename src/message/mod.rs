//! The `Message` value object: one normalized inbound event plus the outbound
//! helpers command handlers use to answer it.

mod actions;
mod parsing;
mod send;


pub use parsing::{classify_content, reply_descriptor};
pub use send::{ContentKind, Detection, SendKind, detect_content, is_url};

use crate::client::MessageClient;
use crate::config::MessageConfig;
use crate::content::QuotedMessage;
use crate::error::{MessageError, Result};
use crate::jid::{Jid, MessageId};
use crate::net::HttpClient;
use crate::types::{MessageContent, MessageKey, RawMessage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Image,
    Video,
    Audio,
    Document,
    Sticker,
    Text,
    #[default]
    Unknown,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Image => "image",
            MessageType::Video => "video",
            MessageType::Audio => "audio",
            MessageType::Document => "document",
            MessageType::Sticker => "sticker",
            MessageType::Text => "text",
            MessageType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sender {
    /// Phone-number JID of the sender with any device suffix removed.
    pub jid: Option<String>,
    pub name: String,
}

/// Minimal descriptor of the message being replied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub key: Option<MessageKey>,
}

/// Everything derived from a `RawMessage`. Rebuilt as a whole on every patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageFields {
    pub user: String,
    pub key: Option<MessageKey>,
    pub id: Option<MessageId>,
    pub jid: Option<String>,
    pub from_me: bool,
    pub is_group: bool,
    pub push_name: Option<String>,
    pub text: Option<String>,
    pub timestamp: Option<i64>,
    pub sender: Sender,
    pub participant: Option<Jid>,
    pub sudo: bool,
    pub devs: bool,
    pub prefix: String,
    pub message_type: MessageType,
    pub text_data: String,
    pub reply_message: Option<ReplyMessage>,
}

impl MessageFields {
    pub fn from_raw(user_id: &str, config: &MessageConfig, raw: &RawMessage) -> Self {
        parsing::normalize(user_id, config, raw)
    }
}

#[derive(Clone)]
pub struct Message {
    client: Arc<dyn MessageClient>,
    http: Arc<dyn HttpClient>,
    config: Arc<MessageConfig>,
    raw: RawMessage,
    fields: MessageFields,
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("fields", &self.fields)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Message {
    pub fn new(
        client: Arc<dyn MessageClient>,
        http: Arc<dyn HttpClient>,
        config: Arc<MessageConfig>,
        raw: RawMessage,
    ) -> Self {
        let fields = parsing::normalize(&client.user_id(), &config, &raw);
        Self {
            client,
            http,
            config,
            raw,
            fields,
        }
    }

    /// Re-normalizes this message from a new payload. No field survives from
    /// the previous one.
    pub fn patch(&mut self, raw: RawMessage) {
        self.fields = parsing::normalize(&self.client.user_id(), &self.config, &raw);
        self.raw = raw;
    }

    /// A message sharing this one's client and configuration, built from `raw`.
    pub fn with_payload(&self, raw: RawMessage) -> Self {
        Self::new(
            self.client.clone(),
            self.http.clone(),
            self.config.clone(),
            raw,
        )
    }

    pub fn fields(&self) -> &MessageFields {
        &self.fields
    }

    pub fn raw(&self) -> &RawMessage {
        &self.raw
    }

    pub fn content(&self) -> Option<&MessageContent> {
        self.raw.message.as_ref()
    }

    pub fn user(&self) -> &str {
        &self.fields.user
    }

    pub fn key(&self) -> Option<&MessageKey> {
        self.fields.key.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.fields.id.as_deref()
    }

    pub fn jid(&self) -> Option<&str> {
        self.fields.jid.as_deref()
    }

    pub fn from_me(&self) -> bool {
        self.fields.from_me
    }

    pub fn is_group(&self) -> bool {
        self.fields.is_group
    }

    pub fn push_name(&self) -> Option<&str> {
        self.fields.push_name.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.fields.text.as_deref()
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.fields.timestamp
    }

    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.fields
            .timestamp
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn sender(&self) -> &Sender {
        &self.fields.sender
    }

    pub fn participant(&self) -> Option<&Jid> {
        self.fields.participant.as_ref()
    }

    pub fn sudo(&self) -> bool {
        self.fields.sudo
    }

    pub fn devs(&self) -> bool {
        self.fields.devs
    }

    pub fn prefix(&self) -> &str {
        &self.fields.prefix
    }

    pub fn message_type(&self) -> MessageType {
        self.fields.message_type
    }

    pub fn text_data(&self) -> &str {
        &self.fields.text_data
    }

    pub fn reply_message(&self) -> Option<&ReplyMessage> {
        self.fields.reply_message.as_ref()
    }

    /// Quote reference pointing at this message.
    pub fn quoted(&self) -> QuotedMessage {
        QuotedMessage {
            key: self.fields.key.clone().unwrap_or_default(),
            message: self.raw.message.clone(),
        }
    }

    fn target(&self) -> Result<&str> {
        self.jid().ok_or(MessageError::MissingJid)
    }
}
