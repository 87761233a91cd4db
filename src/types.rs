//! Serde model of the raw message events handed over by the connection layer.
//!
//! Every field is optional: a partially filled payload still normalizes, it
//! just yields empty or absent values on the `Message` built from it.

use crate::jid::MessageId;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageKey {
    pub remote_jid: Option<String>,
    pub from_me: Option<bool>,
    pub id: Option<MessageId>,
    pub participant: Option<String>,
}

/// Timestamps arrive either as plain seconds or as a protobuf long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Seconds(i64),
    Long {
        low: i64,
        #[serde(default)]
        high: i64,
        #[serde(default)]
        unsigned: bool,
    },
}

impl Timestamp {
    /// Seconds since the epoch. A long with a zero low word falls back to
    /// reading the full 64-bit value.
    pub fn seconds(&self) -> i64 {
        match *self {
            Timestamp::Seconds(s) => s,
            Timestamp::Long { low, high, .. } if low == 0 => high << 32,
            Timestamp::Long { low, .. } => low,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaPayload {
    pub url: Option<String>,
    pub mimetype: Option<String>,
    pub caption: Option<String>,
    pub file_name: Option<String>,
    pub file_length: Option<u64>,
    pub seconds: Option<u32>,
    pub ptt: Option<bool>,
    pub gif_playback: Option<bool>,
    pub context_info: Option<ContextInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtendedTextPayload {
    pub text: Option<String>,
    pub context_info: Option<ContextInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextInfo {
    pub stanza_id: Option<MessageId>,
    pub participant: Option<String>,
    pub remote_jid: Option<String>,
    pub mentioned_jid: Vec<String>,
    pub is_forwarded: Option<bool>,
    pub forwarding_score: Option<u32>,
    pub quoted_message: Option<Box<MessageContent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewOnceEnvelope {
    pub message: Option<Box<MessageContent>>,
}

/// The content part of a message. Also used as the relay envelope, since the
/// protocol does not distinguish the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageContent {
    pub conversation: Option<String>,
    pub image_message: Option<MediaPayload>,
    pub video_message: Option<MediaPayload>,
    pub audio_message: Option<MediaPayload>,
    pub document_message: Option<MediaPayload>,
    pub sticker_message: Option<MediaPayload>,
    pub extended_text_message: Option<ExtendedTextPayload>,
    pub view_once_message: Option<ViewOnceEnvelope>,
    pub context_info: Option<ContextInfo>,
    /// Arbitrary structured payloads (buttons, lists, templates) produced by
    /// the client's message generators.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            conversation: Some(text.into()),
            ..Default::default()
        }
    }

    /// Wraps this content into a single-view envelope.
    pub fn into_view_once(self) -> Self {
        Self {
            view_once_message: Some(ViewOnceEnvelope {
                message: Some(Box::new(self)),
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotedPayload {
    pub key: Option<MessageKey>,
    pub message: Option<MessageContent>,
}

/// One inbound message event, as serialized by the connection layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMessage {
    pub key: Option<MessageKey>,
    pub message: Option<MessageContent>,
    pub sender: Option<String>,
    pub is_group: Option<bool>,
    pub push_name: Option<String>,
    pub body: Option<String>,
    pub quoted: Option<QuotedPayload>,
    pub message_timestamp: Option<Timestamp>,
}

impl RawMessage {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// Bytes and detected MIME type of a resolved file reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub data: Bytes,
    pub mime: String,
}
