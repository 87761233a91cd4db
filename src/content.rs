//! Outbound content handed to the client's compose API.

use crate::config::StickerMetadata;
use crate::jid::Jid;
use crate::types::{ContextInfo, MessageContent, MessageKey};
use bytes::Bytes;
use std::path::PathBuf;

/// Where the bytes of a media attachment come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Bytes(Bytes),
    Url(String),
    Path(PathBuf),
}

impl MediaSource {
    pub fn kind(&self) -> &'static str {
        match self {
            MediaSource::Bytes(_) => "bytes",
            MediaSource::Url(_) => "url",
            MediaSource::Path(_) => "path",
        }
    }
}

impl From<Bytes> for MediaSource {
    fn from(data: Bytes) -> Self {
        MediaSource::Bytes(data)
    }
}

impl From<Vec<u8>> for MediaSource {
    fn from(data: Vec<u8>) -> Self {
        MediaSource::Bytes(Bytes::from(data))
    }
}

impl From<PathBuf> for MediaSource {
    fn from(path: PathBuf) -> Self {
        MediaSource::Path(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub vcard: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingContent {
    Text {
        text: String,
        mentions: Vec<Jid>,
        /// Key of the message this text replaces.
        edit: Option<MessageKey>,
    },
    Image {
        media: MediaSource,
    },
    Video {
        media: MediaSource,
        gif_playback: bool,
    },
    Audio {
        media: MediaSource,
        mimetype: Option<String>,
        ptt: bool,
    },
    Document {
        media: MediaSource,
        mimetype: String,
    },
    Sticker {
        media: MediaSource,
    },
    Reaction {
        text: String,
        key: MessageKey,
    },
    Contacts {
        display_name: String,
        vcards: Vec<String>,
    },
}

impl OutgoingContent {
    pub fn text(text: impl Into<String>) -> Self {
        OutgoingContent::Text {
            text: text.into(),
            mentions: Vec::new(),
            edit: None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OutgoingContent::Text { .. } => "text",
            OutgoingContent::Image { .. } => "image",
            OutgoingContent::Video { .. } => "video",
            OutgoingContent::Audio { .. } => "audio",
            OutgoingContent::Document { .. } => "document",
            OutgoingContent::Sticker { .. } => "sticker",
            OutgoingContent::Reaction { .. } => "reaction",
            OutgoingContent::Contacts { .. } => "contacts",
        }
    }
}

/// Reference to the message being quoted by an outgoing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotedMessage {
    pub key: MessageKey,
    pub message: Option<MessageContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub quoted: Option<QuotedMessage>,
    pub caption: Option<String>,
    pub mentions: Vec<Jid>,
    pub mimetype: Option<String>,
    pub file_name: Option<String>,
    pub context_info: Option<ContextInfo>,
    pub sticker: Option<StickerMetadata>,
    /// Target used by `Message::send` when the message has no chat of its own.
    pub jid: Option<String>,
    /// Overrides content-type detection in `Message::send`.
    pub kind: Option<String>,
    pub message_id: Option<String>,
}

impl SendOptions {
    pub fn quoting(quoted: QuotedMessage) -> Self {
        Self {
            quoted: Some(quoted),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_jid(mut self, jid: impl Into<String>) -> Self {
        self.jid = Some(jid.into());
        self
    }

    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_context_info(mut self, context_info: ContextInfo) -> Self {
        self.context_info = Some(context_info);
        self
    }

    /// Fills every unset field from `defaults`; values already set win.
    pub fn merged_over(self, defaults: SendOptions) -> Self {
        Self {
            quoted: self.quoted.or(defaults.quoted),
            caption: self.caption.or(defaults.caption),
            mentions: if self.mentions.is_empty() {
                defaults.mentions
            } else {
                self.mentions
            },
            mimetype: self.mimetype.or(defaults.mimetype),
            file_name: self.file_name.or(defaults.file_name),
            context_info: self.context_info.or(defaults.context_info),
            sticker: self.sticker.or(defaults.sticker),
            jid: self.jid.or(defaults.jid),
            kind: self.kind.or(defaults.kind),
            message_id: self.message_id.or(defaults.message_id),
        }
    }
}

/// Options for the client's message generators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub user_jid: Option<String>,
    pub quoted: Option<QuotedMessage>,
    pub context_info: Option<ContextInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayOptions {
    pub message_id: Option<String>,
}

/// A fully built low-level message, ready to be relayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedMessage {
    pub key: MessageKey,
    pub message: MessageContent,
}

/// What `Message::send` accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Bytes(Bytes),
    /// Template and interactive payloads, passed to the client's generators.
    Structured(serde_json::Value),
}

impl Content {
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Text(_) => "text",
            Content::Bytes(_) => "bytes",
            Content::Structured(_) => "structured",
        }
    }

    /// The media source this content stands for: bytes as-is, strings as URLs.
    pub fn as_media(&self) -> Option<MediaSource> {
        match self {
            Content::Text(url) => Some(MediaSource::Url(url.clone())),
            Content::Bytes(data) => Some(MediaSource::Bytes(data.clone())),
            Content::Structured(_) => None,
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Bytes> for Content {
    fn from(data: Bytes) -> Self {
        Content::Bytes(data)
    }
}

impl From<Vec<u8>> for Content {
    fn from(data: Vec<u8>) -> Self {
        Content::Bytes(Bytes::from(data))
    }
}

impl From<serde_json::Value> for Content {
    fn from(value: serde_json::Value) -> Self {
        Content::Structured(value)
    }
}
