use super::Message;
use crate::config::{DISPATCH_DEFAULT_FILE_NAME, StickerMetadata};
use crate::content::{
    Content, GenerateOptions, MediaSource, OutgoingContent, RelayOptions, SendOptions,
};
use crate::error::{MessageError, Result};
use crate::mime;
use crate::net::{HttpClient, HttpRequest};
use crate::sticker::write_exif_webp;
use crate::types::RawMessage;
use log::{debug, error, warn};
use std::path::PathBuf;

/// What a piece of content looks like before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Image,
    Video,
    Audio,
    Document,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Video => "video",
            ContentKind::Audio => "audio",
            ContentKind::Document => "document",
        }
    }

    fn from_top_level(top: &str) -> Option<Self> {
        match top {
            "image" => Some(ContentKind::Image),
            "video" => Some(ContentKind::Video),
            "audio" => Some(ContentKind::Audio),
            _ => None,
        }
    }
}

/// Outcome of content-type detection. Detection never fails: when nothing
/// could be determined `kind` is `None` and the caller picks the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Detection {
    pub kind: Option<ContentKind>,
    pub diagnostic: Option<String>,
}

impl Detection {
    fn found(kind: ContentKind) -> Self {
        Self {
            kind: Some(kind),
            diagnostic: None,
        }
    }

    fn failed(diagnostic: String) -> Self {
        Self {
            kind: None,
            diagnostic: Some(diagnostic),
        }
    }
}

/// Dispatch branches of [`Message::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendKind {
    Text,
    Image,
    Video,
    Audio,
    Template,
    Interactive,
    Sticker,
    Unsupported(String),
}

impl SendKind {
    pub fn parse(kind: &str) -> Self {
        match kind.to_lowercase().as_str() {
            "text" => SendKind::Text,
            "image" => SendKind::Image,
            "video" => SendKind::Video,
            "audio" => SendKind::Audio,
            "template" => SendKind::Template,
            "interactive" => SendKind::Interactive,
            "sticker" => SendKind::Sticker,
            other => SendKind::Unsupported(other.to_string()),
        }
    }
}

pub fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

fn file_source(content: &Content) -> Option<MediaSource> {
    match content {
        Content::Text(s) if is_url(s) => Some(MediaSource::Url(s.clone())),
        Content::Text(s) => Some(MediaSource::Path(PathBuf::from(s))),
        Content::Bytes(data) => Some(MediaSource::Bytes(data.clone())),
        Content::Structured(_) => None,
    }
}

fn mismatch(expected: &'static str, content: &Content) -> MessageError {
    MessageError::ContentMismatch {
        expected,
        found: content.kind(),
    }
}

fn media_for(kind: SendKind, media: MediaSource, mimetype: Option<String>) -> OutgoingContent {
    match kind {
        SendKind::Image => OutgoingContent::Image { media },
        SendKind::Video => OutgoingContent::Video {
            media,
            gif_playback: false,
        },
        _ => OutgoingContent::Audio {
            media,
            mimetype,
            ptt: false,
        },
    }
}

/// Guesses what `content` is: URLs are probed with a HEAD request, byte
/// buffers are sniffed, anything else is text.
pub async fn detect_content(http: &dyn HttpClient, content: &Content) -> Detection {
    match content {
        Content::Text(s) if is_url(s) => match http.execute(HttpRequest::head(s.as_str())).await {
            Ok(response) => {
                let kind = response
                    .content_type()
                    .and_then(|ct| ContentKind::from_top_level(mime::top_level(ct)))
                    .unwrap_or(ContentKind::Text);
                Detection::found(kind)
            }
            Err(e) => Detection::failed(format!("HEAD {s} failed: {e}")),
        },
        Content::Text(_) | Content::Structured(_) => Detection::found(ContentKind::Text),
        Content::Bytes(data) => match mime::sniff(data) {
            Some(file_type) => {
                let kind = ContentKind::from_top_level(file_type.top_level()).or(
                    match file_type.mime {
                        "application/pdf" | mime::XLSX_MIME => Some(ContentKind::Document),
                        _ => None,
                    },
                );
                Detection {
                    kind,
                    diagnostic: kind
                        .is_none()
                        .then(|| format!("no dispatch type for {}", file_type.mime)),
                }
            }
            None => Detection::failed("no recognizable file signature".to_string()),
        },
    }
}

impl Message {
    /// Guesses what `content` is. See [`detect_content`].
    pub async fn detect_type(&self, content: &Content) -> Detection {
        detect_content(self.http.as_ref(), content).await
    }

    /// General-purpose dispatcher. The target is this message's chat, or
    /// `options.jid` when the message has none; the type comes from
    /// `options.kind` or is detected, falling back to text.
    pub async fn send(
        &self,
        content: impl Into<Content>,
        options: SendOptions,
    ) -> Result<Option<RawMessage>> {
        let content = content.into();
        let jid = self
            .fields
            .jid
            .clone()
            .or_else(|| options.jid.clone())
            .ok_or(MessageError::MissingJid)?;

        let kind = match options.kind.clone() {
            Some(kind) => kind,
            None => {
                let detection = self.detect_type(&content).await;
                if let Some(diagnostic) = &detection.diagnostic {
                    warn!(target: "Message/Detect", "Error detecting content type: {}", diagnostic);
                }
                detection
                    .kind
                    .unwrap_or(ContentKind::Text)
                    .as_str()
                    .to_string()
            }
        };

        let options = options.merged_over(SendOptions {
            sticker: Some(StickerMetadata::send_default()),
            quoted: Some(self.quoted()),
            ..Default::default()
        });

        match self.dispatch(&jid, SendKind::parse(&kind), content, options).await {
            Ok(sent) => {
                debug!(target: "Message/Send", "Sent {} message to {}", kind, jid);
                Ok(sent)
            }
            Err(e) => {
                error!(target: "Message/Send", "Error sending {} message to {}: {}", kind, jid, e);
                Err(e)
            }
        }
    }

    async fn dispatch(
        &self,
        jid: &str,
        kind: SendKind,
        content: Content,
        options: SendOptions,
    ) -> Result<Option<RawMessage>> {
        match kind {
            SendKind::Text => {
                let Content::Text(text) = content else {
                    return Err(mismatch("text", &content));
                };
                let outgoing = OutgoingContent::Text {
                    text,
                    mentions: options.mentions.clone(),
                    edit: None,
                };
                Ok(Some(self.client.send_message(jid, outgoing, options).await?))
            }
            SendKind::Image | SendKind::Video | SendKind::Audio => {
                let media = content
                    .as_media()
                    .ok_or_else(|| mismatch("media", &content))?;
                let outgoing = media_for(kind, media, options.mimetype.clone());
                Ok(Some(self.client.send_message(jid, outgoing, options).await?))
            }
            SendKind::Template => {
                let Content::Structured(value) = content else {
                    return Err(mismatch("template", &content));
                };
                let generate = GenerateOptions {
                    user_jid: Some(self.client.user_id()),
                    quoted: options.quoted.clone(),
                    context_info: options.context_info.clone(),
                };
                let generated = self.client.generate_message(jid, value, generate).await?;
                let relay = RelayOptions {
                    message_id: generated.key.id.clone(),
                };
                self.client
                    .relay_message(jid, generated.message.into_view_once(), relay)
                    .await?;
                Ok(None)
            }
            SendKind::Interactive => {
                let Content::Structured(value) = content else {
                    return Err(mismatch("interactive", &content));
                };
                let generated = self.client.create_interactive_message(value).await?;
                let relay = RelayOptions {
                    message_id: generated.key.id.clone(),
                };
                self.client
                    .relay_message(jid, generated.message, relay)
                    .await?;
                Ok(None)
            }
            SendKind::Sticker => self.send_sticker(jid, &content, options).await.map(Some),
            SendKind::Unsupported(kind) => Err(MessageError::UnsupportedType(kind)),
        }
    }

    /// WebP input is tagged with the pack metadata and sent as-is; other
    /// images and videos are re-encoded by the client.
    async fn send_sticker(
        &self,
        jid: &str,
        content: &Content,
        options: SendOptions,
    ) -> Result<RawMessage> {
        let source = file_source(content).ok_or_else(|| mismatch("sticker", content))?;
        let file = self.client.get_file(&source).await?;

        if file.mime == "image/webp" {
            let metadata = options
                .sticker
                .clone()
                .unwrap_or_else(StickerMetadata::send_default);
            let tagged = write_exif_webp(&file.data, &metadata)?;
            let outgoing = OutgoingContent::Sticker {
                media: MediaSource::Bytes(tagged.into()),
            };
            return Ok(self.client.send_message(jid, outgoing, options).await?);
        }

        match mime::top_level(&file.mime) {
            "image" | "video" => Ok(self
                .client
                .send_image_as_sticker(jid, &source, options)
                .await?),
            _ => Err(MessageError::UnsupportedSticker(file.mime.clone())),
        }
    }

    /// Secondary dispatcher with an explicit target and type. Media must be a
    /// byte buffer or a URL; documents require `options.mimetype`.
    pub async fn send_message(
        &self,
        jid: &str,
        content: impl Into<Content>,
        options: Option<SendOptions>,
        kind: &str,
    ) -> Result<Option<RawMessage>> {
        let content = content.into();
        let options = options.unwrap_or_else(|| SendOptions {
            sticker: Some(StickerMetadata::dispatch_default()),
            file_name: Some(DISPATCH_DEFAULT_FILE_NAME.to_string()),
            ..Default::default()
        });
        let kind = kind.to_lowercase();

        let media_source = |content: &Content| match content {
            Content::Bytes(data) => Ok(MediaSource::Bytes(data.clone())),
            Content::Text(url) if is_url(url) => Ok(MediaSource::Url(url.clone())),
            _ => Err(MessageError::InvalidMediaSource(kind.clone())),
        };

        let outgoing = match kind.as_str() {
            "text" => {
                let Content::Text(text) = content else {
                    return Err(mismatch("text", &content));
                };
                OutgoingContent::Text {
                    text,
                    mentions: options.mentions.clone(),
                    edit: None,
                }
            }
            "image" | "photo" => OutgoingContent::Image {
                media: media_source(&content)?,
            },
            "video" => OutgoingContent::Video {
                media: media_source(&content)?,
                gif_playback: false,
            },
            "audio" => OutgoingContent::Audio {
                media: media_source(&content)?,
                mimetype: options.mimetype.clone(),
                ptt: false,
            },
            "document" => {
                let mimetype = options.mimetype.clone().ok_or(MessageError::MissingMimetype)?;
                OutgoingContent::Document {
                    media: media_source(&content)?,
                    mimetype,
                }
            }
            "sticker" => return self.send_sticker(jid, &content, options).await.map(Some),
            _ => return Err(MessageError::UnsupportedType(kind.clone())),
        };

        Ok(Some(self.client.send_message(jid, outgoing, options).await?))
    }
}
