use super::Message;
use crate::content::{
    Contact, GenerateOptions, GeneratedMessage, MediaSource, OutgoingContent, RelayOptions,
    SendOptions,
};
use crate::error::{MessageError, Result};
use crate::jid::Jid;
use crate::mime;
use crate::net::HttpRequest;
use crate::types::{MessageContent, RawMessage};
use bytes::Bytes;
use log::debug;

pub const PTT_MIMETYPE: &str = "audio/ogg; codecs=opus";

/// Maps sniffed bytes onto the matching media content.
pub(super) fn media_content(data: Bytes) -> Result<OutgoingContent> {
    let file_type = mime::sniff(&data).ok_or(MessageError::UndeterminedMime)?;
    let media = MediaSource::Bytes(data);
    match file_type.top_level() {
        "image" => Ok(OutgoingContent::Image { media }),
        "video" => Ok(OutgoingContent::Video {
            media,
            gif_playback: false,
        }),
        "audio" => Ok(OutgoingContent::Audio {
            media,
            mimetype: None,
            ptt: false,
        }),
        _ => Err(MessageError::UnsupportedMedia(file_type.mime.to_string())),
    }
}

impl Message {
    pub async fn send_vcard(&self, contact: &Contact, options: SendOptions) -> Result<RawMessage> {
        let content = OutgoingContent::Contacts {
            display_name: contact.name.clone(),
            vcards: vec![contact.vcard.clone()],
        };
        Ok(self
            .client
            .send_message(self.target()?, content, options)
            .await?)
    }

    /// Reacts to this message with `emoji`. An empty string removes the reaction.
    pub async fn react(&self, emoji: &str) -> Result<RawMessage> {
        let content = OutgoingContent::Reaction {
            text: emoji.to_string(),
            key: self.fields.key.clone().unwrap_or_default(),
        };
        Ok(self
            .client
            .send_message(self.target()?, content, SendOptions::default())
            .await?)
    }

    /// Sends the audio at `url` as a voice note.
    pub async fn send_ptt(&self, url: &str, options: SendOptions) -> Result<RawMessage> {
        let content = OutgoingContent::Audio {
            media: MediaSource::Url(url.to_string()),
            mimetype: Some(
                options
                    .mimetype
                    .clone()
                    .unwrap_or_else(|| PTT_MIMETYPE.to_string()),
            ),
            ptt: true,
        };
        Ok(self
            .client
            .send_message(self.target()?, content, options)
            .await?)
    }

    pub async fn send_gif(&self, url: &str, options: SendOptions) -> Result<RawMessage> {
        let content = OutgoingContent::Video {
            media: MediaSource::Url(url.to_string()),
            gif_playback: true,
        };
        Ok(self
            .client
            .send_message(self.target()?, content, options)
            .await?)
    }

    pub async fn send_mention(
        &self,
        text: &str,
        mentioned: Vec<Jid>,
        options: SendOptions,
    ) -> Result<RawMessage> {
        let content = OutgoingContent::Text {
            text: text.to_string(),
            mentions: mentioned,
            edit: None,
        };
        Ok(self
            .client
            .send_message(self.target()?, content, options)
            .await?)
    }

    /// Sends `text` quoting this message.
    pub async fn send_reply(&self, text: &str, options: SendOptions) -> Result<RawMessage> {
        let options = options.merged_over(SendOptions::quoting(self.quoted()));
        Ok(self
            .client
            .send_message(self.target()?, OutgoingContent::text(text), options)
            .await?)
    }

    /// Like [`Message::send_reply`], but normalizes the echoed message.
    pub async fn reply(&self, text: &str, options: SendOptions) -> Result<Message> {
        let sent = self.send_reply(text, options).await?;
        Ok(self.with_payload(sent))
    }

    /// Relays arbitrary `content` to `jid`. A `context_info` in `options`
    /// replaces the one the generator produced.
    pub async fn forward(
        &self,
        jid: &str,
        content: MessageContent,
        options: SendOptions,
    ) -> Result<GeneratedMessage> {
        let generate = GenerateOptions {
            user_jid: Some(self.client.user_id()),
            quoted: options.quoted.clone(),
            context_info: options.context_info.clone(),
        };
        let mut generated = self
            .client
            .generate_message_from_content(jid, content, generate)
            .await?;

        if let Some(context_info) = options.context_info {
            generated.message.context_info = Some(context_info);
        }

        let relay = RelayOptions {
            message_id: options.message_id.or_else(|| generated.key.id.clone()),
        };
        self.client
            .relay_message(jid, generated.message.clone(), relay)
            .await?;
        debug!(target: "Message/Forward", "Forwarded message to {}", jid);
        Ok(generated)
    }

    /// Resolves `source` through the client and sends it as image, video or
    /// audio depending on its sniffed type.
    pub async fn send_file(&self, source: &MediaSource, options: SendOptions) -> Result<RawMessage> {
        let file = self.client.get_file(source).await?;
        let content = media_content(file.data)?;
        Ok(self
            .client
            .send_message(self.target()?, content, options)
            .await?)
    }

    pub async fn send_from_url(&self, url: &str, options: SendOptions) -> Result<RawMessage> {
        let response = self.http.execute(HttpRequest::get(url)).await?;
        if !response.is_success() {
            return Err(MessageError::HttpStatus(response.status_code));
        }
        let content = media_content(Bytes::from(response.body))?;
        Ok(self
            .client
            .send_message(self.target()?, content, options)
            .await?)
    }

    /// Replaces the text of this message with `text`.
    pub async fn edit(&self, text: &str, options: SendOptions) -> Result<()> {
        let content = OutgoingContent::Text {
            text: text.to_string(),
            mentions: Vec::new(),
            edit: Some(self.fields.key.clone().unwrap_or_default()),
        };
        self.client
            .send_message(self.target()?, content, options)
            .await?;
        Ok(())
    }
}
