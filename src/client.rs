use crate::content::{
    GenerateOptions, GeneratedMessage, MediaSource, OutgoingContent, RelayOptions, SendOptions,
};
use crate::types::{FileData, MessageContent, RawMessage};
use anyhow::Result;
use async_trait::async_trait;

/// The connection-level client a `Message` delegates every outbound action to.
///
/// Implementations own transport, encryption and session state; nothing here
/// is retried or timed out on their behalf.
#[async_trait]
pub trait MessageClient: Send + Sync {
    /// JID of the logged-in account, possibly carrying a device suffix.
    fn user_id(&self) -> String;

    /// Composes and sends `content`, returning the message as it was sent.
    async fn send_message(
        &self,
        jid: &str,
        content: OutgoingContent,
        options: SendOptions,
    ) -> Result<RawMessage>;

    /// Sends a pre-built message envelope as-is.
    async fn relay_message(
        &self,
        jid: &str,
        message: MessageContent,
        options: RelayOptions,
    ) -> Result<()>;

    /// Resolves a file reference to its bytes and MIME type.
    async fn get_file(&self, source: &MediaSource) -> Result<FileData>;

    /// Re-encodes an image or video as a WebP sticker and sends it.
    async fn send_image_as_sticker(
        &self,
        jid: &str,
        source: &MediaSource,
        options: SendOptions,
    ) -> Result<RawMessage>;

    /// Builds a relay-ready message from arbitrary content.
    async fn generate_message_from_content(
        &self,
        jid: &str,
        content: MessageContent,
        options: GenerateOptions,
    ) -> Result<GeneratedMessage>;

    /// Builds a relay-ready message from a template payload.
    async fn generate_message(
        &self,
        jid: &str,
        content: serde_json::Value,
        options: GenerateOptions,
    ) -> Result<GeneratedMessage>;

    /// Builds an interactive (buttons / list) message from its description.
    async fn create_interactive_message(
        &self,
        content: serde_json::Value,
    ) -> Result<GeneratedMessage>;
}
