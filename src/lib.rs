pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod jid;
pub mod message;
pub mod mime;
pub mod net;
pub mod sticker;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use client::MessageClient;
pub use config::{MessageConfig, StickerMetadata};
pub use content::{Content, MediaSource, OutgoingContent, SendOptions};
pub use error::MessageError;
pub use http::UreqHttpClient;
pub use message::{Message, MessageType};
pub use net::HttpClient;
pub use types::RawMessage;
