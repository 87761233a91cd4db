use crate::sticker::StickerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("JID is required to send a message.")]
    MissingJid,
    #[error("Unsupported message type: {0}")]
    UnsupportedType(String),
    #[error("Mimetype is required for document")]
    MissingMimetype,
    #[error("could not determine the MIME type of the file")]
    UndeterminedMime,
    #[error("cannot send {0} as image, video or audio")]
    UnsupportedMedia(String),
    #[error("{expected} message needs {expected} content, got {found}")]
    ContentMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{0} content is neither a buffer nor a URL")]
    InvalidMediaSource(String),
    #[error("cannot make a sticker from {0}")]
    UnsupportedSticker(String),
    #[error("sticker tagging failed: {0}")]
    Sticker(#[from] StickerError),
    #[error("HTTP request failed with status {0}")]
    HttpStatus(u16),
    #[error(transparent)]
    Client(#[from] anyhow::Error),
}

pub type Result<T, E = MessageError> = std::result::Result<T, E>;
