//! Stamps sticker pack metadata into WebP files.
//!
//! WhatsApp reads the pack name and publisher from a little-endian TIFF block
//! stored in the `EXIF` chunk of an extended (`VP8X`) WebP. Simple lossy and
//! lossless files are promoted to the extended layout before tagging.

use crate::config::StickerMetadata;
use thiserror::Error;

pub const STICKER_PACK_ID: &str = "wa-message";

/// TIFF header with a single IFD entry (tag 0x5741, type UNDEFINED) whose
/// value is the JSON blob appended after it. The count lives at offset 14.
const EXIF_PREFIX: [u8; 22] = [
    0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01, 0x00, 0x41, 0x57, 0x07, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x16, 0x00, 0x00, 0x00,
];

const FLAG_ALPHA: u8 = 0x10;
const FLAG_EXIF: u8 = 0x08;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StickerError {
    #[error("input is not a RIFF/WEBP file")]
    NotWebp,
    #[error("chunk {0} is truncated")]
    Truncated(String),
    #[error("webp has no image data")]
    MissingImageData,
    #[error("malformed {0} bitstream header")]
    BadBitstream(&'static str),
}

struct Chunk<'a> {
    fourcc: [u8; 4],
    payload: std::borrow::Cow<'a, [u8]>,
}

impl Chunk<'_> {
    fn is(&self, fourcc: &[u8; 4]) -> bool {
        &self.fourcc == fourcc
    }
}

/// Builds the EXIF payload carrying the sticker pack metadata.
pub fn sticker_exif(metadata: &StickerMetadata) -> Vec<u8> {
    let json = serde_json::json!({
        "sticker-pack-id": STICKER_PACK_ID,
        "sticker-pack-name": metadata.pack_name,
        "sticker-pack-publisher": metadata.author,
        "emojis": [""],
    })
    .to_string();

    let mut exif = EXIF_PREFIX.to_vec();
    exif[14..18].copy_from_slice(&(json.len() as u32).to_le_bytes());
    exif.extend_from_slice(json.as_bytes());
    exif
}

fn read_chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>, StickerError> {
    if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WEBP" {
        return Err(StickerError::NotWebp);
    }

    let mut chunks = Vec::new();
    let mut offset = 12;
    while offset + 8 <= data.len() {
        let mut fourcc = [0u8; 4];
        fourcc.copy_from_slice(&data[offset..offset + 4]);
        let size = u32::from_le_bytes([
            data[offset + 4],
            data[offset + 5],
            data[offset + 6],
            data[offset + 7],
        ]) as usize;
        let start = offset + 8;
        let end = start
            .checked_add(size)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| StickerError::Truncated(String::from_utf8_lossy(&fourcc).into()))?;
        chunks.push(Chunk {
            fourcc,
            payload: std::borrow::Cow::Borrowed(&data[start..end]),
        });
        offset = end + (size & 1);
    }
    Ok(chunks)
}

/// Canvas size and alpha usage of a simple (non-extended) image chunk.
fn bitstream_info(chunk: &Chunk<'_>) -> Result<(u32, u32, bool), StickerError> {
    let p = &chunk.payload;
    if chunk.is(b"VP8 ") {
        if p.len() < 10 || p[3..6] != [0x9D, 0x01, 0x2A] {
            return Err(StickerError::BadBitstream("VP8"));
        }
        let width = u16::from_le_bytes([p[6], p[7]]) as u32 & 0x3FFF;
        let height = u16::from_le_bytes([p[8], p[9]]) as u32 & 0x3FFF;
        Ok((width, height, false))
    } else if chunk.is(b"VP8L") {
        if p.len() < 5 || p[0] != 0x2F {
            return Err(StickerError::BadBitstream("VP8L"));
        }
        let bits = u32::from_le_bytes([p[1], p[2], p[3], p[4]]);
        let width = (bits & 0x3FFF) + 1;
        let height = ((bits >> 14) & 0x3FFF) + 1;
        let alpha = (bits >> 28) & 1 == 1;
        Ok((width, height, alpha))
    } else {
        Err(StickerError::MissingImageData)
    }
}

fn vp8x_payload(flags: u8, width: u32, height: u32) -> Vec<u8> {
    let mut payload = vec![flags, 0, 0, 0];
    payload.extend_from_slice(&(width.saturating_sub(1)).to_le_bytes()[..3]);
    payload.extend_from_slice(&(height.saturating_sub(1)).to_le_bytes()[..3]);
    payload
}

/// Returns a copy of `data` carrying `metadata` in its EXIF chunk. Any
/// existing EXIF chunk is replaced.
pub fn write_exif_webp(data: &[u8], metadata: &StickerMetadata) -> Result<Vec<u8>, StickerError> {
    let mut chunks: Vec<Chunk<'_>> = read_chunks(data)?
        .into_iter()
        .filter(|c| !c.is(b"EXIF"))
        .collect();

    if let Some(vp8x) = chunks.iter_mut().find(|c| c.is(b"VP8X")) {
        let mut payload = vp8x.payload.to_vec();
        if payload.is_empty() {
            return Err(StickerError::Truncated("VP8X".into()));
        }
        payload[0] |= FLAG_EXIF;
        vp8x.payload = std::borrow::Cow::Owned(payload);
    } else {
        let image = chunks
            .iter()
            .find(|c| c.is(b"VP8 ") || c.is(b"VP8L"))
            .ok_or(StickerError::MissingImageData)?;
        let (width, height, lossless_alpha) = bitstream_info(image)?;
        let has_alpha = lossless_alpha || chunks.iter().any(|c| c.is(b"ALPH"));
        let flags = FLAG_EXIF | if has_alpha { FLAG_ALPHA } else { 0 };
        chunks.insert(
            0,
            Chunk {
                fourcc: *b"VP8X",
                payload: std::borrow::Cow::Owned(vp8x_payload(flags, width, height)),
            },
        );
    }

    let exif = Chunk {
        fourcc: *b"EXIF",
        payload: std::borrow::Cow::Owned(sticker_exif(metadata)),
    };
    match chunks.iter().position(|c| c.is(b"XMP ")) {
        Some(pos) => chunks.insert(pos, exif),
        None => chunks.push(exif),
    }

    let mut body = b"WEBP".to_vec();
    for chunk in &chunks {
        body.extend_from_slice(&chunk.fourcc);
        body.extend_from_slice(&(chunk.payload.len() as u32).to_le_bytes());
        body.extend_from_slice(&chunk.payload);
        if chunk.payload.len() % 2 == 1 {
            body.push(0);
        }
    }

    let mut out = Vec::with_capacity(body.len() + 8);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}
