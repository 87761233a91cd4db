use std::fs;

use wa_message::StickerMetadata;
use wa_message::mime;
use wa_message::sticker::{StickerError, sticker_exif, write_exif_webp};

fn riff(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut body = b"WEBP".to_vec();
    for (fourcc, payload) in chunks {
        body.extend_from_slice(*fourcc);
        body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        body.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            body.push(0);
        }
    }
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

/// A 2x3 lossless image with an alpha hint.
fn lossless() -> Vec<u8> {
    let bits: u32 = 1 | (2 << 14) | (1 << 28);
    let mut vp8l = vec![0x2F];
    vp8l.extend_from_slice(&bits.to_le_bytes());
    vp8l.extend_from_slice(&[0, 0]);
    riff(&[(b"VP8L", vp8l)])
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[test]
fn test_tagging_a_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.webp");
    let output = dir.path().join("out.webp");
    fs::write(&input, lossless()).unwrap();

    let metadata = StickerMetadata::new("Pack", "Me");
    let tagged = write_exif_webp(&fs::read(&input).unwrap(), &metadata).unwrap();
    fs::write(&output, &tagged).unwrap();

    let written = fs::read(&output).unwrap();
    assert_eq!(&written[..4], b"RIFF");
    assert_eq!(
        u32::from_le_bytes(written[4..8].try_into().unwrap()) as usize,
        written.len() - 8
    );
    assert_eq!(&written[12..16], b"VP8X");
    assert_eq!(count(&written, &sticker_exif(&metadata)), 1);
    assert_eq!(mime::sniff(&written).map(|t| t.mime), Some("image/webp"));
}

#[test]
fn test_retagging_replaces_previous_metadata() {
    let first = write_exif_webp(&lossless(), &StickerMetadata::new("Old", "Someone")).unwrap();
    let metadata = StickerMetadata::new("New", "Someone else");
    let second = write_exif_webp(&first, &metadata).unwrap();

    assert_eq!(count(&second, b"EXIF"), 1);
    assert_eq!(count(&second, b"\"Old\""), 0);
    assert_eq!(count(&second, &sticker_exif(&metadata)), 1);
}

#[test]
fn test_non_webp_input_is_rejected() {
    let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    assert_eq!(
        write_exif_webp(png, &StickerMetadata::send_default()),
        Err(StickerError::NotWebp)
    );
}
