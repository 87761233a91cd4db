//! Magic-byte file type detection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileType {
    pub mime: &'static str,
    pub ext: &'static str,
}

impl FileType {
    const fn new(mime: &'static str, ext: &'static str) -> Self {
        Self { mime, ext }
    }

    pub fn top_level(&self) -> &'static str {
        top_level(self.mime)
    }
}

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// The part of a MIME type before the `/`.
pub fn top_level(mime: &str) -> &str {
    mime.split('/').next().unwrap_or_default()
}

fn ascii_at(data: &[u8], offset: usize, sig: &[u8]) -> bool {
    data.len() >= offset + sig.len() && &data[offset..offset + sig.len()] == sig
}

pub fn sniff(data: &[u8]) -> Option<FileType> {
    if ascii_at(data, 0, &[0xFF, 0xD8, 0xFF]) {
        return Some(FileType::new("image/jpeg", "jpg"));
    }
    if ascii_at(data, 0, &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(FileType::new("image/png", "png"));
    }
    if ascii_at(data, 0, b"GIF87a") || ascii_at(data, 0, b"GIF89a") {
        return Some(FileType::new("image/gif", "gif"));
    }
    if ascii_at(data, 0, b"BM") && data.len() >= 14 {
        return Some(FileType::new("image/bmp", "bmp"));
    }
    if ascii_at(data, 0, b"RIFF") {
        if ascii_at(data, 8, b"WEBP") {
            return Some(FileType::new("image/webp", "webp"));
        }
        if ascii_at(data, 8, b"WAVE") {
            return Some(FileType::new("audio/wav", "wav"));
        }
        if ascii_at(data, 8, b"AVI ") {
            return Some(FileType::new("video/vnd.avi", "avi"));
        }
    }
    if ascii_at(data, 4, b"ftyp") {
        return Some(sniff_ftyp(data));
    }
    if ascii_at(data, 0, &[0x1A, 0x45, 0xDF, 0xA3]) {
        let head = &data[..data.len().min(64)];
        if head.windows(4).any(|w| w == b"webm") {
            return Some(FileType::new("video/webm", "webm"));
        }
        return Some(FileType::new("video/x-matroska", "mkv"));
    }
    if ascii_at(data, 0, b"OggS") {
        if ascii_at(data, 28, b"OpusHead") {
            return Some(FileType::new("audio/opus", "opus"));
        }
        return Some(FileType::new("audio/ogg", "ogg"));
    }
    if ascii_at(data, 0, b"fLaC") {
        return Some(FileType::new("audio/x-flac", "flac"));
    }
    if ascii_at(data, 0, b"ID3") || (data.len() >= 2 && data[0] == 0xFF && data[1] & 0xE0 == 0xE0)
    {
        return Some(FileType::new("audio/mpeg", "mp3"));
    }
    if ascii_at(data, 0, b"%PDF-") {
        return Some(FileType::new("application/pdf", "pdf"));
    }
    if ascii_at(data, 0, &[b'P', b'K', 0x03, 0x04]) {
        return Some(sniff_zip(data));
    }
    None
}

fn sniff_ftyp(data: &[u8]) -> FileType {
    let brand = data.get(8..12).unwrap_or_default();
    match brand {
        b"M4A " | b"M4B " => FileType::new("audio/mp4", "m4a"),
        b"qt  " => FileType::new("video/quicktime", "mov"),
        b"heic" | b"heix" => FileType::new("image/heic", "heic"),
        b"avif" => FileType::new("image/avif", "avif"),
        _ => FileType::new("video/mp4", "mp4"),
    }
}

/// Office Open XML containers are zip archives whose first entries name the
/// document kind.
fn sniff_zip(data: &[u8]) -> FileType {
    let head = &data[..data.len().min(4096)];
    let contains = |needle: &[u8]| head.windows(needle.len()).any(|w| w == needle);
    if contains(b"xl/") {
        FileType::new(XLSX_MIME, "xlsx")
    } else if contains(b"word/") {
        FileType::new(DOCX_MIME, "docx")
    } else if contains(b"ppt/") {
        FileType::new(PPTX_MIME, "pptx")
    } else {
        FileType::new("application/zip", "zip")
    }
}
