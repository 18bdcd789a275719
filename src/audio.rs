//! Content sniffing for uploaded voice notes.
//!
//! Classification looks only at magic signatures in a bounded header prefix.
//! A positive result does not guarantee the payload decodes.

use tracing::debug;

/// Bytes inspected when classifying an upload.
pub const SNIFF_LEN: usize = 4096;

pub const ALLOWED_AUDIO_MIME: &[&str] = &[
    "audio/mpeg",
    "audio/wav",
    "audio/x-wav",
    "audio/flac",
    "audio/ogg",
    "audio/webm",
    "audio/aac",
];

/// Classify the leading bytes of `data` by magic signature.
pub fn detect_audio_mime(data: &[u8]) -> Option<&'static str> {
    let header = &data[..data.len().min(SNIFF_LEN)];

    if header.len() >= 12 && &header[..4] == b"RIFF" && &header[8..12] == b"WAVE" {
        Some("audio/wav")
    } else if header.len() >= 4 && &header[..4] == b"fLaC" {
        Some("audio/flac")
    } else if header.len() >= 4 && &header[..4] == b"OggS" {
        Some("audio/ogg")
    } else if header.len() >= 3 && &header[..3] == b"ID3" {
        Some("audio/mpeg")
    } else if header.len() >= 4 && header[..4] == [0x1A, 0x45, 0xDF, 0xA3] {
        // EBML container; only the WebM doctype is audio we accept
        if contains(header, b"webm") {
            Some("audio/webm")
        } else {
            Some("video/x-matroska")
        }
    } else if header.len() >= 4 && &header[..4] == b"ADIF" {
        Some("audio/aac")
    } else if header.len() >= 2 && header[0] == 0xFF && header[1] & 0xF6 == 0xF0 {
        // ADTS: sync word with layer bits 00
        Some("audio/aac")
    } else if header.len() >= 2 && header[0] == 0xFF && header[1] & 0xE0 == 0xE0 && header[1] & 0x06 != 0 {
        // MPEG audio frame sync
        Some("audio/mpeg")
    } else if header.len() >= 12 && &header[4..8] == b"ftyp" {
        Some("audio/mp4")
    } else if header.len() >= 12 && &header[..4] == b"FORM" && &header[8..12] == b"AIFF" {
        Some("audio/x-aiff")
    } else {
        None
    }
}

/// True when `data` looks like one of the accepted audio formats.
pub fn ensure_valid_audio(data: &[u8]) -> bool {
    if data.is_empty() {
        debug!("Rejected empty audio upload");
        return false;
    }

    match detect_audio_mime(data) {
        Some(mime) if ALLOWED_AUDIO_MIME.contains(&mime) => {
            debug!("Detected audio MIME type: {mime}");
            true
        }
        other => {
            debug!("Rejected audio upload with detected type {:?}", other);
            false
        }
    }
}

/// File extension used when storing audio of the given MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "audio/mpeg" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/flac" => "flac",
        "audio/ogg" => "ogg",
        "audio/webm" => "webm",
        "audio/aac" => "aac",
        _ => "bin",
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
