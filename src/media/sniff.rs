//! Content type detection for headerless base64 payloads
//!
//! Common file signatures always encode to the same first base64 character,
//! so the first character of a payload is enough to tell the formats below
//! apart. Stored data relies on this table; entries must not change.

use super::SupportedFileType;

static SIGNATURES: [(char, SupportedFileType); 11] = [
    // FF D8 FF
    ('/', SupportedFileType::Jpeg),
    // 89 50 4E 47
    ('i', SupportedFileType::Png),
    // GIF8
    ('R', SupportedFileType::Gif),
    // RIFF....WEBP
    ('U', SupportedFileType::Webp),
    // BM
    ('Q', SupportedFileType::Bmp),
    // <svg, <?xml
    ('P', SupportedFileType::Svg),
    // %PDF
    ('J', SupportedFileType::Pdf),
    // 00 00 00 xx ftyp
    ('A', SupportedFileType::Mp4),
    // 1A 45 DF A3
    ('G', SupportedFileType::Webm),
    // OggS
    ('T', SupportedFileType::Ogg),
    // ID3
    ('S', SupportedFileType::Mp3),
];

/// Look up the content type for the first character of a base64 payload.
pub fn sniff(first: char) -> Option<SupportedFileType> {
    SIGNATURES
        .iter()
        .find_map(|(symbol, ty)| (*symbol == first).then_some(*ty))
}

pub fn sniff_payload(payload: &str) -> Option<SupportedFileType> {
    payload.chars().next().and_then(sniff)
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use super::{sniff, sniff_payload};
    use crate::media::SupportedFileType;

    fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_canonical_signatures() {
        let samples: [(&[u8], SupportedFileType); 12] = [
            (&[0xFF, 0xD8, 0xFF, 0xE0], SupportedFileType::Jpeg),
            (b"\x89PNG\r\n\x1a\n", SupportedFileType::Png),
            (b"GIF89a", SupportedFileType::Gif),
            (b"RIFF\x24\x00\x00\x00WEBPVP8 ", SupportedFileType::Webp),
            (b"BM\x36\x00", SupportedFileType::Bmp),
            (b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>", SupportedFileType::Svg),
            (b"<?xml version=\"1.0\"?>", SupportedFileType::Svg),
            (b"%PDF-1.7", SupportedFileType::Pdf),
            (b"\x00\x00\x00\x20ftypisom", SupportedFileType::Mp4),
            (&[0x1A, 0x45, 0xDF, 0xA3], SupportedFileType::Webm),
            (b"OggS\x00\x02", SupportedFileType::Ogg),
            (b"ID3\x04\x00", SupportedFileType::Mp3),
        ];
        for (bytes, expected) in samples {
            let payload = encode(bytes);
            assert_eq!(sniff_payload(&payload), Some(expected), "{payload}");
        }
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(sniff('z'), None);
        assert_eq!(sniff('+'), None);
        assert_eq!(sniff_payload(""), None);
    }

    #[test]
    fn test_sniff_is_stable() {
        for c in ['/', 'i', 'x'] {
            assert_eq!(sniff(c), sniff(c));
        }
    }
}
