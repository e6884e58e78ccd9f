use serde::{Deserialize, Serialize};

pub mod blob;
pub mod normalize;
pub mod sniff;

/// Kind of media a source is configured to hold.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Image,
    Video,
    Audio,
    Pdf,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Image => "image",
            MediaFormat::Video => "video",
            MediaFormat::Audio => "audio",
            MediaFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content types the panel recognizes from headers or leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedFileType {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
    Svg,
    Pdf,
    Mp4,
    Webm,
    Ogg,
    Mp3,
}

impl SupportedFileType {
    pub const ALL: [SupportedFileType; 11] = [
        SupportedFileType::Jpeg,
        SupportedFileType::Png,
        SupportedFileType::Gif,
        SupportedFileType::Webp,
        SupportedFileType::Bmp,
        SupportedFileType::Svg,
        SupportedFileType::Pdf,
        SupportedFileType::Mp4,
        SupportedFileType::Webm,
        SupportedFileType::Ogg,
        SupportedFileType::Mp3,
    ];

    pub fn essence(&self) -> &'static str {
        match self {
            SupportedFileType::Jpeg => "image/jpeg",
            SupportedFileType::Png => "image/png",
            SupportedFileType::Gif => "image/gif",
            SupportedFileType::Webp => "image/webp",
            SupportedFileType::Bmp => "image/bmp",
            SupportedFileType::Svg => "image/svg+xml",
            SupportedFileType::Pdf => "application/pdf",
            SupportedFileType::Mp4 => "video/mp4",
            SupportedFileType::Webm => "video/webm",
            SupportedFileType::Ogg => "audio/ogg",
            SupportedFileType::Mp3 => "audio/mpeg",
        }
    }

    pub fn from_essence(essence: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.essence().eq_ignore_ascii_case(essence))
    }

    pub fn from_mime(mime: &mime::Mime) -> Option<Self> {
        Self::from_essence(mime.essence_str())
    }

    pub fn format(&self) -> MediaFormat {
        match self {
            SupportedFileType::Jpeg
            | SupportedFileType::Png
            | SupportedFileType::Gif
            | SupportedFileType::Webp
            | SupportedFileType::Bmp
            | SupportedFileType::Svg => MediaFormat::Image,
            SupportedFileType::Pdf => MediaFormat::Pdf,
            SupportedFileType::Mp4 | SupportedFileType::Webm => MediaFormat::Video,
            SupportedFileType::Ogg | SupportedFileType::Mp3 => MediaFormat::Audio,
        }
    }
}

impl std::fmt::Display for SupportedFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.essence())
    }
}

/// Type reported to the rendering layer for a resolved row.
///
/// A source that declares its format reports that format; otherwise the type
/// is whatever the content revealed, or `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Declared(MediaFormat),
    Inferred(SupportedFileType),
    Unknown,
}

impl MediaType {
    pub fn format(&self) -> Option<MediaFormat> {
        match self {
            MediaType::Declared(format) => Some(*format),
            MediaType::Inferred(ty) => Some(ty.format()),
            MediaType::Unknown => None,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.format() == Some(MediaFormat::Pdf)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Declared(format) => std::fmt::Display::fmt(format, f),
            MediaType::Inferred(ty) => std::fmt::Display::fmt(ty, f),
            MediaType::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for MediaType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
