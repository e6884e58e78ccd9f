//! Normalization of raw field values into data URIs

use std::sync::LazyLock;

use base64::Engine as _;
use tracing::trace;

use super::{SupportedFileType, sniff};

static MEDIA_HEADER: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^data:(image|application/\w+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub url: String,
    pub file_type: Option<SupportedFileType>,
}

/// Whether `src` only uses base64 characters.
///
/// Whitespace is ignored and up to two trailing `=` are accepted. The payload
/// may use either the standard or the URL-safe alphabet, but not both.
pub fn is_base64(src: &str) -> bool {
    let stripped: String = src.chars().filter(|c| !c.is_whitespace()).collect();
    let body = stripped
        .strip_suffix("==")
        .or_else(|| stripped.strip_suffix('='))
        .unwrap_or(&stripped);
    let standard = body
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/');
    let url_safe = body
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    standard || url_safe
}

/// Type named by a `data:` header the panel can render as-is.
pub fn header_type(raw: &str) -> Option<Option<SupportedFileType>> {
    let captures = MEDIA_HEADER.captures(raw)?;
    let group = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    if let Some(ty) = SupportedFileType::from_essence(group) {
        return Some(Some(ty));
    }
    let ty = data_url::DataUrl::process(raw).ok().and_then(|data| {
        let mime = data.mime_type();
        SupportedFileType::from_essence(&format!("{}/{}", mime.type_, mime.subtype))
    });
    Some(ty)
}

/// Turn a raw field value into a renderable data URI.
///
/// Values that already carry a usable header are returned unchanged. Anything
/// else is base64-encoded when needed and prefixed with a header built from
/// the sniffed content type, or an empty MIME when sniffing fails.
pub fn normalize(raw: &str) -> Normalized {
    if let Some(file_type) = header_type(raw) {
        trace!(?file_type, "value already has a data header");
        return Normalized {
            url: raw.to_owned(),
            file_type,
        };
    }

    let payload = if is_base64(raw) {
        raw.to_owned()
    } else {
        base64::engine::general_purpose::STANDARD.encode(raw.as_bytes())
    };

    let file_type = sniff::sniff_payload(&payload);
    let url = match file_type {
        Some(ty) => format!("data:{ty};base64,{payload}"),
        None => format!("data:;base64,{payload}"),
    };
    Normalized { url, file_type }
}
