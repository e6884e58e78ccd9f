//! Binary objects behind short-lived `blob:` URLs
//!
//! Some viewers cannot load a document from a `data:` URI, so the payload is
//! decoded into a [`Blob`] kept in a process-local [`BlobRegistry`]. Callers
//! receive an [`ObjectUrl`] lease and own its release.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use bytes::Bytes;
use derive_debug::Dbg;
use indexmap::IndexMap;
use tracing::{debug, trace};

pub const DEFAULT_SLICE_SIZE: usize = 512;

const URL_PREFIX: &str = "blob:media-panel/";

#[derive(Debug, thiserror::Error)]
#[error("failed to decode base64 payload ({content_type}): {error}")]
pub struct DecodeError {
    pub content_type: mime::Mime,
    pub error: data_url::forgiving_base64::InvalidBase64,
}

#[derive(Dbg, Clone)]
pub struct Blob {
    pub content_type: mime::Mime,
    #[dbg(skip)]
    pub parts: Vec<Bytes>,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.parts.iter().map(Bytes::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(Bytes::is_empty)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.parts.iter().flat_map(|part| part.iter().copied()).collect()
    }
}

#[derive(Default)]
struct Entries {
    blobs: IndexMap<String, Blob>,
}

#[derive(Default, Clone)]
pub struct BlobRegistry {
    entries: Arc<Mutex<Entries>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for BlobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobRegistry")
            .field("live", &self.len())
            .finish()
    }
}

fn strip_data_header(data: &str) -> String {
    let payload = match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    };
    payload
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect()
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decode a base64 data URI into a blob and register it.
    pub fn materialize(
        &self,
        data: &str,
        content_type: mime::Mime,
    ) -> Result<ObjectUrl, DecodeError> {
        self.materialize_with_slice(data, content_type, DEFAULT_SLICE_SIZE)
    }

    pub fn materialize_with_slice(
        &self,
        data: &str,
        content_type: mime::Mime,
        slice_size: usize,
    ) -> Result<ObjectUrl, DecodeError> {
        let payload = strip_data_header(data);
        let decoded = match data_url::forgiving_base64::decode_to_vec(payload.as_bytes()) {
            Ok(decoded) => Bytes::from(decoded),
            Err(error) => {
                return Err(DecodeError {
                    content_type,
                    error,
                });
            }
        };
        let slice_size = slice_size.max(1);
        let parts = (0..decoded.len())
            .step_by(slice_size)
            .map(|offset| decoded.slice(offset..(offset + slice_size).min(decoded.len())))
            .collect::<Vec<_>>();
        trace!(
            size = decoded.len(),
            parts = parts.len(),
            %content_type,
            "decoded blob"
        );
        Ok(self.register(Blob {
            content_type,
            parts,
        }))
    }

    pub fn register(&self, blob: Blob) -> ObjectUrl {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("{URL_PREFIX}{id:016x}");
        self.lock().blobs.insert(url.clone(), blob);
        debug!(%url, "created object URL");
        ObjectUrl {
            url,
            registry: self.clone(),
            revoked: false,
        }
    }

    /// Blob behind `url`, if its lease has not been released.
    pub fn get(&self, url: &str) -> Option<Blob> {
        let key = url.split_once('#').map(|(key, _)| key).unwrap_or(url);
        self.lock().blobs.get(key).cloned()
    }

    /// Number of live object URLs.
    pub fn len(&self) -> usize {
        self.lock().blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn revoke(&self, url: &str) {
        if self.lock().blobs.shift_remove(url).is_some() {
            debug!(%url, "revoked object URL");
        }
    }
}

/// Lease on a registered blob.
///
/// Released exactly once, either through [`ObjectUrl::revoke`] or when the
/// lease is dropped.
#[derive(Dbg)]
pub struct ObjectUrl {
    url: String,
    #[dbg(skip)]
    registry: BlobRegistry,
    revoked: bool,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn revoke(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.revoked {
            self.revoked = true;
            self.registry.revoke(&self.url);
        }
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.release();
    }
}

impl PartialEq for ObjectUrl {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl std::fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlobRegistry, DEFAULT_SLICE_SIZE};

    const PDF: &str = "data:application/pdf;base64,JVBERi0xLjcKJeLjz9MK";

    #[test]
    fn test_materialize_pdf() {
        let registry = BlobRegistry::new();
        let url = registry.materialize(PDF, mime::APPLICATION_PDF).unwrap();
        assert!(url.as_str().starts_with("blob:media-panel/"));

        let blob = registry.get(url.as_str()).unwrap();
        assert_eq!(blob.content_type, mime::APPLICATION_PDF);
        assert_eq!(blob.to_vec(), b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n");
        assert_eq!(blob.parts.len(), 1);
    }

    #[test]
    fn test_materialize_ignores_whitespace() {
        let registry = BlobRegistry::new();
        let url = registry
            .materialize("data:application/pdf;base64,JVBE\nRi0x\r\nLjc=", mime::APPLICATION_PDF)
            .unwrap();
        assert_eq!(registry.get(url.as_str()).unwrap().to_vec(), b"%PDF-1.7");
    }

    #[test]
    fn test_materialize_url_safe_alphabet() {
        let registry = BlobRegistry::new();
        let url = registry
            .materialize("JVBERi0xLjcK-__-", mime::APPLICATION_PDF)
            .unwrap();
        assert_eq!(
            registry.get(url.as_str()).unwrap().to_vec(),
            b"%PDF-1.7\n\xfb\xff\xfe"
        );
    }

    #[test]
    fn test_slices() {
        let registry = BlobRegistry::new();
        // 12 bytes
        let url = registry
            .materialize_with_slice("aGVsbG8gd29ybGQh", mime::TEXT_PLAIN, 5)
            .unwrap();
        let blob = registry.get(url.as_str()).unwrap();
        let sizes = blob.parts.iter().map(|part| part.len()).collect::<Vec<_>>();
        assert_eq!(sizes, vec![5, 5, 2]);
        assert_eq!(blob.len(), 12);
        assert_eq!(blob.to_vec(), b"hello world!");
        assert_eq!(DEFAULT_SLICE_SIZE, 512);
    }

    #[test]
    fn test_revoke_releases_once() {
        let registry = BlobRegistry::new();
        let first = registry.materialize(PDF, mime::APPLICATION_PDF).unwrap();
        let second = registry.materialize(PDF, mime::APPLICATION_PDF).unwrap();
        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);

        let key = first.to_string();
        first.revoke();
        assert!(registry.get(&key).is_none());
        assert_eq!(registry.len(), 1);

        drop(second);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_ignores_fragment() {
        let registry = BlobRegistry::new();
        let url = registry.materialize(PDF, mime::APPLICATION_PDF).unwrap();
        assert!(registry.get(&format!("{url}#toolbar=0")).is_some());
    }

    #[test]
    fn test_invalid_payload() {
        let registry = BlobRegistry::new();
        let error = registry
            .materialize("data:application/pdf;base64,J", mime::APPLICATION_PDF)
            .unwrap_err();
        assert_eq!(error.content_type, mime::APPLICATION_PDF);
        assert!(registry.is_empty());
    }
}
