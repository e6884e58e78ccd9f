use std::path::PathBuf;

pub mod config;
pub mod frame;
pub mod link;
pub mod media;
pub mod resolve;
pub mod size;

#[cfg(test)]
mod tests;

pub use config::{MediaSource, PanelOptions};
pub use frame::{DataFrame, Field, FieldKind, RowIndex};
pub use media::{MediaFormat, MediaType, SupportedFileType, blob::BlobRegistry};
pub use resolve::{MediaDescriptor, MediaResolver, RowView, Viewport};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {path:?}: {error}")]
    Read {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Failed to parse YAML options: {0}")]
    ParseYaml(serde_yaml::Error),
    #[error("Failed to parse TOML options: {0}")]
    ParseToml(toml::de::Error),
    #[error("Unsupported options file: {0:?}")]
    UnsupportedOptionsFormat(PathBuf),
    #[error("Failed to parse dataset: {0}")]
    ParseJson(serde_json::Error),
    #[error("Field {field} of frame {frame:?} has {got} values, expected {expected}")]
    RaggedFrame {
        frame: String,
        field: String,
        expected: usize,
        got: usize,
    },
}
