//! Per-row media resolution
//!
//! [`MediaResolver`] walks the configured sources in order and turns the
//! first non-empty value into a [`MediaDescriptor`]. [`MediaResolver::render_row`]
//! adds everything else the rendering layer needs for that row.

use std::borrow::Cow;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::{
    config::{MediaSource, PanelOptions},
    frame::{
        self, DataFrame, FieldKind, FieldQuery, RowIndex,
        lookup::value_text,
    },
    link::{self, LinkModel},
    media::{
        MediaType, SupportedFileType,
        blob::{BlobRegistry, ObjectUrl},
        normalize::{self, is_base64},
    },
};

/// Suffix that hides the embedded PDF reader's own toolbar.
pub const PDF_HIDE_TOOLBAR: &str = "#toolbar=0";

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct MediaDescriptor {
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Media column of the source that produced the descriptor. Differs from
    /// `field` when the value came from the source's URL column.
    #[serde(skip)]
    pub source_field: Option<String>,
    /// Lease on the blob behind `url`, when the payload was materialized.
    #[serde(skip)]
    pub object_url: Option<ObjectUrl>,
}

impl MediaDescriptor {
    /// Nothing to show for the row.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.media_type.is_none()
    }

    /// Release the object URL, if any. The descriptor's `url` is dangling
    /// afterwards.
    pub fn release(&mut self) {
        if let Some(object_url) = self.object_url.take() {
            object_url.revoke();
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Everything the rendering layer needs to draw one row.
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub index: Option<usize>,
    pub media: MediaDescriptor,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_results_message: Option<String>,
}

fn guess_from_url(url: &str) -> Option<SupportedFileType> {
    if let Some(ty) = normalize::header_type(url) {
        return ty;
    }
    let path = match url::Url::parse(url) {
        Ok(parsed) => Cow::Owned(parsed.path().to_owned()),
        Err(_) => Cow::Borrowed(url.split(['?', '#']).next().unwrap_or(url)),
    };
    mime_guess::from_path(&*path)
        .iter()
        .find_map(|mime| SupportedFileType::from_mime(&mime))
}

pub struct MediaResolver<'a> {
    options: &'a PanelOptions,
    blobs: &'a BlobRegistry,
}

impl<'a> MediaResolver<'a> {
    pub fn new(options: &'a PanelOptions, blobs: &'a BlobRegistry) -> Self {
        Self { options, blobs }
    }

    pub fn options(&self) -> &PanelOptions {
        self.options
    }

    /// Resolve the media shown for `row`, trying sources in declared order.
    pub fn resolve(&self, frames: &[DataFrame], row: RowIndex) -> MediaDescriptor {
        for source in self.options.media_sources() {
            if let Some(descriptor) = self.resolve_source(frames, &source, row) {
                debug!(
                    field = descriptor.field.as_deref(),
                    media_type = ?descriptor.media_type,
                    ?row,
                    "resolved media"
                );
                return descriptor;
            }
        }
        trace!(?row, "no media for row");
        MediaDescriptor::none()
    }

    fn resolve_source(
        &self,
        frames: &[DataFrame],
        source: &MediaSource,
        row: RowIndex,
    ) -> Option<MediaDescriptor> {
        if let Some(format) = source.format {
            if !self.options.is_enabled(format) {
                trace!(field = %source.field, %format, "format disabled, skipping source");
                return None;
            }
        }

        if let Some(url_field) = source.url_field.as_deref().filter(|name| !name.is_empty()) {
            let query = FieldQuery::named(Some(url_field), FieldKind::String);
            let url = frame::field_value(frames, &query, row).and_then(value_text);
            if let Some(url) = url {
                return Some(self.describe(source, url_field, &url, false));
            }
        }

        let column = frame::find_field(
            frames,
            &FieldQuery::named(Some(source.field.as_str()), FieldKind::String),
        )?;
        let value = row
            .resolve(column.len())
            .and_then(|index| column.values.get(index))
            .and_then(value_text)?;
        Some(self.describe(source, &column.name, &value, is_base64(&value)))
    }

    /// `#toolbar=0` applies to any PDF, whether its type was declared or inferred.
    fn describe(
        &self,
        source: &MediaSource,
        field: &str,
        value: &str,
        encoded: bool,
    ) -> MediaDescriptor {
        let (mut url, inferred) = if encoded {
            let normalized = normalize::normalize(value);
            (normalized.url, normalized.file_type)
        } else {
            (value.to_owned(), guess_from_url(value))
        };
        let media_type = match (source.format, inferred) {
            (Some(format), _) => MediaType::Declared(format),
            (None, Some(ty)) => MediaType::Inferred(ty),
            (None, None) => MediaType::Unknown,
        };

        let mut object_url = None;
        if media_type.is_pdf() && url.starts_with("data:") {
            match self.blobs.materialize(&url, mime::APPLICATION_PDF) {
                Ok(materialized) => {
                    url = materialized.to_string();
                    object_url = Some(materialized);
                }
                Err(error) => warn!(%error, field, "serving PDF as data URI"),
            }
        }
        if media_type.is_pdf() && !self.options.pdf_toolbar {
            url.push_str(PDF_HIDE_TOOLBAR);
        }

        MediaDescriptor {
            media_type: Some(media_type),
            url,
            field: Some(field.to_owned()),
            source_field: Some(source.field.clone()),
            object_url,
        }
    }

    fn description(&self, frames: &[DataFrame], row: RowIndex) -> Option<String> {
        let name = self.options.description.as_deref().filter(|name| !name.is_empty())?;
        frame::field_value(frames, &FieldQuery::named(Some(name), FieldKind::String), row)
            .and_then(value_text)
            .map(Cow::into_owned)
    }

    pub fn render_row(&self, frames: &[DataFrame], viewport: Viewport, row: RowIndex) -> RowView {
        let media = self.resolve(frames, row);
        let link = media
            .source_field
            .as_deref()
            .and_then(|field| link::data_link(frames, Some(field), row));
        let no_results_message = media
            .is_none()
            .then(|| self.options.no_results_message.clone());
        RowView {
            index: row.resolve(frame::row_count(frames)),
            width: self.options.width_spec().resolve(frames, viewport.width, row),
            height: self.options.height_spec().resolve(frames, viewport.height, row),
            description: self.description(frames, row),
            link,
            no_results_message,
            media,
        }
    }

    /// Render every row of the dataset, or a single empty row when there is
    /// no data at all.
    pub fn render_all(&self, frames: &[DataFrame], viewport: Viewport) -> Vec<RowView> {
        match frame::row_count(frames) {
            0 => vec![self.render_row(frames, viewport, RowIndex::Latest)],
            rows => (0..rows)
                .map(|index| self.render_row(frames, viewport, RowIndex::At(index)))
                .collect(),
        }
    }
}
