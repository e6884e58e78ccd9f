use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    media::MediaFormat,
    size::{SizeMode, SizeSpec},
};

pub const DEFAULT_NO_RESULTS_MESSAGE: &str = "Nothing to display...";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    Zoom,
    Navigation,
    Download,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoomType {
    #[default]
    Default,
    Panzoom,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ImageScale {
    #[default]
    Auto,
    CrispEdges,
    Pixelated,
}

/// One place a row's media may come from.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaSource {
    #[serde(default)]
    pub field: String,
    /// Declared format; inferred from the content when absent.
    #[serde(default, rename = "type")]
    pub format: Option<MediaFormat>,
    #[serde(default)]
    pub url_field: Option<String>,
}

impl MediaSource {
    pub fn new(field: impl Into<String>, format: Option<MediaFormat>) -> Self {
        Self {
            field: field.into(),
            format,
            url_field: None,
        }
    }

    pub fn with_url_field(mut self, url_field: impl Into<String>) -> Self {
        self.url_field = Some(url_field.into());
        self
    }
}

fn default_formats() -> Vec<MediaFormat> {
    vec![MediaFormat::Image]
}

fn default_no_results_message() -> String {
    DEFAULT_NO_RESULTS_MESSAGE.to_owned()
}

fn default_buttons() -> Vec<ButtonType> {
    vec![ButtonType::Zoom, ButtonType::Navigation]
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PanelOptions {
    #[serde(default = "default_formats")]
    pub formats: Vec<MediaFormat>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_no_results_message")]
    pub no_results_message: String,

    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub media_sources: Vec<MediaSource>,

    #[serde(default = "default_true")]
    pub toolbar: bool,
    #[serde(default = "default_buttons")]
    pub buttons: Vec<ButtonType>,
    #[serde(default)]
    pub zoom_type: ZoomType,
    #[serde(default = "default_true")]
    pub pdf_toolbar: bool,

    #[serde(default)]
    pub scale: ImageScale,

    #[serde(default = "default_true")]
    pub controls: bool,
    #[serde(default = "default_true")]
    pub auto_play: bool,
    #[serde(default = "default_true")]
    pub infinity_play: bool,

    #[serde(default)]
    pub width_mode: SizeMode,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub width_name: Option<String>,
    #[serde(default)]
    pub height_mode: SizeMode,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub height_name: Option<String>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            description: None,
            no_results_message: default_no_results_message(),
            video_url: None,
            image_url: None,
            name: None,
            media_sources: Vec::new(),
            toolbar: true,
            buttons: default_buttons(),
            zoom_type: ZoomType::default(),
            pdf_toolbar: true,
            scale: ImageScale::default(),
            controls: true,
            auto_play: true,
            infinity_play: true,
            width_mode: SizeMode::default(),
            width: None,
            width_name: None,
            height_mode: SizeMode::default(),
            height: None,
            height_name: None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

impl PanelOptions {
    pub fn is_enabled(&self, format: MediaFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Whether the toolbar shows `button`.
    pub fn has_button(&self, button: ButtonType) -> bool {
        self.toolbar && self.buttons.contains(&button)
    }

    /// Sources in priority order.
    ///
    /// Options saved before `mediaSources` existed name one field per kind:
    /// the video URL field first, then the image URL field, then the generic
    /// encoded field, whose type is left to inference.
    pub fn media_sources(&self) -> Vec<MediaSource> {
        if !self.media_sources.is_empty() {
            return self.media_sources.clone();
        }
        let mut sources = Vec::new();
        if let Some(field) = non_empty(&self.video_url) {
            sources.push(MediaSource::new(field, Some(MediaFormat::Video)));
        }
        if let Some(field) = non_empty(&self.image_url) {
            sources.push(MediaSource::new(field, Some(MediaFormat::Image)));
        }
        sources.push(MediaSource::new(
            non_empty(&self.name).unwrap_or_default(),
            None,
        ));
        sources
    }

    pub fn width_spec(&self) -> SizeSpec<'_> {
        SizeSpec {
            mode: self.width_mode,
            value: self.width,
            field: non_empty(&self.width_name),
        }
    }

    pub fn height_spec(&self) -> SizeSpec<'_> {
        SizeSpec {
            mode: self.height_mode,
            value: self.height,
            field: non_empty(&self.height_name),
        }
    }

    pub fn from_yaml(src: &str) -> Result<Self, Error> {
        serde_yaml::from_str(src).map_err(Error::ParseYaml)
    }

    pub fn from_toml(src: &str) -> Result<Self, Error> {
        toml::from_str(src).map_err(Error::ParseToml)
    }

    /// Load options from a `.yaml`, `.yml` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|error| Error::Read {
            error,
            path: path.to_owned(),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&src),
            Some("toml") => Self::from_toml(&src),
            _ => Err(Error::UnsupportedOptionsFormat(path.to_owned())),
        }
    }
}
