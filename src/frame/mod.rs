//! Tabular input of the panel
//!
//! A dataset is an ordered list of [`DataFrame`]s. Each frame holds named,
//! typed columns whose values line up by row index.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, link::DataLink};

pub mod lookup;

pub use lookup::{FieldQuery, RowIndex, field_value, find_field, row_count};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    #[serde(other)]
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FieldConfig {
    #[serde(default)]
    pub links: Vec<DataLink>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
    #[serde(default)]
    pub config: FieldConfig,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        kind: FieldKind,
        values: impl IntoIterator<Item = serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            values: values.into_iter().collect(),
            config: FieldConfig::default(),
        }
    }

    pub fn string<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            name,
            FieldKind::String,
            values.into_iter().map(|v| serde_json::Value::String(v.into())),
        )
    }

    pub fn number(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            FieldKind::Number,
            values.into_iter().map(|v| {
                serde_json::Number::from_f64(v)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }),
        )
    }

    pub fn with_links(mut self, links: impl IntoIterator<Item = DataLink>) -> Self {
        self.config.links = links.into_iter().collect();
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    fields: Vec<Field>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawFrame")]
pub struct DataFrame {
    name: Option<String>,
    fields: Vec<Field>,
}

impl TryFrom<RawFrame> for DataFrame {
    type Error = Error;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        DataFrame::new(raw.name, raw.fields)
    }
}

impl DataFrame {
    /// Build a frame, rejecting columns of different lengths.
    pub fn new(name: Option<String>, fields: Vec<Field>) -> Result<Self, Error> {
        if let Some(first) = fields.first() {
            let expected = first.len();
            if let Some(field) = fields.iter().find(|field| field.len() != expected) {
                return Err(Error::RaggedFrame {
                    frame: name.clone().unwrap_or_default(),
                    field: field.name.clone(),
                    expected,
                    got: field.len(),
                });
            }
        }
        Ok(Self { name, fields })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of rows, zero for a frame without columns.
    pub fn length(&self) -> usize {
        self.fields.first().map(Field::len).unwrap_or_default()
    }
}

/// Parse a dataset from its JSON form.
pub fn parse_frames(src: &str) -> Result<Vec<DataFrame>, Error> {
    serde_json::from_str(src).map_err(Error::ParseJson)
}

pub fn load_frames(path: impl AsRef<Path>) -> Result<Vec<DataFrame>, Error> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|error| Error::Read {
        error,
        path: path.to_owned(),
    })?;
    parse_frames(&src)
}
