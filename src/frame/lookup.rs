//! Field lookup across frames
//!
//! Lookups scan frames in order and columns in order, and the first column
//! matching the query wins. Several matching columns are not an error.

use std::borrow::Cow;

use super::{DataFrame, Field, FieldKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldQuery<'a> {
    pub name: Option<&'a str>,
    pub kind: Option<FieldKind>,
}

impl<'a> FieldQuery<'a> {
    /// Column called `name` of the given kind, or the first column of that
    /// kind when `name` is empty.
    pub fn named(name: Option<&'a str>, kind: FieldKind) -> Self {
        Self {
            name: name.filter(|name| !name.is_empty()),
            kind: Some(kind),
        }
    }

    pub fn matches(&self, field: &Field) -> bool {
        self.kind.is_none_or(|kind| field.kind == kind)
            && self.name.is_none_or(|name| field.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowIndex {
    #[default]
    Latest,
    At(usize),
}

impl RowIndex {
    pub fn resolve(&self, len: usize) -> Option<usize> {
        match self {
            RowIndex::Latest => len.checked_sub(1),
            RowIndex::At(index) => (*index < len).then_some(*index),
        }
    }
}

impl From<usize> for RowIndex {
    fn from(index: usize) -> Self {
        RowIndex::At(index)
    }
}

impl From<Option<usize>> for RowIndex {
    fn from(index: Option<usize>) -> Self {
        index.map(RowIndex::At).unwrap_or_default()
    }
}

pub fn find_field<'f>(frames: &'f [DataFrame], query: &FieldQuery) -> Option<&'f Field> {
    frames
        .iter()
        .flat_map(|frame| frame.fields())
        .find(|field| query.matches(field))
}

pub fn field_value<'f>(
    frames: &'f [DataFrame],
    query: &FieldQuery,
    row: RowIndex,
) -> Option<&'f serde_json::Value> {
    let field = find_field(frames, query)?;
    let index = row.resolve(field.len())?;
    field.values.get(index)
}

/// Rows available for navigation: the length of the first frame.
pub fn row_count(frames: &[DataFrame]) -> usize {
    frames.first().map(DataFrame::length).unwrap_or_default()
}

/// Text of a cell, or `None` when the cell counts as empty.
pub fn value_text(value: &serde_json::Value) -> Option<Cow<'_, str>> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
        serde_json::Value::Number(n) => Some(Cow::Owned(n.to_string())),
        serde_json::Value::Bool(true) => Some(Cow::Borrowed("true")),
        _ => None,
    }
}

/// Numeric value of a cell. Numeric strings are accepted.
pub fn value_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
