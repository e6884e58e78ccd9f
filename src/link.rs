//! Data links attached to media columns

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::frame::{self, DataFrame, FieldKind, FieldQuery, RowIndex, lookup::value_text};

static VARIABLE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\$\{(__value\.raw|__value\.text|__data\.fields\.[^}:]+)(?::(\w+))?\}")
        .unwrap()
});

/// Link template configured on a column.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataLink {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub target_blank: bool,
}

/// Link ready to be rendered for one row.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LinkModel {
    pub title: String,
    pub href: String,
    pub target: &'static str,
}

fn interpolate(
    template: &str,
    frames: &[DataFrame],
    value: Option<&serde_json::Value>,
    row: RowIndex,
) -> String {
    VARIABLE
        .replace_all(template, |captures: &regex::Captures| {
            let variable = &captures[1];
            let cell = match variable.strip_prefix("__data.fields.") {
                Some(name) => frame::field_value(
                    frames,
                    &FieldQuery {
                        name: Some(name),
                        kind: None,
                    },
                    row,
                ),
                None => value,
            };
            let text = cell.and_then(value_text).unwrap_or_default();
            match captures.get(2).map(|m| m.as_str()) {
                Some("percentencode") => urlencoding::encode(&text).into_owned(),
                _ => text.into_owned(),
            }
        })
        .into_owned()
}

/// First data link of the string column `field` (or the first string
/// column), interpolated for `row`.
pub fn data_link(frames: &[DataFrame], field: Option<&str>, row: RowIndex) -> Option<LinkModel> {
    let query = FieldQuery::named(field, FieldKind::String);
    let column = frame::find_field(frames, &query)?;
    let link = column.config.links.first()?;
    let value = row
        .resolve(column.len())
        .and_then(|index| column.values.get(index));
    Some(LinkModel {
        title: interpolate(&link.title, frames, value, row),
        href: interpolate(&link.url, frames, value, row),
        target: if link.target_blank { "_blank" } else { "_self" },
    })
}
