use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::frame::{self, DataFrame, FieldKind, FieldQuery, RowIndex};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    #[default]
    Auto,
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeSpec<'a> {
    pub mode: SizeMode,
    pub value: Option<f64>,
    pub field: Option<&'a str>,
}

fn positive(value: f64) -> Option<u32> {
    let value = value.round();
    (value.is_finite() && value >= 1.0).then(|| value.min(u32::MAX as f64) as u32)
}

/// Pick the final size for one axis.
///
/// `Auto` follows the viewport. `Custom` prefers a positive value from the
/// data, then the configured value, then the viewport. Values that round
/// below one pixel count as absent.
pub fn resolve_size(
    mode: SizeMode,
    viewport: u32,
    fixed: Option<f64>,
    field_value: Option<&serde_json::Value>,
) -> u32 {
    match mode {
        SizeMode::Auto => viewport,
        SizeMode::Custom => field_value
            .and_then(frame::lookup::value_number)
            .and_then(positive)
            .or_else(|| fixed.and_then(positive))
            .unwrap_or(viewport),
    }
}

impl SizeSpec<'_> {
    pub fn resolve(&self, frames: &[DataFrame], viewport: u32, row: RowIndex) -> u32 {
        let field_value = match (self.mode, self.field) {
            (SizeMode::Custom, Some(name)) if !name.is_empty() => frame::field_value(
                frames,
                &FieldQuery::named(Some(name), FieldKind::Number),
                row,
            ),
            _ => None,
        };
        let size = resolve_size(self.mode, viewport, self.value, field_value);
        trace!(mode = ?self.mode, viewport, size, "resolved size");
        size
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{SizeMode, SizeSpec, resolve_size};
    use crate::frame::{DataFrame, Field, RowIndex};

    #[test]
    fn test_auto_follows_viewport() {
        assert_eq!(resolve_size(SizeMode::Auto, 640, Some(100.0), Some(&json!(50))), 640);
        assert_eq!(resolve_size(SizeMode::Auto, 0, None, None), 0);
    }

    #[test]
    fn test_custom_priority() {
        assert_eq!(resolve_size(SizeMode::Custom, 640, Some(100.0), Some(&json!(50))), 50);
        assert_eq!(resolve_size(SizeMode::Custom, 640, Some(100.0), None), 100);
        assert_eq!(resolve_size(SizeMode::Custom, 640, None, None), 640);
    }

    #[test]
    fn test_invalid_field_values_fall_through() {
        for value in [
            json!("wide"),
            json!(0),
            json!(0.4),
            json!("0.2"),
            json!(-5),
            json!(null),
            json!(true),
        ] {
            assert_eq!(
                resolve_size(SizeMode::Custom, 640, Some(100.0), Some(&value)),
                100,
                "{value}"
            );
        }
        assert_eq!(resolve_size(SizeMode::Custom, 640, Some(0.0), Some(&json!("x"))), 640);
        assert_eq!(resolve_size(SizeMode::Custom, 640, None, Some(&json!("320"))), 320);
        assert_eq!(resolve_size(SizeMode::Custom, 640, None, Some(&json!(99.6))), 100);
    }

    #[test]
    fn test_spec_reads_number_field() {
        let frames = vec![
            DataFrame::new(
                None,
                vec![
                    Field::string("width", ["300"]),
                    Field::number("px", [120.0]),
                ],
            )
            .unwrap(),
        ];
        let spec = SizeSpec {
            mode: SizeMode::Custom,
            value: Some(80.0),
            field: Some("px"),
        };
        assert_eq!(spec.resolve(&frames, 500, RowIndex::Latest), 120);

        // string columns are not size sources
        let spec = SizeSpec {
            field: Some("width"),
            ..spec
        };
        assert_eq!(spec.resolve(&frames, 500, RowIndex::Latest), 80);

        let spec = SizeSpec {
            mode: SizeMode::Auto,
            ..spec
        };
        assert_eq!(spec.resolve(&frames, 500, RowIndex::At(0)), 500);
    }
}
