//! Card configuration: caller input, defaults, validation.
//!
//! The JS-facing bridge hands over the JSON-able part of the caller's options
//! object. DOM handles (`container`) and callbacks (`onComplete`, `onError`)
//! never reach this module; the bridge validates those itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ScratchError};
use crate::geometry::{Size, ValidArea};
use crate::merge::Merge;

/// Reveal threshold used when the caller does not set `percentage`.
pub const DEFAULT_PERCENTAGE: f64 = 0.6;
/// Erase brush diameter in pixels.
pub const DEFAULT_BRUSH_WIDTH: f64 = 30.0;
pub const DEFAULT_TEXT: &str = "刮开此涂层";
pub const DEFAULT_BACKGROUND: &str = "#e0e0e0";
pub const DEFAULT_COLOR: &str = "#888";
pub const DEFAULT_FONT: &str = "30px Verdana";
pub const DEFAULT_NOT_SUPPORT_TEXT: &str =
    "Sorry, your browser does not support Canvas. Please use a newer browser and try again.";

const MSG_IMG_SRC: &str = "Param [imgSrc] must be given and must be a string.";
const MSG_SIZE: &str = "Param [size] must be an array like [{width}, {height}].";
const MSG_VALID_AREA: &str = "Param [validArea] must be an array like [{left}, {top}, {width}, {height}].";
const MSG_PERCENTAGE: &str = "Param [percentage] must be a number or string like 0.8 or \"0.8\".";

/// `percentage` accepts `0.8` as well as `"0.8"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdInput {
    Number(f64),
    Text(String),
}

impl ThresholdInput {
    fn to_fraction(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl Merge for ThresholdInput {
    fn merge(self, _defaults: Self) -> Self {
        self
    }
}

/// Nested brush settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushInput {
    pub width: Option<f64>,
}

crate::merge_fields!(BrushInput { width });

/// Caller-supplied options before defaults are applied. Every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialOptions {
    pub img_src: Option<String>,
    pub size: Option<Vec<f64>>,
    pub valid_area: Option<Vec<f64>>,
    pub percentage: Option<ThresholdInput>,
    pub text: Option<String>,
    pub background: Option<String>,
    pub color: Option<String>,
    pub font: Option<String>,
    pub not_support_text: Option<String>,
    pub brush: Option<BrushInput>,
    pub force_repaint: Option<bool>,
    pub log_level: Option<String>,
}

crate::merge_fields!(PartialOptions {
    img_src,
    size,
    valid_area,
    percentage,
    text,
    background,
    color,
    font,
    not_support_text,
    brush,
    force_repaint,
    log_level,
});

impl PartialOptions {
    /// Built-in defaults. `imgSrc`, `size` and `validArea` have none.
    pub fn defaults() -> Self {
        Self {
            percentage: Some(ThresholdInput::Number(DEFAULT_PERCENTAGE)),
            text: Some(DEFAULT_TEXT.to_string()),
            background: Some(DEFAULT_BACKGROUND.to_string()),
            color: Some(DEFAULT_COLOR.to_string()),
            font: Some(DEFAULT_FONT.to_string()),
            not_support_text: Some(DEFAULT_NOT_SUPPORT_TEXT.to_string()),
            brush: Some(BrushInput { width: Some(DEFAULT_BRUSH_WIDTH) }),
            force_repaint: Some(false),
            log_level: Some("info".to_string()),
            ..Default::default()
        }
    }
}

/// Resolved, validated configuration. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScratchOptions {
    /// Background image URI.
    pub img_src: String,
    /// Display size; `None` means use the image's natural size.
    pub size: Option<Size>,
    /// Coverage sampling rectangle; `None` means the whole overlay.
    pub valid_area: Option<ValidArea>,
    /// Reveal threshold in (0, 1].
    pub percentage: f64,
    /// Prompt drawn on the overlay. Empty string draws nothing.
    pub text: String,
    /// Overlay fill colour (any CSS colour).
    pub background: String,
    /// Prompt text colour.
    pub color: String,
    /// Prompt font (CSS font shorthand).
    pub font: String,
    /// Shown instead of the overlay when there is no 2D context.
    pub not_support_text: String,
    /// Erase brush diameter.
    pub brush_width: f64,
    /// Toggle overlay opacity on every move to force a repaint.
    pub force_repaint: bool,
    pub log_level: log::Level,
}

impl ScratchOptions {
    /// Validate raw caller options, merge them over the defaults and resolve.
    ///
    /// `null` values count as absent. Unknown keys are ignored, so the
    /// caller's whole options object can be passed through.
    pub fn from_value(value: &Value) -> Result<Self> {
        check_shape(value)?;
        let partial: PartialOptions = serde_json::from_value(value.clone())
            .map_err(|e| ScratchError::invalid(e.to_string()))?;
        Self::resolve(partial.merge(PartialOptions::defaults()))
    }

    /// Parse options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ScratchError::invalid(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Turn merged options into the final record, checking value ranges.
    pub fn resolve(partial: PartialOptions) -> Result<Self> {
        let img_src = partial
            .img_src
            .filter(|src| !src.is_empty())
            .ok_or_else(|| ScratchError::invalid(MSG_IMG_SRC))?;

        let size = match partial.size.as_deref() {
            None => None,
            Some(&[w, h]) if is_dimension(w) && is_dimension(h) => {
                Some(Size::new(w.round() as u32, h.round() as u32))
            }
            Some(_) => return Err(ScratchError::invalid(MSG_SIZE)),
        };

        let valid_area = match partial.valid_area.as_deref() {
            None => None,
            Some(&[left, top, width, height])
                if [left, top, width, height].iter().all(|v| v.is_finite())
                    && width >= 0.0
                    && height >= 0.0 =>
            {
                Some(ValidArea::new(left, top, width, height))
            }
            Some(_) => return Err(ScratchError::invalid(MSG_VALID_AREA)),
        };

        let percentage = partial
            .percentage
            .as_ref()
            .map_or(Some(DEFAULT_PERCENTAGE), ThresholdInput::to_fraction)
            .filter(|p| p.is_finite())
            .ok_or_else(|| ScratchError::invalid(MSG_PERCENTAGE))?;
        if !(percentage > 0.0 && percentage <= 1.0) {
            return Err(ScratchError::invalid(format!(
                "Param [percentage] must be in (0, 1], got {percentage}."
            )));
        }

        let brush_width = partial
            .brush
            .and_then(|b| b.width)
            .unwrap_or(DEFAULT_BRUSH_WIDTH);
        if !(brush_width.is_finite() && brush_width > 0.0) {
            return Err(ScratchError::invalid("Param [brush.width] must be a positive number."));
        }

        let log_level = partial
            .log_level
            .as_deref()
            .unwrap_or("info")
            .parse::<log::Level>()
            .map_err(|_| ScratchError::invalid("Param [logLevel] must be one of error, warn, info, debug, trace."))?;

        Ok(Self {
            img_src,
            size,
            valid_area,
            percentage,
            text: partial.text.unwrap_or_default(),
            background: partial.background.unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
            color: partial.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            font: partial.font.unwrap_or_else(|| DEFAULT_FONT.to_string()),
            not_support_text: partial
                .not_support_text
                .unwrap_or_else(|| DEFAULT_NOT_SUPPORT_TEXT.to_string()),
            brush_width,
            force_repaint: partial.force_repaint.unwrap_or(false),
            log_level,
        })
    }
}

fn is_dimension(v: f64) -> bool {
    v.is_finite() && v.round() >= 1.0 && v <= u32::MAX as f64
}

/// Reject wrongly-typed options with the same messages callers already know,
/// before serde gets a chance to produce a less helpful one.
fn check_shape(value: &Value) -> Result<()> {
    let Value::Object(map) = value else {
        return Err(ScratchError::invalid("Options must be an object."));
    };
    let present = |key: &str| map.get(key).filter(|v| !v.is_null());

    match present("imgSrc") {
        Some(Value::String(s)) if !s.is_empty() => {}
        _ => return Err(ScratchError::invalid(MSG_IMG_SRC)),
    }
    if let Some(size) = present("size") {
        if !is_number_array(size, 2) {
            return Err(ScratchError::invalid(MSG_SIZE));
        }
    }
    if let Some(area) = present("validArea") {
        if !is_number_array(area, 4) {
            return Err(ScratchError::invalid(MSG_VALID_AREA));
        }
    }
    if let Some(percentage) = present("percentage") {
        if !(percentage.is_number() || percentage.is_string()) {
            return Err(ScratchError::invalid(MSG_PERCENTAGE));
        }
    }
    Ok(())
}

fn is_number_array(value: &Value, len: usize) -> bool {
    matches!(value, Value::Array(items) if items.len() == len && items.iter().all(Value::is_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_fill_missing_fields() {
        let opts = ScratchOptions::from_value(&json!({ "imgSrc": "a.png" })).unwrap();
        assert_eq!(opts.img_src, "a.png");
        assert_eq!(opts.size, None);
        assert_eq!(opts.valid_area, None);
        assert_eq!(opts.percentage, DEFAULT_PERCENTAGE);
        assert_eq!(opts.text, "刮开此涂层");
        assert_eq!(opts.background, DEFAULT_BACKGROUND);
        assert_eq!(opts.brush_width, DEFAULT_BRUSH_WIDTH);
        assert_eq!(opts.log_level, log::Level::Info);
        assert!(!opts.force_repaint);
    }

    #[test]
    fn caller_values_override_defaults() {
        let opts = ScratchOptions::from_value(&json!({
            "imgSrc": "a.png",
            "size": [100, 80],
            "validArea": [0, 0, 50, 50],
            "percentage": "0.8",
            "text": "Win!",
            "brush": { "width": 12 },
            "logLevel": "debug"
        }))
        .unwrap();
        assert_eq!(opts.size, Some(Size::new(100, 80)));
        assert_eq!(opts.valid_area, Some(ValidArea::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(opts.percentage, 0.8);
        assert_eq!(opts.text, "Win!");
        assert_eq!(opts.brush_width, 12.0);
        assert_eq!(opts.log_level, log::Level::Debug);
        // untouched nested siblings keep their defaults
        assert_eq!(opts.font, DEFAULT_FONT);
    }

    #[test]
    fn null_counts_as_absent() {
        let opts =
            ScratchOptions::from_value(&json!({ "imgSrc": "a.png", "size": null })).unwrap();
        assert_eq!(opts.size, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let opts = ScratchOptions::from_value(&json!({ "imgSrc": "a.png", "container": {} }));
        assert!(opts.is_ok());
    }

    #[test]
    fn missing_img_src_is_rejected() {
        let err = ScratchOptions::from_value(&json!({ "size": [10, 10] })).unwrap_err();
        assert_eq!(err, ScratchError::invalid(MSG_IMG_SRC));
        let err = ScratchOptions::from_value(&json!({ "imgSrc": "" })).unwrap_err();
        assert_eq!(err, ScratchError::invalid(MSG_IMG_SRC));
        let err = ScratchOptions::from_value(&json!({ "imgSrc": 3 })).unwrap_err();
        assert_eq!(err, ScratchError::invalid(MSG_IMG_SRC));
    }

    #[test]
    fn malformed_size_is_rejected() {
        for size in [json!(100), json!([100]), json!([100, "x"]), json!([0, 10])] {
            let err = ScratchOptions::from_value(&json!({ "imgSrc": "a.png", "size": size }))
                .unwrap_err();
            assert_eq!(err, ScratchError::invalid(MSG_SIZE));
        }
    }

    #[test]
    fn malformed_valid_area_is_rejected() {
        for area in [json!("0,0,1,1"), json!([0, 0, 1]), json!([0, 0, -5, 5])] {
            let err = ScratchOptions::from_value(&json!({ "imgSrc": "a.png", "validArea": area }))
                .unwrap_err();
            assert_eq!(err, ScratchError::invalid(MSG_VALID_AREA));
        }
    }

    #[test]
    fn non_numeric_percentage_is_rejected() {
        let err = ScratchOptions::from_value(&json!({ "imgSrc": "a.png", "percentage": true }))
            .unwrap_err();
        assert_eq!(err, ScratchError::invalid(MSG_PERCENTAGE));
        let err = ScratchOptions::from_value(&json!({ "imgSrc": "a.png", "percentage": "lots" }))
            .unwrap_err();
        assert_eq!(err, ScratchError::invalid(MSG_PERCENTAGE));
    }

    #[test]
    fn percentage_out_of_range_is_rejected() {
        for p in [0.0, -0.5, 1.5] {
            let result = ScratchOptions::from_value(&json!({ "imgSrc": "a.png", "percentage": p }));
            assert!(matches!(result, Err(ScratchError::InvalidConfiguration(_))), "p = {p}");
        }
        let full = ScratchOptions::from_value(&json!({ "imgSrc": "a.png", "percentage": 1 }));
        assert_eq!(full.unwrap().percentage, 1.0);
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(ScratchOptions::from_json("[1, 2]").is_err());
        assert!(ScratchOptions::from_json("not json").is_err());
        assert!(ScratchOptions::from_json(r#"{"imgSrc":"b.png"}"#).is_ok());
    }
}
