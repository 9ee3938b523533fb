//! Layout service response format.
//!
//! Decoding is lenient: ids may arrive as numbers or be missing, coordinates
//! may arrive as `x/y/width/height` or as `left/top/right/bottom`, and missing
//! or non-numeric values decode to NaN so the reconciler skips that entry
//! instead of the whole response failing to parse. Informational fields
//! (`warnings`, `scale_factor`, ...) that arrive with the wrong type decode
//! as absent.

use crate::geometry::Rect;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Target placement for one element, keyed by the element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrangementResult {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default = "unusable_rect", deserialize_with = "lenient_coords")]
    pub new_coords: Rect,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub element_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_coords",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_coords: Option<Rect>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub scale_factor: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub adjustment_reason: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub quality_check: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_strings",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub warnings: Vec<String>,
}

impl ArrangementResult {
    pub fn new(id: impl Into<String>, new_coords: Rect) -> Self {
        Self {
            id: id.into(),
            new_coords,
            element_type: None,
            original_coords: None,
            scale_factor: None,
            adjustment_reason: None,
            quality_check: None,
            warnings: Vec::new(),
        }
    }
}

/// Body returned by the layout service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrangeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_arrangements")]
    pub arrangements: Vec<ArrangementResult>,
    #[serde(
        default,
        alias = "error",
        alias = "detail",
        deserialize_with = "lenient_message",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
}

impl ArrangeResponse {
    pub fn ok(arrangements: Vec<ArrangementResult>) -> Self {
        Self {
            success: true,
            arrangements,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            arrangements: Vec::new(),
            message: Some(message.into()),
        }
    }
}

fn unusable_rect() -> Rect {
    Rect::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN)
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Error text as a string; structured details are kept as compact JSON.
fn lenient_message<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

/// Entries that are not objects are dropped; every field of an object entry
/// decodes leniently, so an object entry is never dropped.
fn lenient_arrangements<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<ArrangementResult>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let total = items.len();
    let arrangements: Vec<ArrangementResult> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if arrangements.len() < total {
        tracing::warn!(
            "Dropped {} arrangement entries that are not objects",
            total - arrangements.len()
        );
    }
    Ok(arrangements)
}

fn number(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(f64::NAN)
}

fn coords_from(value: Value) -> Option<Rect> {
    let Value::Object(map) = value else {
        return None;
    };

    let edge_form = !map.contains_key("x") && map.contains_key("left") && map.contains_key("top");
    if edge_form {
        return Some(Rect::from_edges(
            number(map.get("left")),
            number(map.get("top")),
            number(map.get("right")),
            number(map.get("bottom")),
        ));
    }

    Some(Rect::new(
        number(map.get("x")),
        number(map.get("y")),
        number(map.get("width")),
        number(map.get("height")),
    ))
}

fn lenient_coords<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rect, D::Error> {
    Ok(coords_from(Value::deserialize(deserializer)?).unwrap_or_else(unusable_rect))
}

fn lenient_optional_coords<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Rect>, D::Error> {
    Ok(coords_from(Value::deserialize(deserializer)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_standard_response() {
        let raw = json!({
            "success": true,
            "arrangements": [
                {"id": "a", "new_coords": {"x": 1, "y": 2, "width": 3, "height": 4},
                 "type": "image", "scale_factor": 0.5, "warnings": ["scaled"]}
            ]
        });
        let resp: ArrangeResponse = serde_json::from_value(raw).unwrap();
        assert!(resp.success);
        let a = &resp.arrangements[0];
        assert_eq!(a.new_coords, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(a.element_type.as_deref(), Some("image"));
        assert_eq!(a.scale_factor, Some(0.5));
        assert_eq!(a.warnings, vec!["scaled".to_string()]);
    }

    #[test]
    fn test_numeric_id_and_edge_coords() {
        let raw = json!({"id": 123, "new_coords": {"left": 10, "top": 20, "right": 60, "bottom": 45}});
        let a: ArrangementResult = serde_json::from_value(raw).unwrap();
        assert_eq!(a.id, "123");
        assert_eq!(a.new_coords, Rect::new(10.0, 20.0, 50.0, 25.0));
    }

    #[test]
    fn test_bad_coords_decode_as_unusable() {
        let raw = json!([
            {"id": "a"},
            {"id": "b", "new_coords": null},
            {"id": "c", "new_coords": {"x": 0, "y": 0, "width": "wide", "height": 5}}
        ]);
        let list: Vec<ArrangementResult> = serde_json::from_value(raw).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.iter().all(|a| !a.new_coords.is_usable()));
    }

    #[test]
    fn test_sloppy_entry_does_not_lose_the_batch() {
        let raw = json!({
            "success": true,
            "arrangements": [
                {"new_coords": {"x": 0, "y": 0, "width": 10, "height": 10}, "warnings": null},
                {"id": "b", "new_coords": {"x": 5, "y": 5, "width": 20, "height": 20},
                 "quality_check": {"ok": true}, "scale_factor": "1.5",
                 "original_coords": "n/a", "warnings": ["kept", 3], "type": 7},
                "not an entry",
                {"id": "c", "new_coords": {"x": 1, "y": 1, "width": 2, "height": 2},
                 "warnings": "single"}
            ]
        });
        let resp: ArrangeResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.arrangements.len(), 3);

        let missing_id = &resp.arrangements[0];
        assert_eq!(missing_id.id, "");
        assert!(missing_id.warnings.is_empty());

        let b = &resp.arrangements[1];
        assert_eq!(b.id, "b");
        assert_eq!(b.new_coords, Rect::new(5.0, 5.0, 20.0, 20.0));
        assert_eq!(b.quality_check, None);
        assert_eq!(b.scale_factor, None);
        assert_eq!(b.original_coords, None);
        assert_eq!(b.element_type, None);
        assert_eq!(b.warnings, vec!["kept".to_string()]);

        assert_eq!(resp.arrangements[2].warnings, vec!["single".to_string()]);
    }

    #[test]
    fn test_structured_error_detail_kept_as_message() {
        let resp: ArrangeResponse = serde_json::from_value(json!({
            "detail": [{"msg": "field required"}]
        }))
        .unwrap();
        assert!(!resp.success);
        assert!(resp.message.unwrap().contains("field required"));

        let resp: ArrangeResponse =
            serde_json::from_value(json!({"success": true, "arrangements": null})).unwrap();
        assert!(resp.arrangements.is_empty());
    }

    #[test]
    fn test_rejected_response_message_alias() {
        let resp: ArrangeResponse =
            serde_json::from_value(json!({"success": false, "error": "model overloaded"})).unwrap();
        assert!(!resp.success);
        assert!(resp.arrangements.is_empty());
        assert_eq!(resp.message.as_deref(), Some("model overloaded"));
    }
}
