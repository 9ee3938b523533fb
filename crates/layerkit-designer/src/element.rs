//! Canvas elements.
//!
//! An [`Element`] mirrors one entry of the whiteboard's scene JSON. Fields the
//! toolkit does not interpret are kept in [`Element::extra`] so loading and
//! saving a scene never drops data.

use crate::geometry::Bounds;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Element kind tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementType {
    Rectangle,
    Ellipse,
    Diamond,
    Arrow,
    Line,
    Freedraw,
    Text,
    Image,
    Frame,
    Embeddable,
    /// Any tag this crate does not know, passed through unchanged.
    Other(String),
}

impl ElementType {
    pub fn as_str(&self) -> &str {
        match self {
            ElementType::Rectangle => "rectangle",
            ElementType::Ellipse => "ellipse",
            ElementType::Diamond => "diamond",
            ElementType::Arrow => "arrow",
            ElementType::Line => "line",
            ElementType::Freedraw => "freedraw",
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Frame => "frame",
            ElementType::Embeddable => "embeddable",
            ElementType::Other(tag) => tag,
        }
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "rectangle" => ElementType::Rectangle,
            "ellipse" => ElementType::Ellipse,
            "diamond" => ElementType::Diamond,
            "arrow" => ElementType::Arrow,
            "line" => ElementType::Line,
            "freedraw" => ElementType::Freedraw,
            "text" => ElementType::Text,
            "image" => ElementType::Image,
            "frame" => ElementType::Frame,
            "embeddable" => ElementType::Embeddable,
            _ => ElementType::Other(tag),
        }
    }
}

impl From<ElementType> for String {
    fn from(kind: ElementType) -> Self {
        match kind {
            ElementType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key marking an element produced by smart arrangement.
pub const IS_ARRANGED_KEY: &str = "isArranged";
/// Key holding the id of the element a derived element was cloned from.
pub const ORIGINAL_ELEMENT_ID_KEY: &str = "originalElementId";
/// Key holding the millisecond timestamp of the arrangement pass.
pub const ARRANGEMENT_TIMESTAMP_KEY: &str = "arrangementTimestamp";

/// Open, implementation-defined metadata attached to an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CustomData(Map<String, Value>);

impl CustomData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// True only for a literal boolean `true`.
    pub fn is_arranged(&self) -> bool {
        matches!(self.0.get(IS_ARRANGED_KEY), Some(Value::Bool(true)))
    }

    /// Id of the source element, stringified; empty values count as absent.
    pub fn original_element_id(&self) -> Option<String> {
        match self.0.get(ORIGINAL_ELEMENT_ID_KEY)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn arrangement_timestamp(&self) -> Option<i64> {
        self.0.get(ARRANGEMENT_TIMESTAMP_KEY)?.as_i64()
    }

    /// Tag as derived from `original_id`, keeping every other key.
    pub fn mark_arranged(&mut self, original_id: &str, timestamp_ms: i64) {
        self.0.insert(IS_ARRANGED_KEY.to_string(), Value::Bool(true));
        self.0.insert(
            ORIGINAL_ELEMENT_ID_KEY.to_string(),
            Value::String(original_id.to_string()),
        );
        self.0.insert(
            ARRANGEMENT_TIMESTAMP_KEY.to_string(),
            Value::from(timestamp_ms),
        );
    }
}

impl From<Map<String, Value>> for CustomData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<'de> Deserialize<'de> for CustomData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Option::<Map<String, Value>>::deserialize(deserializer)?;
        Ok(Self(map.unwrap_or_default()))
    }
}

fn default_stroke_color() -> String {
    "#1e1e1e".to_string()
}

fn default_background_color() -> String {
    "transparent".to_string()
}

fn default_fill_style() -> String {
    "solid".to_string()
}

fn default_stroke_width() -> f64 {
    2.0
}

/// A visual item on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub x: f64,
    pub y: f64,
    /// May be negative for a flipped box.
    pub width: f64,
    /// May be negative for a flipped box.
    pub height: f64,
    /// Rotation in radians.
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_fill_style")]
    pub fill_style: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub group_ids: Vec<String>,
    /// Last modification time, epoch milliseconds.
    #[serde(default)]
    pub updated: i64,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub version_nonce: i64,
    #[serde(default, skip_serializing_if = "CustomData::is_empty")]
    pub custom_data: CustomData,
    /// Whiteboard fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Element {
    pub fn new(
        id: impl Into<String>,
        element_type: ElementType,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            element_type,
            x,
            y,
            width,
            height,
            angle: 0.0,
            stroke_color: default_stroke_color(),
            background_color: default_background_color(),
            fill_style: default_fill_style(),
            stroke_width: default_stroke_width(),
            group_ids: Vec::new(),
            updated: 0,
            version: 1,
            version_nonce: 0,
            custom_data: CustomData::default(),
            extra: Map::new(),
        }
    }

    pub fn rectangle(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(id, ElementType::Rectangle, x, y, width, height)
    }

    /// Size with flipped dimensions made positive.
    pub fn normalized_size(&self) -> (f64, f64) {
        (self.width.abs(), self.height.abs())
    }

    /// Finite position and size, with a positive normalised size.
    pub fn has_valid_geometry(&self) -> bool {
        let (w, h) = self.normalized_size();
        self.x.is_finite()
            && self.y.is_finite()
            && w.is_finite()
            && h.is_finite()
            && w > 0.0
            && h > 0.0
    }

    pub fn right_edge(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom_edge(&self) -> f64 {
        self.y + self.height
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.right_edge(), self.bottom_edge())
    }

    pub fn is_arranged(&self) -> bool {
        self.custom_data.is_arranged()
    }

    /// Record a local edit: new timestamp, new nonce, next version.
    pub fn touch(&mut self, now_ms: i64, nonce: i64) {
        self.updated = now_ms;
        self.version_nonce = nonce;
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_whiteboard_element() {
        let raw = json!({
            "id": "abc",
            "type": "image",
            "x": 10.0,
            "y": 20.0,
            "width": -30.0,
            "height": 40.0,
            "angle": 0.5,
            "strokeColor": "#000",
            "backgroundColor": "#fff",
            "fillStyle": "hachure",
            "strokeWidth": 1,
            "groupIds": ["g1"],
            "fileId": "file-1",
            "customData": null
        });
        let el: Element = serde_json::from_value(raw).unwrap();
        assert_eq!(el.element_type, ElementType::Image);
        assert_eq!(el.normalized_size(), (30.0, 40.0));
        assert_eq!(el.extra.get("fileId"), Some(&json!("file-1")));
        assert!(el.custom_data.is_empty());

        let back = serde_json::to_value(&el).unwrap();
        assert_eq!(back["fileId"], json!("file-1"));
        assert_eq!(back["type"], json!("image"));
        assert!(back.get("customData").is_none());
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let kind = ElementType::from("magicframe".to_string());
        assert_eq!(kind, ElementType::Other("magicframe".into()));
        assert_eq!(String::from(kind), "magicframe");
    }

    #[test]
    fn test_custom_data_markers() {
        let mut data = CustomData::new();
        data.insert("layerName", json!("Logo"));
        assert!(!data.is_arranged());

        data.mark_arranged("orig", 1_700_000_000_000);
        assert!(data.is_arranged());
        assert_eq!(data.original_element_id().as_deref(), Some("orig"));
        assert_eq!(data.arrangement_timestamp(), Some(1_700_000_000_000));
        assert_eq!(data.get("layerName"), Some(&json!("Logo")));
    }

    #[test]
    fn test_is_arranged_requires_literal_true() {
        let mut data = CustomData::new();
        data.insert(IS_ARRANGED_KEY, json!("true"));
        assert!(!data.is_arranged());
        data.insert(ORIGINAL_ELEMENT_ID_KEY, json!(""));
        assert_eq!(data.original_element_id(), None);
        data.insert(ORIGINAL_ELEMENT_ID_KEY, json!(42));
        assert_eq!(data.original_element_id().as_deref(), Some("42"));
    }

    #[test]
    fn test_geometry_validity() {
        assert!(Element::rectangle("a", 0.0, 0.0, -5.0, 5.0).has_valid_geometry());
        assert!(!Element::rectangle("a", 0.0, 0.0, 0.0, 5.0).has_valid_geometry());
        assert!(!Element::rectangle("a", f64::NAN, 0.0, 5.0, 5.0).has_valid_geometry());
    }

    #[test]
    fn test_touch_bumps_version() {
        let mut el = Element::rectangle("a", 0.0, 0.0, 1.0, 1.0);
        el.touch(99, 7);
        assert_eq!((el.updated, el.version_nonce, el.version), (99, 7, 2));
    }
}
