//! Outbound arrangement request.

use crate::element::Element;
use crate::geometry::Bounds;
use layerkit_core::ArrangeError;
use serde::{Deserialize, Serialize};

/// Canvas size used when neither the scene nor the viewport gives one.
pub const FALLBACK_CANVAS_SIZE: (f64, f64) = (800.0, 600.0);

/// Target canvas size for a smart arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: f64,
    pub height: f64,
}

impl TargetSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Absolute size, rejected when zero or non-finite.
    pub fn validate(&self) -> Result<TargetSize, ArrangeError> {
        let (w, h) = (self.width.abs(), self.height.abs());
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(ArrangeError::InvalidTargetSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(TargetSize::new(w, h))
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::new(1200.0, 628.0)
    }
}

/// Named target size offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPreset {
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub recommended: bool,
}

impl TargetPreset {
    pub fn new(name: &str, width: f64, height: f64, recommended: bool) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            recommended,
        }
    }

    pub fn size(&self) -> TargetSize {
        TargetSize::new(self.width, self.height)
    }
}

/// Built-in presets, recommended sizes first.
pub fn default_presets() -> Vec<TargetPreset> {
    vec![
        TargetPreset::new("Recommended banner", 1200.0, 628.0, true),
        TargetPreset::new("Recommended strip", 960.0, 270.0, true),
        TargetPreset::new("Instagram square", 1080.0, 1080.0, false),
        TargetPreset::new("Instagram story", 1080.0, 1920.0, false),
        TargetPreset::new("Facebook post", 1200.0, 630.0, false),
        TargetPreset::new("Twitter post", 1200.0, 675.0, false),
    ]
}

/// One selected element as sent to the layout service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: String,
    pub stroke_width: f64,
}

impl From<&Element> for RequestElement {
    fn from(el: &Element) -> Self {
        let (width, height) = el.normalized_size();
        Self {
            id: el.id.clone(),
            element_type: el.element_type.to_string(),
            x: el.x,
            y: el.y,
            width,
            height,
            angle: if el.angle.is_finite() { el.angle } else { 0.0 },
            stroke_color: el.stroke_color.clone(),
            background_color: el.background_color.clone(),
            fill_style: el.fill_style.clone(),
            stroke_width: el.stroke_width,
        }
    }
}

/// Body of `POST /arrange`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangeRequest {
    pub selected_elements: Vec<RequestElement>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub target_width: f64,
    pub target_height: f64,
}

impl ArrangeRequest {
    /// Shape the request for `selection`.
    ///
    /// Elements with non-finite or zero geometry are left out, so the service
    /// never sees them and they never come back as arrangement results. The
    /// canvas size is the extent of every element on the canvas, falling back
    /// to the viewport and then to [`FALLBACK_CANVAS_SIZE`].
    pub fn build(
        selection: &[Element],
        all_elements: &[Element],
        viewport: Option<(f64, f64)>,
        target: TargetSize,
    ) -> Result<ArrangeRequest, ArrangeError> {
        if selection.len() < 2 {
            return Err(ArrangeError::TooFewElements {
                count: selection.len(),
            });
        }
        let target = target.validate()?;

        let selected_elements: Vec<RequestElement> = selection
            .iter()
            .filter(|el| el.has_valid_geometry())
            .map(RequestElement::from)
            .collect();

        let skipped = selection.len() - selected_elements.len();
        if skipped > 0 {
            tracing::warn!("{} selected element(s) have unusable geometry and were left out", skipped);
        }
        if selected_elements.is_empty() {
            return Err(ArrangeError::NoValidElements);
        }

        let (canvas_width, canvas_height) = canvas_extent(all_elements, viewport);

        Ok(ArrangeRequest {
            selected_elements,
            canvas_width: canvas_width.abs(),
            canvas_height: canvas_height.abs(),
            target_width: target.width,
            target_height: target.height,
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected_elements.iter().map(|el| el.id.as_str())
    }
}

/// Extent of the canvas content, or the viewport / fallback when empty.
pub fn canvas_extent(all_elements: &[Element], viewport: Option<(f64, f64)>) -> (f64, f64) {
    let finite = all_elements
        .iter()
        .map(Element::bounds)
        .filter(|b| b.min_x.is_finite() && b.min_y.is_finite() && b.max_x.is_finite() && b.max_y.is_finite());

    match Bounds::enclosing(finite) {
        Some(bounds) => (bounds.width(), bounds.height()),
        None => match viewport {
            Some((w, h)) if w > 0.0 && h > 0.0 => (w, h),
            _ => FALLBACK_CANVAS_SIZE,
        },
    }
}
