//! Toolbar operations on the current selection.
//!
//! Align, group, ungroup and the single-element resize. Each operation works
//! on the selected elements of a [`Scene`] and leaves everything else alone.

use crate::arrangement::ids::{Clock, IdSource};
use crate::element::Element;
use crate::geometry::Bounds;
use crate::scene::Scene;
use layerkit_core::{ArrangeError, Error, Result};
use std::fmt;
use std::str::FromStr;

/// Alignment of the selection against its own bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    HorizontalCenter,
    Right,
    Top,
    VerticalCenter,
    Bottom,
}

impl Alignment {
    pub const ALL: [Alignment; 6] = [
        Alignment::Left,
        Alignment::HorizontalCenter,
        Alignment::Right,
        Alignment::Top,
        Alignment::VerticalCenter,
        Alignment::Bottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::HorizontalCenter => "horizontal-center",
            Alignment::Right => "right",
            Alignment::Top => "top",
            Alignment::VerticalCenter => "vertical-center",
            Alignment::Bottom => "bottom",
        }
    }

    fn apply(&self, el: &mut Element, bounds: &Bounds) {
        let (cx, cy) = bounds.center();
        match self {
            Alignment::Left => el.x = bounds.min_x,
            Alignment::HorizontalCenter => el.x = cx - el.width / 2.0,
            Alignment::Right => el.x = bounds.max_x - el.width,
            Alignment::Top => el.y = bounds.min_y,
            Alignment::VerticalCenter => el.y = cy - el.height / 2.0,
            Alignment::Bottom => el.y = bounds.max_y - el.height,
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Alignment::ALL
            .into_iter()
            .find(|a| a.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::other(format!("Unknown alignment: {}", s)))
    }
}

/// How a resize request is carried out for a given selection size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeRoute {
    /// Nothing selected.
    None,
    /// One element: set its size directly.
    Direct,
    /// Two or more: smart arrangement through the layout service.
    Arrange,
}

impl ResizeRoute {
    pub fn for_selection(count: usize) -> Self {
        match count {
            0 => ResizeRoute::None,
            1 => ResizeRoute::Direct,
            _ => ResizeRoute::Arrange,
        }
    }
}

fn require_selected(scene: &Scene, min: usize) -> Result<Vec<Element>> {
    let selected = scene.selected_elements();
    if selected.len() < min {
        return Err(ArrangeError::TooFewElements {
            count: selected.len(),
        }
        .into());
    }
    Ok(selected)
}

/// Align the selected elements. Needs at least two.
///
/// The bounding box uses raw `x + width`, so flipped boxes count from their
/// anchor point. Returns how many elements moved; only those are touched.
pub fn align(
    scene: &mut Scene,
    alignment: Alignment,
    clock: &dyn Clock,
    ids: &dyn IdSource,
) -> Result<usize> {
    let selected = require_selected(scene, 2)?;
    let Some(bounds) = Bounds::enclosing(selected.iter().map(Element::bounds)) else {
        return Ok(0);
    };

    let now = clock.now_ms();
    let mut moved = 0;
    for el in &selected {
        scene.update(&el.id, |el| {
            let before = (el.x, el.y);
            alignment.apply(el, &bounds);
            if (el.x, el.y) != before {
                el.touch(now, ids.nonce());
                moved += 1;
            }
        })?;
    }
    tracing::debug!("Aligned {} element(s) {}, {} moved", selected.len(), alignment, moved);
    Ok(moved)
}

/// Put the selected elements into a new group. Needs at least two.
///
/// Returns the new group id.
pub fn group(scene: &mut Scene, clock: &dyn Clock, ids: &dyn IdSource) -> Result<String> {
    let selected = require_selected(scene, 2)?;
    let now = clock.now_ms();
    let group_id = format!("{}-{}", now, ids.suffix());

    for el in &selected {
        scene.update(&el.id, |el| {
            el.group_ids.push(group_id.clone());
            el.touch(now, ids.nonce());
        })?;
    }
    tracing::info!("Grouped {} element(s) as {}", selected.len(), group_id);
    Ok(group_id)
}

/// Remove the innermost group from each selected element.
///
/// Returns how many elements actually left a group.
pub fn ungroup(scene: &mut Scene, clock: &dyn Clock, ids: &dyn IdSource) -> Result<usize> {
    let selected = require_selected(scene, 1)?;
    let now = clock.now_ms();
    let mut changed = 0;
    for el in selected.iter().filter(|el| !el.group_ids.is_empty()) {
        scene.update(&el.id, |el| {
            el.group_ids.pop();
            el.touch(now, ids.nonce());
        })?;
        changed += 1;
    }
    tracing::info!("Ungrouped {} element(s)", changed);
    Ok(changed)
}

/// Set the size of the single selected element.
///
/// This is the direct path for a one-element selection; the position stays
/// where it is.
pub fn resize_single(
    scene: &mut Scene,
    width: f64,
    height: f64,
    clock: &dyn Clock,
    ids: &dyn IdSource,
) -> Result<String> {
    let selected = scene.selected_elements();
    let [only] = selected.as_slice() else {
        return Err(Error::other(format!(
            "Direct resize needs exactly 1 selected element, got {}",
            selected.len()
        )));
    };
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(ArrangeError::InvalidTargetSize { width, height }.into());
    }

    let now = clock.now_ms();
    let nonce = ids.nonce();
    scene.update(&only.id, |el| {
        el.width = width;
        el.height = height;
        el.touch(now, nonce);
    })?;
    tracing::info!("Resized {} to {}x{}", only.id, width, height);
    Ok(only.id.clone())
}
