//! Axis-aligned rectangles and bounding boxes.

use serde::{Deserialize, Serialize};

/// Position and size of a box, as produced by the layout service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from edge coordinates; the size is the absolute edge distance.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            x: left,
            y: top,
            width: (right - left).abs(),
            height: (bottom - top).abs(),
        }
    }

    /// True when every component is finite and both dimensions are positive.
    pub fn is_usable(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Bounding box over one or more elements.
///
/// Edges are computed as `x + width` without normalising sign, matching how
/// the canvas reports extents for flipped elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Bounding box of a set of boxes, `None` when the set is empty.
    pub fn enclosing<I>(boxes: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = Bounds>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_edges_normalises() {
        let r = Rect::from_edges(100.0, 50.0, 20.0, 10.0);
        assert_eq!(r, Rect::new(100.0, 50.0, 80.0, 40.0));
    }

    #[test]
    fn test_rect_usable() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_usable());
        assert!(!Rect::new(0.0, 0.0, 0.0, 1.0).is_usable());
        assert!(!Rect::new(0.0, 0.0, 1.0, -1.0).is_usable());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 1.0).is_usable());
        assert!(!Rect::new(0.0, 0.0, f64::INFINITY, 1.0).is_usable());
    }

    #[test]
    fn test_enclosing() {
        assert_eq!(Bounds::enclosing(Vec::new()), None);
        let b = Bounds::enclosing(vec![
            Bounds::new(0.0, 0.0, 10.0, 10.0),
            Bounds::new(-5.0, 3.0, 4.0, 20.0),
        ])
        .unwrap();
        assert_eq!(b, Bounds::new(-5.0, 0.0, 10.0, 20.0));
        assert_eq!(b.width(), 15.0);
        assert_eq!(b.center(), (2.5, 10.0));
    }
}
