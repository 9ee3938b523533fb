//! # LayerKit Designer
//!
//! Headless model of an AI canvas editor's element scene and the smart layer
//! arrangement flow built on top of it.
//!
//! ## Core Components
//!
//! - **Elements**: whiteboard elements with pass-through style and custom data
//! - **Scene**: ordered element store, selection and scene files
//! - **Toolbar operations**: align, group, ungroup and single-element resize
//! - **Arrangement**: request shaping, response decoding, id matching and the
//!   reconciler that places derived elements next to existing content
//! - **Fonts**: process-wide font cache
//!
//! ## Architecture
//!
//! ```text
//! Scene (elements + selection)
//!   ├── ops (direct edits on the selection)
//!   └── arrangement
//!         ├── request   -> layout service
//!         ├── wire      <- layout service
//!         └── reconcile (matching, cleanup, placement)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use layerkit_designer::arrangement::{reconcile, ArrangementResult, ReconcileOptions};
//! use layerkit_designer::{Element, Rect};
//!
//! let selection = vec![
//!     Element::rectangle("a", 0.0, 0.0, 100.0, 50.0),
//!     Element::rectangle("b", 0.0, 60.0, 100.0, 50.0),
//! ];
//! let arrangements = vec![
//!     ArrangementResult::new("a", Rect::new(0.0, 0.0, 80.0, 80.0)),
//!     ArrangementResult::new("b", Rect::new(100.0, 0.0, 80.0, 80.0)),
//! ];
//!
//! let result = reconcile(&selection, &arrangements, &selection, &ReconcileOptions::default());
//! assert_eq!(result.derived_ids.len(), 2);
//! assert_eq!(result.elements.len(), 4);
//! ```

pub mod arrangement;
pub mod element;
pub mod font_manager;
pub mod geometry;
pub mod ops;
pub mod scene;
pub mod selection_manager;

pub use arrangement::{
    ArrangeRequest, ArrangeResponse, ArrangementResult, ReconcileOptions, Reconciliation,
    TargetPreset, TargetSize,
};
pub use element::{CustomData, Element, ElementType};
pub use font_manager::{FileFontLoader, FontLoader, FontManager, FontSource};
pub use geometry::{Bounds, Rect};
pub use ops::{align, group, resize_single, ungroup, Alignment, ResizeRoute};
pub use scene::Scene;
pub use selection_manager::SelectionManager;
