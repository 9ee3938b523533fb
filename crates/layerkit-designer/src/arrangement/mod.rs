//! Smart layer arrangement.
//!
//! - [`request`]: shapes the payload sent to the layout service
//! - [`wire`]: lenient decoding of the service response
//! - [`matching`]: resolves returned ids back to selected elements
//! - [`reconcile`]: cleanup, placement and derived element creation
//! - [`ids`]: clock and id sources for derived elements

pub mod ids;
pub mod matching;
pub mod reconcile;
pub mod request;
pub mod wire;

pub use ids::{derived_id, Clock, FixedClock, IdSource, SequentialIdSource, SystemClock, UuidIdSource};
pub use matching::{find_original, ids_loosely_match, IdMatch, MatchKind};
pub use reconcile::{
    cleanup, compute_offset, reconcile, Cleanup, FallbackMatch, Offset, ReconcileOptions,
    Reconciliation, DEFAULT_SPACING,
};
pub use request::{
    canvas_extent, default_presets, ArrangeRequest, RequestElement, TargetPreset, TargetSize,
    FALLBACK_CANVAS_SIZE,
};
pub use wire::{ArrangeResponse, ArrangementResult};
