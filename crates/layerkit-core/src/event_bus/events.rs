//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so they can be logged or replayed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Smart arrangement lifecycle
    Arrange(ArrangeEvent),
    /// Scene content and selection
    Scene(SceneEvent),
    /// Font cache population
    Font(FontEvent),
    /// Recoverable errors and warnings
    Error(ErrorEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Arrange(_) => EventCategory::Arrange,
            AppEvent::Scene(_) => EventCategory::Scene,
            AppEvent::Font(_) => EventCategory::Font,
            AppEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Arrange(e) => e.description(),
            AppEvent::Scene(e) => e.description(),
            AppEvent::Font(e) => e.description(),
            AppEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Smart arrangement events.
    Arrange,
    /// Scene events.
    Scene,
    /// Font events.
    Font,
    /// Error and diagnostic events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Arrange => write!(f, "Arrange"),
            EventCategory::Scene => write!(f, "Scene"),
            EventCategory::Font => write!(f, "Font"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Smart arrangement events
///
/// `Started` is the loading notification; exactly one of `Succeeded` or
/// `Failed` follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrangeEvent {
    /// Request sent to the layout service.
    Started {
        /// Number of selected elements.
        selected: usize,
        /// Target canvas width.
        target_width: f64,
        /// Target canvas height.
        target_height: f64,
    },
    /// Derived elements were committed to the scene.
    Succeeded {
        /// Number of derived elements created.
        created: usize,
        /// Number of stale derived elements removed.
        removed: usize,
    },
    /// The arrangement failed; cleanup may still have been applied.
    Failed {
        /// User-facing failure reason.
        reason: String,
        /// Whether the layout model reported overload.
        overloaded: bool,
    },
}

impl ArrangeEvent {
    fn description(&self) -> String {
        match self {
            ArrangeEvent::Started {
                selected,
                target_width,
                target_height,
            } => format!(
                "Arranging {} layers into {}x{}",
                selected, target_width, target_height
            ),
            ArrangeEvent::Succeeded { created, removed } => {
                format!("Arranged: {} created, {} cleaned up", created, removed)
            }
            ArrangeEvent::Failed { reason, overloaded } => {
                if *overloaded {
                    format!("Arrangement failed (overloaded): {}", reason)
                } else {
                    format!("Arrangement failed: {}", reason)
                }
            }
        }
    }
}

/// Scene events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Scene contents replaced.
    ElementsChanged {
        /// Element count after the change.
        count: usize,
    },
    /// Active selection changed.
    SelectionChanged {
        /// Newly selected ids.
        ids: Vec<String>,
    },
    /// Scene loaded from disk.
    Loaded {
        /// Source file.
        path: PathBuf,
        /// Number of elements read.
        elements: usize,
    },
    /// Scene written to disk.
    Saved {
        /// Destination file.
        path: PathBuf,
    },
}

impl SceneEvent {
    fn description(&self) -> String {
        match self {
            SceneEvent::ElementsChanged { count } => format!("Scene now has {} elements", count),
            SceneEvent::SelectionChanged { ids } => format!("Selected {} elements", ids.len()),
            SceneEvent::Loaded { path, elements } => {
                format!("Loaded {} ({} elements)", path.display(), elements)
            }
            SceneEvent::Saved { path } => format!("Saved {}", path.display()),
        }
    }
}

/// Font events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FontEvent {
    /// Font face loaded and cached.
    Loaded {
        /// Font family name.
        family: String,
    },
    /// Font face failed to load.
    Failed {
        /// Font family name.
        family: String,
        /// Loader error.
        reason: String,
    },
}

impl FontEvent {
    fn description(&self) -> String {
        match self {
            FontEvent::Loaded { family } => format!("Font loaded: {}", family),
            FontEvent::Failed { family, reason } => {
                format!("Font {} failed: {}", family, reason)
            }
        }
    }
}

/// Error events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// Something went wrong but was handled.
    Recoverable {
        /// Component that reported it.
        source: String,
        /// Message.
        message: String,
    },
    /// Non-error condition worth surfacing.
    Warning {
        /// Message.
        message: String,
    },
}

impl ErrorEvent {
    fn description(&self) -> String {
        match self {
            ErrorEvent::Recoverable { source, message } => format!("[{}] {}", source, message),
            ErrorEvent::Warning { message } => format!("Warning: {}", message),
        }
    }
}
