//! Error handling for LayerKit
//!
//! Provides error types for every layer of the toolkit:
//! - Arrangement errors (smart layer arrangement flow)
//! - Scene errors (element store and scene files)
//! - Font errors (font cache population)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Arrangement error type
///
/// Covers every way a smart arrangement request can fail. None of these are
/// fatal to the host application; the caller reports them as a transient
/// notification and keeps running.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArrangeError {
    /// Fewer than two elements were selected
    #[error("Smart arrangement needs at least 2 selected elements, got {count}")]
    TooFewElements {
        /// Number of selected elements.
        count: usize,
    },

    /// Every selected element had invalid geometry and was filtered out
    #[error("No selected element has a usable size")]
    NoValidElements,

    /// Target size was non-positive or non-finite
    #[error("Invalid target size {width}x{height}")]
    InvalidTargetSize {
        /// Requested target width.
        width: f64,
        /// Requested target height.
        height: f64,
    },

    /// Another arrangement is still outstanding
    #[error("An arrangement is already in progress")]
    AlreadyArranging,

    /// Network or HTTP failure talking to the layout service
    #[error("Layout service request failed: {message}")]
    Transport {
        /// Transport error message.
        message: String,
    },

    /// The layout model reported it is overloaded
    #[error("Layout model is overloaded, try again later")]
    ModelOverloaded,

    /// The layout service answered with `success: false`
    #[error("Layout service rejected the request: {message}")]
    ServiceRejected {
        /// Message returned by the service, if any.
        message: String,
    },

    /// No arrangement result could be turned into a new element
    #[error("No arrangement result matched a selected element ({} unmatched)", unmatched.len())]
    NoMatches {
        /// Arrangement ids that could not be used.
        unmatched: Vec<String>,
    },

    /// The scene refused the reconciled elements
    #[error("Could not commit arrangement: {message}")]
    CommitFailed {
        /// Scene error message.
        message: String,
    },

    /// Every selected element was deleted while the request was in flight
    #[error("Selection changed during arrangement: {} element(s) no longer exist", missing.len())]
    StaleSelection {
        /// Ids that disappeared from the scene.
        missing: Vec<String>,
    },
}

impl ArrangeError {
    /// Check if the failure left the scene cleaned up rather than untouched
    pub fn commits_cleanup(&self) -> bool {
        matches!(
            self,
            ArrangeError::Transport { .. }
                | ArrangeError::ModelOverloaded
                | ArrangeError::ServiceRejected { .. }
                | ArrangeError::NoMatches { .. }
                | ArrangeError::StaleSelection { .. }
        )
    }
}

/// Scene error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No element with this id exists
    #[error("Element not found: {id}")]
    ElementNotFound {
        /// The missing element id.
        id: String,
    },

    /// An element with this id already exists
    #[error("Duplicate element id: {id}")]
    DuplicateId {
        /// The duplicated element id.
        id: String,
    },

    /// The scene file could not be understood
    #[error("Invalid scene file: {reason}")]
    InvalidFile {
        /// Why the file was rejected.
        reason: String,
    },
}

/// Font error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    /// Loading the font face failed
    #[error("Failed to load font {family}: {reason}")]
    LoadFailed {
        /// Font family name.
        family: String,
        /// Loader failure message.
        reason: String,
    },

    /// The font source url is not usable
    #[error("Invalid font source for {family}: {url}")]
    InvalidSource {
        /// Font family name.
        family: String,
        /// Offending url.
        url: String,
    },
}

/// Main error type for LayerKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrangement error
    #[error(transparent)]
    Arrange(#[from] ArrangeError),

    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Font error
    #[error(transparent)]
    Font(#[from] FontError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an arrangement error
    pub fn is_arrange_error(&self) -> bool {
        matches!(self, Error::Arrange(_))
    }

    /// Check if this is a scene error
    pub fn is_scene_error(&self) -> bool {
        matches!(self, Error::Scene(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
