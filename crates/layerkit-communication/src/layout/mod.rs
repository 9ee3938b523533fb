//! Layout service abstraction.
//!
//! The layout service receives the selected elements plus the target size and
//! answers with a new box for each element id.

mod http;
mod static_service;

pub use http::{HttpLayoutConfig, HttpLayoutService};
pub use static_service::StaticLayoutService;

use async_trait::async_trait;
use layerkit_core::ArrangeError;
use layerkit_designer::arrangement::{ArrangeRequest, ArrangeResponse};
use std::time::Duration;
use thiserror::Error;

/// Layout client error type
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Connection or protocol failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Layout service returned status {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Body was not a valid arrangement response
    #[error("Invalid layout response: {0}")]
    Decode(String),

    /// No answer within the configured timeout
    #[error("Layout request timed out after {0:?}")]
    Timeout(Duration),

    /// The service could not be reached at all
    #[error("Layout service unavailable: {0}")]
    Unavailable(String),
}

impl LayoutError {
    /// The layout model reported it is overloaded.
    pub fn is_overloaded(&self) -> bool {
        self.to_string().to_ascii_lowercase().contains("overloaded")
    }
}

impl From<LayoutError> for ArrangeError {
    fn from(err: LayoutError) -> Self {
        if err.is_overloaded() {
            ArrangeError::ModelOverloaded
        } else {
            ArrangeError::Transport {
                message: err.to_string(),
            }
        }
    }
}

/// Computes target boxes for a selection.
#[async_trait]
pub trait LayoutService: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn arrange(&self, request: &ArrangeRequest) -> Result<ArrangeResponse, LayoutError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overloaded_detection() {
        let err = LayoutError::Status {
            code: 503,
            body: r#"{"detail":"The model is overloaded. Please try again later."}"#.to_string(),
        };
        assert!(err.is_overloaded());
        assert_eq!(ArrangeError::from(err), ArrangeError::ModelOverloaded);

        let err = LayoutError::Decode("expected value".to_string());
        assert!(!err.is_overloaded());
        assert!(matches!(ArrangeError::from(err), ArrangeError::Transport { .. }));
    }
}
