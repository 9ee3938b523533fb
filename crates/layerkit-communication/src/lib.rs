//! # LayerKit Communication
//!
//! Talks to the remote layout service and runs the smart arrangement flow
//! against a shared scene.
//!
//! - [`layout`]: the [`LayoutService`] trait with an HTTP client and an
//!   in-memory implementation
//! - [`session`]: [`ArrangeSession`], which gates re-entrant requests, awaits
//!   the service without holding the scene lock and commits the reconciled
//!   elements

pub mod layout;
pub mod session;

pub use layout::{HttpLayoutConfig, HttpLayoutService, LayoutError, LayoutService, StaticLayoutService};
pub use session::{ArrangeOutcome, ArrangeSession, Notice, ResizeOutcome, SessionOptions};
