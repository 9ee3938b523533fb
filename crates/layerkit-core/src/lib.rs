//! # LayerKit Core
//!
//! Core types and utilities shared by every LayerKit crate: the unified
//! error taxonomy, the application event bus and shared-state aliases.

pub mod error;
pub mod event_bus;
pub mod types;

pub use error::{ArrangeError, Error, FontError, Result, SceneError};

pub use event_bus::{
    event_bus, init_event_bus, AppEvent, ArrangeEvent, ErrorEvent, EventBus, EventBusConfig,
    EventCategory, EventFilter, FontEvent, SceneEvent, SubscriptionId,
};

pub use types::{thread_safe, thread_safe_rw, BoxedSendError, ThreadSafe, ThreadSafeRw};
