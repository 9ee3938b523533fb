//! # Event Bus Module
//!
//! Publish/subscribe bus used to deliver transient notifications (arrangement
//! progress, scene changes, font loading) without coupling producers to the UI.
//!
//! ## Usage
//!
//! ```rust
//! use layerkit_core::event_bus::{event_bus, AppEvent, ArrangeEvent, EventCategory, EventFilter};
//!
//! let subscription = event_bus().subscribe(
//!     EventFilter::Categories(vec![EventCategory::Arrange]),
//!     |event| {
//!         if let AppEvent::Arrange(ArrangeEvent::Failed { reason, .. }) = event {
//!             eprintln!("arrangement failed: {reason}");
//!         }
//!     },
//! );
//!
//! event_bus().publish(AppEvent::Arrange(ArrangeEvent::Succeeded { created: 2, removed: 0 }));
//! event_bus().unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
