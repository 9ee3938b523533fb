//! # LayerKit
//!
//! A headless toolkit for the element scene of an AI-assisted canvas editor,
//! built around smart layer arrangement:
//! - Whiteboard-compatible element model and scene files
//! - Toolbar operations (align, group, ungroup, resize)
//! - Smart arrangement through a remote layout service, placing the arranged
//!   copies next to the existing content without touching the originals
//! - Process-wide font cache
//!
//! ## Architecture
//!
//! LayerKit is organized as a workspace with multiple crates:
//!
//! 1. **layerkit-core** - Errors, event bus, shared-state aliases
//! 2. **layerkit-designer** - Elements, scene, toolbar ops, arrangement reconciler, fonts
//! 3. **layerkit-communication** - Layout service client and arrangement session
//! 4. **layerkit-settings** - Configuration files
//! 5. **layerkit** - Logging setup and the `layerkit` command line tool

pub mod app;
pub mod cli;

pub use layerkit_communication as communication;
pub use layerkit_designer as designer;
pub use layerkit_settings as settings;

pub use layerkit_core::{
    event_bus, AppEvent, ArrangeError, ArrangeEvent, Error, EventBus, EventFilter, Result,
    SceneError,
};

pub use layerkit_designer::{
    Alignment, ArrangeRequest, ArrangeResponse, ArrangementResult, Element, ElementType, Rect,
    ReconcileOptions, Reconciliation, Scene, TargetPreset, TargetSize,
};

pub use layerkit_communication::{
    ArrangeOutcome, ArrangeSession, HttpLayoutService, LayoutService, Notice, ResizeOutcome,
    StaticLayoutService,
};

pub use layerkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so command output on stdout stays clean
/// - RUST_LOG environment variable support (default level INFO)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
