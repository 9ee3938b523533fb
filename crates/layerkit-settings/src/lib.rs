//! LayerKit Settings Crate
//!
//! Loads, validates and saves the LayerKit configuration file.

pub mod config;
pub mod error;

pub use config::{ArrangementSettings, Config, FontSettings, LayoutSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
