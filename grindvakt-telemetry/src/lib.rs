//! # Grindvakt Telemetry
//!
//! Crate for logging set-up shared by the plugin binary and its tests.

pub mod logging;

pub use logging::PluginLogger;
