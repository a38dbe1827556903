// GameNative Config Tools - raw container dump to importable JSON
//
// This is the library crate containing the converter, export and editing logic.
// The binary crate (main.rs) provides the command-line entry point.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use crate::config::ConfigManager;
pub use crate::metrics::Metrics;
pub use crate::models::{ButtonKey, Config, ExportData, RecognizedKey, ToolSettings};
pub use crate::services::{convert, ConvertError, ExportService};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
