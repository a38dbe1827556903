//! Data models for the converter.
//!
//! - [`RecognizedKey`] / [`ButtonKey`]: the closed vocabularies a dump line must belong to
//! - [`CoercionPolicy`]: how a value line is typed for a given key
//! - [`Config`] / [`ExportData`]: the structured output and its export envelope
//! - [`ToolSettings`]: user settings loaded by [`ConfigManager`](crate::config::ConfigManager)

pub mod export;
pub mod settings;
pub mod vocabulary;

pub use export::{
    Config, ExportData, CONTROLLER_BINDINGS_KEY, DEFAULT_CONTAINER_NAME, EXPORT_VERSION,
    EXPORTED_FROM_CONVERTER, EXPORTED_FROM_EDITOR,
};
pub use settings::{ToolSettings, DEFAULT_PROXIES};
pub use vocabulary::{ButtonKey, CoercionPolicy, LineKind, RecognizedKey};
