use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Structured container configuration, in key insertion order.
pub type Config = IndexMap<String, Value>;

/// Envelope format version understood by GameNative.
pub const EXPORT_VERSION: u32 = 1;

/// `exportedFrom` marker for configs produced by the converter.
pub const EXPORTED_FROM_CONVERTER: &str = "GameNative";

/// `exportedFrom` marker for configs re-exported after editing.
pub const EXPORTED_FROM_EDITOR: &str = "WebEditor";

/// Container name used when nothing better is known.
pub const DEFAULT_CONTAINER_NAME: &str = "Imported Config";

/// Config key holding the button index → binding map.
pub const CONTROLLER_BINDINGS_KEY: &str = "controllerEmulationBindings";

/// Importable export file wrapping a [`Config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: u32,
    pub exported_from: String,
    /// Unix time in milliseconds
    pub timestamp: u64,
    pub container_name: String,
    pub config: Config,
}

impl ExportData {
    /// Wrap a config, stamping it with the current time.
    pub fn new(exported_from: &str, container_name: impl Into<String>, config: Config) -> Self {
        Self {
            version: EXPORT_VERSION,
            exported_from: exported_from.to_string(),
            timestamp: now_millis(),
            container_name: container_name.into(),
            config,
        }
    }

    /// Pretty JSON with two-space indentation, as written to export files.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
