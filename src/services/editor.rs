//! Re-import of exported configs for editing and re-export.

use crate::models::{Config, ExportData, DEFAULT_CONTAINER_NAME, EXPORTED_FROM_EDITOR};
use crate::services::fields::{parse_kv, stringify_kv};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Invalid configuration.")]
    MissingId,
}

/// A config loaded for editing, with its container name held separately.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableConfig {
    pub container_name: String,
    pub config: Config,
}

/// Load either a full export envelope or a bare config object.
///
/// The config must carry a truthy `id`. The container name comes from the
/// envelope, then the config `name`, then the default.
pub fn import_export_json(text: &str) -> Result<EditableConfig, ImportError> {
    let parsed: Value = serde_json::from_str(text)?;
    let root = parsed.as_object().ok_or(ImportError::NotAnObject)?;

    let data = match root.get("config") {
        Some(Value::Object(inner)) => inner,
        _ => root,
    };

    if !data.get("id").is_some_and(is_truthy) {
        return Err(ImportError::MissingId);
    }

    let container_name = non_empty_str(root.get("containerName"))
        .or_else(|| non_empty_str(data.get("name")))
        .unwrap_or(DEFAULT_CONTAINER_NAME)
        .to_string();

    let mut config: Config = data
        .iter()
        .filter(|(key, _)| key.as_str() != "containerName")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if let Some(Value::String(dx)) = config.get("dxwrapperConfig") {
        if !dx.is_empty() {
            let synced = sync_renderer(dx);
            config.insert("dxwrapperConfig".to_string(), Value::String(synced));
        }
    }

    let id = config.get("id").map(|v| v.to_string()).unwrap_or_default();
    tracing::info!(
        "Imported config {} as {:?} ({} keys)",
        id,
        container_name,
        config.len()
    );

    Ok(EditableConfig {
        container_name,
        config,
    })
}

/// Make `renderer` and `gpuName` agree, preferring `gpuName`.
fn sync_renderer(dxwrapper_config: &str) -> String {
    let mut pairs = parse_kv(dxwrapper_config);
    let synced = [pairs.get("gpuName"), pairs.get("renderer")]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .cloned()
        .unwrap_or_default();
    pairs.insert("renderer".to_string(), synced.clone());
    pairs.insert("gpuName".to_string(), synced);
    stringify_kv(&pairs)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

impl EditableConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    pub fn set_field(&mut self, key: &str, value: Value) {
        self.config.insert(key.to_string(), value);
    }

    /// Update one `sub_key=value` entry inside a KV-list field such as
    /// `dxwrapperConfig`, creating the field if needed.
    pub fn update_nested_kv(&mut self, root_key: &str, sub_key: &str, value: &str) {
        let current = self
            .config
            .get(root_key)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let mut pairs = parse_kv(current);
        pairs.insert(sub_key.to_string(), value.to_string());
        self.set_field(root_key, Value::String(stringify_kv(&pairs)));
    }

    /// Re-export as a `WebEditor` envelope.
    pub fn to_export(&self) -> ExportData {
        ExportData::new(
            EXPORTED_FROM_EDITOR,
            self.container_name.clone(),
            self.config.clone(),
        )
    }

    /// `<id>_export.json`, or `config_export.json` without a usable id.
    ///
    /// Path separators and `..` in the id are replaced with `_`, so the name
    /// never leaves the directory it is written to.
    pub fn export_file_name(&self) -> String {
        let id = match self.config.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => "config".to_string(),
        };
        let safe_id = id.replace("..", "_").replace(['/', '\\'], "_");
        format!("{}_export.json", safe_id)
    }
}
