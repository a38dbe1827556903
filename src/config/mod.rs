use crate::models::ToolSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ::config::{Config as Layered, Environment, File, FileFormat};
use std::fs;

/// Prefix of environment variables that override settings (`GNCONFIG_LOOKUP_ENABLED`, ...).
pub const ENV_PREFIX: &str = "GNCONFIG";

/// Settings file name inside the configuration directory.
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Per-user configuration directory: `~/.config/gnconfig` on Linux.
///
/// Falls back to `./gnconfig` when the platform directory is unknown or not UTF-8.
pub fn default_config_dir() -> Utf8PathBuf {
    dirs::config_dir()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
        .join("gnconfig")
}

/// Configuration manager for the tool's YAML settings file.
///
/// Settings are layered: built-in defaults, then `settings.yaml` if present,
/// then `GNCONFIG_*` environment variables.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager for the specified configuration directory.
    ///
    /// Nothing is touched on disk until settings are saved.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Self {
        let config_dir = config_dir.as_ref().to_path_buf();
        Self {
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
        }
    }

    /// Load settings from file and environment.
    ///
    /// # Returns
    /// The merged ToolSettings; defaults fill anything not set
    pub fn load_settings(&self) -> Result<ToolSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let defaults = serde_yaml_ng::to_string(&ToolSettings::default())
            .context("Failed to serialize default settings")?;

        let layered = Layered::builder()
            .add_source(File::from_str(&defaults, FileFormat::Yaml))
            .add_source(File::new(self.settings_path.as_str(), FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("proxies"),
            )
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: ToolSettings = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Save settings as YAML, creating the configuration directory if needed.
    pub fn save_settings(&self, settings: &ToolSettings) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).with_context(|| {
                format!("Failed to create config directory: {}", self.config_dir)
            })?;
        }

        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }

    /// Resolve a settings path: relative paths are taken from the config directory.
    pub fn resolve(&self, path: &str) -> Utf8PathBuf {
        let path = Utf8Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }
}
