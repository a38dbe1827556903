use serde::{Deserialize, Serialize};

/// Default CORS proxy prefixes tried, in order, for Steam store lookups.
pub const DEFAULT_PROXIES: &[&str] = &["https://api.allorigins.win/raw?url=", "https://corsproxy.io/?"];

/// Tool settings from `settings.yaml`, overridable through `GNCONFIG_*` variables.
///
/// Every field has a default, so a partial or missing file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_container_name")]
    pub default_container_name: String,

    /// Resolve `STEAM_<appid>` ids to game names when converting
    #[serde(default = "default_true")]
    pub lookup_enabled: bool,

    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,

    #[serde(default = "default_proxies")]
    pub proxies: Vec<String>,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default = "default_true")]
    pub pretty_output: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            default_container_name: default_container_name(),
            lookup_enabled: true,
            lookup_timeout_secs: default_lookup_timeout_secs(),
            proxies: default_proxies(),
            log_dir: default_log_dir(),
            debug_mode: false,
            pretty_output: true,
        }
    }
}

fn default_container_name() -> String {
    crate::models::DEFAULT_CONTAINER_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_proxies() -> Vec<String> {
    DEFAULT_PROXIES.iter().map(|p| p.to_string()).collect()
}

fn default_log_dir() -> String {
    "logs".to_string()
}
