use crate::metrics::Metrics;
use crate::models::{Config, ExportData, DEFAULT_CONTAINER_NAME, EXPORTED_FROM_CONVERTER};
use crate::services::converter::{convert_with_stats, ConvertError};
use crate::services::game_lookup::{GameNameLookup, NoLookup};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static STEAM_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^STEAM_([0-9]+)$").expect("Invalid Steam id regex"));

/// Steam app id encoded in a config `id` of the form `STEAM_<digits>`.
pub fn steam_app_id(config: &Config) -> Option<&str> {
    let id = config.get("id")?.as_str()?;
    STEAM_ID_PATTERN
        .captures(id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Converts dump text and wraps the result in an [`ExportData`] envelope.
///
/// Container naming is best-effort: the injected [`GameNameLookup`] is only
/// consulted for Steam ids, and any miss or failure keeps the default name.
pub struct ExportService {
    lookup: Arc<dyn GameNameLookup>,
    default_container_name: String,
    metrics: Arc<Metrics>,
}

impl ExportService {
    pub fn new(lookup: Arc<dyn GameNameLookup>, default_container_name: impl Into<String>) -> Self {
        Self {
            lookup,
            default_container_name: default_container_name.into(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Service with no lookup and the standard default name.
    pub fn offline() -> Self {
        Self::new(Arc::new(NoLookup), DEFAULT_CONTAINER_NAME)
    }

    /// Share a metrics instance with the caller.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn default_container_name(&self) -> &str {
        &self.default_container_name
    }

    /// Convert and record the outcome in the metrics.
    pub fn convert(&self, text: &str) -> Result<Config, ConvertError> {
        match convert_with_stats(text) {
            Ok((config, stats)) => {
                self.metrics.record_conversion_succeeded(stats.lines);
                Ok(config)
            }
            Err(e) => {
                tracing::warn!("Conversion failed: {}", e);
                self.metrics.record_conversion_failed();
                Err(e)
            }
        }
    }

    /// Convert with the default container name and no lookup.
    pub fn preview(&self, text: &str) -> Result<ExportData, ConvertError> {
        let config = self.convert(text)?;
        Ok(ExportData::new(
            EXPORTED_FROM_CONVERTER,
            self.default_container_name.clone(),
            config,
        ))
    }

    /// Convert, then name the container through the lookup.
    pub async fn export(&self, text: &str) -> Result<ExportData, ConvertError> {
        let config = self.convert(text)?;
        let container_name = self.resolve_container_name(&config).await;
        Ok(ExportData::new(EXPORTED_FROM_CONVERTER, container_name, config))
    }

    /// Convert with an explicit container name.
    pub fn export_named(&self, text: &str, container_name: &str) -> Result<ExportData, ConvertError> {
        let config = self.convert(text)?;
        Ok(ExportData::new(EXPORTED_FROM_CONVERTER, container_name, config))
    }

    /// Game name for a `STEAM_<appid>` config id, else the default name.
    pub async fn resolve_container_name(&self, config: &Config) -> String {
        let Some(app_id) = steam_app_id(config) else {
            return self.default_container_name.clone();
        };

        self.metrics.record_lookup_attempted();
        match self.lookup.lookup_name(app_id).await {
            Ok(Some(name)) => {
                self.metrics.record_lookup_resolved();
                name
            }
            Ok(None) => {
                tracing::info!("No game name found for Steam app {}", app_id);
                self.default_container_name.clone()
            }
            Err(e) => {
                tracing::warn!("Game name lookup for Steam app {} failed: {}", app_id, e);
                self.metrics.record_lookup_failed();
                self.default_container_name.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::game_lookup::{LookupError, MockGameNameLookup};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn config_with_id(id: serde_json::Value) -> Config {
        let mut config = Config::new();
        config.insert("id".to_string(), id);
        config
    }

    #[test]
    fn test_steam_app_id() {
        assert_eq!(steam_app_id(&config_with_id(json!("STEAM_440"))), Some("440"));
        assert_eq!(steam_app_id(&config_with_id(json!("STEAM_"))), None);
        assert_eq!(steam_app_id(&config_with_id(json!("STEAM_44a"))), None);
        assert_eq!(steam_app_id(&config_with_id(json!("CUSTOM_1"))), None);
        assert_eq!(steam_app_id(&config_with_id(json!(440))), None);
        assert_eq!(steam_app_id(&Config::new()), None);
    }

    #[test]
    fn test_preview_uses_default_name() {
        let service = ExportService::offline();
        let export = service.preview("id\nSTEAM_440\nname\nTF2").unwrap();

        assert_eq!(export.container_name, "Imported Config");
        assert_eq!(export.exported_from, "GameNative");
        assert_eq!(export.version, 1);
        assert_eq!(export.config["id"], json!("STEAM_440"));
        assert_eq!(service.metrics().conversions_succeeded.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_failed_conversion_counted() {
        let service = ExportService::offline();
        assert!(service.preview("bogus").is_err());
        assert_eq!(service.metrics().conversions_failed.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_export_resolves_steam_name() {
        let mut mock = MockGameNameLookup::new();
        mock.expect_lookup_name()
            .withf(|app_id| app_id == "440")
            .times(1)
            .returning(|_| Ok(Some("Team Fortress 2".to_string())));

        let service = ExportService::new(Arc::new(mock), DEFAULT_CONTAINER_NAME);
        let export = service.export("id\nSTEAM_440").await.unwrap();

        assert_eq!(export.container_name, "Team Fortress 2");
        assert_eq!(service.metrics().lookups_resolved.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back() {
        let mut mock = MockGameNameLookup::new();
        mock.expect_lookup_name()
            .returning(|_| Err(LookupError::InvalidResponse("HTTP 502".to_string())));

        let service = ExportService::new(Arc::new(mock), "Fallback");
        let export = service.export("id\nSTEAM_440").await.unwrap();

        assert_eq!(export.container_name, "Fallback");
        assert_eq!(service.metrics().lookups_failed.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_non_steam_id_skips_lookup() {
        let mut mock = MockGameNameLookup::new();
        mock.expect_lookup_name().times(0);

        let service = ExportService::new(Arc::new(mock), DEFAULT_CONTAINER_NAME);
        let export = service.export("id\nGOG_123").await.unwrap();

        assert_eq!(export.container_name, "Imported Config");
        assert_eq!(service.metrics().lookups_attempted.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_export_named() {
        let service = ExportService::offline();
        let export = service.export_named("name\nx", "Custom").unwrap();
        assert_eq!(export.container_name, "Custom");
    }
}
