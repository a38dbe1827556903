//! Game name lookup used to name exported containers.
//!
//! The converter itself never touches the network. Callers inject a
//! [`GameNameLookup`]; [`NoLookup`] is the offline default and
//! [`SteamStoreLookup`] asks the Steam store `appdetails` API through a list
//! of CORS proxy prefixes, taking the first usable answer.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const STEAM_APP_DETAILS_URL: &str = "https://store.steampowered.com/api/appdetails?appids=";

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid lookup response: {0}")]
    InvalidResponse(String),
}

/// Resolves a Steam app id to a display name.
///
/// `Ok(None)` means the id is unknown; errors are never fatal to a conversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameNameLookup: Send + Sync {
    async fn lookup_name(&self, app_id: &str) -> Result<Option<String>, LookupError>;
}

/// Lookup that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

#[async_trait]
impl GameNameLookup for NoLookup {
    async fn lookup_name(&self, _app_id: &str) -> Result<Option<String>, LookupError> {
        Ok(None)
    }
}

/// Steam store lookup through CORS proxies.
pub struct SteamStoreLookup {
    http: reqwest::Client,
    proxies: Vec<String>,
}

impl SteamStoreLookup {
    pub fn new(proxies: Vec<String>, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, proxies })
    }

    pub fn proxies(&self) -> &[String] {
        &self.proxies
    }

    /// Request URLs for an app id, one per proxy, in try order.
    pub fn request_urls(&self, app_id: &str) -> Vec<String> {
        let store_url = format!("{}{}", STEAM_APP_DETAILS_URL, app_id);
        let encoded = encode_uri_component(&store_url);
        self.proxies
            .iter()
            .map(|proxy| format!("{}{}", proxy, encoded))
            .collect()
    }

    async fn fetch(&self, url: &str) -> Result<Value, LookupError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::InvalidResponse(format!("HTTP {}", status)));
        }

        let body: Value = response.json().await?;
        if !body.is_object() {
            return Err(LookupError::InvalidResponse(
                "response is not a JSON object".to_string(),
            ));
        }
        Ok(body)
    }
}

#[async_trait]
impl GameNameLookup for SteamStoreLookup {
    async fn lookup_name(&self, app_id: &str) -> Result<Option<String>, LookupError> {
        for (proxy, url) in self.proxies.iter().zip(self.request_urls(app_id)) {
            match self.fetch(&url).await {
                Ok(body) => {
                    if let Some(name) = parse_app_details(&body, app_id) {
                        tracing::info!("Resolved Steam app {} to {:?}", app_id, name);
                        return Ok(Some(escape_html(&name)));
                    }
                    tracing::debug!("Proxy {} had no usable details for app {}", proxy, app_id);
                }
                Err(e) => {
                    tracing::warn!("Proxy {} failed: {}", proxy, e);
                }
            }
        }

        Ok(None)
    }
}

/// Extract `data.<app_id>.data.name` when `success` is `true`.
pub fn parse_app_details(body: &Value, app_id: &str) -> Option<String> {
    let entry = body.get(app_id)?.as_object()?;
    if entry.get("success")?.as_bool() != Some(true) {
        return None;
    }

    entry
        .get("data")?
        .as_object()?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

/// HTML-escape a game name before it is used as a container name.
pub fn escape_html(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
fn encode_uri_component(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
