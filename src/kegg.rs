use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::OrganismCode;
use crate::error::G2koError;

pub const DEFAULT_BASE_URL: &str = "https://rest.kegg.jp";
/// Per-call timeouts are clamped into this range, in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Read-only access to the two KEGG REST resources the report needs.
pub trait KeggClient: Send + Sync {
    /// Body of `GET /link/ko/{organism}`.
    fn link_ko(&self, organism: &OrganismCode) -> Result<String, G2koError>;
    /// Body of `GET /list/ko`.
    fn list_ko(&self) -> Result<String, G2koError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeggSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_link_timeout_secs")]
    pub link_timeout_secs: u64,
    #[serde(default = "default_list_timeout_secs")]
    pub list_timeout_secs: u64,
}

impl Default for KeggSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            link_timeout_secs: default_link_timeout_secs(),
            list_timeout_secs: default_list_timeout_secs(),
        }
    }
}

impl KeggSettings {
    /// Same settings with both timeouts clamped to
    /// [`MIN_TIMEOUT_SECS`]..=[`MAX_TIMEOUT_SECS`].
    pub fn bounded(self) -> Self {
        Self {
            link_timeout_secs: self
                .link_timeout_secs
                .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS),
            list_timeout_secs: self
                .list_timeout_secs
                .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS),
            ..self
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_link_timeout_secs() -> u64 {
    20
}

fn default_list_timeout_secs() -> u64 {
    25
}

#[derive(Clone)]
pub struct KeggHttpClient {
    client: Client,
    settings: KeggSettings,
}

impl KeggHttpClient {
    pub fn new() -> Result<Self, G2koError> {
        Self::with_settings(KeggSettings::default())
    }

    pub fn with_settings(settings: KeggSettings) -> Result<Self, G2koError> {
        let settings = settings.bounded();
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("g2ko/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| G2koError::KeggHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(
                settings.link_timeout_secs.max(settings.list_timeout_secs),
            ))
            .build()
            .map_err(|err| G2koError::KeggHttp(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn get_text(&self, url: &str, timeout: Duration) -> Result<String, G2koError> {
        debug!(url, timeout_secs = timeout.as_secs(), "kegg.request");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|err| G2koError::KeggHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        response
            .text()
            .map_err(|err| G2koError::KeggHttp(err.to_string()))
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, G2koError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let message = response
            .text()
            .ok()
            .map(|body| body.trim().to_string())
            .filter(|body| !body.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("KEGG request failed")
                    .to_string()
            });
        Err(G2koError::KeggStatus {
            status: status.as_u16(),
            message,
        })
    }
}

impl KeggClient for KeggHttpClient {
    fn link_ko(&self, organism: &OrganismCode) -> Result<String, G2koError> {
        let url = link_ko_url(&self.settings.base_url, organism);
        self.get_text(&url, Duration::from_secs(self.settings.link_timeout_secs))
    }

    fn list_ko(&self) -> Result<String, G2koError> {
        let url = list_ko_url(&self.settings.base_url);
        self.get_text(&url, Duration::from_secs(self.settings.list_timeout_secs))
    }
}

pub fn link_ko_url(base_url: &str, organism: &OrganismCode) -> String {
    format!("{}/link/ko/{}", base_url.trim_end_matches('/'), organism.as_str())
}

pub fn list_ko_url(base_url: &str) -> String {
    format!("{}/list/ko", base_url.trim_end_matches('/'))
}
