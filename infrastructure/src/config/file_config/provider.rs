//! Backend provider settings from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

use crate::config::validation::{ConfigIssue, ConfigIssueCode};

/// Which caller variant to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// Call the Gemini API directly with each credential
    #[default]
    Direct,
    /// Route calls through a relay that accepts the same protocol
    Proxy,
}

/// Backend selection and HTTP tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub mode: ProviderMode,
    /// Relay base URL (required in proxy mode)
    pub proxy_url: Option<String>,
    /// Bearer token presented to the relay itself
    pub proxy_token: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::Direct,
            proxy_url: None,
            proxy_token: None,
            timeout_secs: 120,
        }
    }
}

impl FileProviderConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.mode == ProviderMode::Proxy
            && self.proxy_url.as_deref().unwrap_or("").trim().is_empty()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingProxyUrl,
                "provider: mode = \"proxy\" requires proxy_url",
            ));
        }
        issues
    }
}
