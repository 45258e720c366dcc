//! Gateway configuration, read from the environment.

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_MODEL: &str = "black-forest-labs/flux-1.1-pro";

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_BASE_URL: &str = "OPENROUTER_BASE_URL";
pub const ENV_SITE_URL: &str = "POSTERDRAFT_SITE_URL";
pub const ENV_MODEL: &str = "POSTERDRAFT_IMAGE_MODEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// `None` until a key is configured; requests then fail with
    /// `MissingCredential`.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Sent as `HTTP-Referer`.
    pub site_url: String,
    pub model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            api_key: get(ENV_API_KEY),
            base_url: get(ENV_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            site_url: get(ENV_SITE_URL).unwrap_or(defaults.site_url),
            model: get(ENV_MODEL).unwrap_or(defaults.model),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}
