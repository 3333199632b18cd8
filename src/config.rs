//! Application configuration
//!
//! One explicit value constructed at startup and passed into the downloader.
//! Official-API credentials are optional; without them the public fallback
//! source is used.

const DEFAULT_OAUTH_ENDPOINT: &str = "https://oauth2.quran.foundation";
const DEFAULT_FALLBACK_API: &str = "https://api.alquran.cloud/v1";
const DEFAULT_TEXT_EDITION: &str = "quran-uthmani";
const DEFAULT_TRANSLATION_EDITION: &str = "en.sahih";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub oauth_endpoint: String,
    pub api_base: String,
    pub text_edition: String,
    pub translation_edition: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            client_id: None,
            client_secret: None,
            oauth_endpoint: DEFAULT_OAUTH_ENDPOINT.to_string(),
            api_base: DEFAULT_FALLBACK_API.to_string(),
            text_edition: DEFAULT_TEXT_EDITION.to_string(),
            translation_edition: DEFAULT_TRANSLATION_EDITION.to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = AppConfig::default();
        if let Ok(id) = std::env::var("QURAN_CLIENT_ID") {
            if !id.is_empty() {
                config.client_id = Some(id);
            }
        }
        if let Ok(secret) = std::env::var("QURAN_CLIENT_SECRET") {
            if !secret.is_empty() {
                config.client_secret = Some(secret);
            }
        }
        if let Ok(endpoint) = std::env::var("QURAN_ENDPOINT") {
            if !endpoint.is_empty() {
                config.oauth_endpoint = endpoint;
            }
        }
        if let Ok(base) = std::env::var("QURAN_API_BASE") {
            if !base.is_empty() {
                config.api_base = base;
            }
        }
        config
    }

    /// Whether official-API credentials are configured.
    pub fn has_official_api(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_fallback_api() {
        let config = AppConfig::default();
        assert!(!config.has_official_api());
        assert_eq!(config.api_base, DEFAULT_FALLBACK_API);
        assert_eq!(config.translation_edition, "en.sahih");
    }

    #[test]
    fn official_api_requires_both_credentials() {
        let config = AppConfig {
            client_id: Some("id".to_string()),
            ..AppConfig::default()
        };
        assert!(!config.has_official_api());

        let config = AppConfig {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            ..AppConfig::default()
        };
        assert!(config.has_official_api());
    }
}
