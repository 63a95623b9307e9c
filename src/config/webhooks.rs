//! Webhook configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::webhook::ProviderTag;

/// Per-provider webhook secrets and request limits.
///
/// Secrets are optional here. A provider without one still gets an
/// endpoint, which rejects every delivery with 401.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhooksConfig {
    /// SellAuth shared secret (HMAC-SHA256)
    #[serde(default)]
    pub sellauth_secret: Option<String>,

    /// Sellix shared secret (HMAC-SHA512)
    #[serde(default)]
    pub sellix_secret: Option<String>,

    /// Maximum accepted webhook body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl WebhooksConfig {
    /// Returns the shared secret for a provider exactly as configured.
    ///
    /// An empty or all-whitespace value counts as missing.
    pub fn secret_for(&self, provider: ProviderTag) -> Option<SecretString> {
        let raw = match provider {
            ProviderTag::SellAuth => self.sellauth_secret.as_deref(),
            ProviderTag::Sellix => self.sellix_secret.as_deref(),
        };
        raw.filter(|secret| !secret.trim().is_empty())
            .map(|secret| SecretString::new(secret.to_string()))
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_body_bytes < 1024 || self.max_body_bytes > 1024 * 1024 {
            return Err(ValidationError::InvalidBodyLimit);
        }
        Ok(())
    }
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            sellauth_secret: None,
            sellix_secret: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_lookup_per_provider() {
        let config = WebhooksConfig {
            sellauth_secret: Some("sa_secret".to_string()),
            sellix_secret: Some("sx_secret".to_string()),
            ..Default::default()
        };

        let sellauth = config.secret_for(ProviderTag::SellAuth).unwrap();
        let sellix = config.secret_for(ProviderTag::Sellix).unwrap();
        assert_eq!(sellauth.expose_secret(), "sa_secret");
        assert_eq!(sellix.expose_secret(), "sx_secret");
    }

    #[test]
    fn test_empty_secret_counts_as_missing() {
        let config = WebhooksConfig {
            sellauth_secret: Some(String::new()),
            ..Default::default()
        };
        assert!(config.secret_for(ProviderTag::SellAuth).is_none());
        assert!(config.secret_for(ProviderTag::Sellix).is_none());
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let config = WebhooksConfig {
            sellix_secret: Some("  \t".to_string()),
            ..Default::default()
        };
        assert!(config.secret_for(ProviderTag::Sellix).is_none());
    }

    #[test]
    fn test_secret_whitespace_is_preserved() {
        let config = WebhooksConfig {
            sellauth_secret: Some(" sa_secret ".to_string()),
            ..Default::default()
        };

        let secret = config.secret_for(ProviderTag::SellAuth).unwrap();
        assert_eq!(secret.expose_secret(), " sa_secret ");
    }

    #[test]
    fn test_body_limit_bounds() {
        assert!(WebhooksConfig::default().validate().is_ok());

        let config = WebhooksConfig {
            max_body_bytes: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
