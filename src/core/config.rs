use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Credentials and endpoint override for one adapter instance.
///
/// Every field is optional: an adapter built from an empty configuration can
/// still make unauthenticated calls.
#[derive(Clone, Default)]
pub struct ExchangeConfig {
    pub api_key: Option<Secret<String>>,
    pub secret_key: Option<Secret<String>>,
    pub passphrase: Option<Secret<String>>,
    pub subaccount: Option<String>,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("has_api_key", &self.api_key.is_some())
            .field("has_secret_key", &self.secret_key.is_some())
            .field("has_passphrase", &self.passphrase.is_some())
            .field("subaccount", &self.subaccount)
            .field("base_url", &self.base_url)
            .finish()
    }
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let redact = |secret: &Option<Secret<String>>| secret.as_ref().map(|_| "[REDACTED]");

        let mut state = serializer.serialize_struct("ExchangeConfig", 5)?;
        state.serialize_field("api_key", &redact(&self.api_key))?;
        state.serialize_field("secret_key", &redact(&self.secret_key))?;
        state.serialize_field("passphrase", &redact(&self.passphrase))?;
        state.serialize_field("subaccount", &self.subaccount)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: Option<String>,
            secret_key: Option<String>,
            passphrase: Option<String>,
            subaccount: Option<String>,
            base_url: Option<String>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: helper.api_key.map(Secret::new),
            secret_key: helper.secret_key.map(Secret::new),
            passphrase: helper.passphrase.map(Secret::new),
            subaccount: helper.subaccount,
            base_url: helper.base_url,
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Some(Secret::new(api_key)),
            secret_key: Some(Secret::new(secret_key)),
            ..Self::default()
        }
    }

    /// Configuration without credentials, for public endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables
    ///
    /// Reads, all optional:
    /// - `{EXCHANGE}_API_KEY`
    /// - `{EXCHANGE}_API_SECRET`
    /// - `{EXCHANGE}_PASSPHRASE`
    /// - `{EXCHANGE}_SUBACCOUNT`
    /// - `{EXCHANGE}_BASE_URL`
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let read = |suffix: &str| -> Result<Option<String>, ConfigError> {
            let name = format!("{}_{}", prefix, suffix);
            match env::var(&name) {
                Ok(value) if value.is_empty() => Ok(None),
                Ok(value) => Ok(Some(value)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(env::VarError::NotUnicode(_)) => {
                    Err(ConfigError::InvalidConfiguration(format!(
                        "Environment variable {} is not valid unicode",
                        name
                    )))
                }
            }
        };

        Ok(Self {
            api_key: read("API_KEY")?.map(Secret::new),
            secret_key: read("API_SECRET")?.map(Secret::new),
            passphrase: read("PASSPHRASE")?.map(Secret::new),
            subaccount: read("SUBACCOUNT")?,
            base_url: read("BASE_URL")?,
        })
    }

    /// Create configuration from a .env file (if present) and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // no file, fall back to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    #[must_use]
    pub fn passphrase(mut self, passphrase: String) -> Self {
        self.passphrase = Some(Secret::new(passphrase));
        self
    }

    #[must_use]
    pub fn subaccount(mut self, subaccount: String) -> Self {
        self.subaccount = Some(subaccount);
        self
    }

    /// Point every host of the adapter at a custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Check if this configuration has both a key and a secret
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.api_key().is_some_and(|k| !k.is_empty())
            && self.secret_key().is_some_and(|s| !s.is_empty())
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|s| s.expose_secret().as_str())
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_ref().map(|s| s.expose_secret().as_str())
    }

    pub fn passphrase_value(&self) -> Option<&str> {
        self.passphrase.as_ref().map(|s| s.expose_secret().as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_has_no_credentials() {
        let config = ExchangeConfig::read_only();
        assert!(!config.has_credentials());
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_serialize_redacts_secrets() {
        let config = ExchangeConfig::new("my key".to_string(), "my secret".to_string())
            .passphrase("phrase".to_string());
        let json = serde_json::to_string(&config).unwrap();

        assert!(!json.contains("my secret"));
        assert!(!json.contains("\"phrase\""));
        assert!(json.contains("[REDACTED]"));
        assert!(!format!("{:?}", config).contains("my secret"));
    }

    #[test]
    fn test_from_env_reads_optional_fields() {
        env::set_var("EXAPITEST_API_KEY", "key");
        env::set_var("EXAPITEST_API_SECRET", "secret");
        env::set_var("EXAPITEST_SUBACCOUNT", "sub one");

        let config = ExchangeConfig::from_env("exapitest").unwrap();
        assert!(config.has_credentials());
        assert_eq!(config.subaccount.as_deref(), Some("sub one"));
        assert!(config.passphrase.is_none());
        assert!(config.base_url.is_none());
    }
}
