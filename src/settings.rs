use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub generator_base_url: Url,
    /// Base URL of the document store. When unset, the cloud endpoints
    /// short-circuit with a 503 instead of failing.
    pub store_base_url: Option<Url>,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix. No separator:
            // APP_STORE_BASE_URL must map onto the flat store_base_url key.
            .add_source(Environment::with_prefix("APP"))
            .set_default(
                "generator_base_url",
                "https://generativelanguage.googleapis.com",
            )?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, 8080);
        assert!(!settings.debug);
        assert!(settings.enable_swagger);
        assert!(settings.store_base_url.is_none());
        assert_eq!(
            settings.generator_base_url.as_str(),
            "https://generativelanguage.googleapis.com/"
        );
    }

    #[test]
    #[serial]
    fn test_env_override() {
        unsafe {
            std::env::set_var("APP_PORT", "9090");
            std::env::set_var("APP_DEBUG", "true");
        }
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, 9090);
        assert!(settings.debug);
        unsafe {
            std::env::remove_var("APP_PORT");
            std::env::remove_var("APP_DEBUG");
        }
    }

    #[test]
    #[serial]
    fn test_multi_word_env_overrides() {
        unsafe {
            std::env::set_var("APP_STORE_BASE_URL", "https://store.example.com");
            std::env::set_var("APP_ENABLE_SWAGGER", "false");
        }
        let settings = Settings::from_env().unwrap();
        assert_eq!(
            settings.store_base_url.as_ref().map(Url::as_str),
            Some("https://store.example.com/")
        );
        assert!(!settings.enable_swagger);
        unsafe {
            std::env::remove_var("APP_STORE_BASE_URL");
            std::env::remove_var("APP_ENABLE_SWAGGER");
        }
    }
}
