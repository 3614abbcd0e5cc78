//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use chrono::FixedOffset;

use crate::aggregate::CardType;
use crate::domain::SystemClock;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (development, production)
    pub environment: String,

    /// Card type used when a request does not name one
    pub default_card_type: CardType,

    /// Business calendar offset; daily and monthly limits reset at its midnight
    pub business_offset: FixedOffset,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let default_card_type = lookup("DEFAULT_CARD_TYPE")
            .unwrap_or_else(|| CardType::Debit.code().to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DEFAULT_CARD_TYPE"))?;

        // production must name its business calendar explicitly
        let raw_offset = match lookup("BUSINESS_UTC_OFFSET_HOURS") {
            Some(value) => value,
            None if environment == "production" => {
                return Err(ConfigError::MissingEnv("BUSINESS_UTC_OFFSET_HOURS"))
            }
            None => "9".to_string(),
        };
        let offset_hours: i32 = raw_offset
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BUSINESS_UTC_OFFSET_HOURS"))?;

        let business_offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidValue("BUSINESS_UTC_OFFSET_HOURS"))?;

        Ok(Self {
            environment,
            default_card_type,
            business_offset,
        })
    }

    /// Wall clock on the business calendar
    pub fn clock(&self) -> SystemClock {
        SystemClock::new(self.business_offset)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Clock;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert_eq!(config.default_card_type, CardType::Debit);
        assert_eq!(config.business_offset.local_minus_utc(), 9 * 3600);
        assert_eq!(config.clock().offset(), config.business_offset);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ENVIRONMENT", "staging"),
            ("DEFAULT_CARD_TYPE", "PRE"),
            ("BUSINESS_UTC_OFFSET_HOURS", "-5"),
        ])
        .unwrap();

        assert!(!config.is_production());
        assert_eq!(config.default_card_type, CardType::Prepaid);
        assert_eq!(config.business_offset.local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_production_requires_offset() {
        assert!(matches!(
            load(&[("ENVIRONMENT", "production")]),
            Err(ConfigError::MissingEnv("BUSINESS_UTC_OFFSET_HOURS"))
        ));

        let config = load(&[
            ("ENVIRONMENT", "production"),
            ("BUSINESS_UTC_OFFSET_HOURS", "0"),
        ])
        .unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("DEFAULT_CARD_TYPE", "GOLD")]),
            Err(ConfigError::InvalidValue("DEFAULT_CARD_TYPE"))
        ));
        assert!(matches!(
            load(&[("BUSINESS_UTC_OFFSET_HOURS", "nine")]),
            Err(ConfigError::InvalidValue("BUSINESS_UTC_OFFSET_HOURS"))
        ));
        assert!(matches!(
            load(&[("BUSINESS_UTC_OFFSET_HOURS", "30")]),
            Err(ConfigError::InvalidValue("BUSINESS_UTC_OFFSET_HOURS"))
        ));
    }
}
