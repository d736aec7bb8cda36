//! Shared configuration primitives: runtime environment detection, the
//! `FromEnv` loading trait and small env-var helpers, plus tracing setup.

pub mod tracing;

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Runtime environment, selected through `APP_ENV`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Anything other than `production` (any case) is development.
    pub fn from_env() -> Self {
        let app_env = env_or_default("APP_ENV", "development");

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Value of `key`, or `default` when unset
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Value of `key`, or `ConfigError::MissingEnvVar`
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// First set variable among `keys`; the error names all of them
pub fn env_required_any(keys: &[&str]) -> Result<String, ConfigError> {
    keys.iter()
        .find_map(|key| env::var(key).ok())
        .ok_or_else(|| ConfigError::MissingEnvVar(keys.join(" or ")))
}

/// Parse `key` into `T`, falling back to `default` when unset
pub fn env_parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
        });
    }

    #[test]
    fn test_environment_production_any_case() {
        for value in ["production", "PRODUCTION", "Production"] {
            temp_env::with_var("APP_ENV", Some(value), || {
                assert!(Environment::from_env().is_production());
            });
        }
    }

    #[test]
    fn test_env_required_missing_names_key() {
        temp_env::with_var_unset("RECIPES_MISSING_REQUIRED", || {
            let err = env_required("RECIPES_MISSING_REQUIRED").unwrap_err();
            assert!(err.to_string().contains("RECIPES_MISSING_REQUIRED"));
        });
    }

    #[test]
    fn test_env_required_any_prefers_first_set_key() {
        temp_env::with_vars(
            [("RECIPES_PRIMARY", None::<&str>), ("RECIPES_FALLBACK", Some("fallback"))],
            || {
                let value = env_required_any(&["RECIPES_PRIMARY", "RECIPES_FALLBACK"]);
                assert_eq!(value, Ok("fallback".to_string()));
            },
        );
    }

    #[test]
    fn test_env_required_any_lists_all_keys_when_missing() {
        temp_env::with_vars_unset(["RECIPES_A", "RECIPES_B"], || {
            let err = env_required_any(&["RECIPES_A", "RECIPES_B"]).unwrap_err();
            assert_eq!(err, ConfigError::MissingEnvVar("RECIPES_A or RECIPES_B".into()));
        });
    }

    #[test]
    fn test_env_parse_or_default_and_value() {
        temp_env::with_var_unset("RECIPES_POOL", || {
            assert_eq!(env_parse_or("RECIPES_POOL", 7u32), Ok(7));
        });
        temp_env::with_var("RECIPES_POOL", Some(" 42 "), || {
            assert_eq!(env_parse_or("RECIPES_POOL", 7u32), Ok(42));
        });
    }

    #[test]
    fn test_env_parse_or_reports_key_on_bad_value() {
        temp_env::with_var("RECIPES_POOL", Some("many"), || {
            let err = env_parse_or("RECIPES_POOL", 7u32).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "RECIPES_POOL"));
        });
    }
}
