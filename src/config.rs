//! Transport configuration.
//!
//! Defaults match what the plain transport functions assume. Environment
//! overrides are read by [`TransportConfig::from_env`]:
//!
//! - `EFFECTKIT_ISOLATION_LEVEL`: `read_uncommitted`, `read_committed`,
//!   `repeatable_read`, `serializable` or `snapshot`
//! - `EFFECTKIT_JSON_CONTENT_TYPE`: content type sent with JSON requests
//! - `EFFECTKIT_BEGIN_IF_MISSING`: `true`/`false` (also `1`/`0`,
//!   `yes`/`no`)

use std::str::FromStr;

use thiserror::Error;

use crate::transport::IsolationLevel;

/// Environment variable overriding [`TransportConfig::isolation_level`].
pub const ISOLATION_LEVEL_VAR: &str = "EFFECTKIT_ISOLATION_LEVEL";
/// Environment variable overriding [`TransportConfig::json_content_type`].
pub const JSON_CONTENT_TYPE_VAR: &str = "EFFECTKIT_JSON_CONTENT_TYPE";
/// Environment variable overriding [`TransportConfig::begin_if_missing`].
pub const BEGIN_IF_MISSING_VAR: &str = "EFFECTKIT_BEGIN_IF_MISSING";

/// Errors raised while reading configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// The variable name.
        key: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// Settings shared by the transport adapters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Isolation level for transactions begun on demand.
    pub isolation_level: IsolationLevel,
    /// Content type of JSON requests and the `Accept` header.
    pub json_content_type: String,
    /// Whether a database step may begin a transaction when none is active.
    pub begin_if_missing: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            isolation_level: IsolationLevel::ReadCommitted,
            json_content_type: "application/json".to_string(),
            begin_if_missing: true,
        }
    }
}

impl TransportConfig {
    /// Loads the defaults, overridden by any variables set in the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`TransportConfig::from_env`], reading variables through
    /// `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a value that does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let isolation_level = lookup(ISOLATION_LEVEL_VAR)
            .map(|value| value.parse().map_err(|message| invalid(ISOLATION_LEVEL_VAR, message)))
            .transpose()?
            .unwrap_or(defaults.isolation_level);

        let json_content_type = match lookup(JSON_CONTENT_TYPE_VAR) {
            Some(value) if value.trim().is_empty() => {
                return Err(invalid(JSON_CONTENT_TYPE_VAR, "must not be blank".to_string()));
            }
            Some(value) => value.trim().to_string(),
            None => defaults.json_content_type,
        };

        let begin_if_missing = lookup(BEGIN_IF_MISSING_VAR)
            .map(|value| parse_flag(&value).ok_or_else(|| invalid(BEGIN_IF_MISSING_VAR, format!("expected a boolean, got {value:?}"))))
            .transpose()?
            .unwrap_or(defaults.begin_if_missing);

        Ok(Self {
            isolation_level,
            json_content_type,
            begin_if_missing,
        })
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

impl FromStr for IsolationLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|character| !matches!(character, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "readuncommitted" => Ok(Self::ReadUncommitted),
            "readcommitted" => Ok(Self::ReadCommitted),
            "repeatableread" => Ok(Self::RepeatableRead),
            "serializable" => Ok(Self::Serializable),
            "snapshot" => Ok(Self::Snapshot),
            _ => Err(format!("unknown isolation level {value:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[rstest]
    fn defaults_without_variables() {
        let config = TransportConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, TransportConfig::default());
        assert!(config.begin_if_missing);
        assert_eq!(config.json_content_type, "application/json");
    }

    #[rstest]
    fn variables_override_defaults() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            (ISOLATION_LEVEL_VAR, "serializable"),
            (JSON_CONTENT_TYPE_VAR, "application/vnd.api+json"),
            (BEGIN_IF_MISSING_VAR, "no"),
        ]))
        .unwrap();
        assert_eq!(config.isolation_level, IsolationLevel::Serializable);
        assert_eq!(config.json_content_type, "application/vnd.api+json");
        assert!(!config.begin_if_missing);
    }

    #[rstest]
    #[case("read_committed", IsolationLevel::ReadCommitted)]
    #[case("RepeatableRead", IsolationLevel::RepeatableRead)]
    #[case("read-uncommitted", IsolationLevel::ReadUncommitted)]
    #[case(" Snapshot ", IsolationLevel::Snapshot)]
    fn isolation_levels_parse(#[case] input: &str, #[case] expected: IsolationLevel) {
        assert_eq!(input.parse::<IsolationLevel>(), Ok(expected));
    }

    #[rstest]
    #[case(ISOLATION_LEVEL_VAR, "chaos")]
    #[case(BEGIN_IF_MISSING_VAR, "maybe")]
    #[case(JSON_CONTENT_TYPE_VAR, "  ")]
    fn invalid_values_are_reported(#[case] key: &str, #[case] value: &str) {
        let error = TransportConfig::from_lookup(lookup_from(&[(key, value)])).unwrap_err();
        let ConfigError::InvalidValue { key: reported, .. } = &error;
        assert_eq!(reported, key);
        assert!(error.to_string().starts_with(&format!("invalid value for {key}")));
    }
}
