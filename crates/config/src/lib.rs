//! Rule options for flaglint.
//!
//! The option-flags rule takes a single options object:
//!
//! ```json
//! { "order": "long", "method": "option" }
//! ```
//!
//! Both keys are optional. Unknown keys are rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Method name treated as a flag declaration when none is configured.
pub const DEFAULT_METHOD: &str = "option";

/// Errors that can occur when loading or validating rule options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON deserialization failed (syntax error, unknown key, bad enum value).
    #[error("invalid config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is not acceptable.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Which flag kind supplies the sort key when both are declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Prefer the short flag (`-p` sorts as `p`).
    Short,
    /// Prefer the long flag (`--port` sorts as `port`).
    #[default]
    Long,
}

impl SortOrder {
    /// The lowercase name used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Short => "short",
            SortOrder::Long => "long",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(SortOrder::Short),
            "long" => Ok(SortOrder::Long),
            other => Err(ConfigError::InvalidField {
                field: "order".into(),
                reason: format!("expected \"short\" or \"long\", got {other:?}"),
            }),
        }
    }
}

/// Options for the option-flags rule.
///
/// # Example
/// ```
/// use flaglint_config::{RuleConfig, SortOrder};
///
/// let config = RuleConfig {
///     order: SortOrder::Short,
///     ..Default::default()
/// };
/// assert_eq!(config.method, "option");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RuleConfig {
    /// Sort key preference for the chain-order check.
    pub order: SortOrder,
    /// Name of the builder method whose first argument is a flag specifier.
    pub method: String,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            order: SortOrder::default(),
            method: DEFAULT_METHOD.to_string(),
        }
    }
}

impl RuleConfig {
    /// Check invariants that serde cannot express.
    ///
    /// `method` must be a plain identifier: it is matched against the
    /// property name of member calls, never against computed members.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.method.is_empty() {
            return Err(ConfigError::InvalidField {
                field: "method".into(),
                reason: "must not be empty".into(),
            });
        }
        if !is_identifier(&self.method) {
            return Err(ConfigError::InvalidField {
                field: "method".into(),
                reason: format!("{:?} is not a valid identifier", self.method),
            });
        }
        Ok(())
    }
}

/// Load and validate a [`RuleConfig`] from a JSON string.
pub fn load_config_from_str(s: &str) -> Result<RuleConfig, ConfigError> {
    let config: RuleConfig = serde_json::from_str(s)?;
    config.validate()?;
    Ok(config)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config, RuleConfig::default());
        assert_eq!(config.order, SortOrder::Long);
        assert_eq!(config.method, "option");
    }

    #[test]
    fn order_short_is_accepted() {
        let config = load_config_from_str(r#"{"order":"short"}"#).unwrap();
        assert_eq!(config.order, SortOrder::Short);
    }

    #[test]
    fn custom_method_is_accepted() {
        let config = load_config_from_str(r#"{"method":"requiredOption"}"#).unwrap();
        assert_eq!(config.method, "requiredOption");
    }

    #[test]
    fn unknown_order_is_rejected() {
        let err = load_config_from_str(r#"{"order":"alphabetical"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)), "{err}");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = load_config_from_str(r#"{"order":"long","extra":true}"#).unwrap_err();
        assert!(err.to_string().contains("extra"), "{err}");
    }

    #[test]
    fn empty_method_is_rejected() {
        let err = load_config_from_str(r#"{"method":""}"#).unwrap_err();
        match err {
            ConfigError::InvalidField { field, .. } => assert_eq!(field, "method"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_identifier_method_is_rejected() {
        for bad in ["1option", "opt-ion", "opt ion", "a.b"] {
            let json = format!(r#"{{"method":"{bad}"}}"#);
            assert!(load_config_from_str(&json).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            load_config_from_str("{order:"),
            Err(ConfigError::InvalidJson(_))
        ));
    }

    #[test]
    fn sort_order_from_str_round_trips() {
        for order in [SortOrder::Short, SortOrder::Long] {
            assert_eq!(order.as_str().parse::<SortOrder>().unwrap(), order);
            assert_eq!(order.to_string(), order.as_str());
        }
        assert!("medium".parse::<SortOrder>().is_err());
    }

    #[test]
    fn config_serializes_lowercase_order() {
        let json = serde_json::to_string(&RuleConfig::default()).unwrap();
        assert_eq!(json, r#"{"order":"long","method":"option"}"#);
    }
}
