//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a configuration value.
///
/// # Errors
///
/// Returns [`ConfigError::EnvVar`] naming `field` when a referenced variable
/// is unset and has no default.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_unchanged() {
        assert_eq!(expand_env("127.0.0.1", "server.host").unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_default_used_when_unset() {
        let value = expand_env("${PUBSITE_TEST_SURELY_UNSET:-fallback}", "server.host").unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_unset_without_default_fails() {
        let err = expand_env("${PUBSITE_TEST_SURELY_UNSET}", "database.url").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("database.url"));
        assert!(msg.contains("PUBSITE_TEST_SURELY_UNSET"));
    }
}
