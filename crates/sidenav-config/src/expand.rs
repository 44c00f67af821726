//! Environment variable expansion for configuration strings.
//!
//! - `${VAR}` expands to the value of VAR and fails if it is unset
//! - `${VAR:-default}` falls back to `default` when VAR is unset

use crate::ConfigError;

/// Expand `${VAR}` references in `value`.
///
/// Strings without `${` are returned unchanged, so bare `$` characters in
/// URLs survive.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that could not be resolved.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SIDENAV_TEST_HOST", "docs.example.com");
        }
        let result = expand_env("https://${SIDENAV_TEST_HOST}/", "site.url").unwrap();
        assert_eq!(result, "https://docs.example.com/");
        unsafe {
            std::env::remove_var("SIDENAV_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SIDENAV_TEST_UNSET_URL");
        }
        let result =
            expand_env("${SIDENAV_TEST_UNSET_URL:-https://example.com}", "site.url").unwrap();
        assert_eq!(result, "https://example.com");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SIDENAV_TEST_MISSING");
        }
        let err = expand_env("${SIDENAV_TEST_MISSING}", "site.base_url").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("SIDENAV_TEST_MISSING"));
        assert!(err.to_string().contains("site.base_url"));
    }

    #[test]
    fn test_literal_and_bare_dollar_unchanged() {
        assert_eq!(expand_env("/docs/", "site.base_url").unwrap(), "/docs/");
        assert_eq!(
            expand_env("https://example.com/$path", "site.url").unwrap(),
            "https://example.com/$path"
        );
    }
}
