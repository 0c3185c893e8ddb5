//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Strings without `${` are returned unchanged, so a bare `$` in a path or
/// URL is left alone. An unset variable without a default is an error
/// naming `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Unset variable encountered during expansion.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_output_dir() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("APIDOC_TEST_TARGET", "build");
        }
        let result = expand_env("${APIDOC_TEST_TARGET}/api-docs", "output.dir").unwrap();
        assert_eq!(result, "build/api-docs");
        unsafe {
            std::env::remove_var("APIDOC_TEST_TARGET");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("APIDOC_TEST_UNSET_HOST");
        }
        let result = expand_env(
            "http://${APIDOC_TEST_UNSET_HOST:-localhost:8080}",
            "trace.base_url",
        )
        .unwrap();
        assert_eq!(result, "http://localhost:8080");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("APIDOC_TEST_MISSING");
        }
        let err = expand_env("${APIDOC_TEST_MISSING}", "output.templates_dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("APIDOC_TEST_MISSING"));
        assert!(err.to_string().contains("output.templates_dir"));
    }

    #[test]
    fn test_bare_dollar_left_alone() {
        let result = expand_env("docs/$generated", "output.dir").unwrap();
        assert_eq!(result, "docs/$generated");
    }
}
