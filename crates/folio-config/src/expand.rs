//! `${VAR}` expansion in configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// An unset variable without a default is an error naming `field`. Bare
/// `$VAR` is left alone so that literal dollar signs survive.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, lookup)
        .map(|expanded| expanded.into_owned())
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.var_name),
        })
}

/// Expand an optional string in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        *value = Some(expand_env(raw, field)?);
    }
    Ok(())
}

fn lookup(var: &str) -> Result<Option<String>, Unset> {
    std::env::var(var).map(Some).map_err(|_| Unset)
}

/// Marker for a variable with no value and no default.
#[derive(Debug)]
struct Unset;

impl std::fmt::Display for Unset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("not set")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("FOLIO_EXPAND_SET", "example.com");
        }
        assert_eq!(
            expand_env("https://${FOLIO_EXPAND_SET}/kroki", "diagrams.kroki_url").unwrap(),
            "https://example.com/kroki"
        );
        unsafe {
            std::env::remove_var("FOLIO_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("FOLIO_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${FOLIO_EXPAND_UNSET:-0.0.0.0}", "server.host").unwrap(),
            "0.0.0.0"
        );
    }

    #[test]
    fn test_expand_missing_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("FOLIO_EXPAND_MISSING");
        }
        let err = expand_env("${FOLIO_EXPAND_MISSING}", "server.host").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Environment variable error in server.host: ${FOLIO_EXPAND_MISSING} not set"
        );
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        assert_eq!(expand_env("costs $5", "site.footer").unwrap(), "costs $5");
    }

    #[test]
    fn test_expand_opt_none() {
        let mut value = None;
        expand_opt(&mut value, "site.footer").unwrap();
        assert_eq!(value, None);
    }
}
