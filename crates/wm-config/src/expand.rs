//! `${VAR}` references in the site's base URL.
//!
//! Lets one `wm.toml` build for several hosts, e.g.
//! `html_base_url = "${SITE_URL:-http://localhost:8000/}"`.

use std::env::VarError;

use shellexpand::LookupError;

use crate::ConfigError;

/// Substitute environment variables in `value`.
///
/// `${VAR:-default}` falls back to `default`; a bare `${VAR}` must be set.
/// Values without `${` are returned as-is, so a `$` in a URL path survives.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let expanded = shellexpand::env_with_context(value, lookup)
        .map_err(|e| unresolved(field, &e))?;
    Ok(expanded.into_owned())
}

fn lookup(var: &str) -> Result<Option<String>, VarError> {
    std::env::var(var).map(Some)
}

fn unresolved(field: &str, err: &LookupError<VarError>) -> ConfigError {
    ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}}: {}", err.var_name, err.cause),
    }
}
