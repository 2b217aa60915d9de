//! Environment variable handling for calbridge.
//!
//! Configuration values can be overridden with `CALBRIDGE__SECTION__KEY`
//! variables, secrets marked `secret_from_env` are looked up as
//! `CALBRIDGE_SECRET_SECTION_KEY` (falling back to `SECTION_KEY`), and the
//! Google OAuth client settings also honour the conventional `GOOGLE_*`
//! variable names.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "CALBRIDGE";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "CALBRIDGE_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// The marker string replaced by an environment variable at load time
pub const SECRET_MARKER: &str = "secret_from_env";

/// Well-known Google variables for each `gcal` field, in lookup order.
pub const GOOGLE_ENV_FALLBACKS: &[(&str, &[&str])] = &[
    ("client_id", &["GOOGLE_CLIENT_ID", "CLIENT_ID"]),
    ("client_secret", &["GOOGLE_CLIENT_SECRET", "CLIENT_SECRET"]),
    ("redirect_uri", &["GOOGLE_REDIRECT_URI"]),
    ("refresh_token", &["GOOGLE_REFRESH_TOKEN"]),
    ("calendar_id", &["GOOGLE_CALENDAR_ID"]),
];

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"server.host"` becomes `"CALBRIDGE__SERVER__HOST"`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `"gcal.client_secret"` becomes `"CALBRIDGE_SECRET_GCAL_CLIENT_SECRET"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to the short, unprefixed variable name
///
/// `"gcal.client_secret"` becomes `"GCAL_CLIENT_SECRET"`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Get an environment variable for a configuration path
pub fn get_config_env_var(path: &str) -> Option<String> {
    let env_var = config_path_to_env_var(path);
    env::var(&env_var).ok()
}

/// Get an environment variable for a secret path
///
/// Tries the prefixed name first, then the short name.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    let env_var = secret_path_to_env_var(path);
    if let Ok(value) = env::var(&env_var) {
        return Some(value);
    }

    let legacy_env_var = legacy_secret_path_to_env_var(path);
    env::var(&legacy_env_var).ok()
}

/// Check if a path is a secret path
///
/// Paths containing "secret", "key", "password" or "token" are secrets.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

/// Get an environment variable for a path, as secret or as plain config.
pub fn get_env_var(path: &str) -> Option<String> {
    if is_secret_path(path) {
        get_secret_env_var(path)
    } else {
        get_config_env_var(path)
    }
}

/// Look up the first non-empty well-known Google variable for a `gcal` field.
pub fn google_env_var(field: &str) -> Option<String> {
    GOOGLE_ENV_FALLBACKS
        .iter()
        .find(|(name, _)| *name == field)
        .and_then(|(_, vars)| {
            vars.iter()
                .filter_map(|var| env::var(var).ok())
                .find(|value| !value.is_empty())
        })
}

/// Inject environment variables into a JSON value
///
/// Recursively replaces `secret_from_env` strings with values from the
/// environment. Markers with no matching variable are replaced by `null`
/// so optional fields deserialize as missing instead of as the marker.
///
/// Returns `true` if any values were replaced.
pub fn inject_env_vars(value: &mut serde_json::Value) -> bool {
    use serde_json::Value;

    fn walk(path: Vec<String>, obj: &mut Value) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                if let Some(env_val) = get_env_var(&path_str) {
                    *obj = Value::String(env_val);
                    replaced = true;
                } else {
                    tracing::warn!("env var for {} not found", path_str);
                    *obj = Value::Null;
                }
            }
            _ => {}
        }

        replaced
    }

    walk(vec![], value)
}
