//! Configuration loading for calbridge.
//!
//! Sources, lowest precedence first: `config/default.*`, `config/{RUN_ENV}.*`,
//! `CALBRIDGE__*` environment variables. After that `secret_from_env`
//! markers are resolved and the conventional `GOOGLE_*` variables fill any
//! Google client setting that is still missing.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::Path;
use tracing::debug;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads the application configuration from `CONFIG_DIR` (default `config`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    load_config_from(Path::new(&config_dir))
}

/// Loads the application configuration from an explicit directory.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    debug!("config default_path: {}", default_path.display());
    debug!("config env_path: {}", env_path.display());

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator(env_vars::CONFIG_SEPARATOR));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let config = apply_env_overrides_from_marker(raw_config)?;
    Ok(apply_google_env_fallbacks(config))
}

/// Replaces all `secret_from_env` string values with environment variable values.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    env_vars::inject_env_vars(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

/// Fills missing Google client settings from the `GOOGLE_*` variables.
///
/// Values already present in the config always win. A `gcal` section is
/// created when at least one variable is set and the config has none.
pub fn apply_google_env_fallbacks(mut config: AppConfig) -> AppConfig {
    let resolved: Vec<(&str, String)> = env_vars::GOOGLE_ENV_FALLBACKS
        .iter()
        .filter_map(|(field, _)| env_vars::google_env_var(field).map(|value| (*field, value)))
        .collect();

    if resolved.is_empty() {
        return config;
    }

    let gcal = config.gcal.get_or_insert_with(GcalConfig::default);
    for (field, value) in resolved {
        let slot = match field {
            "client_id" => &mut gcal.client_id,
            "client_secret" => &mut gcal.client_secret,
            "redirect_uri" => &mut gcal.redirect_uri,
            "refresh_token" => &mut gcal.refresh_token,
            "calendar_id" => &mut gcal.calendar_id,
            _ => continue,
        };
        if slot.as_deref().map_or(true, str::is_empty) {
            *slot = Some(value);
        }
    }
    config
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is `DOTENV_OVERRIDE` if set, else the first command line
/// argument when it starts with `.env`, else `.env`. Loading happens once
/// per process; a missing file is not an error.
///
/// Returns the path that was (or would have been) loaded.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
