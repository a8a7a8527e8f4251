//! Load configuration from XDG `config.toml` and project `.env`, apply it to the process
//! environment with priority **existing env > .env > XDG**, then read the typed
//! [`AppConfig`] once at startup.

mod dotenv_file;
mod settings;
mod xdg_toml;

pub use settings::{AppConfig, ConfigError};

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(String),
}

/// Loads `$XDG_CONFIG_HOME/<app_name>/config.toml` (`[env]` table) and the project `.env`,
/// then sets only the variables that are **not** already set.
///
/// * `app_name`: e.g. `"carscout"`.
/// * `override_dir`: look for `.env` here instead of the current directory.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    apply_sources(
        xdg_toml::config_path(app_name).as_deref(),
        override_dir,
    )
}

fn apply_sources(xdg_file: Option<&Path>, dotenv_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = match xdg_file {
        Some(path) => xdg_toml::load_env_map(path)?,
        None => Default::default(),
    };
    let dotenv_map = dotenv_file::load_env_map(dotenv_dir)?;

    let keys: HashSet<&String> = xdg_map.keys().chain(dotenv_map.keys()).collect();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(value) = dotenv_map.get(key).or_else(|| xdg_map.get(key)) {
            std::env::set_var(key, value);
        }
    }
    Ok(())
}
