use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use poplingo_config::Config;
use poplingo_config::gemini::api_key_from_env;

const SETTINGS_FILE: &str = "settings.json";

/// `explicit`, or `settings.json` in the platform config dir
pub fn settings_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| poplingo_config::storage::config_dir().join(SETTINGS_FILE))
}

/// Write a default settings file on first run.
///
/// The API key is never written; it stays in the environment.
pub fn init_user_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut defaults = Config::new();
    defaults.gemini.api_key.clear();

    fs::write(path, serde_json::to_string_pretty(&defaults)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created default settings at {}", path.display());

    Ok(())
}

/// Load settings from `path`, falling back to the environment when absent.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::warn!("{} not found, using environment defaults", path.display());
        return Ok(Config::new());
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut config: Config = serde_json::from_str(&data)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    if !config.gemini.has_api_key() {
        config.gemini.api_key = api_key_from_env().unwrap_or_default();
    }

    tracing::info!("Loaded settings from {}", path.display());
    Ok(config)
}
