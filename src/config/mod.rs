mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (~/.config/intro-score/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("intro-score"))
}

/// Get the default config file path (~/.config/intro-score/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to an empty config when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path()?, false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    debug!(path = %config_path.display(), ?config, "loaded config");
    Ok(expand_paths(config))
}

/// Expand a leading `~/` in configured paths.
fn expand_paths(config: Config) -> Config {
    Config {
        rubric: config.rubric.map(|p| expand_home(&p)),
        model_dir: config.model_dir.map(|p| expand_home(&p)),
        sample_transcript: config.sample_transcript.map(|p| expand_home(&p)),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
