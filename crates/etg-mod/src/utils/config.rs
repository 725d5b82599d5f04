//! Locating and loading the overlay configuration.

use crate::errors::CliError;
use camino::{Utf8Path, Utf8PathBuf};
use etg_assets::AssetsConfig;
use std::env;

pub const CONFIG_FILE_NAME: &str = "etg-mod.toml";

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// Returns the default configuration file path (etg-mod.toml next to the executable).
pub fn default_config_path() -> Option<Utf8PathBuf> {
    install_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// The configuration in effect and the file it came from.
pub struct EffectiveConfig {
    pub config: AssetsConfig,
    /// `None` when the defaults are used.
    pub path: Option<Utf8PathBuf>,
}

/// Load the configuration from `explicit`, or from the default location.
///
/// An explicitly passed file must exist. A missing default file means defaults.
pub fn load_config(explicit: Option<&Utf8Path>) -> Result<EffectiveConfig, CliError> {
    if let Some(path) = explicit {
        let config = AssetsConfig::load(path)
            .map_err(|source| CliError::ConfigParseError { source })?
            .ok_or_else(|| CliError::ConfigNotFound {
                path: path.to_path_buf(),
            })?;
        return Ok(EffectiveConfig {
            config,
            path: Some(path.to_path_buf()),
        });
    }

    if let Some(path) = default_config_path() {
        if let Some(config) =
            AssetsConfig::load(&path).map_err(|source| CliError::ConfigParseError { source })?
        {
            tracing::debug!("Loaded configuration from {}", path);
            return Ok(EffectiveConfig {
                config,
                path: Some(path),
            });
        }
    }

    Ok(EffectiveConfig {
        config: AssetsConfig::default(),
        path: None,
    })
}
