//! Configuration file loading.
//!
//! The file is optional and every key in it is optional. Problems are
//! collected as warnings and the defaults are used instead.

use directories::ProjectDirs;
use minisheet_core::{Limits, SheetConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 65_536; // 64 KiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    limits: Option<Limits>,
    sheet: Option<SheetSection>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SheetSection {
    rows: usize,
    cols: usize,
    history: usize,
    decimals: usize,
}

impl Default for SheetSection {
    fn default() -> Self {
        let defaults = SheetConfig::default();
        SheetSection {
            rows: defaults.rows,
            cols: defaults.cols,
            history: defaults.history,
            decimals: defaults.decimals,
        }
    }
}

impl From<ConfigFile> for SheetConfig {
    fn from(file: ConfigFile) -> Self {
        let sheet = file.sheet.unwrap_or_default();
        SheetConfig {
            limits: file.limits.unwrap_or_default(),
            rows: sheet.rows,
            cols: sheet.cols,
            history: sheet.history,
            decimals: sheet.decimals,
        }
    }
}

/// Default location: `<config dir>/minisheet/config.toml`.
fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "minisheet").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load settings from `explicit` or the user config file.
///
/// Returns the settings plus any warnings to show the user.
pub fn load_config(explicit: Option<&Path>) -> (SheetConfig, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = explicit
        .map(Path::to_path_buf)
        .or_else(user_config_path)
    else {
        return (SheetConfig::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (SheetConfig::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match parse_config(&content) {
                Ok(config) => Some(config),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    if let Some(config) = &config {
        tracing::debug!(path = %path.display(), ?config, "loaded config");
    }
    (config.unwrap_or_default(), warnings)
}

fn parse_config(content: &str) -> Result<SheetConfig, toml::de::Error> {
    toml::from_str::<ConfigFile>(content).map(SheetConfig::from)
}
