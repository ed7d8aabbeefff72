//! Section-toggle config file discovery, loading and saving.
//!
//! Resolution order: `--config` path → `PF2E_SHEET_CONFIG` → `./output/config.json`
//! → built-in defaults (every section on).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sheet_core::core_api::{CoreError, CoreErrorCode};
use sheet_core::sections::SectionConfig;
use tracing::{debug, info};

pub const ENV_CONFIG_PATH: &str = "PF2E_SHEET_CONFIG";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
const CONFIG_FILENAME: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument,
    Environment,
    DefaultPath,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::DefaultPath => write!(f, "default path"),
        }
    }
}

/// The file toggles are read from and, with `--save-config`, written back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub source: ConfigSource,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    sections: SectionConfig,
}

pub fn resolve_config_path(cli_path: Option<&Path>) -> ConfigLocation {
    if let Some(path) = cli_path {
        return ConfigLocation {
            path: path.to_path_buf(),
            source: ConfigSource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH)
        && !env_path.trim().is_empty()
    {
        return ConfigLocation {
            path: PathBuf::from(env_path),
            source: ConfigSource::Environment,
        };
    }

    ConfigLocation {
        path: Path::new(DEFAULT_OUTPUT_DIR).join(CONFIG_FILENAME),
        source: ConfigSource::DefaultPath,
    }
}

/// Missing files yield the defaults; unreadable or malformed ones are errors.
pub fn load_sections(location: &ConfigLocation) -> Result<SectionConfig, CoreError> {
    if !location.path.exists() {
        debug!(
            path = %location.path.display(),
            source = %location.source,
            "no config file, using default sections"
        );
        return Ok(SectionConfig::default());
    }

    let bytes = fs::read(&location.path).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Io,
            format!("failed to read config {}: {e}", location.path.display()),
        )
    })?;
    let file: ConfigFile = serde_json::from_slice(&bytes).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Parse,
            format!("invalid config {}: {e}", location.path.display()),
        )
    })?;
    info!(
        path = %location.path.display(),
        source = %location.source,
        "loaded section config"
    );
    Ok(file.sections)
}

pub fn save_sections(path: &Path, sections: &SectionConfig) -> Result<(), CoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to create {}: {e}", parent.display()),
            )
        })?;
    }

    let file = ConfigFile {
        sections: *sections,
    };
    let rendered = serde_json::to_string_pretty(&file)
        .map_err(|e| CoreError::new(CoreErrorCode::Parse, e.to_string()))?;
    fs::write(path, format!("{rendered}\n")).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Io,
            format!("failed to write config {}: {e}", path.display()),
        )
    })?;
    info!(path = %path.display(), "saved section config");
    Ok(())
}
