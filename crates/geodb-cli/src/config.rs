use std::path::{Path, PathBuf};

use geodb::{DEFAULT_DATABASE_NAME, HookConfig, UrlTemplates};
use serde::{Deserialize, Serialize};

/// Environment variable holding the MaxMind license key.
pub const LICENSE_ENV: &str = "MAXMIND_LICENSE_KEY";

/// Environment variable overriding the install directory.
pub const INSTALL_DIR_ENV: &str = "GEOLITE_SYNC_DIR";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    pub license_key: Option<String>,
    pub install_dir: Option<PathBuf>,
    pub database: Option<String>,
    pub archive_url: Option<String>,
    pub hash_url: Option<String>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub license_key: Option<String>,
    pub install_dir: Option<PathBuf>,
}

impl Overrides {
    /// Command-line values, falling back to the environment.
    pub fn from_args_and_env(license_key: Option<String>, install_dir: Option<PathBuf>) -> Self {
        Self {
            license_key: license_key.or_else(|| non_empty_env(LICENSE_ENV)),
            install_dir: install_dir.or_else(|| non_empty_env(INSTALL_DIR_ENV).map(PathBuf::from)),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Config file path: `~/.config/geolite-sync/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("geolite-sync").join("config.toml"))
}

/// Default install directory: `~/.local/share/geolite-sync/data`
pub fn default_install_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("geolite-sync")
        .join("data")
}

/// Load config from `path` (or the default location), falling back to an
/// empty config if the file is missing or unparsable.
pub fn load_file_config(path: Option<&Path>) -> FileConfig {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
        return FileConfig::default();
    };
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return FileConfig::default();
    };

    match toml::from_str::<FileConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "warning: failed to parse config at {}, using defaults: {e}",
                path.display()
            );
            FileConfig::default()
        }
    }
}

/// Merge overrides, file values and built-in defaults, in that order.
pub fn resolve(file: FileConfig, overrides: Overrides) -> HookConfig {
    let defaults = UrlTemplates::default();

    HookConfig {
        license_key: overrides.license_key.or(file.license_key),
        install_dir: overrides
            .install_dir
            .or(file.install_dir)
            .unwrap_or_else(default_install_dir),
        database_name: file
            .database
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_owned()),
        templates: UrlTemplates {
            archive: file.archive_url.unwrap_or(defaults.archive),
            hash: file.hash_url.unwrap_or(defaults.hash),
        },
    }
}
