use std::{fs, path::PathBuf};

use common::prelude::Principal;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "delphi";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEY_FILE_NAME: &str = "key.pem";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the delphi directory (~/.delphi)
    pub delphi_dir: PathBuf,
    /// Path to the private key PEM file
    pub key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the delphi directory path (custom or default ~/.delphi)
    pub fn delphi_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new delphi state directory with a fresh principal
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let delphi_dir = Self::delphi_dir(custom_path)?;

        if delphi_dir.join(KEY_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&delphi_dir)?;

        let principal =
            Principal::generate(&mut OsRng).map_err(|e| StateError::InvalidKey(e.to_string()))?;
        let key_path = delphi_dir.join(KEY_FILE_NAME);
        fs::write(&key_path, principal.to_pem())?;
        restrict_permissions(&key_path)?;

        let config = config.unwrap_or_default();
        let config_path = delphi_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        tracing::info!(dir = %delphi_dir.display(), nick = %principal.nickname(), "initialized");

        Ok(Self {
            delphi_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the delphi directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let delphi_dir = Self::delphi_dir(custom_path)?;

        if !delphi_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let key_path = delphi_dir.join(KEY_FILE_NAME);
        let config_path = delphi_dir.join(CONFIG_FILE_NAME);

        if !key_path.exists() {
            return Err(StateError::MissingFile(KEY_FILE_NAME.to_string()));
        }

        // a missing config file just means defaults
        let config = if config_path.exists() {
            let config_toml = fs::read_to_string(&config_path)?;
            toml::from_str(&config_toml)?
        } else {
            AppConfig::default()
        };

        Ok(Self {
            delphi_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load the principal from the key file
    pub fn load_key(&self) -> Result<Principal, StateError> {
        let pem = fs::read_to_string(&self.key_path)?;
        let principal =
            Principal::from_pem(&pem).map_err(|e| StateError::InvalidKey(e.to_string()))?;
        Ok(principal)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> Result<(), StateError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> Result<(), StateError> {
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("delphi directory not initialized. Run 'delphi init' first")]
    NotInitialized,

    #[error("delphi directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state");

        let state = AppState::init(Some(path.clone()), None).unwrap();
        assert!(state.key_path.exists());
        assert!(state.config_path.exists());

        let loaded = AppState::load(Some(path)).unwrap();
        assert_eq!(loaded.config, AppConfig::default());
        let principal = loaded.load_key().unwrap();
        assert_eq!(principal, state.load_key().unwrap());
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();

        AppState::init(Some(path.clone()), None).unwrap();
        assert!(matches!(
            AppState::init(Some(path), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(dir.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
        assert!(matches!(
            AppState::load(Some(dir.path().to_path_buf())),
            Err(StateError::MissingFile(_))
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.log_level, "warn");

        let config: AppConfig = toml::from_str("log_level = \"debug\"").unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_corrupt_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(Some(dir.path().to_path_buf()), None).unwrap();
        fs::write(&state.key_path, "not a key").unwrap();
        assert!(matches!(state.load_key(), Err(StateError::InvalidKey(_))));
    }
}
