use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::error::ConfigError;
use crate::config::types::{default_config, ConfigData};

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Owns the configuration and the file it is persisted to.
pub struct ConfigManager {
    path: PathBuf,
    config: ConfigData,
}

impl ConfigManager {
    /// Binds to an existing file and loads it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = read_config(&path)?;
        Ok(Self { path, config })
    }

    /// Binds to `path` with an in-memory seed. Nothing is written until [`ConfigManager::save`].
    pub fn with_config(path: impl Into<PathBuf>, config: ConfigData) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Re-reads the bound file. On error the current configuration is kept.
    pub fn load(&mut self) -> Result<(), ConfigError> {
        self.config = read_config(&self.path)?;
        Ok(())
    }

    /// Rewrites the whole document through a temporary file and a rename.
    /// Refuses to persist anything [`ConfigManager::load`] would reject.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        let yaml = serde_yaml::to_string(&self.config)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = temp_path(&self.path);
        fs::write(&tmp, yaml)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Saved config to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &ConfigData {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigData {
        &mut self.config
    }

    pub fn set_config(&mut self, config: ConfigData) {
        self.config = config;
    }
}

/// Loads the configuration at `path`, or seeds and writes the defaults when
/// the file does not exist yet.
pub fn init_config(path: impl AsRef<Path>) -> Result<ConfigManager, ConfigError> {
    let path = path.as_ref();
    info!("Initializing config...");

    let manager = if path.exists() {
        debug!("Config found! Loading {}", path.display());
        ConfigManager::open(path)?
    } else {
        debug!("Config not found! Writing defaults to {}", path.display());
        let manager = ConfigManager::with_config(path, default_config());
        manager.save()?;
        manager
    };

    info!("Done!");
    Ok(manager)
}

fn read_config(path: &Path) -> Result<ConfigData, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ConfigData = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(DEFAULT_CONFIG_PATH));
    name.push(".tmp");
    path.with_file_name(name)
}
