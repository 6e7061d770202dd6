// src/config/app.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use super::defaults::*;
use crate::consts::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_CONFIG, ENV_PRIVKEY_FILE, ENV_PUBKEY_FILE,
    ENV_STORE_KEY, MIN_KEY_BITS,
};
use crate::enums::RsaPadding;
use crate::error::{CoreError, Result};
use crate::store::KeyLocation;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keys: KeyFiles,
    #[serde(default)]
    pub crypto: CryptoSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

/// Locations of the private and public key stores
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeyFiles {
    pub private_key_file: Option<String>,
    pub public_key_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CryptoSettings {
    #[serde(default = "default_key_bits")]
    pub key_bits: usize,
    #[serde(default)]
    pub padding: RsaPadding,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// SQLCipher passphrase; plain SQLite when unset
    pub passphrase: Option<String>,
}

impl Default for CryptoSettings {
    fn default() -> Self {
        default_crypto()
    }
}

impl KeyFiles {
    pub fn new(private_key_file: impl Into<String>, public_key_file: impl Into<String>) -> Self {
        Self {
            private_key_file: Some(private_key_file.into()),
            public_key_file: Some(public_key_file.into()),
        }
    }

    /// Both locations, or a configuration error naming the missing one
    pub fn locations(&self) -> Result<(KeyLocation, KeyLocation)> {
        let private = required(&self.private_key_file, "private_key_file")?;
        let public = required(&self.public_key_file, "public_key_file")?;
        Ok((private, public))
    }
}

fn required(value: &Option<String>, name: &str) -> Result<KeyLocation> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(KeyLocation::new(v)),
        _ => Err(CoreError::Configuration(format!("{name} is not set"))),
    }
}

impl Config {
    /// Reject settings no key pair could be generated with
    pub fn validate(&self) -> Result<()> {
        if self.crypto.key_bits < MIN_KEY_BITS {
            return Err(CoreError::Configuration(format!(
                "key_bits {} is below the minimum of {MIN_KEY_BITS}",
                self.crypto.key_bits
            )));
        }
        Ok(())
    }

    /// Apply `EPV_*` environment overrides
    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(ENV_PRIVKEY_FILE) {
            self.keys.private_key_file = Some(path);
        }
        if let Ok(path) = std::env::var(ENV_PUBKEY_FILE) {
            self.keys.public_key_file = Some(path);
        }
        if let Ok(key) = std::env::var(ENV_STORE_KEY) {
            self.store.passphrase = Some(key);
        }
    }
}

/// Parse a TOML config file (no environment overrides)
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CoreError::Configuration(format!("cannot read {}: {e}", path.display()))
    })?;
    let conf: Config = toml::from_str(&content)
        .map_err(|e| CoreError::Configuration(format!("invalid TOML in {}: {e}", path.display())))?;
    conf.validate()?;
    Ok(conf)
}

/// Default config file location: `$EPV_CONFIG`, else the user config dir
pub fn config_path() -> Option<PathBuf> {
    std::env::var_os(ENV_CONFIG)
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
}

/// Load config from the default location, falling back to built-in
/// defaults, then apply environment overrides
pub fn load() -> Result<Config> {
    let mut conf = match config_path() {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "loading config");
            load_from(&path)?
        }
        _ => {
            warn!("{CONFIG_FILE_NAME} not found — using built-in defaults");
            Config {
                keys: default_keys(),
                crypto: default_crypto(),
                store: default_store(),
            }
        }
    };

    conf.apply_env();
    conf.validate()?;
    Ok(conf)
}
