// src/config/defaults.rs
use crate::config::app::{CryptoSettings, KeyFiles, StoreSettings};
use crate::consts::DEFAULT_KEY_BITS;
use crate::enums::RsaPadding;

pub fn default_key_bits() -> usize {
    DEFAULT_KEY_BITS
}

/// No key locations: the generator reports them missing instead of guessing
pub fn default_keys() -> KeyFiles {
    KeyFiles {
        private_key_file: None,
        public_key_file: None,
    }
}

pub fn default_crypto() -> CryptoSettings {
    CryptoSettings {
        key_bits: DEFAULT_KEY_BITS,
        padding: RsaPadding::Pkcs1v15,
    }
}

pub fn default_store() -> StoreSettings {
    StoreSettings { passphrase: None }
}
