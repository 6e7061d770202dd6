// src/config/mod.rs
//! Configuration system for encrypted-pw-vault
//!
//! TOML file + `EPV_*` env overrides, returned as an immutable value.

pub use app::{config_path, load, load_from, Config, CryptoSettings, KeyFiles, StoreSettings};

mod app;
mod defaults;
