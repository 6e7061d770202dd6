// src/lib.rs
//! encrypted-pw-vault — Versioned RSA encryption for values at rest
//!
//! Features:
//! - Tagged ciphertext (`<index>{<payload>}`) naming the key that made it
//! - Always-newest key for encryption, tag-addressed key for decryption
//! - Append-only key stores (in-memory or SQLite/SQLCipher)
//! - Key generation with a round-trip self-test

pub mod aliases;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod enums;
pub mod error;
pub mod genkeys;
pub mod store;
pub mod tagged;
pub mod util;
pub mod versioned;

// Re-export everything users need at the crate root
pub use config::load as load_config;
pub use error::{CoreError, Result as CoreResult};
pub use genkeys::{Diagnostics, KeyGenerator};
pub use store::{KeyIndex, KeyLocation};
pub use tagged::TaggedCiphertext;
pub use versioned::VersionedCipher;
