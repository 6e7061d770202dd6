// src/error.rs
//! Public error types for the entire crate
//!
//! Four kinds reach callers: configuration, format, key store and cipher.
//! Each carries its own nested enum so calling code can match on the cause
//! without looking at message text.

use thiserror::Error;

use crate::store::{KeyIndex, KeyLocation};

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Key store error: {0}")]
    KeyStore(#[from] KeyStoreError),

    #[error("Cipher operation failed: {0}")]
    Cipher(#[from] CipherError),
}

/// Tagged ciphertext did not have the `<index>{<payload>}` shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("malformed tagged ciphertext: no '{{' found")]
    MissingOpenBrace,

    #[error("malformed tagged ciphertext: last character is not '}}'")]
    MissingCloseBrace,

    #[error("malformed tagged ciphertext: bad key index {0:?}")]
    BadIndex(String),
}

#[derive(Error, Debug)]
pub enum KeyStoreError {
    #[error("no keys at {location}")]
    Empty { location: KeyLocation },

    #[error("key index {index} out of range (store holds {count} keys)")]
    IndexOutOfRange { index: KeyIndex, count: usize },

    #[error("refusing to overwrite {count} existing keys at {location}")]
    WouldOverwrite { location: KeyLocation, count: usize },

    #[error("corrupt key store: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),
}

#[derive(Error, Debug)]
pub enum CipherError {
    #[error("RSA: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("ciphertext is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("key encoding: {0}")]
    KeyEncoding(String),

    #[error("decrypted value is not valid UTF-8")]
    NotUtf8,
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::KeyStore(KeyStoreError::Sql(err))
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::KeyStore(KeyStoreError::Io(err))
    }
}
