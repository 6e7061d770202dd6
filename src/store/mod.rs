// src/store/mod.rs
//! Append-only key stores
//!
//! A key store is an ordered log of key pairs. Index 0 is the oldest pair,
//! `count - 1` the newest; an index, once visible, never changes meaning.
//! Private and public halves live at two locations that share the same
//! index space.

use std::fmt;

use crate::aliases::KeyBytes;
use crate::error::{KeyStoreError, Result};

mod memory;
mod sqlite;

pub use memory::MemoryKeyStore;
pub use sqlite::{open_key_db, SqliteKeyStore};

/// Ordinal position of a key pair in its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyIndex(u32);

impl KeyIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Newest index of a store holding `count` keys, `None` when empty
    pub fn newest(count: usize) -> Option<Self> {
        count
            .checked_sub(1)
            .and_then(|n| u32::try_from(n).ok())
            .map(Self)
    }

    /// Index the next appended pair will receive
    pub fn next(count: usize) -> Result<Self> {
        u32::try_from(count)
            .map(Self)
            .map_err(|_| KeyStoreError::Corrupt(format!("key count {count} exceeds index range")).into())
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Whether this index exists in a store holding `count` keys
    pub fn within(self, count: usize) -> bool {
        self.as_usize() < count
    }
}

impl fmt::Display for KeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where one half of a key store lives (a file path for SQLite stores)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyLocation(String);

impl KeyLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for KeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyLocation {
    fn from(location: &str) -> Self {
        Self::new(location)
    }
}

impl From<String> for KeyLocation {
    fn from(location: String) -> Self {
        Self(location)
    }
}

/// Storage backend for key material
///
/// Implementations must make [`append_key_pair`](KeyStore::append_key_pair)
/// atomic with respect to readers: a reader that sees `count` private keys
/// must be able to read both halves of every index below `count`.
pub trait KeyStore: Send + Sync {
    /// Number of keys stored at `location`
    fn count_keys(&self, location: &KeyLocation) -> Result<usize>;

    /// DER bytes of the key at `index`
    fn read_key(&self, location: &KeyLocation, index: KeyIndex) -> Result<KeyBytes>;

    /// Append a key pair and return the index both halves were stored under
    fn append_key_pair(
        &self,
        private: &KeyLocation,
        public: &KeyLocation,
        private_der: &KeyBytes,
        public_der: &[u8],
    ) -> Result<KeyIndex>;

    /// Newest index at `location`; fails when the store is empty
    fn newest_index(&self, location: &KeyLocation) -> Result<KeyIndex> {
        let count = self.count_keys(location)?;
        KeyIndex::newest(count).ok_or_else(|| {
            KeyStoreError::Empty {
                location: location.clone(),
            }
            .into()
        })
    }
}
