// src/store/memory.rs
//! In-process key store
//!
//! One arena vector per location. Appends take the write lock once for both
//! halves, so readers never observe a half-written pair.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::aliases::KeyBytes;
use crate::error::{KeyStoreError, Result};

use super::{KeyIndex, KeyLocation, KeyStore};

#[derive(Default)]
pub struct MemoryKeyStore {
    slots: RwLock<HashMap<KeyLocation, Vec<KeyBytes>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> KeyStoreError {
    KeyStoreError::Corrupt("memory key store lock poisoned".into())
}

impl KeyStore for MemoryKeyStore {
    fn count_keys(&self, location: &KeyLocation) -> Result<usize> {
        let slots = self.slots.read().map_err(poisoned)?;
        Ok(slots.get(location).map_or(0, Vec::len))
    }

    fn read_key(&self, location: &KeyLocation, index: KeyIndex) -> Result<KeyBytes> {
        let slots = self.slots.read().map_err(poisoned)?;
        let keys = slots.get(location).map(Vec::as_slice).unwrap_or_default();

        let key = keys
            .get(index.as_usize())
            .ok_or(KeyStoreError::IndexOutOfRange {
                index,
                count: keys.len(),
            })?;

        Ok(KeyBytes::new(key.expose_secret().clone()))
    }

    fn append_key_pair(
        &self,
        private: &KeyLocation,
        public: &KeyLocation,
        private_der: &KeyBytes,
        public_der: &[u8],
    ) -> Result<KeyIndex> {
        if private == public {
            return Err(KeyStoreError::Corrupt(format!(
                "private and public keys cannot share location {private}"
            ))
            .into());
        }

        let mut slots = self.slots.write().map_err(poisoned)?;

        let index = KeyIndex::next(slots.get(private).map_or(0, Vec::len))?;

        // Drop public halves orphaned past the private count
        let public_keys = slots.entry(public.clone()).or_default();
        public_keys.truncate(index.as_usize());
        if public_keys.len() != index.as_usize() {
            return Err(KeyStoreError::Corrupt(format!(
                "public store {public} holds {} keys, private store {private} holds {index}",
                public_keys.len()
            ))
            .into());
        }
        public_keys.push(KeyBytes::new(public_der.to_vec()));

        slots
            .entry(private.clone())
            .or_default()
            .push(KeyBytes::new(private_der.expose_secret().clone()));

        Ok(index)
    }
}
