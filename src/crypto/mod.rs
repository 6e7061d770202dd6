// src/crypto/mod.rs
//! Cryptography provider seam
//!
//! [`CryptoProvider`] is everything the versioned cipher and the key
//! generator need from the outside world: count keys, encrypt or decrypt
//! with the key at a given index, and append freshly generated pairs.
//! [`RsaProvider`] is the production implementation on top of a
//! [`KeyStore`](crate::store::KeyStore).

use chrono::{DateTime, Utc};

use crate::aliases::PlainText;
use crate::error::Result;
use crate::store::{KeyIndex, KeyLocation};

mod rsa_keys;

pub use rsa_keys::{RsaProvider, RsaSettings};

/// What a successful key generation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairInfo {
    pub index: KeyIndex,
    /// BLAKE3 hex of the public key DER
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
}

pub trait CryptoProvider: Send + Sync {
    /// Handle returned for direct private-key access
    type PrivateKey;

    fn count_keys(&self, location: &KeyLocation) -> Result<usize>;

    /// Encrypt with the public key at `index`, returning the opaque payload
    fn encrypt_with_key_file(
        &self,
        public: &KeyLocation,
        plaintext: &str,
        index: KeyIndex,
    ) -> Result<String>;

    /// Decrypt a payload produced by [`encrypt_with_key_file`](Self::encrypt_with_key_file)
    fn decrypt_with_key_file(
        &self,
        private: &KeyLocation,
        ciphertext: &str,
        index: KeyIndex,
    ) -> Result<PlainText>;

    /// Generate a key pair and store it at the next index
    ///
    /// `Ok(None)` means the primitive produced no key pair; store failures
    /// are errors.
    fn generate_key_pair_into_files(
        &self,
        private: &KeyLocation,
        public: &KeyLocation,
        append: bool,
    ) -> Result<Option<KeyPairInfo>>;

    /// DER bytes of the public key at `index`
    fn public_key(&self, location: &KeyLocation, index: KeyIndex) -> Result<Vec<u8>>;

    /// Handle to the private key at `index`
    fn private_key(&self, location: &KeyLocation, index: KeyIndex) -> Result<Self::PrivateKey>;
}
