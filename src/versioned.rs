// src/versioned.rs
//! Versioned cipher service
//!
//! New values are always encrypted with the newest key and tagged with its
//! index. Decryption follows the tag, so ciphertext produced before a key
//! rotation stays readable as long as its key is kept in the store.
//!
//! The service holds nothing but the two locations: every call re-reads
//! the key count, so a key appended by another thread or process is picked
//! up immediately.

use std::sync::Arc;

use tracing::debug;

use crate::aliases::PlainText;
use crate::config::KeyFiles;
use crate::crypto::CryptoProvider;
use crate::error::{CoreError, KeyStoreError, Result};
use crate::store::{KeyIndex, KeyLocation};
use crate::tagged::TaggedCiphertext;

pub struct VersionedCipher<P> {
    provider: Arc<P>,
    private: KeyLocation,
    public: KeyLocation,
}

impl<P: CryptoProvider> VersionedCipher<P> {
    /// Bind the service to a private and a public key location
    pub fn init(
        provider: Arc<P>,
        private: impl Into<KeyLocation>,
        public: impl Into<KeyLocation>,
    ) -> Result<Self> {
        let private = private.into();
        let public = public.into();

        if private.is_blank() {
            return Err(CoreError::Configuration("private key location is empty".into()));
        }
        if public.is_blank() {
            return Err(CoreError::Configuration("public key location is empty".into()));
        }

        Ok(Self {
            provider,
            private,
            public,
        })
    }

    pub fn from_config(provider: Arc<P>, keys: &KeyFiles) -> Result<Self> {
        let (private, public) = keys.locations()?;
        Self::init(provider, private, public)
    }

    pub fn private_location(&self) -> &KeyLocation {
        &self.private
    }

    pub fn public_location(&self) -> &KeyLocation {
        &self.public
    }

    fn newest(&self) -> Result<KeyIndex> {
        let count = self.provider.count_keys(&self.private)?;
        debug!(count, location = %self.private, "number of keys");

        KeyIndex::newest(count).ok_or_else(|| {
            KeyStoreError::Empty {
                location: self.private.clone(),
            }
            .into()
        })
    }

    /// Encrypt with the newest key, producing `<index>{<payload>}`
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let index = self.newest()?;
        let payload = self
            .provider
            .encrypt_with_key_file(&self.public, plaintext, index)?;

        Ok(TaggedCiphertext::new(index, payload).to_string())
    }

    /// Decrypt with whichever key the tag names
    pub fn decrypt(&self, tagged: &str) -> Result<PlainText> {
        let tagged = TaggedCiphertext::parse(tagged)?;
        let index = tagged.index();

        let count = self.provider.count_keys(&self.private)?;
        if !index.within(count) {
            return Err(KeyStoreError::IndexOutOfRange { index, count }.into());
        }

        self.provider
            .decrypt_with_key_file(&self.private, tagged.payload(), index)
    }

    /// True iff encrypting `plain` right now yields exactly `tagged`
    ///
    /// This is a string comparison against a fresh encryption, not a
    /// decrypt-and-compare. It is false for anything tagged with an older
    /// key, even when the plaintext is the same, and it can only be true
    /// with a provider whose encryption is deterministic. The RSA provider
    /// pads randomly, so with it this never matches.
    pub fn matches(&self, plain: &str, tagged: &str) -> Result<bool> {
        Ok(self.encrypt(plain)? == tagged)
    }

    /// DER bytes of the newest public key
    ///
    /// "Newest" is counted in the private store, so an orphaned public half
    /// left by an interrupted append is never returned.
    pub fn public_key(&self) -> Result<Vec<u8>> {
        let index = self.newest()?;
        self.provider.public_key(&self.public, index)
    }

    /// Handle to the newest private key
    pub fn private_key(&self) -> Result<P::PrivateKey> {
        let index = self.newest()?;
        self.provider.private_key(&self.private, index)
    }
}
