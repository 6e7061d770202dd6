// tests/support.rs
//! Test fixtures — fast RSA providers, SQLite stores and a deterministic provider

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use encrypted_pw_vault::aliases::{KeyBytes, PlainText};
use encrypted_pw_vault::crypto::{CryptoProvider, KeyPairInfo, RsaProvider, RsaSettings};
use encrypted_pw_vault::enums::RsaPadding;
use encrypted_pw_vault::error::{CipherError, Result};
use encrypted_pw_vault::store::{KeyStore, MemoryKeyStore, SqliteKeyStore};
use encrypted_pw_vault::{KeyIndex, KeyLocation};
use tempfile::TempDir;

#[allow(dead_code)]
pub const PRIV: &str = "keys/private";
#[allow(dead_code)]
pub const PUB: &str = "keys/public";

/// Smallest modulus that still fits the self-test text
#[allow(dead_code)]
pub fn fast_settings() -> RsaSettings {
    RsaSettings {
        key_bits: 1024,
        padding: RsaPadding::Pkcs1v15,
    }
}

#[allow(dead_code)]
pub fn memory_provider() -> Arc<RsaProvider<MemoryKeyStore>> {
    Arc::new(RsaProvider::new(MemoryKeyStore::new(), fast_settings()))
}

/// Append `n` fresh RSA pairs at the test locations
#[allow(dead_code)]
pub fn grow<P: CryptoProvider>(provider: &P, n: usize) {
    for _ in 0..n {
        provider
            .generate_key_pair_into_files(&PRIV.into(), &PUB.into(), true)
            .expect("store append")
            .expect("RSA generation");
    }
}

/// Private/public SQLite files inside a temp dir that lives as long as this
#[allow(dead_code)]
pub struct TempStores {
    pub dir: TempDir,
    pub private: KeyLocation,
    pub public: KeyLocation,
}

#[allow(dead_code)]
impl TempStores {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let private = KeyLocation::new(dir.path().join("priv.db").to_string_lossy());
        let public = KeyLocation::new(dir.path().join("pub.db").to_string_lossy());
        Self {
            dir,
            private,
            public,
        }
    }

    pub fn provider(&self, passphrase: Option<&str>) -> Arc<RsaProvider<SqliteKeyStore>> {
        Arc::new(RsaProvider::new(
            SqliteKeyStore::new(passphrase.map(str::to_owned)),
            fast_settings(),
        ))
    }
}

/// Deterministic XOR "cipher" over a memory store
///
/// Same key + same plaintext always yields the same payload, which is what
/// `VersionedCipher::matches` needs to ever return true.
#[derive(Default)]
#[allow(dead_code)]
pub struct XorProvider {
    pub store: MemoryKeyStore,
    pub refuse_generation: AtomicBool,
    pub garble_decrypt: AtomicBool,
}

#[allow(dead_code)]
impl XorProvider {
    pub fn with_keys(n: usize) -> Arc<Self> {
        let provider = Arc::new(Self::default());
        for _ in 0..n {
            provider
                .generate_key_pair_into_files(&PRIV.into(), &PUB.into(), true)
                .unwrap()
                .unwrap();
        }
        provider
    }

    fn xor(key: &[u8], data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(key.iter().cycle())
            .map(|(d, k)| d ^ k)
            .collect()
    }
}

impl CryptoProvider for XorProvider {
    type PrivateKey = Vec<u8>;

    fn count_keys(&self, location: &KeyLocation) -> Result<usize> {
        self.store.count_keys(location)
    }

    fn encrypt_with_key_file(
        &self,
        public: &KeyLocation,
        plaintext: &str,
        index: KeyIndex,
    ) -> Result<String> {
        let key = self.store.read_key(public, index)?;
        Ok(STANDARD.encode(Self::xor(key.expose_secret(), plaintext.as_bytes())))
    }

    fn decrypt_with_key_file(
        &self,
        private: &KeyLocation,
        ciphertext: &str,
        index: KeyIndex,
    ) -> Result<PlainText> {
        let key = self.store.read_key(private, index)?;
        let raw = STANDARD.decode(ciphertext).map_err(CipherError::Encoding)?;
        let mut plain = Self::xor(key.expose_secret(), &raw);
        if self.garble_decrypt.load(Ordering::SeqCst) {
            plain.reverse();
        }
        let text = String::from_utf8(plain).map_err(|_| CipherError::NotUtf8)?;
        Ok(PlainText::new(text))
    }

    fn generate_key_pair_into_files(
        &self,
        private: &KeyLocation,
        public: &KeyLocation,
        _append: bool,
    ) -> Result<Option<KeyPairInfo>> {
        if self.refuse_generation.load(Ordering::SeqCst) {
            return Ok(None);
        }
        // Symmetric toy key: both halves are the same bytes
        let seed = self.store.count_keys(private)? as u8 + 1;
        let key = vec![seed; 16];
        let index =
            self.store
                .append_key_pair(private, public, &KeyBytes::new(key.clone()), &key)?;
        Ok(Some(KeyPairInfo {
            index,
            fingerprint: format!("xor-{seed}"),
            created_at: Utc::now(),
        }))
    }

    fn public_key(&self, location: &KeyLocation, index: KeyIndex) -> Result<Vec<u8>> {
        Ok(self.store.read_key(location, index)?.expose_secret().clone())
    }

    fn private_key(&self, location: &KeyLocation, index: KeyIndex) -> Result<Vec<u8>> {
        self.public_key(location, index)
    }
}
