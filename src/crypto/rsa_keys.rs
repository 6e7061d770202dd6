// src/crypto/rsa_keys.rs
//! RSA implementation of [`CryptoProvider`]
//!
//! Private keys are stored as PKCS#8 DER, public keys as SPKI DER. Payloads
//! are standard base64 so they never contain `{` or `}`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::rand_core::OsRng;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::{info, warn};

use crate::aliases::{KeyBytes, PlainText};
use crate::config::CryptoSettings;
use crate::consts::DEFAULT_KEY_BITS;
use crate::enums::RsaPadding;
use crate::error::{CipherError, KeyStoreError, Result};
use crate::store::{KeyIndex, KeyLocation, KeyStore};
use crate::util::fingerprint;

use super::{CryptoProvider, KeyPairInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaSettings {
    pub key_bits: usize,
    pub padding: RsaPadding,
}

impl Default for RsaSettings {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            padding: RsaPadding::default(),
        }
    }
}

impl From<&CryptoSettings> for RsaSettings {
    fn from(settings: &CryptoSettings) -> Self {
        Self {
            key_bits: settings.key_bits,
            padding: settings.padding,
        }
    }
}

pub struct RsaProvider<S> {
    store: S,
    settings: RsaSettings,
}

impl<S: KeyStore> RsaProvider<S> {
    pub fn new(store: S, settings: RsaSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> RsaSettings {
        self.settings
    }

    fn load_public(&self, location: &KeyLocation, index: KeyIndex) -> Result<RsaPublicKey> {
        let der = self.store.read_key(location, index)?;
        RsaPublicKey::from_public_key_der(der.expose_secret())
            .map_err(|e| CipherError::KeyEncoding(e.to_string()).into())
    }

    fn load_private(&self, location: &KeyLocation, index: KeyIndex) -> Result<RsaPrivateKey> {
        let der = self.store.read_key(location, index)?;
        RsaPrivateKey::from_pkcs8_der(der.expose_secret())
            .map_err(|e| CipherError::KeyEncoding(e.to_string()).into())
    }
}

impl<S: KeyStore> CryptoProvider for RsaProvider<S> {
    type PrivateKey = RsaPrivateKey;

    fn count_keys(&self, location: &KeyLocation) -> Result<usize> {
        self.store.count_keys(location)
    }

    fn encrypt_with_key_file(
        &self,
        public: &KeyLocation,
        plaintext: &str,
        index: KeyIndex,
    ) -> Result<String> {
        let key = self.load_public(public, index)?;
        let data = plaintext.as_bytes();

        let ciphertext = match self.settings.padding {
            RsaPadding::Pkcs1v15 => key.encrypt(&mut OsRng, Pkcs1v15Encrypt, data),
            RsaPadding::OaepSha256 => key.encrypt(&mut OsRng, Oaep::new::<Sha256>(), data),
        }
        .map_err(CipherError::Rsa)?;

        Ok(STANDARD.encode(ciphertext))
    }

    fn decrypt_with_key_file(
        &self,
        private: &KeyLocation,
        ciphertext: &str,
        index: KeyIndex,
    ) -> Result<PlainText> {
        let key = self.load_private(private, index)?;
        let raw = STANDARD.decode(ciphertext).map_err(CipherError::Encoding)?;

        let plain = match self.settings.padding {
            RsaPadding::Pkcs1v15 => key.decrypt(Pkcs1v15Encrypt, &raw),
            RsaPadding::OaepSha256 => key.decrypt(Oaep::new::<Sha256>(), &raw),
        }
        .map_err(CipherError::Rsa)?;

        let text = String::from_utf8(plain).map_err(|_| CipherError::NotUtf8)?;
        Ok(PlainText::new(text))
    }

    fn generate_key_pair_into_files(
        &self,
        private: &KeyLocation,
        public: &KeyLocation,
        append: bool,
    ) -> Result<Option<KeyPairInfo>> {
        if !append {
            let count = self.store.count_keys(private)?;
            if count > 0 {
                return Err(KeyStoreError::WouldOverwrite {
                    location: private.clone(),
                    count,
                }
                .into());
            }
        }

        let private_key = match RsaPrivateKey::new(&mut OsRng, self.settings.key_bits) {
            Ok(key) => key,
            Err(e) => {
                warn!(bits = self.settings.key_bits, error = %e, "RSA key generation failed");
                return Ok(None);
            }
        };
        let public_key = RsaPublicKey::from(&private_key);

        let private_der = private_key
            .to_pkcs8_der()
            .map_err(|e| CipherError::KeyEncoding(e.to_string()))?;
        let public_der = public_key
            .to_public_key_der()
            .map_err(|e| CipherError::KeyEncoding(e.to_string()))?;

        let index = self.store.append_key_pair(
            private,
            public,
            &KeyBytes::new(private_der.as_bytes().to_vec()),
            public_der.as_bytes(),
        )?;

        let info = KeyPairInfo {
            index,
            fingerprint: fingerprint(public_der.as_bytes()),
            created_at: Utc::now(),
        };
        info!(
            index = %info.index,
            fingerprint = %info.fingerprint,
            bits = self.settings.key_bits,
            "generated RSA key pair"
        );

        Ok(Some(info))
    }

    fn public_key(&self, location: &KeyLocation, index: KeyIndex) -> Result<Vec<u8>> {
        Ok(self.store.read_key(location, index)?.expose_secret().clone())
    }

    fn private_key(&self, location: &KeyLocation, index: KeyIndex) -> Result<RsaPrivateKey> {
        self.load_private(location, index)
    }
}
