// src/genkeys.rs
//! Key generation with a round-trip self-test
//!
//! This is an administrative operation: every outcome, including failures,
//! comes back as human-readable [`Diagnostics`] and nothing is propagated
//! to the caller as an error.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use crate::config::KeyFiles;
use crate::consts::{
    MSG_DECRYPTS_TO, MSG_ENCRYPTS_TO, MSG_EXCEPTION, MSG_GEN_FAILED, MSG_NO_PRIVKEY,
    MSG_NO_PUBKEY, MSG_TEST_WITH, MSG_VALIDITY_FAILED, MSG_VALIDITY_OK, SELF_TEST_TEXT,
};
use crate::crypto::CryptoProvider;
use crate::error::{KeyStoreError, Result};
use crate::store::{KeyIndex, KeyLocation};

/// Ordered, human-readable output of an administrative operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<String>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, line: &str) -> bool {
        self.iter().any(|l| l == line)
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("\n"))
    }
}

pub struct KeyGenerator<P> {
    provider: Arc<P>,
    keys: KeyFiles,
    running: Mutex<()>,
}

impl<P: CryptoProvider> KeyGenerator<P> {
    pub fn new(provider: Arc<P>, keys: KeyFiles) -> Self {
        Self {
            provider,
            keys,
            running: Mutex::new(()),
        }
    }

    pub fn private_key_file(&self) -> Option<&str> {
        self.keys.private_key_file.as_deref()
    }

    pub fn set_private_key_file(&mut self, file: impl Into<String>) {
        self.keys.private_key_file = Some(file.into());
    }

    pub fn public_key_file(&self) -> Option<&str> {
        self.keys.public_key_file.as_deref()
    }

    pub fn set_public_key_file(&mut self, file: impl Into<String>) {
        self.keys.public_key_file = Some(file.into());
    }

    /// Append a new key pair and prove it round-trips the self-test text
    ///
    /// A pair that fails the self-test stays in the store and becomes the
    /// newest key; the failure is only reported.
    pub fn gen_keys(&self) -> Diagnostics {
        let mut lines = Diagnostics::new();

        let Some(private) = self.location(self.private_key_file()) else {
            lines.add(MSG_NO_PRIVKEY);
            return lines;
        };
        let Some(public) = self.location(self.public_key_file()) else {
            lines.add(MSG_NO_PUBKEY);
            return lines;
        };

        // One generation at a time, or two runs could race for "newest"
        let _running = match self.running.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = self.generate_and_test(&private, &public, &mut lines) {
            error!(error = %e, "key generation failed");
            lines.add(format!("{MSG_EXCEPTION}{e}"));
        }

        lines
    }

    fn location(&self, file: Option<&str>) -> Option<KeyLocation> {
        file.map(str::trim)
            .filter(|f| !f.is_empty())
            .map(KeyLocation::new)
    }

    fn generate_and_test(
        &self,
        private: &KeyLocation,
        public: &KeyLocation,
        lines: &mut Diagnostics,
    ) -> Result<()> {
        let Some(info) = self
            .provider
            .generate_key_pair_into_files(private, public, true)?
        else {
            lines.add(MSG_GEN_FAILED);
            return Ok(());
        };

        let count = self.provider.count_keys(private)?;
        let index = KeyIndex::newest(count).ok_or_else(|| KeyStoreError::Empty {
            location: private.clone(),
        })?;
        if index != info.index {
            // Another writer appended after us; the self-test still runs
            // against whatever is newest, since that is what encrypt will use
            warn!(generated = %info.index, newest = %index, "key store grew during generation");
        }

        lines.add(format!("{MSG_TEST_WITH}{SELF_TEST_TEXT}"));
        let ciphertext = self
            .provider
            .encrypt_with_key_file(public, SELF_TEST_TEXT, index)?;
        lines.add(format!("{MSG_ENCRYPTS_TO}{ciphertext}"));
        let recovered = self
            .provider
            .decrypt_with_key_file(private, &ciphertext, index)?;
        lines.add(format!("{MSG_DECRYPTS_TO}{}", recovered.expose_secret()));

        if recovered.expose_secret().as_str() == SELF_TEST_TEXT {
            info!(%index, fingerprint = %info.fingerprint, "key pair passed self-test");
            lines.add("");
            lines.add(MSG_VALIDITY_OK);
        } else {
            warn!(%index, fingerprint = %info.fingerprint, "key pair failed self-test but remains installed");
            lines.add(MSG_VALIDITY_FAILED);
        }

        Ok(())
    }
}
