// src/store/sqlite.rs
//! SQLite/SQLCipher key store
//!
//! Each location is its own database file holding a single `key_pairs`
//! table. Connections are opened per call; nothing is cached, so every
//! read sees the latest committed append.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::debug;

use crate::aliases::KeyBytes;
use crate::consts::DB_KDF_ITERATIONS;
use crate::error::{KeyStoreError, Result};
use crate::util::fingerprint;

use super::{KeyIndex, KeyLocation, KeyStore};

/// Open (creating if needed) the key database at `path`
///
/// With a passphrase the file is keyed through SQLCipher; without one it is
/// a plain SQLite file.
pub fn open_key_db(path: &Path, passphrase: Option<&str>) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;

    if let Some(key) = passphrase {
        let key = key.replace('\'', "''");
        conn.execute_batch(&format!(
            r#"
            PRAGMA key = '{key}';
            PRAGMA cipher_page_size = 4096;
            PRAGMA kdf_iter = {DB_KDF_ITERATIONS};
            PRAGMA cipher_hmac_algorithm = HMAC_SHA512;
            PRAGMA cipher_kdf_algorithm = PBKDF2_HMAC_SHA512;
            PRAGMA cipher_plaintext_header_size = 0;
            "#
        ))?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS key_pairs (
            idx         INTEGER PRIMARY KEY,
            key_der     BLOB NOT NULL,
            fingerprint TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(conn)
}

pub struct SqliteKeyStore {
    passphrase: Option<String>,
    append_lock: Mutex<()>,
}

impl SqliteKeyStore {
    pub fn new(passphrase: Option<String>) -> Self {
        Self {
            passphrase,
            append_lock: Mutex::new(()),
        }
    }

    fn open(&self, location: &KeyLocation) -> Result<Connection> {
        open_key_db(Path::new(location.as_str()), self.passphrase.as_deref())
    }
}

fn count_rows(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM key_pairs", [], |row| row.get(0))?;
    usize::try_from(count)
        .map_err(|_| KeyStoreError::Corrupt(format!("negative key count {count}")).into())
}

impl KeyStore for SqliteKeyStore {
    fn count_keys(&self, location: &KeyLocation) -> Result<usize> {
        if !Path::new(location.as_str()).exists() {
            return Ok(0);
        }
        count_rows(&self.open(location)?)
    }

    fn read_key(&self, location: &KeyLocation, index: KeyIndex) -> Result<KeyBytes> {
        if !Path::new(location.as_str()).exists() {
            return Err(KeyStoreError::IndexOutOfRange { index, count: 0 }.into());
        }

        let conn = self.open(location)?;
        let der: Option<Vec<u8>> = conn
            .query_row(
                "SELECT key_der FROM key_pairs WHERE idx = ?1",
                [index.get()],
                |row| row.get(0),
            )
            .optional()?;

        match der {
            Some(der) => Ok(KeyBytes::new(der)),
            None => Err(KeyStoreError::IndexOutOfRange {
                index,
                count: count_rows(&conn)?,
            }
            .into()),
        }
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

        let _guard = self
            .append_lock
            .lock()
            .map_err(|_| KeyStoreError::Corrupt("append lock poisoned".into()))?;

        let mut private_conn = self.open(private)?;
        let public_conn = self.open(public)?;

        // IMMEDIATE takes the write lock up front so another process cannot
        // claim the same index between the count and the insert
        let tx = private_conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM key_pairs", [], |row| row.get(0))?;
        let index = KeyIndex::next(
            usize::try_from(count)
                .map_err(|_| KeyStoreError::Corrupt(format!("negative key count {count}")))?,
        )?;
        let print = fingerprint(public_der);

        // Public half first: the count is always taken from the private
        // store, so the new index only becomes visible once both exist
        public_conn.execute(
            "INSERT OR REPLACE INTO key_pairs (idx, key_der, fingerprint) VALUES (?1, ?2, ?3)",
            params![index.get(), public_der, print],
        )?;
        tx.execute(
            "INSERT INTO key_pairs (idx, key_der, fingerprint) VALUES (?1, ?2, ?3)",
            params![index.get(), private_der.expose_secret().as_slice(), print],
        )?;
        tx.commit()?;

        debug!(%index, %private, %public, "appended key pair");
        Ok(index)
    }
}
