// src/consts.rs
//! Shared constants — security parameters, wire format and diagnostics

/// Default RSA modulus size for newly generated key pairs
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Smallest modulus accepted from configuration
// Anything smaller cannot fit the self-test text under PKCS#1 v1.5 padding
pub const MIN_KEY_BITS: usize = 1024;

/// Opens the payload of a tagged ciphertext (`<index>{<payload>}`)
pub const TAG_OPEN: char = '{';

/// Closes the payload; always the final character
pub const TAG_CLOSE: char = '}';

/// Known plaintext used only to validate freshly generated key pairs
pub const SELF_TEST_TEXT: &str = "A variable of array type holds a reference to an object. ";

/// Recommended KDF iterations for SQLCipher key stores
pub const DB_KDF_ITERATIONS: u32 = 256_000;

/// Environment variable naming the TOML config file
pub const ENV_CONFIG: &str = "EPV_CONFIG";
pub const ENV_PRIVKEY_FILE: &str = "EPV_PRIVKEY_FILE";
pub const ENV_PUBKEY_FILE: &str = "EPV_PUBKEY_FILE";
pub const ENV_STORE_KEY: &str = "EPV_STORE_KEY";

/// Config file looked up under the user's config directory
pub const CONFIG_DIR_NAME: &str = "encrypted-pw-vault";
pub const CONFIG_FILE_NAME: &str = "genkeys.toml";

// Key generation diagnostics
pub const MSG_NO_PRIVKEY: &str = "Must provide a --privkey <file> parameter";
pub const MSG_NO_PUBKEY: &str = "Must provide a --pubkey <file> parameter";
pub const MSG_GEN_FAILED: &str = "Generation of keys failed";
pub const MSG_TEST_WITH: &str = "test with---->";
pub const MSG_ENCRYPTS_TO: &str = "encrypts to-->";
pub const MSG_DECRYPTS_TO: &str = "decrypts to-->";
pub const MSG_VALIDITY_FAILED: &str = "Validity check failed: encrypt/decrypt failure";
pub const MSG_VALIDITY_OK: &str = "Validity check succeeded";
pub const MSG_EXCEPTION: &str = "Exception - check logs: ";
