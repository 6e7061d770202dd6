//! Small utility functions used across the crate
//!
//! Keep this light — if it grows, split further.

use blake3::Hasher;

/// BLAKE3 fingerprint of a public key's DER bytes as lowercase hex
///
/// Safe to log: identifies a key pair without revealing key material.
pub fn fingerprint(public_der: &[u8]) -> String {
    Hasher::new().update(public_der).finalize().to_hex().to_string()
}
