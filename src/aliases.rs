// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret containers used throughout encrypted-pw-vault.
//! Everything here zeroizes on drop.

pub use secure_gate::dynamic_alias;

// Raw DER key material as it crosses the key-store boundary
dynamic_alias!(KeyBytes, Vec<u8>);

// Recovered plaintext values (stored passwords and the like)
dynamic_alias!(PlainText, String);
