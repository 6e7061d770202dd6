// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the enums that represent user-visible choices.

use serde::{Deserialize, Serialize};

/// RSA padding scheme used by the crypto provider
///
/// Both schemes are randomized: encrypting the same value twice under the
/// same key yields different payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RsaPadding {
    #[default]
    Pkcs1v15,
    OaepSha256,
}

