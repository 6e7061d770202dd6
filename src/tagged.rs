// src/tagged.rs
//! Tagged ciphertext wire format: `<index>{<payload>}`
//!
//! `<index>` is the decimal ordinal of the key that produced the payload.
//! The payload is everything between the first `{` and the final `}`, so it
//! may itself contain braces.

use std::fmt;
use std::str::FromStr;

use crate::consts::{TAG_CLOSE, TAG_OPEN};
use crate::error::FormatError;
use crate::store::KeyIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedCiphertext {
    index: KeyIndex,
    payload: String,
}

impl TaggedCiphertext {
    pub fn new(index: KeyIndex, payload: impl Into<String>) -> Self {
        Self {
            index,
            payload: payload.into(),
        }
    }

    /// Split `<index>{<payload>}` into its parts
    pub fn parse(tagged: &str) -> Result<Self, FormatError> {
        let open = tagged.find(TAG_OPEN).ok_or(FormatError::MissingOpenBrace)?;
        if !tagged.ends_with(TAG_CLOSE) {
            return Err(FormatError::MissingCloseBrace);
        }
        let close = tagged.len() - TAG_CLOSE.len_utf8();

        let digits = &tagged[..open];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatError::BadIndex(digits.to_owned()));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| FormatError::BadIndex(digits.to_owned()))?;

        Ok(Self {
            index: KeyIndex::new(index),
            payload: tagged[open + TAG_OPEN.len_utf8()..close].to_owned(),
        })
    }

    pub fn index(&self) -> KeyIndex {
        self.index
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Display for TaggedCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{TAG_OPEN}{}{TAG_CLOSE}", self.index, self.payload)
    }
}

impl FromStr for TaggedCiphertext {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
