// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::Error;
use crate::{impl_wrapper_str, serde_str};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// A SHA-256 digest of byte or text content, as 64 lowercase hex characters.
/// Used as the dedup key for images and the cache key for source text.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct ContentDigest(String);
impl_wrapper_str!(ContentDigest);
serde_str!(ContentDigest);

impl ContentDigest {
    /// Length of the hex representation.
    pub const HEX_LEN: usize = 64;

    /// Digest of raw bytes, such as a downloaded image.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Digest of the UTF-8 encoding of `text`.  No normalization is applied.
    pub fn of_text(text: &str) -> Self {
        Self::of_bytes(text.as_bytes())
    }

    /// Validates a digest read back from storage.  Upper case hex is accepted
    /// and lowered.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.len() != Self::HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::String(format!("{s}: not a SHA-256 hex digest")));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl FromStr for ContentDigest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
