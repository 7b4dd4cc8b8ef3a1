// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{impl_wrapper_display_from_str, serde_str};
use rand::Rng;
use std::num::NonZeroU64;

/// A random 64-bit record ID, stored as a decimal string (the translation
/// table's primary key).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct RecordId(pub NonZeroU64);
impl_wrapper_display_from_str!(RecordId, NonZeroU64);
serde_str!(RecordId);

impl RecordId {
    /// Generates a new ID.
    pub fn generate() -> Self {
        Self(rand::thread_rng().gen())
    }
}
