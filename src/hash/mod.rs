// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// SHA-256 content digests.
mod digest;

pub use self::digest::ContentDigest;
