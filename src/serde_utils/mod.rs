// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

mod tests;

/// Visitor pattern.
mod visitors;

/// Macros for newtype wrappers.
mod wrappers;

pub use self::visitors::*;
