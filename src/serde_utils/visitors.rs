// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use core::marker::PhantomData;
use serde::de;
use serde::de::Visitor;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Implement `Serialize` (via `Display`) and `Deserialize` (via `FromStr`), so that
/// validation in `FromStr` also applies to values read back from a store.  For example:
///     serde_str!(ContentDigest);
#[macro_export]
macro_rules! serde_str {
    ($id:ident) => {
        impl serde::Serialize for $id {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $id {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_str($crate::FromStrVisitor::<Self>::default())
            }
        }
    };
}

/// Deserializes any type that implements `FromStr`.
pub struct FromStrVisitor<T>(PhantomData<T>);

impl<T> Default for FromStrVisitor<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<'de, T> Visitor<'de> for FromStrVisitor<T>
where
    T: FromStr,
    T::Err: Display,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a str")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        T::from_str(value).map_err(de::Error::custom)
    }
}
