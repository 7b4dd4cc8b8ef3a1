// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Implement `Display` and `FromStr` for wrapper tuples whose inner type has both.
///
/// # Example
///
/// `pub struct RecordId(pub NonZeroU64);`
/// `impl_wrapper_display_from_str!(RecordId, NonZeroU64);`
#[macro_export]
macro_rules! impl_wrapper_display_from_str {
    ($typ:ty, $inner:ty) => {
        impl std::fmt::Display for $typ {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $typ {
            type Err = <$inner as std::str::FromStr>::Err;
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(Self(std::str::FromStr::from_str(s)?))
            }
        }
    };
}

/// Implement `as_str()`, `Deref<Target = str>`, `Display` etc. for string wrapper tuples.
///
/// # Example
///
/// `pub struct LanguageCode(String);`
/// `impl_wrapper_str!(LanguageCode);`
#[macro_export]
macro_rules! impl_wrapper_str {
    ($typ:ty) => {
        impl $typ {
            /// Returns `as_str()` of the inner string.
            #[allow(unused)]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $typ {
            fn as_ref(&self) -> &str {
                self.0.as_ref()
            }
        }

        impl std::borrow::Borrow<str> for $typ {
            fn borrow(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::ops::Deref for $typ {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &*self.0
            }
        }

        impl std::fmt::Display for $typ {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl PartialEq<str> for $typ {
            fn eq(&self, other: &str) -> bool {
                self.0.as_str() == other
            }
        }
    };
}
