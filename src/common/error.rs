// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt::{Display, Formatter};

#[cfg(feature = "aws")]
/// A convenient alias for Anyhow so consuming code doesn't need to add to `Cargo.toml`
pub type AnyhowError = anyhow::Error;

#[cfg(feature = "aws")]
/// A convenient alias for Dynamo DB error so consuming code doesn't need to add to `Cargo.toml`
pub type DynamoError = aws_sdk_dynamodb::Error;

#[cfg(feature = "aws")]
/// A convenient alias for Serde Dynamo error so consuming code doesn't need to add to `Cargo.toml`
pub type SerdeError = serde_dynamo::Error;

#[derive(Debug)]
/// An enum that encapsulates a variety of error types.
///
/// # Example
///
/// Error::Timeout(format!("lookup(t={table})"))
pub enum Error {
    #[cfg(feature = "aws")]
    /// Anyhow error (for example, an AWS Translate service error)
    Anyhow(AnyhowError, String),
    #[cfg(feature = "aws")]
    /// Dynamo (database) error
    Dynamo(DynamoError, String),
    /// HTTP error
    #[cfg(feature = "http")]
    Http(hyper::StatusCode, String),
    /// JSON (payload) error
    Json(serde_json::Error),
    #[cfg(feature = "aws")]
    /// Serde (serialization or deserialization) error
    Serde(SerdeError),
    /// A backing store call did not finish in time.
    Timeout(String),
    /// String error.
    String(String),
}

impl Error {
    /// Returns `true` for failures of a backing store (as opposed to bad input),
    /// which callers may degrade around.
    pub fn is_store_failure(&self) -> bool {
        match self {
            #[cfg(feature = "aws")]
            Error::Anyhow(..) | Error::Dynamo(..) | Error::Serde(_) => true,
            Error::Timeout(_) => true,
            _ => false,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            #[cfg(feature = "aws")]
            Error::Anyhow(e, context) => write!(f, "{context}: {e}"),
            #[cfg(feature = "aws")]
            Error::Dynamo(DynamoError::ConditionalCheckFailedException(_), context) => {
                write!(f, "DynamoDb condition not met by {context}")
            }
            #[cfg(feature = "aws")]
            Error::Dynamo(e, context) => write!(f, "{context}: {e}"),
            #[cfg(feature = "http")]
            Error::Http(status_code, mesg) => write!(f, "{status_code}: {mesg}"),
            Error::Json(e) => write!(f, "json: {e}"),
            #[cfg(feature = "aws")]
            Error::Serde(e) => write!(f, "serde: {e}"),
            Error::Timeout(context) => write!(f, "{context}: timed out"),
            Error::String(s) => Display::fmt(&s, f),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
