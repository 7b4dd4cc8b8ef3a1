// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::Error;
use axum::response::{IntoResponse, Json, Response};
use hyper::StatusCode;
use serde_json::json;

/// Create a JSON error `Response` suitable for `axum::Router`, with a body
/// of the form `{"error": message}`.
pub fn create_error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Convert `Error` into a `Response` suitable for `axum::Router`.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            #[cfg(feature = "aws")]
            Error::Anyhow(e, s) => {
                create_error_response(StatusCode::FAILED_DEPENDENCY, format!("{s}: {e}"))
            }
            #[cfg(feature = "aws")]
            Error::Dynamo(e, s) => {
                create_error_response(StatusCode::FAILED_DEPENDENCY, format!("{s}: {e}"))
            }
            Error::Http(code, mesg) => create_error_response(code, mesg),
            Error::Json(e) => create_error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            #[cfg(feature = "aws")]
            Error::Serde(e) => {
                create_error_response(StatusCode::UNPROCESSABLE_ENTITY, format!("{e:?}"))
            }
            Error::Timeout(s) => {
                create_error_response(StatusCode::GATEWAY_TIMEOUT, format!("{s}: timed out"))
            }
            Error::String(s) => create_error_response(StatusCode::BAD_REQUEST, s),
        }
    }
}
