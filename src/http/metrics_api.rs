// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::create_error_response;
use crate::metrics::{MetricsQuery, OperationTotals, PerformanceRecorder, TimeRange};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

/// Shared state of the metrics endpoints.
#[derive(Clone)]
pub struct MetricsApiState {
    /// Answers `GET /metrics`.
    pub query: Arc<MetricsQuery>,
    /// Answers `GET /metrics/current`, if this process records metrics itself.
    pub recorder: Option<Arc<PerformanceRecorder>>,
}

/// Query string of `GET /metrics`.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsParams {
    /// `1h` (default), `6h`, `24h` or `7d`.
    pub range: Option<String>,
    /// Restrict the report to one function.
    pub function: Option<String>,
}

/// Body of `GET /metrics/current`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMetrics {
    /// Function the totals are recorded for.
    pub function_name: Option<String>,
    /// Running totals per operation.
    pub operations: BTreeMap<String, OperationTotals>,
}

/// `GET /metrics` and `GET /metrics/current`.
pub fn metrics_router(state: MetricsApiState) -> Router {
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/metrics/current", get(get_current_metrics))
        .with_state(state)
}

/// Report over the requested range.  400 for an unknown range, 503 if the
/// store could not be read.
pub async fn get_metrics(
    State(state): State<MetricsApiState>,
    Query(params): Query<MetricsParams>,
) -> Response {
    let range = match params.range.as_deref().map(TimeRange::from_str) {
        None => TimeRange::default(),
        Some(Ok(range)) => range,
        Some(Err(e)) => return e.into_response(),
    };
    let function_name = params.function.as_deref().filter(|f| !f.is_empty());
    match state.query.report(range, function_name).await {
        Ok(report) => Json(report).into_response(),
        Err(_) => create_error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "could not retrieve metrics".to_string(),
        ),
    }
}

/// Running totals of this process's recorder.
pub async fn get_current_metrics(State(state): State<MetricsApiState>) -> Json<CurrentMetrics> {
    Json(match &state.recorder {
        Some(recorder) => CurrentMetrics {
            function_name: Some(recorder.function_name().to_string()),
            operations: recorder.current(),
        },
        None => CurrentMetrics {
            function_name: None,
            operations: BTreeMap::new(),
        },
    })
}
