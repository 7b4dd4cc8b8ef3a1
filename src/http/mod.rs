// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Metrics report endpoints.
mod metrics_api;
/// Run an `axum::Router` on a socket.
mod socket;

pub use self::metrics_api::{
    get_current_metrics, get_metrics, metrics_router, CurrentMetrics, MetricsApiState,
    MetricsParams,
};
pub use self::socket::run_router_on_socket;
