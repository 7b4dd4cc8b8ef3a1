// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::Error;
use crate::log::RunLog;
use axum::Router;
use std::net::SocketAddr;

/// Run an `axum::Router` on incoming requests from a socket.
pub async fn run_router_on_socket(router: Router, addr: SocketAddr, log: &RunLog) -> Result<(), Error> {
    log.trace(format!("Begin running router on socket {addr}"));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::String(format!("bind({addr}): {e}")))?;
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|e| Error::String(format!("serve({addr}): {e}")))?;
    log.trace("Done running router on socket".to_string());
    Ok(())
}
