//! Dashboard HTTP server
//!
//! - `GET  /`                    selector page
//! - `GET  /distribution`        mirrored distribution page
//! - `GET  /api/dataset`         status banner, columns, preview
//! - `GET  /api/panels`          all selector panels
//! - `GET|POST /api/panels/{i}`  one panel / apply a control change
//! - `GET  /api/distribution`    mirrored chart sections
//! - `POST /api/refresh`         reload the spreadsheet
//! - `GET  /health`              liveness, uptime, version

pub mod page;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use log::info;

use crate::config::Settings;
use crate::core::error::Result;
use crate::logging;
pub use state::{AppState, DataSource, SharedState};

/// Router with state and request logging attached
pub fn app(state: SharedState) -> Router {
    routes::router()
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            track_requests,
        ))
        .with_state(state)
}

async fn track_requests(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    state.total_requests.fetch_add(1, Ordering::Relaxed);
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    logging::log_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        started.elapsed().as_millis(),
    );
    response
}

/// Bind, then serve until Ctrl-C
pub async fn serve(settings: Settings) -> Result<()> {
    let addr = settings.bind_address();
    let state: SharedState = Arc::new(AppState::from_settings(settings)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("sheetdash {} listening on http://{addr}", env!("CARGO_PKG_VERSION"));

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sheetdash stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        logging::log_error("Failed to listen for shutdown signal", Some(&err));
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
