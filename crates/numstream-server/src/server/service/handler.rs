//! HTTP handlers for the streaming endpoints.
//!
//! ## Routes
//!
//! - `GET /random-numbers` - a deflate-compressed, pretty-printed JSON array
//!   served as a file download.
//! - `GET /random-numbers/live` - newline-delimited records, one per chunk,
//!   paced in time.
//! - `GET /healthz` - `200 OK` while serving, `503` once shutdown begins.
//!
//! Headers are committed before the first record exists, so a failure during
//! generation can only truncate the body, never change the status.

use crate::server::{
    service::state::AppState,
    streaming::coordinator::{Endpoint, start_session},
};
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use core::convert::Infallible;
use futures::StreamExt;
use numstream::DeflateFormat;
use tokio_stream::wrappers::ReceiverStream;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

/// Presents the compressed array as a file download.
const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"random-numbers.json\"";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/random-numbers", get(download))
        .route("/random-numbers/live", get(live))
        .route("/healthz", get(healthz))
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "shutting down\n").into_response()
}

fn streaming_body(state: &AppState, endpoint: Endpoint) -> Option<Body> {
    let guard = state.begin_session()?;
    let rx = start_session(state, endpoint, guard);
    Some(Body::from_stream(
        ReceiverStream::new(rx).map(Ok::<_, Infallible>),
    ))
}

async fn download(State(state): State<AppState>) -> Response {
    let Some(body) = streaming_body(&state, Endpoint::Download) else {
        return unavailable();
    };

    // Raw deflate has no registered content coding; only label zlib output.
    let encoding = state
        .config()
        .download
        .compression
        .filter(|c| c.format == DeflateFormat::Zlib)
        .map_or("identity", |_| "deflate");

    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CONTENT_ENCODING, encoding),
            (header::CONTENT_DISPOSITION, DOWNLOAD_DISPOSITION),
        ],
        body,
    )
        .into_response()
}

async fn live(State(state): State<AppState>) -> Response {
    let Some(body) = streaming_body(&state, Endpoint::Live) else {
        return unavailable();
    };

    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

async fn healthz(State(state): State<AppState>) -> Response {
    if state.is_shutting_down() {
        unavailable()
    } else {
        (StatusCode::OK, "ok\n").into_response()
    }
}
