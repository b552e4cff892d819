mod admin;
mod ping;

use crate::common::ApiError;
use crate::middlewares::trace_id::{TraceId, TraceIdLayer};
use crate::state::AppState;
use axum::body::Body;
use axum::http::{Request, Uri};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tracing::Span;

pub fn build() -> Router<AppState> {
    Router::new()
        .route("/clear_data", post(admin::clear_data))
        .route("/devices", get(admin::devices))
        .route(
            "/{device_id}",
            get(ping::missing_date).post(ping::missing_epoch_time),
        )
        .route("/{device_id}/{time}", get(ping::by_date).post(ping::store))
        .route("/{device_id}/{from}/{to}", get(ping::by_range))
        .fallback(fallback)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let trace_id = request
                        .extensions()
                        .get::<TraceId>()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    tracing::debug_span!(
                        "request",
                        trace_id = %trace_id,
                    )
                })
                .on_request(|req: &Request<Body>, _span: &Span| {
                    tracing::trace!(
                        method = %req.method(),
                        uri = %req.uri(),
                        version = %format!("{:?}", req.version()),
                        "started processing request"
                    );
                })
                .on_response(|res: &Response, latency: Duration, _span: &Span| {
                    tracing::trace!(
                        status = ?res.status(),
                        latency = %format!("{}ms", latency.as_millis()),
                        "finished processing request"
                    );
                }),
        )
        .layer(TraceIdLayer)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any),
        )
}

/// Paths with an empty segment (`//`, trailing `/`) never reach a handler.
async fn fallback(uri: Uri) -> ApiError {
    if uri.path().split('/').skip(1).any(str::is_empty) {
        ApiError::MissingInput("path segment")
    } else {
        ApiError::ResourceNotFound
    }
}
