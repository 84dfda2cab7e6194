//! HTTP API route definitions.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sentry_tower::{NewSentryLayer, SentryHttpLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::docs::ApiDoc;
use super::handlers::{convert, health, prometheus_metrics, root, AppState};

/// Record per-endpoint latency once the route has matched.
async fn track_latency(matched: Option<MatchedPath>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = matched
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    crate::metrics::record_http_latency(start, &endpoint);
    response
}

/// Create the API router.
///
/// The Sentry layers are inert unless a client was initialised.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        // Health endpoints
        .route("/health", get(health))
        // Conversion
        .route("/convert", post(convert))
        .route("/metrics", get(prometheus_metrics))
        .route_layer(middleware::from_fn(track_latency))
        // Docs
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(SentryHttpLayer::with_transaction())
        .layer(NewSentryLayer::<Request>::new_from_top())
        .with_state(state)
}
