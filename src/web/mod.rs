//! HTTP surface: form actions, page data and operational endpoints.

pub(crate) mod handlers;
mod middleware;
mod openapi;

pub use self::middleware::RequestToken;
pub use self::openapi::ApiDoc;

use crate::{auth::Authenticator, backend::BackendClient, config::Config};
use anyhow::Result;
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;

/// Build the application router with its upstream clients.
///
/// # Errors
/// Returns an error if an upstream HTTP client cannot be built.
pub fn router(config: Arc<Config>) -> Result<Router> {
    let backend = BackendClient::new(config.clone())?;
    let authenticator = Arc::new(Authenticator::new(config.clone(), backend.clone())?);

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/signup", post(handlers::signup::signup))
        .route("/login", post(handlers::login::login))
        .route("/logout", post(handlers::logout::logout))
        .route("/dashboard", get(handlers::pages::dashboard))
        .route(
            "/learn/:subject_id/lesson/:lesson_id",
            get(handlers::pages::lesson),
        )
        .route("/api-docs/openapi.json", get(openapi::openapi))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(axum::middleware::from_fn(middleware::request_token))
                .layer(Extension(authenticator))
                .layer(Extension(backend))
                .layer(Extension(config)),
        );

    Ok(app)
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, config: Arc<Config>) -> Result<()> {
    let app = router(config)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Gracefully shutdown");
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
