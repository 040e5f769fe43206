use axum::{
    Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use super::redirect;
use crate::{config::Config, session};

#[utoipa::path(
    post,
    path= "/logout",
    responses (
        (status = 303, description = "Session cookies cleared, redirect to /"),
    ),
    tag= "auth"
)]
// axum handler for logout
pub async fn logout(config: Extension<Arc<Config>>) -> Response {
    let mut headers = HeaderMap::new();

    if let Err(e) = session::clear(&config.0, &mut headers) {
        error!("Failed to clear session cookies: {e:#}");

        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    redirect(headers, "/")
}
