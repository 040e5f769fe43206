use axum::{extract::Request, middleware::Next, response::Response};

use crate::session;

/// Identity token of the current request, if any.
///
/// Taken from `Authorization: Bearer` first, then the `jwt_token` cookie.
#[derive(Clone, Debug, Default)]
pub struct RequestToken(pub Option<String>);

impl RequestToken {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

pub async fn request_token(mut request: Request, next: Next) -> Response {
    let token = session::request_token(request.headers());
    request.extensions_mut().insert(RequestToken(token));
    next.run(request).await
}
