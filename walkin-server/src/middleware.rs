//! Request middleware: representative authentication and CORS.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;
use walkin_core::IdentityError;

use crate::api::error::ApiError;
use crate::state::AppState;

/// Pull the credential out of `Authorization: Bearer <credential>`.
pub(crate) fn bearer_credential(headers: &HeaderMap) -> Result<&str, IdentityError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(IdentityError::MissingCredential)?
        .to_str()
        .map_err(|_| IdentityError::InvalidCredential("non-ascii header".to_string()))?;

    let credential = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| IdentityError::InvalidCredential("expected Bearer scheme".to_string()))?
        .trim();
    if credential.is_empty() {
        return Err(IdentityError::MissingCredential);
    }
    Ok(credential)
}

/// Resolve the caller's identity and attach it as a request extension.
/// Requests without a valid credential never reach the handler.
pub async fn rep_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let resolved = match bearer_credential(request.headers()) {
        Ok(credential) => state.gateway().resolve(credential).await,
        Err(err) => Err(err),
    };

    match resolved {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        },
        Err(err) => {
            warn!(path = %request.uri().path(), error = %err, "rejected representative request");
            ApiError::from(err).into_response()
        },
    }
}

/// CORS for the dashboard. An empty origin list allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> =
            allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false)
        .max_age(std::time::Duration::from_secs(3600))
}
