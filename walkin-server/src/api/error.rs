//! HTTP mapping of queue errors.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use walkin_core::IdentityError;
use walkin_types::{ErrorKind, QueueError};

#[derive(Debug)]
pub struct ApiError(pub QueueError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound | ErrorKind::NoWaitingCustomer | ErrorKind::NoActiveCustomer => {
                StatusCode::NOT_FOUND
            },
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        Self(err)
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(QueueError::validation("body", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(QueueError::validation("id", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody { error: self.0.to_string(), kind: self.0.kind().as_str() };
        (status, Json(body)).into_response()
    }
}
