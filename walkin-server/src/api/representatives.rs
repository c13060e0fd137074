//! Representative handlers. Everything except the listing acts on the caller,
//! identified by the [`RepIdentity`] the auth middleware attached.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    Extension,
};
use walkin_types::{Customer, FinishOutcome, RepIdentity, Representative, RepresentativePatch};

use super::error::ApiError;
use crate::state::AppState;

pub async fn list_representatives(
    State(state): State<AppState>,
) -> Result<Json<Vec<Representative>>, ApiError> {
    Ok(Json(state.engine().list_representatives().await?))
}

pub async fn get_me(
    State(state): State<AppState>,
    Extension(identity): Extension<RepIdentity>,
) -> Result<Json<Representative>, ApiError> {
    Ok(Json(state.engine().get_representative(&identity).await?))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(identity): Extension<RepIdentity>,
    patch: Result<Json<RepresentativePatch>, JsonRejection>,
) -> Result<Json<Representative>, ApiError> {
    let Json(patch) = patch?;
    Ok(Json(state.engine().update_representative(&identity, &patch).await?))
}

pub async fn take_next(
    State(state): State<AppState>,
    Extension(identity): Extension<RepIdentity>,
) -> Result<Json<Customer>, ApiError> {
    Ok(Json(state.engine().take_next(&identity).await?))
}

pub async fn finish(
    State(state): State<AppState>,
    Extension(identity): Extension<RepIdentity>,
) -> Result<Json<FinishOutcome>, ApiError> {
    Ok(Json(state.engine().finish(&identity).await?))
}

pub async fn reset(
    State(state): State<AppState>,
    Extension(identity): Extension<RepIdentity>,
) -> Result<Json<Representative>, ApiError> {
    Ok(Json(state.engine().reset(&identity).await?))
}
