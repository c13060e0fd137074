//! Customer queue handlers: list, add, remove

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use walkin_types::Customer;

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewCustomer {
    #[serde(alias = "customer_name")]
    pub name: String,
}

pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.engine().list_customers().await?))
}

pub async fn add_customer(
    State(state): State<AppState>,
    body: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let Json(body) = body?;
    let customer = state.engine().add_customer(&body.name).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn remove_customer(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.engine().remove_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
