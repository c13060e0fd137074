//! API Routes
//!
//! Customer endpoints are open to the front desk; representative actions
//! require a bearer credential and always act on the caller.

mod customers;
pub(crate) mod error;
pub(crate) mod realtime;
mod representatives;


use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, patch},
    Router,
};

use crate::middleware::rep_auth_middleware;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/customers", get(customers::list_customers).post(customers::add_customer))
        .route("/customers/:id", delete(customers::remove_customer))
        .route("/representatives", get(representatives::list_representatives));

    let protected = Router::new()
        .route("/representatives/me", get(representatives::get_me).patch(representatives::update_me))
        .route("/representatives/next", patch(representatives::take_next))
        .route("/representatives/finish", patch(representatives::finish))
        .route("/representatives/reset", patch(representatives::reset))
        .route_layer(middleware::from_fn_with_state(state.clone(), rep_auth_middleware));

    public
        .merge(protected)
        // API fallback: return 404 for unknown API endpoints
        .fallback(api_not_found)
}

async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Not found", "kind": "not_found"})))
}
