//! Test helpers for walkin-server unit tests.

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue};
use axum_test::TestServer;
use walkin_core::modules::repository::RepresentativeRepository;
use walkin_core::{AssignmentEngine, EventBroadcaster, InMemoryQueueRepository, StaticTokenGateway};
use walkin_types::WalkinConfig;

use crate::router::build_router;
use crate::state::AppState;

/// Bearer tokens known to the test gateway. `ghost` resolves to an identity
/// with no representative row.
pub const TOKEN_R1: &str = "token-r1";
pub const TOKEN_R2: &str = "token-r2";
pub const TOKEN_GHOST: &str = "token-ghost";

/// Create an `AppState` on the in-memory store with representatives `r1` and
/// `r2` provisioned.
pub async fn test_app_state() -> (AppState, Arc<InMemoryQueueRepository>) {
    let repo = Arc::new(InMemoryQueueRepository::new());
    repo.create_representative(&"r1".into(), Some("Rita")).await.expect("provision r1");
    repo.create_representative(&"r2".into(), None).await.expect("provision r2");

    let events = Arc::new(EventBroadcaster::new(64));
    let engine = AssignmentEngine::new(repo.clone(), events);
    let gateway = Arc::new(StaticTokenGateway::new([
        (TOKEN_R1, "r1"),
        (TOKEN_R2, "r2"),
        (TOKEN_GHOST, "ghost"),
    ]));

    (AppState::new(engine, gateway, WalkinConfig::default()), repo)
}

pub async fn test_server() -> (TestServer, AppState, Arc<InMemoryQueueRepository>) {
    let (state, repo) = test_app_state().await;
    let server = TestServer::new(build_router(state.clone())).expect("failed to start test server");
    (server, state, repo)
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value");
    (header::AUTHORIZATION, value)
}
