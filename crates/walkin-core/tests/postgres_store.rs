//! PostgreSQL store tests.
//!
//! Run only when `WALKIN_TEST_DATABASE_URL` points at a disposable database;
//! otherwise every test returns immediately. Tests truncate both tables, so
//! they are serialized.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serial_test::serial;
use walkin_core::modules::repository::{
    AssignmentRepository, CustomerRepository, RepresentativeRepository,
};
use walkin_core::{AssignmentEngine, EventBroadcaster, PostgresQueueRepository, RepositoryError};
use walkin_types::models::DatabaseConfig;
use walkin_types::{CustomerStatus, QueueError, RepIdentity, RepresentativeStatus};

async fn repo() -> Option<PostgresQueueRepository> {
    let url = std::env::var("WALKIN_TEST_DATABASE_URL").ok()?;
    let repo = PostgresQueueRepository::connect(&url, &DatabaseConfig::default()).await.unwrap();
    repo.run_migrations().await.unwrap();
    sqlx::query("TRUNCATE customers, representatives RESTART IDENTITY CASCADE")
        .execute(repo.pool())
        .await
        .unwrap();
    Some(repo)
}

#[tokio::test]
#[serial]
async fn test_pg_customer_lifecycle() {
    let Some(repo) = repo().await else { return };
    let rep = repo.create_representative(&"pg-r1".into(), Some("Rita")).await.unwrap();
    let a = repo.insert_customer("A").await.unwrap();
    let b = repo.insert_customer("B").await.unwrap();
    assert_eq!(a.status, CustomerStatus::Waiting);

    let assignment = repo.assign_next_waiting(&rep.identity).await.unwrap().unwrap();
    assert_eq!(assignment.customer.id, a.id);
    assert_eq!(assignment.customer.rep_id, Some(rep.id));
    assert_eq!(assignment.rep.status, RepresentativeStatus::Busy);

    let outcome = repo.complete_active(&rep.identity, Utc::now()).await.unwrap().unwrap();
    assert_eq!(outcome.finished_customer.id, a.id);
    assert_eq!(outcome.finished_customer.status, CustomerStatus::Helped);
    assert_eq!(outcome.rep.total_customers, 1);
    assert!(repo.complete_active(&rep.identity, Utc::now()).await.unwrap().is_none());

    let ids: Vec<i64> = repo.list_customers().await.unwrap().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);

    repo.delete_customer(b.id).await.unwrap();
    assert!(matches!(repo.delete_customer(b.id).await, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn test_pg_representative_updates() {
    let Some(repo) = repo().await else { return };
    let identity = RepIdentity::from("pg-r2");
    repo.create_representative(&identity, None).await.unwrap();
    assert!(matches!(
        repo.create_representative(&identity, None).await,
        Err(RepositoryError::AlreadyExists(_))
    ));

    let patch = walkin_types::RepresentativePatch { status: None, total_customers: Some(4) };
    let rep = repo.update_representative(&identity, &patch).await.unwrap();
    assert_eq!(rep.total_customers, 4);
    assert_eq!(rep.status, RepresentativeStatus::Available);

    let rep = repo.reset_representative(&identity).await.unwrap();
    assert_eq!(rep.total_customers, 0);
    assert!(matches!(
        repo.get_representative(&"nobody".into()).await,
        Err(RepositoryError::NotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_pg_concurrent_take_next() {
    let Some(repo) = repo().await else { return };
    let repo = Arc::new(repo);
    for i in 0..8 {
        repo.create_representative(&RepIdentity::new(format!("pg-c{i}")), None).await.unwrap();
    }
    for i in 0..5 {
        repo.insert_customer(&format!("c{i}")).await.unwrap();
    }
    let engine = AssignmentEngine::new(repo.clone(), Arc::new(EventBroadcaster::new(16)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.take_next(&RepIdentity::new(format!("pg-c{i}"))).await })
        })
        .collect();

    let mut assigned = HashSet::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(customer) => assert!(assigned.insert(customer.id)),
            Err(err) => assert_eq!(err, QueueError::NoWaitingCustomer),
        }
    }
    assert_eq!(assigned.len(), 5);
}

#[tokio::test]
#[serial]
async fn test_pg_server_time() {
    let Some(repo) = repo().await else { return };
    let now = repo.server_time().await.unwrap();
    assert!((Utc::now() - now).num_minutes().abs() < 5);
}
