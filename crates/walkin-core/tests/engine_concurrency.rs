//! Concurrent `take_next` calls must never hand out the same customer twice.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Arc;

use walkin_core::modules::repository::{CustomerRepository, RepresentativeRepository};
use walkin_core::{AssignmentEngine, EventBroadcaster, InMemoryQueueRepository};
use walkin_types::{CustomerStatus, QueueError, RepIdentity};

async fn setup(reps: usize, customers: usize) -> (AssignmentEngine, Arc<InMemoryQueueRepository>, Vec<RepIdentity>) {
    let repo = Arc::new(InMemoryQueueRepository::new());
    let engine = AssignmentEngine::new(repo.clone(), Arc::new(EventBroadcaster::new(16)));

    let mut identities = Vec::with_capacity(reps);
    for i in 0..reps {
        let identity = RepIdentity::new(format!("rep-{i}"));
        repo.create_representative(&identity, None).await.unwrap();
        identities.push(identity);
    }
    for i in 0..customers {
        repo.insert_customer(&format!("customer-{i}")).await.unwrap();
    }
    (engine, repo, identities)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_take_next_assigns_distinct_customers() {
    let (engine, repo, identities) = setup(16, 10).await;

    let handles: Vec<_> = identities
        .into_iter()
        .map(|identity| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.take_next(&identity).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let mut assigned = HashSet::new();
    let mut empty = 0;
    for result in results {
        match result.unwrap() {
            Ok(customer) => assert!(assigned.insert(customer.id), "customer {} assigned twice", customer.id),
            Err(QueueError::NoWaitingCustomer) => empty += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(assigned.len(), 10);
    assert_eq!(empty, 6);
    let customers = repo.list_customers().await.unwrap();
    assert!(customers.iter().all(|c| c.status == CustomerStatus::BeingHelped));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fewer_reps_than_customers_leaves_rest_waiting() {
    let (engine, repo, identities) = setup(3, 8).await;

    let handles: Vec<_> = identities
        .into_iter()
        .map(|identity| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.take_next(&identity).await.unwrap() })
        })
        .collect();

    let ids: HashSet<i64> =
        futures::future::join_all(handles).await.into_iter().map(|r| r.unwrap().id).collect();
    assert_eq!(ids.len(), 3);

    let waiting = repo.list_customers().await.unwrap().into_iter().filter(|c| c.is_waiting()).count();
    assert_eq!(waiting, 5);
}
