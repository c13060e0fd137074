use crate::broadcaster::{Delivery, EventBroadcaster};
use crate::engine::AssignmentEngine;
use crate::modules::memory::InMemoryQueueRepository;
use crate::modules::repository::{CustomerRepository, RepresentativeRepository};
use chrono::{Duration, Utc};
use std::sync::Arc;
use walkin_types::{
    CustomerStatus, QueueError, QueueEvent, RepIdentity, RepresentativePatch, RepresentativeStatus,
};

struct Fixture {
    repo: Arc<InMemoryQueueRepository>,
    events: Arc<EventBroadcaster>,
    engine: AssignmentEngine,
}

fn fixture() -> Fixture {
    let repo = Arc::new(InMemoryQueueRepository::new());
    let events = Arc::new(EventBroadcaster::new(64));
    let engine = AssignmentEngine::new(repo.clone(), events.clone());
    Fixture { repo, events, engine }
}

async fn rep(fx: &Fixture, identity: &str) -> RepIdentity {
    let identity = RepIdentity::from(identity);
    fx.repo.create_representative(&identity, None).await.unwrap();
    identity
}

#[tokio::test]
async fn test_take_next_is_fifo_by_arrival() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    let t0 = Utc::now();
    let b = fx.repo.insert_customer_at("B", t0 + Duration::seconds(5));
    let a = fx.repo.insert_customer_at("A", t0);

    let first = fx.engine.take_next(&r1).await.unwrap();
    assert_eq!(first.id, a.id);
    assert_eq!(first.status, CustomerStatus::BeingHelped);

    let second = fx.engine.take_next(&r1).await.unwrap();
    assert_eq!(second.id, b.id);

    let err = fx.engine.take_next(&r1).await.unwrap_err();
    assert_eq!(err, QueueError::NoWaitingCustomer);
}

#[tokio::test]
async fn test_two_rep_scenario() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    let r2 = rep(&fx, "r2").await;
    let t0 = Utc::now();
    let a = fx.repo.insert_customer_at("A", t0);
    let b = fx.repo.insert_customer_at("B", t0 + Duration::seconds(5));

    assert_eq!(fx.engine.take_next(&r1).await.unwrap().id, a.id);
    assert_eq!(fx.engine.take_next(&r2).await.unwrap().id, b.id);

    let outcome = fx.engine.finish(&r1).await.unwrap();
    assert_eq!(outcome.finished_customer.id, a.id);
    assert_eq!(outcome.finished_customer.status, CustomerStatus::Helped);
    assert!(outcome.finished_customer.finished_at.is_some());
    assert_eq!(outcome.rep.total_customers, 1);
    assert_eq!(outcome.rep.status, RepresentativeStatus::Available);

    assert_eq!(fx.engine.finish(&r1).await.unwrap_err(), QueueError::NoActiveCustomer);

    let b_now = fx.repo.get_customer(b.id).await.unwrap();
    assert_eq!(b_now.status, CustomerStatus::BeingHelped);
}

#[tokio::test]
async fn test_take_next_marks_rep_busy() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    fx.engine.add_customer("Ada").await.unwrap();

    let customer = fx.engine.take_next(&r1).await.unwrap();
    let me = fx.engine.get_representative(&r1).await.unwrap();
    assert_eq!(me.status, RepresentativeStatus::Busy);
    assert_eq!(customer.rep_id, Some(me.id));
}

#[tokio::test]
async fn test_unknown_rep_is_not_found() {
    let fx = fixture();
    let customer = fx.engine.add_customer("Ada").await.unwrap();
    let ghost = RepIdentity::from("ghost");

    assert!(matches!(fx.engine.take_next(&ghost).await, Err(QueueError::NotFound { .. })));
    assert!(matches!(fx.engine.finish(&ghost).await, Err(QueueError::NotFound { .. })));
    assert!(matches!(fx.engine.reset(&ghost).await, Err(QueueError::NotFound { .. })));
    assert!(fx.repo.get_customer(customer.id).await.unwrap().is_waiting());
}

#[tokio::test]
async fn test_finish_without_active_customer_mutates_nothing() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    let waiting = fx.engine.add_customer("Ada").await.unwrap();
    let before = fx.engine.get_representative(&r1).await.unwrap();

    assert_eq!(fx.engine.finish(&r1).await.unwrap_err(), QueueError::NoActiveCustomer);
    assert_eq!(fx.engine.get_representative(&r1).await.unwrap(), before);
    assert!(fx.repo.get_customer(waiting.id).await.unwrap().is_waiting());
}

#[tokio::test]
async fn test_finish_only_touches_own_customer() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    let r2 = rep(&fx, "r2").await;
    fx.engine.add_customer("Ada").await.unwrap();
    let taken = fx.engine.take_next(&r2).await.unwrap();

    assert_eq!(fx.engine.finish(&r1).await.unwrap_err(), QueueError::NoActiveCustomer);
    let still = fx.repo.get_customer(taken.id).await.unwrap();
    assert_eq!(still.status, CustomerStatus::BeingHelped);
}

#[tokio::test]
async fn test_reset_leaves_active_customer_alone() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    fx.engine.add_customer("Ada").await.unwrap();
    fx.engine.add_customer("Bob").await.unwrap();
    fx.engine.take_next(&r1).await.unwrap();
    fx.engine.finish(&r1).await.unwrap();
    let active = fx.engine.take_next(&r1).await.unwrap();

    let rep_after = fx.engine.reset(&r1).await.unwrap();
    assert_eq!(rep_after.total_customers, 0);
    assert!(rep_after.finished_at.is_none());
    assert_eq!(rep_after.status, RepresentativeStatus::Available);

    let customer = fx.repo.get_customer(active.id).await.unwrap();
    assert_eq!(customer.status, CustomerStatus::BeingHelped);
    assert_eq!(customer.rep_id, Some(rep_after.id));
}

#[tokio::test]
async fn test_second_removal_is_not_found() {
    let fx = fixture();
    let customer = fx.engine.add_customer("Ada").await.unwrap();

    fx.engine.remove_customer(customer.id).await.unwrap();
    let err = fx.engine.remove_customer(customer.id).await.unwrap_err();
    assert!(matches!(err, QueueError::NotFound { .. }));
}

#[tokio::test]
async fn test_remove_in_any_status() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    fx.engine.add_customer("Ada").await.unwrap();
    let active = fx.engine.take_next(&r1).await.unwrap();

    fx.engine.remove_customer(active.id).await.unwrap();
    assert!(fx.engine.list_customers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_customer_validation() {
    let fx = fixture();
    assert!(matches!(
        fx.engine.add_customer("   ").await,
        Err(QueueError::Validation { ref field, .. }) if field == "name"
    ));
    let long = "x".repeat(201);
    assert!(fx.engine.add_customer(&long).await.is_err());

    let ok = fx.engine.add_customer("  Ada Lovelace ").await.unwrap();
    assert_eq!(ok.name, "Ada Lovelace");
    assert!(ok.is_waiting());
    assert!(ok.rep_id.is_none());
}

#[tokio::test]
async fn test_update_representative_patch() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;

    let patch = RepresentativePatch { status: Some(RepresentativeStatus::Busy), total_customers: None };
    let updated = fx.engine.update_representative(&r1, &patch).await.unwrap();
    assert_eq!(updated.status, RepresentativeStatus::Busy);
    assert_eq!(updated.total_customers, 0);

    let negative = RepresentativePatch { status: None, total_customers: Some(-1) };
    assert!(matches!(
        fx.engine.update_representative(&r1, &negative).await,
        Err(QueueError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_empty_patch_is_silent() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    let mut sub = fx.events.subscribe().unwrap();

    let rep = fx.engine.update_representative(&r1, &RepresentativePatch::default()).await.unwrap();
    assert_eq!(rep.status, RepresentativeStatus::Available);

    let err = fx.engine.update_representative(&"ghost".into(), &RepresentativePatch::default()).await;
    assert!(matches!(err, Err(QueueError::NotFound { .. })));

    fx.engine.add_customer("Ada").await.unwrap();
    assert!(matches!(sub.next().await, Delivery::Event(QueueEvent::CustomerUpdated(_))));
}

#[tokio::test]
async fn test_listing_puts_helped_last() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    let t0 = Utc::now();
    let a = fx.repo.insert_customer_at("A", t0);
    let b = fx.repo.insert_customer_at("B", t0 + Duration::seconds(1));
    let c = fx.repo.insert_customer_at("C", t0 + Duration::seconds(2));
    fx.engine.take_next(&r1).await.unwrap();
    fx.engine.finish(&r1).await.unwrap();

    let ids: Vec<i64> = fx.engine.list_customers().await.unwrap().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![b.id, c.id, a.id]);
}

#[tokio::test]
async fn test_events_follow_commits() {
    let fx = fixture();
    let r1 = rep(&fx, "r1").await;
    let mut sub = fx.events.subscribe().unwrap();

    let customer = fx.engine.add_customer("Ada").await.unwrap();
    assert!(matches!(sub.next().await, Delivery::Event(QueueEvent::CustomerUpdated(c)) if c.id == customer.id));

    fx.engine.take_next(&r1).await.unwrap();
    assert!(matches!(
        sub.next().await,
        Delivery::Event(QueueEvent::CustomerUpdated(c)) if c.status == CustomerStatus::BeingHelped
    ));
    assert!(matches!(
        sub.next().await,
        Delivery::Event(QueueEvent::RepUpdated(r)) if r.status == RepresentativeStatus::Busy
    ));

    // Failed operations publish nothing.
    fx.engine.take_next(&r1).await.unwrap_err();
    fx.engine.remove_customer(customer.id).await.unwrap();
    assert_eq!(
        sub.next().await,
        Delivery::Event(QueueEvent::CustomerRemoved { id: customer.id })
    );
}

#[tokio::test]
async fn test_late_subscriber_misses_earlier_events() {
    let fx = fixture();
    fx.engine.add_customer("Ada").await.unwrap();
    let mut late = fx.events.subscribe().unwrap();
    let bob = fx.engine.add_customer("Bob").await.unwrap();

    assert!(matches!(late.next().await, Delivery::Event(QueueEvent::CustomerUpdated(c)) if c.id == bob.id));
}

#[tokio::test]
async fn test_provision_rejects_duplicates() {
    let fx = fixture();
    let identity = RepIdentity::from("uid-7");
    let rep = fx.engine.provision_representative(&identity, Some(" Rita ")).await.unwrap();
    assert_eq!(rep.name.as_deref(), Some("Rita"));

    let err = fx.engine.provision_representative(&identity, None).await.unwrap_err();
    assert!(matches!(err, QueueError::Validation { .. }));
    assert_eq!(fx.engine.list_representatives().await.unwrap().len(), 1);
}
