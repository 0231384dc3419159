//! Integration tests for the events domain against a real SQLite file

use chrono::{Duration, SubsecRound, Utc};
use domain_events::entity::{event, session};
use domain_events::*;
use sea_orm::{EntityTrait, ModelTrait, PaginatorTrait};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use test_utils::assertions::{assert_some, assert_strictly_ascending};
use test_utils::{TestDataBuilder, TestDatabase};

fn create_event(category: &str, name: &str, data: Value, session_id: &str) -> CreateEvent {
    let Value::Object(data) = data else {
        panic!("payload must be an object");
    };
    CreateEvent {
        category: category.to_string(),
        name: name.to_string(),
        data,
        timestamp: Utc::now().trunc_subsecs(3) - Duration::seconds(1),
        session_id: session_id.to_string(),
    }
}

fn pageview(session_id: &str) -> CreateEvent {
    create_event(
        "page interaction",
        "pageview",
        json!({"host": "example.com", "path": "/"}),
        session_id,
    )
}

async fn setup() -> (TestDatabase, IngestionService<SqliteEventStore>) {
    let db = TestDatabase::new().await;
    let service = IngestionService::new(SqliteEventStore::new(db.connection()));
    (db, service)
}

#[tokio::test]
async fn test_pageview_round_trip() {
    let (_db, service) = setup().await;
    let input = pageview("s1");

    let stored = service.ingest(input.clone()).await.unwrap();

    let events = service.list_by_session("s1", Page::new(0, 100)).await.unwrap();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.id, stored.id);
    assert_eq!(event.category, "page interaction");
    assert_eq!(event.name, "pageview");
    assert_eq!(event.data, json!({"host": "example.com", "path": "/"}));
    assert_eq!(event.timestamp, input.timestamp);
    assert_eq!(event.session_id, "s1");
}

#[tokio::test]
async fn test_rejected_event_leaves_no_rows() {
    let (db, service) = setup().await;
    let builder = TestDataBuilder::from_test_name("rejected_event");
    let session_id = builder.session_id("main");

    let mut future = pageview(&session_id);
    future.timestamp = Utc::now() + Duration::days(1);
    let err = service.ingest(future).await.unwrap_err();
    assert!(matches!(
        err,
        EventError::Validation(ValidationError::FutureTimestamp { .. })
    ));

    let missing = create_event(
        "page interaction",
        "pageview",
        json!({"host": "example.com"}),
        &session_id,
    );
    assert!(service.ingest(missing).await.is_err());

    let conn = db.connection();
    assert_eq!(session::Entity::find().count(&conn).await.unwrap(), 0);
    assert_eq!(event::Entity::find().count(&conn).await.unwrap(), 0);
}

#[tokio::test]
async fn test_submit_with_string_form_is_rejected() {
    let (_db, service) = setup().await;

    let err = service
        .ingest(create_event(
            "form interaction",
            "submit",
            json!({"host": "example.com", "path": "/signup", "form": "email"}),
            "s1",
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EventError::Validation(ValidationError::InvalidFieldType { field: "form", .. })
    ));
}

#[tokio::test]
async fn test_upsert_twice_keeps_one_session() {
    let db = TestDatabase::new().await;
    let store = Arc::new(SqliteEventStore::new(db.connection()));
    let sessions = SessionUpsertService::new(Arc::clone(&store));

    assert_eq!(sessions.upsert("s1").await.unwrap(), SessionUpsert::Created);
    assert_eq!(
        sessions.upsert("s1").await.unwrap(),
        SessionUpsert::AlreadyExists
    );

    let count = session::Entity::find().count(&db.connection()).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_store_reports_session_conflict() {
    let db = TestDatabase::new().await;
    let store = SqliteEventStore::new(db.connection());

    store.insert_session("dup").await.unwrap();
    let err = store.insert_session("dup").await.unwrap_err();
    assert!(matches!(err, EventError::SessionConflict(ref id) if id == "dup"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ingest_for_new_session() {
    let (db, service) = setup().await;
    let service = Arc::new(service);
    let builder = TestDataBuilder::from_test_name("concurrent_new_session");
    let session_id = builder.session_id("shared");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let event = pageview(&session_id);
            tokio::spawn(async move { service.ingest(event).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let conn = db.connection();
    assert_eq!(session::Entity::find().count(&conn).await.unwrap(), 1);
    let events = service
        .list_by_session(&session_id, Page::default())
        .await
        .unwrap();
    assert_eq!(events.len(), 8);
}

#[tokio::test]
async fn test_list_by_session_filters_and_paginates() {
    let (_db, service) = setup().await;

    for _ in 0..5 {
        service.ingest(pageview("a")).await.unwrap();
    }
    service.ingest(pageview("b")).await.unwrap();

    let all = service.list_by_session("a", Page::new(0, 500)).await.unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|e| e.session_id == "a"));
    let ids: Vec<i64> = all.iter().map(|e| e.id).collect();
    assert_strictly_ascending(&ids, "session events");

    let window = service.list_by_session("a", Page::new(1, 2)).await.unwrap();
    assert_eq!(
        window.iter().map(|e| e.id).collect::<Vec<_>>(),
        ids[1..3].to_vec()
    );

    let past_end = service.list_by_session("a", Page::new(10, 2)).await.unwrap();
    assert!(past_end.is_empty());

    let unknown = service
        .list_by_session("nobody", Page::default())
        .await
        .unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn test_limit_is_capped_at_one_hundred() {
    let (_db, service) = setup().await;

    for _ in 0..105 {
        service
            .ingest(create_event("video", "play", json!({}), "s1"))
            .await
            .unwrap();
    }

    let events = service.list_by_session("s1", Page::new(0, 500)).await.unwrap();
    assert_eq!(events.len(), 100);
}

#[tokio::test]
async fn test_list_by_category() {
    let (_db, service) = setup().await;

    service.ingest(pageview("s1")).await.unwrap();
    service
        .ingest(create_event(
            "page interaction",
            "cta click",
            json!({"host": "example.com", "path": "/", "element": "signup"}),
            "s2",
        ))
        .await
        .unwrap();
    service
        .ingest(create_event(
            "form interaction",
            "submit",
            json!({"host": "example.com", "path": "/", "form": {"email": "a@b.c"}}),
            "s1",
        ))
        .await
        .unwrap();

    let page_events = service
        .list_by_category("page interaction", Page::default())
        .await
        .unwrap();
    assert_eq!(page_events.len(), 2);
    assert_eq!(page_events[0].name, "pageview");
    assert_eq!(page_events[1].name, "cta click");

    let forms = service
        .list_by_category("form interaction", Page::default())
        .await
        .unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].data["form"]["email"], "a@b.c");
}

#[tokio::test]
async fn test_event_session_relation() {
    let (db, service) = setup().await;
    let stored = service.ingest(pageview("s1")).await.unwrap();

    let session = assert_some(service.get_session("s1").await.unwrap(), "session s1");
    assert_eq!(session.id, stored.session_id);
    assert!(service.get_session("missing").await.unwrap().is_none());

    let conn = db.connection();
    let model = assert_some(
        session::Entity::find_by_id("s1".to_string())
            .one(&conn)
            .await
            .unwrap(),
        "session model",
    );
    let related = model.find_related(event::Entity).all(&conn).await.unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].id, stored.id);
}

#[tokio::test]
async fn test_deferred_worker_persists_valid_events() {
    let (_db, service) = setup().await;
    let service = Arc::new(service);
    let config = IngestConfig {
        mode: IngestMode::Deferred,
        queue_capacity: 8,
        max_in_flight: 2,
    };

    let (queue, worker) = ingest_channel(Arc::clone(&service), &config);
    let handle = tokio::spawn(worker.run(std::future::pending()));

    queue.submit(pageview("deferred")).await.unwrap();
    queue
        .submit(create_event("page interaction", "pageview", Value::Object(Map::new()), "deferred"))
        .await
        .unwrap();
    drop(queue);

    let stats = handle.await.unwrap();
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.persisted, 1);
    assert_eq!(stats.rejected, 1);

    let events = service
        .list_by_session("deferred", Page::default())
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
}
