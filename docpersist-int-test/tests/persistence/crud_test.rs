// Create, read, write and delete through IdentifiablePersistence

use docpersist::common::SortOrder;
use docpersist::errors::{ErrorKind, PersistenceResult};
use docpersist::query::{field, Filter, Sort, Update};
use docpersist::repository::{Identifiable, IdentifiablePersistence};
use docpersist_int_test::test_util::{cleanup, create_test_context, generate_beacons, Beacon, Counter};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Session {
    id: Option<uuid::Uuid>,
    user: String,
}

impl Identifiable for Session {
    type Key = uuid::Uuid;

    fn id(&self) -> Option<uuid::Uuid> {
        self.id
    }

    fn set_id(&mut self, id: uuid::Uuid) {
        self.id = Some(id);
    }
}

#[tokio::test]
async fn test_create_then_get_with_generated_id() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();

    let created = beacons.create(Some("c1"), Beacon::new("north", "even", 3)).await?;
    let id = created.id.clone().unwrap_or_default();
    assert!(!id.is_empty());

    let fetched = beacons.get_one_by_id(Some("c1"), &id).await?;
    assert_eq!(fetched, Some(created));

    cleanup(ctx).await
}

#[tokio::test]
async fn test_uuid_keys_are_generated() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let sessions: IdentifiablePersistence<Session> = IdentifiablePersistence::new(ctx.connection().clone(), "sessions");

    let created = sessions
        .create(None, Session { id: None, user: "alice".to_string() })
        .await?;
    let id = created.id.unwrap_or_default();
    assert!(!id.is_nil());
    assert_eq!(sessions.get_one_by_id(None, &id).await?.map(|s| s.user), Some("alice".to_string()));

    cleanup(ctx).await
}

#[tokio::test]
async fn test_custom_id_field_and_numeric_keys() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let counters = ctx.counters();

    counters.create(None, Counter::new(1, "home", 10)).await?;
    counters.create(None, Counter::new(2, "about", 3)).await?;

    let err = counters.create(None, Counter::new(1, "dup", 0)).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);

    let by_key = counters
        .get_list_by_filter(None, field("key").gte(2), Some(Sort::ascending("key")))
        .await?;
    assert_eq!(by_key, vec![Counter::new(2, "about", 3)]);

    let modified = counters.modify_by_id(None, &1, Update::set("hits", 11)).await?;
    assert_eq!(modified, Some(Counter::new(1, "home", 11)));

    cleanup(ctx).await
}

#[tokio::test]
async fn test_set_inserts_and_update_never_inserts() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();

    let missing = beacons.update(None, Beacon::new("ghost", "odd", 1).with_id("x1")).await?;
    assert!(missing.is_none());
    assert_eq!(beacons.get_count_by_filter(None, Filter::All).await?, 0);

    let stored = beacons.set(None, Beacon::new("north", "odd", 1).with_id("x1")).await?;
    assert_eq!(stored.map(|b| b.label), Some("north".to_string()));

    let replaced = beacons.set(None, Beacon::new("south", "odd", 2).with_id("x1")).await?;
    assert_eq!(replaced.map(|b| b.label), Some("south".to_string()));

    let updated = beacons.update(None, Beacon::new("west", "odd", 3).with_id("x1")).await?;
    assert_eq!(updated.map(|b| b.radius), Some(3));
    assert_eq!(beacons.get_count_by_filter(None, Filter::All).await?, 1);

    assert!(beacons.set(None, Beacon::new("no id", "odd", 0)).await?.is_none());
    assert!(beacons.update(None, Beacon::new("no id", "odd", 0)).await?.is_none());

    cleanup(ctx).await
}

#[tokio::test]
async fn test_modify_never_inserts() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    for beacon in generate_beacons(3) {
        beacons.create(None, beacon).await?;
    }

    let none = beacons
        .modify(None, Some(field("label").eq("nobody")), Some(Update::set("radius", 99)))
        .await?;
    assert!(none.is_none());
    assert_eq!(beacons.get_count_by_filter(None, Filter::All).await?, 3);
    assert_eq!(beacons.get_count_by_filter(None, field("radius").eq(99)).await?, 0);

    let modified = beacons
        .modify(
            None,
            Some(field("label").eq("beacon-1")),
            Some(Update::set("kind", "special").and(Update::unset("tags"))),
        )
        .await?;
    let modified = modified.unwrap_or_default();
    assert_eq!(modified.kind, "special");
    assert!(modified.tags.is_empty());

    cleanup(ctx).await
}

#[tokio::test]
async fn test_modify_cannot_change_id() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    beacons.create(None, Beacon::new("north", "odd", 1).with_id("a")).await?;

    let err = beacons
        .modify_by_id(None, &"a".to_string(), Update::set("id", "b"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    assert!(beacons.get_one_by_id(None, &"a".to_string()).await?.is_some());

    cleanup(ctx).await
}

#[tokio::test]
async fn test_get_list_by_ids_omits_missing() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    for (index, beacon) in generate_beacons(3).into_iter().enumerate() {
        beacons.create(None, beacon.with_id(&format!("b{}", index))).await?;
    }

    let ids = vec!["b0".to_string(), "b2".to_string(), "zz".to_string()];
    let mut found: Vec<String> = beacons
        .get_list_by_ids(None, &ids)
        .await?
        .into_iter()
        .filter_map(|b| b.id)
        .collect();
    found.sort();
    assert_eq!(found, vec!["b0".to_string(), "b2".to_string()]);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_deletes() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    for (index, beacon) in generate_beacons(6).into_iter().enumerate() {
        beacons.create(None, beacon.with_id(&format!("b{}", index))).await?;
    }

    let deleted = beacons.delete_by_id(None, &"b0".to_string()).await?;
    assert_eq!(deleted.map(|b| b.label), Some("beacon-0".to_string()));
    assert!(beacons.delete_by_id(None, &"b0".to_string()).await?.is_none());

    beacons
        .delete_by_ids(None, &["b1".to_string(), "missing".to_string()])
        .await?;
    assert_eq!(beacons.get_count_by_filter(None, Filter::All).await?, 4);

    beacons.delete_by_filter(None, field("kind").eq("even")).await?;
    let remaining = beacons
        .get_list_by_filter(None, Filter::All, Some(Sort::by("radius", SortOrder::Descending)))
        .await?;
    let labels: Vec<String> = remaining.into_iter().map(|b| b.label).collect();
    assert_eq!(labels, vec!["beacon-5".to_string(), "beacon-3".to_string()]);

    beacons.clear(None).await?;
    assert_eq!(beacons.get_count_by_filter(None, Filter::All).await?, 0);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_operations_require_open_connection() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    cleanup(ctx).await?;

    let err = beacons.create(Some("late"), Beacon::new("x", "odd", 0)).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::NotOpened);
    assert_eq!(err.correlation_id(), Some("late"));
    Ok(())
}
