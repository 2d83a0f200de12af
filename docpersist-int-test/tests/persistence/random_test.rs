// Random selection

use docpersist::data::FilterParams;
use docpersist::errors::PersistenceResult;
use docpersist::query::{field, Filter};
use docpersist_int_test::test_util::{cleanup, create_test_context, generate_beacons};
use std::collections::HashSet;

#[tokio::test]
async fn test_random_on_empty_match_is_none() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    assert!(beacons.get_one_random(None, Filter::All).await?.is_none());

    for beacon in generate_beacons(3) {
        beacons.create(None, beacon).await?;
    }
    assert!(beacons
        .get_one_random(None, field("kind").eq("missing"))
        .await?
        .is_none());

    cleanup(ctx).await
}

#[tokio::test]
async fn test_random_single_match_is_always_picked() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    for beacon in generate_beacons(5) {
        beacons.create(None, beacon).await?;
    }

    for _ in 0..10 {
        let picked = beacons.get_one_random(None, field("radius").eq(3)).await?;
        assert_eq!(picked.map(|b| b.label), Some("beacon-3".to_string()));
    }

    cleanup(ctx).await
}

#[tokio::test]
async fn test_random_stays_within_filter_and_reaches_every_match() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    for beacon in generate_beacons(6) {
        beacons.create(None, beacon).await?;
    }

    let filter = FilterParams::new().with("kind", "odd");
    let mut seen = HashSet::new();
    for _ in 0..200 {
        let picked = beacons.get_one_random_by_params(None, Some(&filter)).await?;
        let beacon = picked.unwrap_or_default();
        assert_eq!(beacon.kind, "odd");
        seen.insert(beacon.radius);
    }
    assert_eq!(seen, HashSet::from([1, 3, 5]));

    cleanup(ctx).await
}
