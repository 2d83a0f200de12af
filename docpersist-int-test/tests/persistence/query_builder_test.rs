// Replacing the parameter translation

use docpersist::data::{FilterParams, UpdateParams};
use docpersist::errors::PersistenceResult;
use docpersist::query::{default_filter, field, Filter, QueryBuilder};
use docpersist_int_test::test_util::{cleanup, create_test_context, generate_beacons};
use std::sync::Arc;

/// Understands `min_radius` and `search` on top of plain equality.
struct BeaconQueryBuilder;

impl QueryBuilder for BeaconQueryBuilder {
    fn compose_filter(&self, params: Option<&FilterParams>) -> Filter {
        let Some(params) = params else {
            return Filter::All;
        };

        let mut plain = params.clone();
        let min_radius = plain.remove("min_radius").and_then(|value| value.as_i64());
        let search = plain.remove("search").map(|value| value.to_plain_string());

        let mut filter = default_filter(Some(&plain));
        if let Some(min_radius) = min_radius {
            filter = filter.and(field("radius").gte(min_radius));
        }
        if let Some(search) = search {
            filter = filter.and(field("label").eq(search.clone()).or(field("kind").eq(search)));
        }
        filter
    }
}

#[tokio::test]
async fn test_custom_builder_translates_params() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons().with_query_builder(Arc::new(BeaconQueryBuilder));
    for beacon in generate_beacons(8) {
        beacons.create(None, beacon).await?;
    }

    let filter = FilterParams::new().with("kind", "even").with("min_radius", 3);
    let mut radii: Vec<i64> = beacons
        .get_list_by_params(None, Some(&filter), None)
        .await?
        .into_iter()
        .map(|b| b.radius)
        .collect();
    radii.sort();
    assert_eq!(radii, vec![4, 6]);

    let search = FilterParams::new().with("search", "beacon-5");
    assert_eq!(beacons.get_count_by_params(None, Some(&search)).await?, 1);

    beacons.delete_by_params(None, Some(&FilterParams::new().with("min_radius", 6))).await?;
    assert_eq!(beacons.get_count_by_params(None, None).await?, 6);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_default_builder_for_updates() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    let created = beacons.create(None, generate_beacons(1).remove(0)).await?;
    let id = created.id.clone().unwrap_or_default();

    let updated = beacons
        .update_partially(None, &id, &UpdateParams::new().with("label", "renamed").with("radius", 42))
        .await?;
    let updated = updated.unwrap_or_default();
    assert_eq!(updated.label, "renamed");
    assert_eq!(updated.radius, 42);
    assert_eq!(updated.kind, created.kind);

    let modified = beacons
        .modify_by_params(
            None,
            Some(&FilterParams::new().with("label", "renamed")),
            Some(&UpdateParams::new().with("kind", "odd")),
        )
        .await?;
    assert_eq!(modified.map(|b| b.kind), Some("odd".to_string()));

    cleanup(ctx).await
}
