// Projected reads never expose the storage id

use docpersist::common::{Value, DOC_ID};
use docpersist::data::{PagingParams, ProjectionParams};
use docpersist::errors::PersistenceResult;
use docpersist::query::{Filter, Projection, Sort};
use docpersist_int_test::test_util::{cleanup, create_test_context, generate_beacons, Counter};

#[tokio::test]
async fn test_projection_never_contains_storage_id() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    for beacon in generate_beacons(4) {
        beacons.create(None, beacon).await?;
    }

    let projections = [
        None,
        Some(Projection::new()),
        Some(Projection::new().include("label")),
        Some(Projection::new().include("label").include(DOC_ID)),
        Some(Projection::new().exclude("kind")),
        Some(Projection::new().include("id")),
    ];
    for projection in projections {
        let page = beacons
            .get_page_by_filter_and_projection(None, Filter::All, None, None, projection.clone())
            .await?;
        assert_eq!(page.len(), 4, "{:?}", projection);
        for document in &page.data {
            assert!(!document.contains_key(DOC_ID), "{:?} leaked into {:?}", projection, document);
        }
    }

    cleanup(ctx).await
}

#[tokio::test]
async fn test_requesting_id_field_reincludes_id() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    let created = beacons
        .create(None, generate_beacons(1).remove(0).with_id("b0"))
        .await?;

    let page = beacons
        .get_page_by_params_and_projection(
            None,
            None,
            Some(PagingParams::new(None, None, true)),
            None,
            Some(&ProjectionParams::from_csv("id,label")),
        )
        .await?;
    assert_eq!(page.total, Some(1));
    assert_eq!(page.data[0].get("id"), Some(Value::from("b0")));
    assert_eq!(page.data[0].get("label"), Some(Value::from(created.label)));
    assert_eq!(page.data[0].size(), 2);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_custom_id_field_projection() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let counters = ctx.counters();
    for key in [3, 1, 2] {
        counters.create(None, Counter::new(key, &format!("c{}", key), key * 10)).await?;
    }

    let page = counters
        .get_page_by_filter_and_projection(
            None,
            Filter::All,
            None,
            Some(Sort::ascending("key")),
            Some(Projection::new().include("key")),
        )
        .await?;
    let keys: Vec<Value> = page.data.iter().filter_map(|d| d.get("key")).collect();
    assert_eq!(keys, vec![Value::from(1), Value::from(2), Value::from(3)]);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_empty_projected_documents_are_skipped() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    for beacon in generate_beacons(3) {
        beacons.create(None, beacon).await?;
    }

    let page = beacons
        .get_page_by_filter_and_projection(None, Filter::All, None, None, Some(Projection::new().include("missing")))
        .await?;
    assert!(page.is_empty());

    let one = beacons
        .get_one_by_id_with_projection(None, &"nope".to_string(), Projection::new().include("label"))
        .await?;
    assert!(one.is_none());

    cleanup(ctx).await
}

#[tokio::test]
async fn test_storage_id_alone_projects_to_nothing() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    beacons.create(None, generate_beacons(1).remove(0).with_id("b0")).await?;

    let page = beacons
        .get_page_by_params_and_projection(None, None, None, None, Some(&ProjectionParams::from_csv("_id")))
        .await?;
    assert!(page.is_empty(), "{:?}", page.data);

    let page = beacons
        .get_page_by_filter_and_projection(None, Filter::All, None, None, Some(Projection::new().include(DOC_ID)))
        .await?;
    assert!(page.is_empty(), "{:?}", page.data);

    let one = beacons
        .get_one_by_id_with_projection(None, &"b0".to_string(), Projection::new().include(DOC_ID))
        .await?;
    assert!(one.is_none());

    let with_label = beacons
        .get_one_by_id_with_projection(None, &"b0".to_string(), Projection::new().include(DOC_ID).include("label"))
        .await?;
    assert_eq!(with_label.map(|d| d.fields()), Some(vec!["label".to_string()]));

    cleanup(ctx).await
}
