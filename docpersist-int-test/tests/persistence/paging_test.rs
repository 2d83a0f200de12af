// Paged reads

use docpersist::data::{PagingParams, SortParams};
use docpersist::errors::PersistenceResult;
use docpersist::query::{field, Filter, Sort};
use docpersist_int_test::test_util::{cleanup, create_test_context, create_test_context_with, generate_beacons, test_config};

#[tokio::test]
async fn test_default_paging_is_capped_without_total() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons().with_max_page_size(5);
    for beacon in generate_beacons(12) {
        beacons.create(None, beacon).await?;
    }

    let page = beacons.get_page_by_filter(None, Filter::All, None, None).await?;
    assert_eq!(page.len(), 5);
    assert_eq!(page.total, None);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_take_is_capped_at_max_page_size() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons().with_max_page_size(4);
    for beacon in generate_beacons(10) {
        beacons.create(None, beacon).await?;
    }

    let page = beacons
        .get_page_by_filter(None, Filter::All, Some(PagingParams::new(None, Some(50), false)), None)
        .await?;
    assert_eq!(page.len(), 4);

    let page = beacons
        .get_page_by_filter(None, Filter::All, Some(PagingParams::new(None, Some(2), false)), None)
        .await?;
    assert_eq!(page.len(), 2);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_skip_sort_and_total() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    for beacon in generate_beacons(10) {
        beacons.create(None, beacon).await?;
    }

    let page = beacons
        .get_page_by_filter(
            Some("p1"),
            field("kind").eq("even"),
            Some(PagingParams::new(Some(1), Some(2), true)),
            Some(Sort::descending("radius")),
        )
        .await?;
    let radii: Vec<i64> = page.data.iter().map(|b| b.radius).collect();
    assert_eq!(radii, vec![6, 4]);
    assert_eq!(page.total, Some(5));

    let past_end = beacons
        .get_page_by_filter(None, Filter::All, Some(PagingParams::new(Some(100), None, true)), None)
        .await?;
    assert!(past_end.is_empty());
    assert_eq!(past_end.total, Some(10));

    cleanup(ctx).await
}

#[tokio::test]
async fn test_max_page_size_from_configuration() -> PersistenceResult<()> {
    let mut config = test_config();
    config.set("options.max_page_size", 3);
    let ctx = create_test_context_with(config).await?;
    let beacons = ctx.beacons();
    assert_eq!(beacons.max_page_size(), 3);

    for beacon in generate_beacons(5) {
        beacons.create(None, beacon).await?;
    }
    let page = beacons
        .get_page_by_params(None, None, None, Some(&SortParams::new().ascending("radius")))
        .await?;
    let radii: Vec<i64> = page.data.iter().map(|b| b.radius).collect();
    assert_eq!(radii, vec![0, 1, 2]);

    cleanup(ctx).await
}
