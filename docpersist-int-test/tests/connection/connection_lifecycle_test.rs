// DocumentConnection open/close behavior

use docpersist::config::{ConfigParams, ConnectionParams, CredentialParams};
use docpersist::connection::DocumentConnection;
use docpersist::errors::{ErrorKind, PersistenceResult};
use docpersist::memory::MemoryDriver;
use docpersist_int_test::test_util::{
    cleanup, create_test_context, test_config, Beacon, FlakyDriver, StallingDriver,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_open_exposes_database() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let connection = ctx.connection();

    assert!(connection.is_open());
    assert_eq!(connection.get_database_name(), Some("test".to_string()));
    assert_eq!(connection.get_database().map(|db| db.name().to_string()), Some("test".to_string()));
    assert!(connection.get_connection().is_some());

    cleanup(ctx).await
}

#[tokio::test]
async fn test_accessors_are_empty_before_open() -> PersistenceResult<()> {
    let connection = DocumentConnection::builder()
        .driver(MemoryDriver::new())
        .config(test_config())
        .build()?;

    assert!(!connection.is_open());
    assert!(connection.get_connection().is_none());
    assert!(connection.get_database().is_none());
    assert!(connection.get_database_name().is_none());
    Ok(())
}

#[tokio::test]
async fn test_close_is_idempotent() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let connection = ctx.connection().clone();

    connection.close(Some("1")).await?;
    connection.close(Some("2")).await?;
    assert!(!connection.is_open());
    assert!(connection.get_database().is_none());
    Ok(())
}

#[tokio::test]
async fn test_open_twice_keeps_connection() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let before = ctx.connection().get_connection();
    ctx.connection().open(None).await?;
    let after = ctx.connection().get_connection();

    assert!(matches!((before, after), (Some(a), Some(b)) if Arc::ptr_eq(&a, &b)));
    cleanup(ctx).await
}

#[tokio::test]
async fn test_failed_open_is_retryable() -> PersistenceResult<()> {
    let driver = Arc::new(FlakyDriver::new(1));
    let connection = DocumentConnection::builder()
        .shared_driver(driver.clone())
        .config(test_config())
        .build()?;

    let err = connection.open(Some("retry")).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ConnectFailed);
    assert_eq!(err.cause().map(|cause| cause.kind()), Some(&ErrorKind::BackendError));
    assert!(!connection.is_open());

    connection.open(Some("retry")).await?;
    assert!(connection.is_open());
    assert_eq!(driver.attempts(), 2);

    connection.close(Some("retry")).await
}

#[tokio::test]
async fn test_abandoned_open_is_retryable() -> PersistenceResult<()> {
    let driver = Arc::new(StallingDriver::new(1));
    let connection = DocumentConnection::builder()
        .shared_driver(driver.clone())
        .config(test_config())
        .build()?;

    let timed_out = tokio::time::timeout(Duration::from_millis(50), connection.open(Some("stall"))).await;
    assert!(timed_out.is_err());
    assert!(!connection.is_open());

    connection.open(Some("stall")).await?;
    assert!(connection.is_open());
    assert_eq!(connection.get_database_name(), Some("test".to_string()));
    assert_eq!(driver.attempts(), 2);

    connection.close(Some("stall")).await
}

#[tokio::test]
async fn test_configuration_errors_never_reach_driver() -> PersistenceResult<()> {
    let driver = Arc::new(FlakyDriver::new(0));
    let connection = DocumentConnection::builder()
        .shared_driver(driver.clone())
        .config(ConfigParams::from_tuples([("connection.port", "27017")]))
        .build()?;

    let err = connection.open(None).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::NoHost);
    assert!(err.kind().is_config_error());
    assert_eq!(driver.attempts(), 0);
    Ok(())
}

#[tokio::test]
async fn test_explicit_parameters_override_configuration() -> PersistenceResult<()> {
    let connection = DocumentConnection::builder()
        .driver(MemoryDriver::new())
        .config(ConfigParams::from_tuples([("connection.database", "ignored")]))
        .connection(ConnectionParams::new().with_host("h").with_port(1).with_database("explicit"))
        .credential(CredentialParams::new().with_username("u").with_password("p"))
        .build()?;

    connection.open(None).await?;
    assert_eq!(connection.get_database_name(), Some("explicit".to_string()));
    connection.close(None).await
}

#[tokio::test]
async fn test_data_survives_reopen_on_same_driver() -> PersistenceResult<()> {
    let ctx = create_test_context().await?;
    let beacons = ctx.beacons();
    let created = beacons.create(None, Beacon::new("north", "even", 1)).await?;

    ctx.connection().close(None).await?;
    assert_eq!(
        beacons.get_count_by_filter(None, docpersist::query::Filter::All).await.unwrap_err().kind(),
        &ErrorKind::NotOpened
    );

    ctx.connection().open(None).await?;
    let id = created.id.clone().unwrap_or_default();
    assert_eq!(beacons.get_one_by_id(None, &id).await?, Some(created));
    assert_eq!(ctx.driver().database_names(), vec!["test".to_string()]);

    cleanup(ctx).await
}
