// Connection string composition and validation

use docpersist::config::{ConnectionParams, CredentialParams};
use docpersist::connection::{validate_connections, UriComposer};
use docpersist::errors::ErrorKind;

#[test]
fn test_uri_passes_through_unchanged() {
    let composer = UriComposer::default();
    let connections = vec![ConnectionParams::new().with_uri("mongodb://h:1/d?x=1")];
    assert_eq!(composer.compose(&connections, None), "mongodb://h:1/d?x=1");
}

#[test]
fn test_hosts_are_merged_in_order() {
    let composer = UriComposer::default();
    let connections = vec![
        ConnectionParams::new().with_host("a").with_port(1000).with_database("d"),
        ConnectionParams::new().with_host("b").with_port(2000),
    ];
    assert_eq!(composer.compose(&connections, None), "mongodb://a:1000,b:2000/d");
}

#[test]
fn test_last_database_wins() {
    let composer = UriComposer::default();
    let connections = vec![
        ConnectionParams::new().with_host("a").with_port(1).with_database("d1"),
        ConnectionParams::new().with_host("b").with_port(2).with_database("d2"),
    ];
    assert!(composer.compose(&connections, None).ends_with("/d2"));
}

#[test]
fn test_auth_rendering() {
    let composer = UriComposer::default();
    let connections = vec![ConnectionParams::new().with_host("h").with_port(1).with_database("d")];

    let full = CredentialParams::new().with_username("u").with_password("p");
    assert_eq!(composer.compose(&connections, Some(&full)), "mongodb://u:p@h:1/d");

    let user_only = CredentialParams::new().with_username("u");
    assert_eq!(composer.compose(&connections, Some(&user_only)), "mongodb://u@h:1/d");

    assert_eq!(composer.compose(&connections, None), "mongodb://h:1/d");
}

#[test]
fn test_reserved_keys_are_not_forwarded_as_options() {
    let composer = UriComposer::default();
    let connections = vec![ConnectionParams::new()
        .with_host("h")
        .with_port(1)
        .with_database("d")
        .with_param("replicaSet", "rs0")];
    let credential = CredentialParams::new()
        .with_username("u")
        .with_password("p")
        .with_param("authSource", "admin");

    let uri = composer.compose(&connections, Some(&credential));
    assert_eq!(uri, "mongodb://u:p@h:1/d?replicaSet=rs0&authSource=admin");
    let (_, options) = uri.split_once('?').unwrap();
    for reserved in ["host=", "port=", "database=", "username=", "password="] {
        assert!(!options.contains(reserved), "{} leaked into {}", reserved, uri);
    }
}

#[test]
fn test_custom_scheme() {
    let composer = UriComposer::new("mongodb+srv");
    let connections = vec![ConnectionParams::new().with_host("cluster").with_database("d")];
    assert_eq!(composer.compose(&connections, None), "mongodb+srv://cluster/d");
}

#[test]
fn test_validation_failures() {
    let err = validate_connections(Some("123"), &[]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::NoConnection);
    assert_eq!(err.correlation_id(), Some("123"));

    let no_database = [ConnectionParams::new().with_host("h").with_port(1)];
    assert_eq!(
        validate_connections(None, &no_database).unwrap_err().kind(),
        &ErrorKind::NoDatabase
    );

    let no_host = [ConnectionParams::new().with_port(1).with_database("d")];
    assert_eq!(validate_connections(None, &no_host).unwrap_err().kind(), &ErrorKind::NoHost);

    let no_port = [ConnectionParams::new().with_host("h").with_database("d")];
    assert_eq!(validate_connections(None, &no_port).unwrap_err().kind(), &ErrorKind::NoPort);

    let with_uri = [ConnectionParams::new().with_uri("mongodb://h/d")];
    assert!(validate_connections(None, &with_uri).is_ok());
}
