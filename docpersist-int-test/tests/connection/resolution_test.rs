// Configuration, discovery and credential store resolution

use docpersist::auth::{
    ConnectionResolver, CredentialResolver, CredentialStore, Discovery, MemoryCredentialStore, MemoryDiscovery,
};
use docpersist::config::{ConfigParams, ConnectionParams, CredentialParams};
use docpersist::connection::{DocumentConnection, DocumentConnectionResolver};
use docpersist::errors::{ErrorKind, PersistenceResult};
use docpersist::memory::MemoryDriver;
use std::sync::Arc;

#[tokio::test]
async fn test_multiple_connections_from_config() -> PersistenceResult<()> {
    let resolver = DocumentConnectionResolver::from_config(&ConfigParams::from_tuples([
        ("connections.a.host", "a"),
        ("connections.a.port", "1000"),
        ("connections.a.database", "d"),
        ("connections.b.host", "b"),
        ("connections.b.port", "2000"),
        ("connections.b.database", "d"),
        ("connections.b.replicaSet", "rs0"),
    ]));

    let uri = resolver.resolve(Some("123")).await?;
    assert_eq!(uri, "mongodb://a:1000,b:2000/d?replicaSet=rs0");
    Ok(())
}

#[tokio::test]
async fn test_discovery_replaces_descriptor_in_place() -> PersistenceResult<()> {
    let discovery = Arc::new(MemoryDiscovery::new());
    discovery
        .register(None, "cluster", ConnectionParams::new().with_host("d1").with_port(1).with_database("app"))
        .await?;
    discovery
        .register(None, "cluster", ConnectionParams::new().with_host("d2").with_port(2).with_database("app"))
        .await?;

    let mut resolver = ConnectionResolver::new().with_discovery(discovery);
    resolver.add(ConnectionParams::new().with_host("first").with_port(9).with_database("app"));
    resolver.add(ConnectionParams::new().with_discovery_key("cluster"));

    let hosts: Vec<String> = resolver
        .resolve_all(None)
        .await?
        .iter()
        .filter_map(|connection| connection.host())
        .collect();
    assert_eq!(hosts, vec!["first", "d1", "d2"]);
    Ok(())
}

#[tokio::test]
async fn test_discovery_key_without_service_cannot_resolve() {
    let resolver = ConnectionResolver::from_config(&ConfigParams::from_tuples([("connection.discovery_key", "cluster")]));
    let err = resolver.resolve_all(Some("abc")).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::CannotResolve);
    assert_eq!(err.correlation_id(), Some("abc"));

    let credentials = CredentialResolver::from_config(&ConfigParams::from_tuples([("credential.store_key", "vault")]));
    assert_eq!(credentials.lookup(None).await.unwrap_err().kind(), &ErrorKind::CannotResolve);
}

#[tokio::test]
async fn test_credential_lookup_order() -> PersistenceResult<()> {
    let store = Arc::new(MemoryCredentialStore::new());
    store
        .store(None, "vault", Some(CredentialParams::new().with_username("admin").with_password("secret")))
        .await?;

    let mut resolver = CredentialResolver::new().with_store(store.clone());
    resolver.add(CredentialParams::new().with_store_key("missing"));
    resolver.add(CredentialParams::new().with_store_key("vault"));
    resolver.add(CredentialParams::new().with_username("inline"));

    let credential = resolver.lookup(None).await?;
    assert_eq!(credential.and_then(|c| c.username()), Some("admin".to_string()));

    store.store(None, "vault", None).await?;
    let credential = resolver.lookup(None).await?;
    assert_eq!(credential.and_then(|c| c.username()), Some("inline".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_builder_wires_discovery_and_store() -> PersistenceResult<()> {
    let discovery = Arc::new(MemoryDiscovery::from_config(&ConfigParams::from_tuples([
        ("cluster.host", "db1"),
        ("cluster.port", "27017"),
        ("cluster.database", "app"),
    ])));
    let store = Arc::new(MemoryCredentialStore::from_config(&ConfigParams::from_tuples([
        ("vault.username", "admin"),
        ("vault.password", "secret"),
    ])));

    let connection = DocumentConnection::builder()
        .driver(MemoryDriver::new())
        .config(ConfigParams::from_tuples([
            ("connection.discovery_key", "cluster"),
            ("credential.store_key", "vault"),
        ]))
        .discovery(discovery)
        .credential_store(store)
        .build()?;

    connection.open(Some("wired")).await?;
    assert_eq!(connection.get_database_name(), Some("app".to_string()));
    connection.close(Some("wired")).await
}

#[tokio::test]
async fn test_config_from_json() -> PersistenceResult<()> {
    let config = ConfigParams::from_json(&serde_json::json!({
        "connection": { "uri": "mongodb://localhost:27017/json" },
        "options": { "max_page_size": 25 }
    }));

    let connection = DocumentConnection::builder().driver(MemoryDriver::new()).config(config).build()?;
    assert_eq!(connection.options().max_page_size, 25);
    connection.open(None).await?;
    assert_eq!(connection.get_database_name(), Some("json".to_string()));
    connection.close(None).await
}
