use crate::common::PARAM_URI;
use crate::config::{ConfigParams, ConnectionParams};
use crate::errors::PersistenceResult;
use async_trait::async_trait;
use dashmap::DashMap;

/// Service that maps discovery keys to connection descriptors.
///
/// A connection configured with a `discovery_key` is not used as given; it is
/// replaced by whatever the discovery service returns for that key.
#[async_trait]
pub trait Discovery: Send + Sync {
    /// Registers a connection under `key`, keeping previously registered ones.
    async fn register(
        &self,
        correlation_id: Option<&str>,
        key: &str,
        connection: ConnectionParams,
    ) -> PersistenceResult<()>;

    /// Returns the first connection registered under `key`.
    async fn resolve_one(
        &self,
        correlation_id: Option<&str>,
        key: &str,
    ) -> PersistenceResult<Option<ConnectionParams>>;

    /// Returns every connection registered under `key`, in registration order.
    async fn resolve_all(
        &self,
        correlation_id: Option<&str>,
        key: &str,
    ) -> PersistenceResult<Vec<ConnectionParams>>;
}

/// Discovery service that keeps its registrations in memory.
///
/// It can be filled from configuration where every top-level section is a key
/// and holds one connection, and every plain key holds a connection uri:
///
/// ```rust,ignore
/// let discovery = MemoryDiscovery::from_config(&ConfigParams::from_tuples([
///     ("main.host", "localhost"),
///     ("main.port", "27017"),
///     ("main.database", "test"),
///     ("reporting", "mongodb://reports:27017/stats"),
/// ]));
/// ```
#[derive(Default)]
pub struct MemoryDiscovery {
    items: DashMap<String, Vec<ConnectionParams>>,
}

impl MemoryDiscovery {
    pub fn new() -> Self {
        MemoryDiscovery {
            items: DashMap::new(),
        }
    }

    pub fn from_config(config: &ConfigParams) -> Self {
        let discovery = MemoryDiscovery::new();
        discovery.configure(config);
        discovery
    }

    /// Adds the registrations described by `config`.
    pub fn configure(&self, config: &ConfigParams) {
        for (key, value) in config.iter() {
            if !key.contains('.') && !value.trim().is_empty() {
                self.add(key, ConnectionParams::new().with_param(PARAM_URI, value.as_str()));
            }
        }

        for name in config.section_names() {
            let section = config.get_section(&name);
            if !section.is_empty() {
                self.add(&name, ConnectionParams::from_config(&section));
            }
        }
    }

    fn add(&self, key: &str, connection: ConnectionParams) {
        self.items.entry(key.to_string()).or_default().push(connection);
    }
}

#[async_trait]
impl Discovery for MemoryDiscovery {
    async fn register(
        &self,
        correlation_id: Option<&str>,
        key: &str,
        connection: ConnectionParams,
    ) -> PersistenceResult<()> {
        log::trace!("[{}] Registered connection under discovery key {}", correlation_id.unwrap_or_default(), key);
        self.add(key, connection);
        Ok(())
    }

    async fn resolve_one(
        &self,
        _correlation_id: Option<&str>,
        key: &str,
    ) -> PersistenceResult<Option<ConnectionParams>> {
        Ok(self
            .items
            .get(key)
            .and_then(|connections| connections.first().cloned()))
    }

    async fn resolve_all(
        &self,
        _correlation_id: Option<&str>,
        key: &str,
    ) -> PersistenceResult<Vec<ConnectionParams>> {
        Ok(self
            .items
            .get(key)
            .map(|connections| connections.value().clone())
            .unwrap_or_default())
    }
}
