use crate::auth::Discovery;
use crate::common::PARAM_DISCOVERY_KEY;
use crate::config::{ConfigParams, ConnectionParams};
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use std::sync::Arc;

/// Gathers the connection descriptors of a component.
///
/// Descriptors are read from configuration (see
/// [`ConnectionParams::many_from_config`]) or added directly. A descriptor with a
/// `discovery_key` is replaced, in place, by the connections the [Discovery]
/// service returns for that key, each merged over the original descriptor.
#[derive(Clone, Default)]
pub struct ConnectionResolver {
    connections: Vec<ConnectionParams>,
    discovery: Option<Arc<dyn Discovery>>,
}

impl ConnectionResolver {
    pub fn new() -> Self {
        ConnectionResolver {
            connections: Vec::new(),
            discovery: None,
        }
    }

    pub fn from_config(config: &ConfigParams) -> Self {
        let mut resolver = ConnectionResolver::new();
        resolver.configure(config);
        resolver
    }

    /// Appends the descriptors found in `config`.
    pub fn configure(&mut self, config: &ConfigParams) {
        self.connections
            .extend(ConnectionParams::many_from_config(config));
    }

    pub fn set_discovery(&mut self, discovery: Arc<dyn Discovery>) {
        self.discovery = Some(discovery);
    }

    pub fn with_discovery(mut self, discovery: Arc<dyn Discovery>) -> Self {
        self.set_discovery(discovery);
        self
    }

    pub fn add(&mut self, connection: ConnectionParams) {
        self.connections.push(connection);
    }

    /// Returns the descriptors as configured, without any lookup.
    pub fn get_all(&self) -> &[ConnectionParams] {
        &self.connections
    }

    /// Registers the first discovery-backed descriptor with the discovery service.
    pub async fn register(&self, correlation_id: Option<&str>) -> PersistenceResult<()> {
        let Some(connection) = self.connections.iter().find(|it| it.uses_discovery()) else {
            return Ok(());
        };
        let Some(discovery) = &self.discovery else {
            return Ok(());
        };

        let key = connection.discovery_key().unwrap_or_default();
        let mut registered = connection.clone();
        registered.remove(PARAM_DISCOVERY_KEY);
        discovery.register(correlation_id, &key, registered).await
    }

    /// Resolves every descriptor, looking discovery-backed ones up.
    ///
    /// # Errors
    ///
    /// Returns `CannotResolve` when a descriptor needs discovery and no discovery
    /// service is set. Discovery failures propagate unchanged.
    pub async fn resolve_all(&self, correlation_id: Option<&str>) -> PersistenceResult<Vec<ConnectionParams>> {
        let mut resolved = Vec::with_capacity(self.connections.len());
        for connection in &self.connections {
            match connection.discovery_key() {
                None => resolved.push(connection.clone()),
                Some(key) => {
                    let discovery = self.discovery(correlation_id, &key)?;
                    for found in discovery.resolve_all(correlation_id, &key).await? {
                        let mut merged = connection.clone();
                        merged.merge(found.parameters());
                        resolved.push(merged);
                    }
                }
            }
        }
        Ok(resolved)
    }

    /// Resolves a single descriptor: the first one that needs no lookup, or the
    /// first one discovery knows about.
    pub async fn resolve(&self, correlation_id: Option<&str>) -> PersistenceResult<Option<ConnectionParams>> {
        if let Some(connection) = self.connections.iter().find(|it| !it.uses_discovery()) {
            return Ok(Some(connection.clone()));
        }

        for connection in &self.connections {
            let key = connection.discovery_key().unwrap_or_default();
            let discovery = self.discovery(correlation_id, &key)?;
            if let Some(found) = discovery.resolve_one(correlation_id, &key).await? {
                let mut merged = connection.clone();
                merged.merge(found.parameters());
                return Ok(Some(merged));
            }
        }
        Ok(None)
    }

    fn discovery(&self, correlation_id: Option<&str>, key: &str) -> PersistenceResult<&Arc<dyn Discovery>> {
        match &self.discovery {
            Some(discovery) => Ok(discovery),
            None => {
                log::error!(
                    "[{}] Discovery is not set to resolve connection {}",
                    correlation_id.unwrap_or_default(),
                    key
                );
                Err(PersistenceError::new(
                    &format!("Discovery is not set to resolve connection {}", key),
                    ErrorKind::CannotResolve,
                )
                .with_correlation_id(correlation_id))
            }
        }
    }
}
