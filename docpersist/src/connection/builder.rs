use crate::auth::{CredentialStore, Discovery};
use crate::config::{ConfigParams, ConnectionParams, CredentialParams};
use crate::connection::{ConnectionOptions, DocumentConnection, DocumentConnectionResolver};
use crate::driver::DocumentDriver;
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use std::sync::Arc;

/// Builder for a [DocumentConnection].
///
/// A driver is required. Configuration supplies the connections, credentials and
/// options; explicit [`ConnectionParams`] or [`CredentialParams`] bypass
/// configuration-based resolution entirely.
///
/// ```rust,ignore
/// let connection = DocumentConnection::builder()
///     .driver(MemoryDriver::new())
///     .config(config)
///     .discovery(Arc::new(MemoryDiscovery::new()))
///     .build()?;
/// ```
#[derive(Default)]
pub struct DocumentConnectionBuilder {
    driver: Option<Arc<dyn DocumentDriver>>,
    config: ConfigParams,
    discovery: Option<Arc<dyn Discovery>>,
    credential_store: Option<Arc<dyn CredentialStore>>,
    connection: Option<ConnectionParams>,
    credential: Option<CredentialParams>,
    options: Option<ConnectionOptions>,
}

impl DocumentConnectionBuilder {
    pub fn new() -> Self {
        DocumentConnectionBuilder::default()
    }

    pub fn driver<T: DocumentDriver + 'static>(mut self, driver: T) -> Self {
        self.driver = Some(Arc::new(driver));
        self
    }

    pub fn shared_driver(mut self, driver: Arc<dyn DocumentDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Merges `config` over any configuration set before.
    pub fn config(mut self, config: ConfigParams) -> Self {
        self.config = self.config.override_with(&config);
        self
    }

    pub fn discovery(mut self, discovery: Arc<dyn Discovery>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    /// Uses this connection instead of resolving one from configuration.
    pub fn connection(mut self, connection: ConnectionParams) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Uses this credential instead of resolving one from configuration.
    pub fn credential(mut self, credential: CredentialParams) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Overrides the options read from configuration.
    pub fn options(mut self, options: ConnectionOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn build(self) -> PersistenceResult<DocumentConnection> {
        let Some(driver) = self.driver else {
            log::error!("Document driver is not set");
            return Err(PersistenceError::new(
                "Document driver is not set",
                ErrorKind::InvalidOperation,
            ));
        };

        let options = self
            .options
            .unwrap_or_else(|| ConnectionOptions::from_config(&self.config));

        let mut resolver = DocumentConnectionResolver::from_config(&self.config);
        if let Some(discovery) = self.discovery {
            resolver.set_discovery(discovery);
        }
        if let Some(store) = self.credential_store {
            resolver.set_credential_store(store);
        }

        Ok(DocumentConnection::new(
            driver,
            resolver,
            self.connection,
            self.credential,
            options,
        ))
    }
}
