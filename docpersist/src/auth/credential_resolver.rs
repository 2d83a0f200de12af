use crate::auth::CredentialStore;
use crate::config::{ConfigParams, CredentialParams};
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use std::sync::Arc;

/// Gathers the credentials of a component and picks the one to use.
///
/// Credentials are tried in order: an inline credential is used as is, a
/// credential with a `store_key` is looked up in the [CredentialStore] and merged
/// over the original. The first credential found wins.
#[derive(Clone, Default)]
pub struct CredentialResolver {
    credentials: Vec<CredentialParams>,
    store: Option<Arc<dyn CredentialStore>>,
}

impl CredentialResolver {
    pub fn new() -> Self {
        CredentialResolver {
            credentials: Vec::new(),
            store: None,
        }
    }

    pub fn from_config(config: &ConfigParams) -> Self {
        let mut resolver = CredentialResolver::new();
        resolver.configure(config);
        resolver
    }

    pub fn configure(&mut self, config: &ConfigParams) {
        self.credentials
            .extend(CredentialParams::many_from_config(config));
    }

    pub fn set_store(&mut self, store: Arc<dyn CredentialStore>) {
        self.store = Some(store);
    }

    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.set_store(store);
        self
    }

    pub fn add(&mut self, credential: CredentialParams) {
        self.credentials.push(credential);
    }

    pub fn get_all(&self) -> &[CredentialParams] {
        &self.credentials
    }

    /// Returns the credential to authenticate with, or [None] when no credential
    /// is configured or none of the stored ones exists.
    ///
    /// # Errors
    ///
    /// Returns `CannotResolve` when a credential needs a credential store and
    /// none is set.
    pub async fn lookup(&self, correlation_id: Option<&str>) -> PersistenceResult<Option<CredentialParams>> {
        for credential in &self.credentials {
            let Some(key) = credential.store_key() else {
                return Ok(Some(credential.clone()));
            };

            let Some(store) = &self.store else {
                log::error!(
                    "[{}] Credential store is not set to resolve credential {}",
                    correlation_id.unwrap_or_default(),
                    key
                );
                return Err(PersistenceError::new(
                    &format!("Credential store is not set to resolve credential {}", key),
                    ErrorKind::CannotResolve,
                )
                .with_correlation_id(correlation_id));
            };

            if let Some(found) = store.lookup(correlation_id, &key).await? {
                let mut merged = credential.clone();
                merged.merge(found.parameters());
                return Ok(Some(merged));
            }
            log::trace!("[{}] Credential {} was not found in the store", correlation_id.unwrap_or_default(), key);
        }
        Ok(None)
    }
}
