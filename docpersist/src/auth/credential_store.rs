use crate::config::{ConfigParams, CredentialParams};
use crate::errors::PersistenceResult;
use async_trait::async_trait;
use dashmap::DashMap;

/// Secure storage for credentials, addressed by a store key.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Stores a credential under `key`; [None] removes it.
    async fn store(
        &self,
        correlation_id: Option<&str>,
        key: &str,
        credential: Option<CredentialParams>,
    ) -> PersistenceResult<()>;

    /// Looks up the credential stored under `key`.
    async fn lookup(
        &self,
        correlation_id: Option<&str>,
        key: &str,
    ) -> PersistenceResult<Option<CredentialParams>>;
}

/// Credential store that keeps credentials in memory. Every top-level
/// configuration section is a key holding one credential.
#[derive(Default)]
pub struct MemoryCredentialStore {
    items: DashMap<String, CredentialParams>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        MemoryCredentialStore {
            items: DashMap::new(),
        }
    }

    pub fn from_config(config: &ConfigParams) -> Self {
        let store = MemoryCredentialStore::new();
        store.configure(config);
        store
    }

    pub fn configure(&self, config: &ConfigParams) {
        for name in config.section_names() {
            let section = config.get_section(&name);
            if !section.is_empty() {
                self.items.insert(name, CredentialParams::from_config(&section));
            }
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn store(
        &self,
        correlation_id: Option<&str>,
        key: &str,
        credential: Option<CredentialParams>,
    ) -> PersistenceResult<()> {
        match credential {
            Some(credential) => {
                self.items.insert(key.to_string(), credential);
            }
            None => {
                self.items.remove(key);
            }
        }
        log::trace!("[{}] Updated credential {}", correlation_id.unwrap_or_default(), key);
        Ok(())
    }

    async fn lookup(
        &self,
        _correlation_id: Option<&str>,
        key: &str,
    ) -> PersistenceResult<Option<CredentialParams>> {
        Ok(self.items.get(key).map(|credential| credential.value().clone()))
    }
}
