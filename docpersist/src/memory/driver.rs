use crate::connection::ConnectionOptions;
use crate::driver::{DatabaseHandle, DocumentClient, DocumentDriver};
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use crate::memory::MemoryDatabase;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-process driver keeping every database in memory.
///
/// Clones of a driver share their databases, so data written through one client
/// is visible to every later client of the same driver, including after a
/// connection is closed and opened again. Nothing is persisted.
///
/// The connection string must have the form
/// `scheme://[auth@]host[:port][,host[:port]...][/database][?options]`; its
/// database becomes the client's default database.
#[derive(Clone, Default)]
pub struct MemoryDriver {
    inner: Arc<MemoryDriverInner>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        MemoryDriver::default()
    }

    /// Returns the database `name`, creating it when needed.
    pub fn database(&self, name: &str) -> MemoryDatabase {
        self.inner.database(name)
    }

    pub fn database_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .databases
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl DocumentDriver for MemoryDriver {
    async fn connect(&self, uri: &str, options: &ConnectionOptions) -> PersistenceResult<Arc<dyn DocumentClient>> {
        let parsed = ParsedUri::parse(uri)?;
        if options.debug {
            log::debug!(
                "Memory driver connected to {} with {} option(s) (pool size {}, timeout {:?})",
                parsed.hosts.join(","),
                parsed.options.len(),
                options.max_pool_size,
                options.connect_timeout
            );
        }

        Ok(Arc::new(MemoryClient {
            driver: self.clone(),
            default_database: parsed.database,
            closed: AtomicBool::new(false),
        }))
    }
}

#[derive(Default)]
struct MemoryDriverInner {
    databases: DashMap<String, MemoryDatabase>,
}

impl MemoryDriverInner {
    fn database(&self, name: &str) -> MemoryDatabase {
        self.databases
            .entry(name.to_string())
            .or_insert_with(|| MemoryDatabase::new(name))
            .value()
            .clone()
    }
}

/// Client returned by [MemoryDriver].
pub struct MemoryClient {
    driver: MemoryDriver,
    default_database: Option<String>,
    closed: AtomicBool,
}

impl MemoryClient {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DocumentClient for MemoryClient {
    fn default_database(&self) -> Option<Arc<dyn DatabaseHandle>> {
        let name = self.default_database.as_deref()?;
        Some(Arc::new(self.driver.database(name)))
    }

    fn database(&self, name: &str) -> Arc<dyn DatabaseHandle> {
        Arc::new(self.driver.database(name))
    }

    async fn close(&self) -> PersistenceResult<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// The parts of a connection string the memory driver cares about.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParsedUri {
    pub(crate) hosts: Vec<String>,
    pub(crate) database: Option<String>,
    pub(crate) options: Vec<(String, String)>,
}

impl ParsedUri {
    pub(crate) fn parse(uri: &str) -> PersistenceResult<ParsedUri> {
        let Some((scheme, rest)) = uri.split_once("://") else {
            return Err(invalid_uri(uri, "missing scheme separator"));
        };
        if scheme.is_empty() {
            return Err(invalid_uri(uri, "missing scheme"));
        }

        let (address, query) = match rest.split_once('?') {
            Some((address, query)) => (address, Some(query)),
            None => (rest, None),
        };
        let (authority, database) = match address.split_once('/') {
            Some((authority, database)) => (authority, Some(database)),
            None => (address, None),
        };
        let hosts_part = match authority.rsplit_once('@') {
            Some((_, hosts)) => hosts,
            None => authority,
        };

        let hosts: Vec<String> = hosts_part
            .split(',')
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .map(str::to_string)
            .collect();
        if hosts.is_empty() {
            return Err(invalid_uri(uri, "no hosts"));
        }

        let options = query
            .unwrap_or_default()
            .split('&')
            .filter(|option| !option.is_empty())
            .map(|option| match option.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (option.to_string(), String::new()),
            })
            .collect();

        Ok(ParsedUri {
            hosts,
            database: database.filter(|it| !it.is_empty()).map(str::to_string),
            options,
        })
    }
}

fn invalid_uri(uri: &str, reason: &str) -> PersistenceError {
    log::error!("Invalid connection string {}: {}", uri, reason);
    PersistenceError::new(
        &format!("Invalid connection string {}: {}", uri, reason),
        ErrorKind::BackendError,
    )
}
