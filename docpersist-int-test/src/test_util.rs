use async_trait::async_trait;
use docpersist::config::ConfigParams;
use docpersist::connection::{ConnectionOptions, DocumentConnection};
use docpersist::driver::{DocumentClient, DocumentDriver};
use docpersist::errors::{ErrorKind, PersistenceError, PersistenceResult};
use docpersist::memory::MemoryDriver;
use docpersist::repository::{Identifiable, IdentifiablePersistence};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A record keyed by a generated string id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub id: Option<String>,
    pub label: String,
    pub kind: String,
    pub radius: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Beacon {
    pub fn new(label: &str, kind: &str, radius: i64) -> Self {
        Beacon {
            id: None,
            label: label.to_string(),
            kind: kind.to_string(),
            radius,
            tags: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

impl Identifiable for Beacon {
    type Key = String;

    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// A record keyed by a caller-assigned number under a custom id field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Counter {
    pub key: Option<i64>,
    pub name: String,
    pub hits: i64,
}

impl Counter {
    pub fn new(key: i64, name: &str, hits: i64) -> Self {
        Counter {
            key: Some(key),
            name: name.to_string(),
            hits,
        }
    }
}

impl Identifiable for Counter {
    type Key = i64;
    const ID_FIELD: &'static str = "key";

    fn id(&self) -> Option<i64> {
        self.key
    }

    fn set_id(&mut self, id: i64) {
        self.key = Some(id);
    }
}

/// Builds `count` beacons with labels `beacon-0..`, alternating kinds and radius
/// equal to the index.
pub fn generate_beacons(count: usize) -> Vec<Beacon> {
    (0..count)
        .map(|index| {
            let kind = if index % 2 == 0 { "even" } else { "odd" };
            Beacon::new(&format!("beacon-{}", index), kind, index as i64)
        })
        .collect()
}

/// An opened connection over a fresh in-memory driver.
#[derive(Clone)]
pub struct TestContext {
    driver: MemoryDriver,
    connection: DocumentConnection,
}

impl TestContext {
    pub fn driver(&self) -> &MemoryDriver {
        &self.driver
    }

    pub fn connection(&self) -> &DocumentConnection {
        &self.connection
    }

    pub fn beacons(&self) -> IdentifiablePersistence<Beacon> {
        IdentifiablePersistence::new(self.connection.clone(), "beacons")
    }

    pub fn counters(&self) -> IdentifiablePersistence<Counter> {
        IdentifiablePersistence::new(self.connection.clone(), "counters")
    }
}

pub fn test_config() -> ConfigParams {
    ConfigParams::from_tuples([
        ("connection.host", "localhost"),
        ("connection.port", "27017"),
        ("connection.database", "test"),
    ])
}

pub async fn create_test_context() -> PersistenceResult<TestContext> {
    create_test_context_with(test_config()).await
}

pub async fn create_test_context_with(config: ConfigParams) -> PersistenceResult<TestContext> {
    let driver = MemoryDriver::new();
    let connection = DocumentConnection::builder()
        .driver(driver.clone())
        .config(config)
        .build()?;
    connection.open(Some("test")).await?;
    Ok(TestContext { driver, connection })
}

pub async fn cleanup(ctx: TestContext) -> PersistenceResult<()> {
    ctx.connection.close(Some("test")).await
}

/// Driver that refuses the first `failures` connection attempts, then delegates to
/// an in-memory driver.
pub struct FlakyDriver {
    delegate: MemoryDriver,
    failures: u32,
    attempts: AtomicU32,
}

impl FlakyDriver {
    pub fn new(failures: u32) -> Self {
        FlakyDriver {
            delegate: MemoryDriver::new(),
            failures,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentDriver for FlakyDriver {
    async fn connect(&self, uri: &str, options: &ConnectionOptions) -> PersistenceResult<Arc<dyn DocumentClient>> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(PersistenceError::new("connection refused", ErrorKind::BackendError));
        }
        self.delegate.connect(uri, options).await
    }
}

/// Driver whose first `stalls` connection attempts never complete, then delegates
/// to an in-memory driver.
pub struct StallingDriver {
    delegate: MemoryDriver,
    stalls: u32,
    attempts: AtomicU32,
}

impl StallingDriver {
    pub fn new(stalls: u32) -> Self {
        StallingDriver {
            delegate: MemoryDriver::new(),
            stalls,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentDriver for StallingDriver {
    async fn connect(&self, uri: &str, options: &ConnectionOptions) -> PersistenceResult<Arc<dyn DocumentClient>> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.stalls {
            std::future::pending::<()>().await;
        }
        self.delegate.connect(uri, options).await
    }
}
