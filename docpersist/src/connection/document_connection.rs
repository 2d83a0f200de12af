use crate::config::{ConnectionParams, CredentialParams};
use crate::connection::{validate_connection, ConnectionOptions, DocumentConnectionBuilder, DocumentConnectionResolver, UriComposer};
use crate::driver::{DatabaseHandle, DocumentClient, DocumentDriver};
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// Opens and owns the connection to a document database.
///
/// `DocumentConnection` is a cheap, cloneable handle: every clone shares the same
/// state, so a persistence component can keep a clone and see the connection the
/// application opened. The connection moves through `Closed -> Opening -> Open`;
/// a failed open goes straight back to `Closed` and may be retried.
///
/// The connection string comes either from explicit connection and credential
/// parameters given to the builder, or from the configured
/// [DocumentConnectionResolver].
///
/// # Examples
///
/// ```rust,ignore
/// let connection = DocumentConnection::builder()
///     .driver(MemoryDriver::new())
///     .config(ConfigParams::from_tuples([
///         ("connection.uri", "mongodb://localhost:27017/test"),
///     ]))
///     .build()?;
///
/// connection.open(Some("123")).await?;
/// let database = connection.get_database();
/// connection.close(Some("123")).await?;
/// ```
#[derive(Clone)]
pub struct DocumentConnection {
    inner: Arc<DocumentConnectionInner>,
}

impl DocumentConnection {
    pub fn builder() -> DocumentConnectionBuilder {
        DocumentConnectionBuilder::new()
    }

    pub(crate) fn new(
        driver: Arc<dyn DocumentDriver>,
        resolver: DocumentConnectionResolver,
        connection: Option<ConnectionParams>,
        credential: Option<CredentialParams>,
        options: ConnectionOptions,
    ) -> Self {
        DocumentConnection {
            inner: Arc::new(DocumentConnectionInner {
                driver,
                resolver,
                connection,
                credential,
                options,
                state: RwLock::new(ConnectionState::Closed),
            }),
        }
    }

    /// Resolves the connection string and connects.
    ///
    /// Opening an open connection does nothing.
    ///
    /// # Errors
    ///
    /// - `NoConnection`, `NoHost`, `NoPort`, `NoDatabase`, `CannotResolve` when the
    ///   configuration is incomplete; nothing is contacted in that case
    /// - `ConnectFailed` wrapping the driver error when connecting fails
    /// - `NoDatabase` when the connection string names no database
    /// - `InvalidOperation` when another `open` is in progress
    pub async fn open(&self, correlation_id: Option<&str>) -> PersistenceResult<()> {
        self.inner.open(correlation_id).await
    }

    /// Releases the client. Closing a closed connection does nothing.
    pub async fn close(&self, correlation_id: Option<&str>) -> PersistenceResult<()> {
        self.inner.close(correlation_id).await
    }

    pub fn is_open(&self) -> bool {
        matches!(*self.inner.state.read(), ConnectionState::Open { .. })
    }

    /// Returns the client, or [None] before `open`.
    pub fn get_connection(&self) -> Option<Arc<dyn DocumentClient>> {
        match &*self.inner.state.read() {
            ConnectionState::Open { client, .. } => Some(client.clone()),
            _ => None,
        }
    }

    /// Returns the database, or [None] before `open`.
    pub fn get_database(&self) -> Option<Arc<dyn DatabaseHandle>> {
        match &*self.inner.state.read() {
            ConnectionState::Open { database, .. } => Some(database.clone()),
            _ => None,
        }
    }

    /// Returns the database name, or [None] before `open`.
    pub fn get_database_name(&self) -> Option<String> {
        match &*self.inner.state.read() {
            ConnectionState::Open { database_name, .. } => Some(database_name.clone()),
            _ => None,
        }
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.inner.options
    }
}

enum ConnectionState {
    Closed,
    Opening,
    Open {
        client: Arc<dyn DocumentClient>,
        database: Arc<dyn DatabaseHandle>,
        database_name: String,
    },
}

struct DocumentConnectionInner {
    driver: Arc<dyn DocumentDriver>,
    resolver: DocumentConnectionResolver,
    connection: Option<ConnectionParams>,
    credential: Option<CredentialParams>,
    options: ConnectionOptions,
    state: RwLock<ConnectionState>,
}

/// Holds a connection in `Opening`; unless completed, dropping it returns the
/// state to `Closed`.
struct OpeningGuard<'a> {
    state: &'a RwLock<ConnectionState>,
    completed: bool,
}

impl<'a> OpeningGuard<'a> {
    fn new(state: &'a RwLock<ConnectionState>) -> Self {
        OpeningGuard { state, completed: false }
    }

    fn complete(mut self, open: ConnectionState) {
        *self.state.write() = open;
        self.completed = true;
    }
}

impl Drop for OpeningGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            let mut state = self.state.write();
            if matches!(*state, ConnectionState::Opening) {
                *state = ConnectionState::Closed;
            }
        }
    }
}

impl DocumentConnectionInner {
    async fn open(&self, correlation_id: Option<&str>) -> PersistenceResult<()> {
        {
            let mut state = self.state.write();
            if matches!(*state, ConnectionState::Open { .. }) {
                log::trace!("[{}] Connection is already open", cid(correlation_id));
                return Ok(());
            }
            if matches!(*state, ConnectionState::Opening) {
                log::error!("[{}] Connection is already being opened", cid(correlation_id));
                return Err(PersistenceError::new(
                    "Connection is already being opened",
                    ErrorKind::InvalidOperation,
                )
                .with_correlation_id(correlation_id));
            }
            *state = ConnectionState::Opening;
        }

        // reset to Closed on error and when the caller drops this future mid-connect
        let guard = OpeningGuard::new(&self.state);
        let (client, database) = self.connect(correlation_id).await?;
        let database_name = database.name().to_string();
        log::debug!("[{}] Connected to database {}", cid(correlation_id), database_name);
        guard.complete(ConnectionState::Open {
            client,
            database,
            database_name,
        });
        Ok(())
    }

    async fn connect(
        &self,
        correlation_id: Option<&str>,
    ) -> PersistenceResult<(Arc<dyn DocumentClient>, Arc<dyn DatabaseHandle>)> {
        let uri = self.compose_uri(correlation_id).await?;

        let client = match self.driver.connect(&uri, &self.options).await {
            Ok(client) => client,
            Err(cause) => {
                log::error!("[{}] Connection to database failed: {}", cid(correlation_id), cause);
                return Err(PersistenceError::new_with_cause(
                    "Connection to database failed",
                    ErrorKind::ConnectFailed,
                    cause,
                )
                .with_correlation_id(correlation_id));
            }
        };

        let Some(database) = client.default_database() else {
            if let Err(error) = client.close().await {
                log::warn!("[{}] Failed to release client: {}", cid(correlation_id), error);
            }
            log::error!("[{}] Connection string does not name a database", cid(correlation_id));
            return Err(PersistenceError::new(
                "Connection string does not name a database",
                ErrorKind::NoDatabase,
            )
            .with_correlation_id(correlation_id));
        };

        Ok((client, database))
    }

    async fn compose_uri(&self, correlation_id: Option<&str>) -> PersistenceResult<String> {
        if self.connection.is_none() && self.credential.is_none() {
            return self.resolver.resolve(correlation_id).await;
        }

        let Some(connection) = &self.connection else {
            log::error!("[{}] Database connection is not set", cid(correlation_id));
            return Err(PersistenceError::new(
                "Database connection is not set",
                ErrorKind::NoConnection,
            )
            .with_correlation_id(correlation_id));
        };

        validate_connection(correlation_id, connection)?;
        let composer = UriComposer::new(&self.options.scheme);
        Ok(composer.compose(std::slice::from_ref(connection), self.credential.as_ref()))
    }

    async fn close(&self, correlation_id: Option<&str>) -> PersistenceResult<()> {
        let previous = {
            let mut state = self.state.write();
            if !matches!(*state, ConnectionState::Open { .. }) {
                return Ok(());
            }
            std::mem::replace(&mut *state, ConnectionState::Closed)
        };

        if let ConnectionState::Open { client, database_name, .. } = previous {
            client.close().await.inspect_err(|error| {
                log::error!("[{}] Failed to close connection: {}", cid(correlation_id), error);
            })?;
            log::debug!("[{}] Disconnected from database {}", cid(correlation_id), database_name);
        }
        Ok(())
    }
}

fn cid(correlation_id: Option<&str>) -> &str {
    correlation_id.unwrap_or_default()
}
