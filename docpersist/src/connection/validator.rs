use crate::config::ConnectionParams;
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};

/// Checks that every connection can be turned into a connection string.
///
/// A connection with an explicit `uri` is always valid. Any other connection
/// needs a host, a nonzero port and a database.
///
/// # Errors
///
/// `NoConnection` for an empty list, otherwise `NoHost`, `NoPort` or
/// `NoDatabase` for the first connection missing that field. Errors carry the
/// correlation id.
pub fn validate_connections(
    correlation_id: Option<&str>,
    connections: &[ConnectionParams],
) -> PersistenceResult<()> {
    if connections.is_empty() {
        return Err(config_error(correlation_id, "Database connection is not set", ErrorKind::NoConnection));
    }

    for connection in connections {
        validate_connection(correlation_id, connection)?;
    }
    Ok(())
}

/// Checks a single connection; see [validate_connections].
pub fn validate_connection(correlation_id: Option<&str>, connection: &ConnectionParams) -> PersistenceResult<()> {
    if connection.uri().is_some() {
        return Ok(());
    }

    if connection.host().is_none() {
        return Err(config_error(correlation_id, "Connection host is not set", ErrorKind::NoHost));
    }
    if connection.port().is_none() {
        return Err(config_error(correlation_id, "Connection port is not set", ErrorKind::NoPort));
    }
    if connection.database().is_none() {
        return Err(config_error(correlation_id, "Connection database is not set", ErrorKind::NoDatabase));
    }
    Ok(())
}

fn config_error(correlation_id: Option<&str>, message: &str, kind: ErrorKind) -> PersistenceError {
    log::error!("[{}] {}", correlation_id.unwrap_or_default(), message);
    PersistenceError::new(message, kind).with_correlation_id(correlation_id)
}
