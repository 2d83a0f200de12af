use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

/// Error kinds for persistence operations
///
/// Each kind describes a specific category of failure and carries a stable,
/// machine-readable code (see [`ErrorKind::code`]) so callers can react without
/// parsing messages.
///
/// # Examples
///
/// ```rust,ignore
/// use docpersist::errors::{PersistenceError, ErrorKind, PersistenceResult};
///
/// fn example() -> PersistenceResult<()> {
///     Err(PersistenceError::new("Connection database is not set", ErrorKind::NoDatabase))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Configuration Errors - raised before any network attempt
    /// No connection descriptors were configured
    NoConnection,
    /// A connection descriptor has no host
    NoHost,
    /// A connection descriptor has no port (or port zero)
    NoPort,
    /// A connection descriptor has no database name
    NoDatabase,
    /// A discovery or credential-store key could not be resolved
    CannotResolve,

    // Connection Errors
    /// The driver failed to establish a connection
    ConnectFailed,

    // State Errors
    /// The connection has not been opened yet
    NotOpened,

    // Data Errors
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Error mapping a record to/from a document
    ObjectMappingError,
    /// A unique constraint was violated
    UniqueConstraintViolation,

    // Driver Errors
    /// Error reported by the database driver
    BackendError,

    /// Error from an extension or third-party driver
    Extension(String),

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl ErrorKind {
    /// Returns the machine-readable code of this kind.
    pub fn code(&self) -> &str {
        match self {
            ErrorKind::NoConnection => "NO_CONNECTION",
            ErrorKind::NoHost => "NO_HOST",
            ErrorKind::NoPort => "NO_PORT",
            ErrorKind::NoDatabase => "NO_DATABASE",
            ErrorKind::CannotResolve => "CANNOT_RESOLVE",
            ErrorKind::ConnectFailed => "CONNECT_FAILED",
            ErrorKind::NotOpened => "NOT_OPENED",
            ErrorKind::InvalidOperation => "INVALID_OPERATION",
            ErrorKind::ObjectMappingError => "OBJECT_MAPPING",
            ErrorKind::UniqueConstraintViolation => "UNIQUE_CONSTRAINT",
            ErrorKind::BackendError => "BACKEND_ERROR",
            ErrorKind::Extension(name) => name.as_str(),
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Returns `true` for the configuration kinds, which are raised during
    /// validation and never retried.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::NoConnection
                | ErrorKind::NoHost
                | ErrorKind::NoPort
                | ErrorKind::NoDatabase
                | ErrorKind::CannotResolve
        )
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NoConnection => write!(f, "No connection"),
            ErrorKind::NoHost => write!(f, "No host"),
            ErrorKind::NoPort => write!(f, "No port"),
            ErrorKind::NoDatabase => write!(f, "No database"),
            ErrorKind::CannotResolve => write!(f, "Cannot resolve"),
            ErrorKind::ConnectFailed => write!(f, "Connect failed"),
            ErrorKind::NotOpened => write!(f, "Not opened"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::UniqueConstraintViolation => write!(f, "Unique constraint violation"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::Extension(name) => write!(f, "{} error", name),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Persistence error type.
///
/// `PersistenceError` carries a message, an [ErrorKind], the correlation id of the
/// call that failed (when known) and an optional cause, so that driver failures can
/// be wrapped without losing the original error.
///
/// # Examples
///
/// ```rust,ignore
/// use docpersist::errors::{PersistenceError, ErrorKind};
///
/// let cause = PersistenceError::new("connection refused", ErrorKind::BackendError);
/// let err = PersistenceError::new_with_cause("Connection to database failed", ErrorKind::ConnectFailed, cause)
///     .with_correlation_id(Some("123"));
/// ```
#[derive(Clone)]
pub struct PersistenceError {
    message: String,
    error_kind: ErrorKind,
    correlation_id: Option<String>,
    cause: Option<Box<PersistenceError>>,
    backtrace: Backtrace,
}

impl PersistenceError {
    /// Creates a new `PersistenceError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        PersistenceError {
            message: message.to_string(),
            error_kind,
            correlation_id: None,
            cause: None,
            backtrace: Backtrace::new(),
        }
    }

    /// Creates a new `PersistenceError` with a cause error.
    ///
    /// The cause is kept as the error source for debugging.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: PersistenceError) -> Self {
        PersistenceError {
            message: message.to_string(),
            error_kind,
            correlation_id: None,
            cause: Some(Box::new(cause)),
            backtrace: Backtrace::new(),
        }
    }

    /// Attaches the correlation id of the failing call.
    pub fn with_correlation_id(mut self, correlation_id: Option<&str>) -> Self {
        self.correlation_id = correlation_id.map(|it| it.to_string());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn code(&self) -> &str {
        self.error_kind.code()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn cause(&self) -> Option<&PersistenceError> {
        self.cause.as_deref()
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        let prefix = match &self.correlation_id {
            Some(id) => format!("[{}] {}: ", id, self.error_kind.code()),
            None => format!("{}: ", self.error_kind.code()),
        };
        match &self.cause {
            Some(cause) => write!(f, "{}{}\nCaused by: {:?}", prefix, self.message, cause),
            None => write!(f, "{}{}\n{:?}", prefix, self.message, self.backtrace),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::new(
            &format!("Object mapping error: {}", err),
            ErrorKind::ObjectMappingError,
        )
    }
}

impl From<std::num::ParseIntError> for PersistenceError {
    fn from(err: std::num::ParseIntError) -> Self {
        PersistenceError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidOperation,
        )
    }
}

impl From<String> for PersistenceError {
    fn from(msg: String) -> Self {
        PersistenceError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for PersistenceError {
    fn from(msg: &str) -> Self {
        PersistenceError::new(msg, ErrorKind::InternalError)
    }
}
