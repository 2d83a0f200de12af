//! Connection string composition and the connection lifecycle.
//!
//! - [validate_connections] checks connection descriptors
//! - [UriComposer] merges descriptors and a credential into a connection string
//! - [DocumentConnectionResolver] resolves configuration into a connection string
//! - [DocumentConnection] opens the database through a driver and owns the client

mod builder;
mod document_connection;
mod options;
mod resolver;
mod uri_composer;
mod validator;

pub use builder::*;
pub use document_connection::*;
pub use options::*;
pub use resolver::*;
pub use uri_composer::*;
pub use validator::*;
