//! Resolution of connection and credential descriptors, optionally through
//! discovery and credential-store services.

mod connection_resolver;
mod credential_resolver;
mod credential_store;
mod discovery;

pub use connection_resolver::*;
pub use credential_resolver::*;
pub use credential_store::*;
pub use discovery::*;
