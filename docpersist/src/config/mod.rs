//! Configuration: nested key/value settings and the connection and credential
//! descriptors read from them.

mod config_params;
mod connection_params;
mod credential_params;
mod parameters;

pub use config_params::*;
pub use connection_params::*;
pub use credential_params::*;
pub use parameters::*;
