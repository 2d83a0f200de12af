//! # docpersist - document database persistence
//!
//! `docpersist` resolves configuration into a document database connection and
//! provides a generic persistence engine for records with a unique identifier.
//!
//! ## Key Features
//!
//! - **Connection resolution**: connection and credential descriptors from
//!   configuration, discovery services or credential stores are validated and
//!   composed into a single connection string
//! - **Connection lifecycle**: [`connection::DocumentConnection`] opens and owns
//!   the driver client and exposes the database handle
//! - **Identifiable persistence**: paged, filtered, sorted and projected reads plus
//!   create, set, update, modify and delete operations for any
//!   [`repository::Identifiable`] record
//! - **Native queries**: filters, updates, sorts and projections are typed trees
//!   that drivers translate or evaluate
//! - **Pluggable drivers**: anything implementing [`driver::DocumentDriver`]; the
//!   in-memory [`memory::MemoryDriver`] ships with the crate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docpersist::config::ConfigParams;
//! use docpersist::connection::DocumentConnection;
//! use docpersist::memory::MemoryDriver;
//! use docpersist::repository::IdentifiablePersistence;
//!
//! let connection = DocumentConnection::builder()
//!     .driver(MemoryDriver::new())
//!     .config(ConfigParams::from_tuples([
//!         ("connection.host", "localhost"),
//!         ("connection.port", "27017"),
//!         ("connection.database", "app"),
//!     ]))
//!     .build()?;
//! connection.open(Some("123")).await?;
//!
//! let beacons = IdentifiablePersistence::<Beacon>::new(connection.clone(), "beacons");
//! let created = beacons.create(Some("123"), Beacon::new("north")).await?;
//! ```
//!
//! ## Module Organization
//!
//! - [`auth`] - connection and credential resolution, discovery and credential stores
//! - [`common`] - values, documents, record mapping and constants
//! - [`config`] - flat configuration and connection/credential descriptors
//! - [`connection`] - validation, uri composition and the connection lifecycle
//! - [`data`] - generic filter, sort, update, projection and paging parameters
//! - [`driver`] - the traits a database driver implements
//! - [`errors`] - error types and result definitions
//! - [`memory`] - the in-memory driver
//! - [`query`] - native query expressions and parameter translation
//! - [`repository`] - the identifiable persistence engine

pub mod auth;
pub mod common;
pub mod config;
pub mod connection;
pub mod data;
pub mod driver;
pub mod errors;
pub mod memory;
pub mod query;
pub mod repository;

pub use common::{Document, Value};
pub use errors::{ErrorKind, PersistenceError, PersistenceResult};

#[cfg(test)]
#[ctor::ctor]
fn init() {
    colog::init();
}
