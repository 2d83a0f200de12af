//! An in-process document driver.
//!
//! [MemoryDriver] implements the [driver](crate::driver) traits over shared maps
//! and evaluates filters, updates and find options directly. It backs the tests
//! and suits embedded use where no database server is available.

mod collection;
mod database;
mod driver;

pub use collection::*;
pub use database::*;
pub use driver::*;
