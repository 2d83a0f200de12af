//! Generic persistence for records with a unique identifier.
//!
//! A record type implements [Identifiable] and gets the full set of paged reads,
//! writes and deletes from [IdentifiablePersistence] over any driver.

mod identifiable;
mod identifiable_persistence;
mod record_mapper;

pub use identifiable::*;
pub use identifiable_persistence::*;
