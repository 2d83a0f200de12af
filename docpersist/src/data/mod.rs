//! Generic, driver-independent parameter objects and the paged result type.

mod paging;
mod params;

pub use paging::*;
pub use params::*;
