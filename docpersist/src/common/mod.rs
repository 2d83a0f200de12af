//! Engine-native data: values, documents, record mapping and shared constants.

mod constants;
mod convert;
mod document;
mod sort_order;
mod value;

pub use constants::*;
pub use convert::*;
pub use document::*;
pub use sort_order::*;
pub use value::*;
