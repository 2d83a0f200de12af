//! Native query expressions and the translation of generic parameters into them.
//!
//! Filters, updates, sorts and projections are small typed trees. Drivers with a
//! query language translate them; drivers without one evaluate them in place:
//!
//! - [`Filter::matches`] tests a document
//! - [`Update::apply`] modifies a document
//! - [`Sort::compare`] orders two documents
//! - [`Projection::apply`] shapes a document
//!
//! # Examples
//!
//! ```rust,ignore
//! use docpersist::query::{field, FindOptions, Sort, Update};
//!
//! let filter = field("age").gt(30).and(field("status").in_list(vec!["active", "new"]));
//! let update = Update::set("status", "verified").and(Update::unset("token"));
//! let options = FindOptions::new().sort(Sort::descending("age")).limit(10);
//! ```

mod builder;
mod filter;
mod find_options;
mod fluent;
mod projection;
mod sort;
mod update;

pub use builder::*;
pub use filter::*;
pub use find_options::*;
pub use fluent::*;
pub use projection::*;
pub use sort::*;
pub use update::*;
