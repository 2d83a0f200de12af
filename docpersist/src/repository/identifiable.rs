use crate::common::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;

/// A record with a unique identifier.
///
/// The record serializes its id under [`Identifiable::ID_FIELD`] (`"id"` unless
/// overridden); the persistence engine stores it in the driver's `_id` field and
/// maps it back when reading.
///
/// # Examples
///
/// ```rust,ignore
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Beacon {
///     id: Option<String>,
///     label: String,
/// }
///
/// impl Identifiable for Beacon {
///     type Key = String;
///
///     fn id(&self) -> Option<String> {
///         self.id.clone()
///     }
///
///     fn set_id(&mut self, id: String) {
///         self.id = Some(id);
///     }
/// }
/// ```
pub trait Identifiable: Serialize + DeserializeOwned + Send + Sync {
    type Key: IdentifierKey;

    /// Name of the id field in the serialized record.
    const ID_FIELD: &'static str = "id";

    /// Returns the id, or [None] while it is unassigned.
    fn id(&self) -> Option<Self::Key>;

    fn set_id(&mut self, id: Self::Key);
}

/// A type usable as a record identifier.
///
/// Keys that [generate](IdentifierKey::generate) a value get one assigned on
/// `create` when the record has none; other keys must be assigned by the caller.
pub trait IdentifierKey: Clone + Display + Into<Value> + Send + Sync + 'static {
    fn generate() -> Option<Self> {
        None
    }
}

impl IdentifierKey for String {
    fn generate() -> Option<Self> {
        Some(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl IdentifierKey for uuid::Uuid {
    fn generate() -> Option<Self> {
        Some(uuid::Uuid::new_v4())
    }
}

impl IdentifierKey for i32 {}

impl IdentifierKey for i64 {}

impl IdentifierKey for u32 {}
