use crate::common::{Document, Value};
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts a serializable record into a [Document].
///
/// # Errors
///
/// Returns an `ObjectMappingError` if serialization fails or the record does not
/// serialize to a map/struct.
pub fn to_document<T: Serialize>(record: &T) -> PersistenceResult<Document> {
    let json = serde_json::to_value(record)?;
    match Value::from(json) {
        Value::Document(doc) => Ok(doc),
        other => {
            log::error!("Record serialized to {} instead of a document", other);
            Err(PersistenceError::new(
                "Record must serialize to a document",
                ErrorKind::ObjectMappingError,
            ))
        }
    }
}

/// Converts a [Document] back into a record.
pub fn from_document<T: DeserializeOwned>(document: Document) -> PersistenceResult<T> {
    let json: serde_json::Value = Value::Document(document).into();
    Ok(serde_json::from_value(json)?)
}
