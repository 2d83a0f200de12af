use crate::common::{Document, Value, DOC_ID};
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use std::fmt::{Display, Formatter};

/// A native update expression: a partial modification of a document.
#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    /// Sets a field (embedded keys allowed) to a value.
    Set { field: String, value: Value },
    /// Removes a field.
    Unset { field: String },
    /// Applies several updates in order.
    Combine(Vec<Update>),
}

impl Update {
    pub fn set(field: &str, value: impl Into<Value>) -> Update {
        Update::Set {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn unset(field: &str) -> Update {
        Update::Unset {
            field: field.to_string(),
        }
    }

    /// Appends `other` to this update; nested combinations are flattened.
    pub fn and(self, other: Update) -> Update {
        match (self, other) {
            (Update::Combine(mut left), Update::Combine(right)) => {
                left.extend(right);
                Update::Combine(left)
            }
            (Update::Combine(mut left), other) => {
                left.push(other);
                Update::Combine(left)
            }
            (this, other) => Update::Combine(vec![this, other]),
        }
    }

    /// Returns the update with field `from` renamed to `to`.
    pub fn rename_field(self, from: &str, to: &str) -> Update {
        let rename = |field: String| if field == from { to.to_string() } else { field };
        match self {
            Update::Set { field, value } => Update::Set { field: rename(field), value },
            Update::Unset { field } => Update::Unset { field: rename(field) },
            Update::Combine(updates) => {
                Update::Combine(updates.into_iter().map(|u| u.rename_field(from, to)).collect())
            }
        }
    }

    /// Returns `true` if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Update::Combine(updates) => updates.iter().all(Update::is_empty),
            _ => false,
        }
    }

    /// Applies the update to a document in place.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidOperation` error when the update tries to change the
    /// storage id, or when an embedded key cannot be written.
    pub fn apply(&self, document: &mut Document) -> PersistenceResult<()> {
        match self {
            Update::Set { field, value } => {
                if field == DOC_ID && document.get(DOC_ID).as_ref() != Some(value) {
                    log::error!("Update cannot change the {} field", DOC_ID);
                    return Err(PersistenceError::new(
                        &format!("Update cannot change the {} field", DOC_ID),
                        ErrorKind::InvalidOperation,
                    ));
                }
                document.put(field.as_str(), value.clone())
            }
            Update::Unset { field } => {
                if field == DOC_ID {
                    log::error!("Update cannot remove the {} field", DOC_ID);
                    return Err(PersistenceError::new(
                        &format!("Update cannot remove the {} field", DOC_ID),
                        ErrorKind::InvalidOperation,
                    ));
                }
                document.remove(field);
                Ok(())
            }
            Update::Combine(updates) => {
                for update in updates {
                    update.apply(document)?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Update {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Update::Set { field, value } => write!(f, "set({} = {})", field, value),
            Update::Unset { field } => write!(f, "unset({})", field),
            Update::Combine(updates) => {
                let rendered: Vec<String> = updates.iter().map(|u| u.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}
