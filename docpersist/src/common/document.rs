use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

/// A document as the driver sees it: an insertion-ordered map of field names to
/// [Value]s.
///
/// Keys containing the field separator (`.`) address embedded documents, so
/// `document.get("address.city")` reads the `city` field of the nested `address`
/// document. Insertion order is preserved, which keeps projections and serialized
/// output deterministic.
///
/// The `_id` field holds the storage identifier of the document.
#[derive(Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates the specified [Value] with the specified key in this document.
    ///
    /// Embedded keys (`"user.name"`) create or extend nested documents. An existing
    /// key keeps its position and takes the new value.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidOperation` error if the key (or one of its segments) is
    /// empty, or if an intermediate segment holds a non-document value.
    pub fn put<'a, T: Into<Value>>(&mut self, key: impl Into<Cow<'a, str>>, value: T) -> PersistenceResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(PersistenceError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();
        if key.contains(FIELD_SEPARATOR) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data.insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Inserts a top-level field without interpreting the field separator.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Returns the value of the key, following embedded keys, or [None] if the
    /// document has no such field.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.data.get(key) {
            Some(value) => Some(value.clone()),
            None if key.contains(FIELD_SEPARATOR) => self.deep_get(key),
            None => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes the key (embedded keys allowed) and returns its previous value.
    /// Remaining fields keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if let Some(value) = self.data.shift_remove(key) {
            return Some(value);
        }

        if !key.contains(FIELD_SEPARATOR) {
            return None;
        }

        let (head, tail) = key.split_once(FIELD_SEPARATOR)?;
        match self.data.get_mut(head) {
            Some(Value::Document(inner)) => inner.remove(tail),
            _ => None,
        }
    }

    /// Returns the top-level field names in insertion order.
    pub fn fields(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Copies every field of `other` into this document; fields of `other` win.
    pub fn merge(&mut self, other: &Document) {
        for (key, value) in other.iter() {
            self.data.insert(key.clone(), value.clone());
        }
    }

    /// Renames a top-level field in place, keeping its position.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        if let Some(index) = self.data.get_index_of(from) {
            if let Some((_, value)) = self.data.shift_remove_index(index) {
                self.data.shift_remove(to);
                let index = index.min(self.data.len());
                self.data.shift_insert(index, to.to_string(), value);
            }
        }
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> PersistenceResult<()> {
        let Some((head, rest)) = splits.split_first() else {
            return Ok(());
        };
        if head.is_empty() {
            log::error!("Document does not support empty embedded key segment");
            return Err(PersistenceError::new(
                "Document does not support empty embedded key segment",
                ErrorKind::InvalidOperation,
            ));
        }

        if rest.is_empty() {
            self.data.insert(head.to_string(), value);
            return Ok(());
        }

        let entry = self
            .data
            .entry(head.to_string())
            .or_insert_with(|| Value::Document(Document::new()));
        if entry.is_null() {
            *entry = Value::Document(Document::new());
        }

        match entry.as_document_mut() {
            Some(inner) => inner.deep_put(rest, value),
            None => {
                log::error!("Field {} is not a document and cannot hold embedded fields", head);
                Err(PersistenceError::new(
                    &format!("Field {} is not a document and cannot hold embedded fields", head),
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    fn deep_get(&self, key: &str) -> Option<Value> {
        let (head, tail) = key.split_once(FIELD_SEPARATOR)?;
        match self.data.get(head)? {
            Value::Document(inner) => inner.get(tail),
            Value::Array(items) => {
                let index: usize = tail.split(FIELD_SEPARATOR).next()?.parse().ok()?;
                let item = items.get(index)?;
                match tail.split_once(FIELD_SEPARATOR) {
                    Some((_, rest)) => item.as_document()?.get(rest),
                    None => Some(item.clone()),
                }
            }
            _ => None,
        }
    }

    fn sorted_entries(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<(&String, &Value)> = self.data.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Ord for Document {
    fn cmp(&self, other: &Self) -> Ordering {
        // field order does not take part in equality, so it must not take part here
        self.sorted_entries().cmp(&other.sorted_entries())
    }
}

impl PartialOrd for Document {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().collect(),
        }
    }
}

/// Creates a [Document] from `key: value` pairs; values go through `Into<Value>`.
///
/// ```rust,ignore
/// let doc = doc! { "name": "Alice", "age": 30, "address": doc! { "city": "Paris" } };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::common::Document::new()
    };
    ($($key:literal : $value:expr),+ $(,)?) => {{
        let mut document = $crate::common::Document::new();
        $(
            document.insert($key, $crate::common::Value::from($value));
        )+
        document
    }};
}
