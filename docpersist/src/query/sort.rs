use crate::common::{Document, SortOrder, Value};
use std::cmp::Ordering;

/// A native sort expression: fields compared in listed order, earlier fields
/// take precedence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sort {
    fields: Vec<(String, SortOrder)>,
}

impl Sort {
    pub fn new() -> Self {
        Sort { fields: Vec::new() }
    }

    pub fn by(field: &str, order: SortOrder) -> Self {
        Sort {
            fields: vec![(field.to_string(), order)],
        }
    }

    pub fn ascending(field: &str) -> Self {
        Sort::by(field, SortOrder::Ascending)
    }

    pub fn descending(field: &str) -> Self {
        Sort::by(field, SortOrder::Descending)
    }

    /// Adds a tie-breaking field.
    pub fn then(mut self, field: &str, order: SortOrder) -> Self {
        self.fields.push((field.to_string(), order));
        self
    }

    /// Returns the sort with field `from` renamed to `to`.
    pub fn rename_field(mut self, from: &str, to: &str) -> Self {
        for (field, _) in self.fields.iter_mut() {
            if *field == from {
                *field = to.to_string();
            }
        }
        self
    }

    pub fn fields(&self) -> &[(String, SortOrder)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compares two documents. Missing fields read as null, which sorts first in
    /// ascending order.
    pub fn compare(&self, left: &Document, right: &Document) -> Ordering {
        for (field, order) in &self.fields {
            let a = left.get(field).unwrap_or(Value::Null);
            let b = right.get(field).unwrap_or(Value::Null);
            let ordering = order.apply(a.cmp(&b));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
