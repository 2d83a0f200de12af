use crate::common::{SortOrder, Value};
use indexmap::{IndexMap, IndexSet};

/// Generic exact-match filter: field name to expected value.
///
/// A missing key puts no constraint on that field. Keys keep insertion order,
/// which is the order the default query builder combines them in.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FilterParams {
    data: IndexMap<String, Value>,
}

impl FilterParams {
    pub fn new() -> Self {
        FilterParams::default()
    }

    pub fn from_tuples<K: Into<String>, V: Into<Value>>(tuples: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut params = FilterParams::new();
        for (key, value) in tuples {
            params.put(key, value);
        }
        params
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.put(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns the value as a non-empty string.
    pub fn get_as_string(&self, key: &str) -> Option<String> {
        self.data
            .get(key)
            .filter(|value| !value.is_null())
            .map(|value| value.to_plain_string())
            .filter(|text| !text.is_empty())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Generic update map: field name to new value.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UpdateParams {
    data: IndexMap<String, Value>,
}

impl UpdateParams {
    pub fn new() -> Self {
        UpdateParams::default()
    }

    pub fn from_tuples<K: Into<String>, V: Into<Value>>(tuples: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut params = UpdateParams::new();
        for (key, value) in tuples {
            params.put(key, value);
        }
        params
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.put(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One field of a [SortParams].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SortField {
    pub name: String,
    pub order: SortOrder,
}

/// Generic sort: fields in precedence order, each ascending or descending.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SortParams {
    fields: Vec<SortField>,
}

impl SortParams {
    pub fn new() -> Self {
        SortParams::default()
    }

    pub fn push(&mut self, name: &str, order: SortOrder) {
        self.fields.push(SortField {
            name: name.to_string(),
            order,
        });
    }

    pub fn with(mut self, name: &str, order: SortOrder) -> Self {
        self.push(name, order);
        self
    }

    pub fn ascending(self, name: &str) -> Self {
        self.with(name, SortOrder::Ascending)
    }

    pub fn descending(self, name: &str) -> Self {
        self.with(name, SortOrder::Descending)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Generic projection: the set of fields to return, in request order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ProjectionParams {
    fields: IndexSet<String>,
}

impl ProjectionParams {
    pub fn new() -> Self {
        ProjectionParams::default()
    }

    pub fn from_fields<S: AsRef<str>>(fields: impl IntoIterator<Item = S>) -> Self {
        let mut params = ProjectionParams::new();
        for field in fields {
            params.add(field.as_ref());
        }
        params
    }

    /// Parses a comma separated field list such as `"name, address.city"`.
    pub fn from_csv(fields: &str) -> Self {
        ProjectionParams::from_fields(fields.split(',').map(str::trim).filter(|it| !it.is_empty()))
    }

    pub fn add(&mut self, field: &str) {
        self.fields.insert(field.to_string());
    }

    pub fn with(mut self, field: &str) -> Self {
        self.add(field);
        self
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
