use crate::common::Value;
use crate::config::ConfigParams;
use indexmap::IndexMap;

/// Ordered map of parameter names to [Value]s, shared by connection and credential
/// descriptors.
///
/// Insertion order is kept and overriding an existing key keeps its position,
/// which is what makes merged parameter lists (and the connection strings built
/// from them) deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    data: IndexMap<String, Value>,
}

impl Parameters {
    pub fn new() -> Self {
        Parameters {
            data: IndexMap::new(),
        }
    }

    /// Builds parameters from a configuration section; every value is kept as a
    /// string.
    pub fn from_config(config: &ConfigParams) -> Self {
        let mut params = Parameters::new();
        for (key, value) in config.iter() {
            params.put(key.clone(), value.clone());
        }
        params
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns the value as a non-empty string, or [None] when it is missing,
    /// null or blank.
    pub fn get_as_string(&self, key: &str) -> Option<String> {
        match self.data.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => {
                let text = value.to_plain_string();
                if text.trim().is_empty() {
                    None
                } else {
                    Some(text)
                }
            }
        }
    }

    /// Returns the value as an integer, parsing strings when needed.
    pub fn get_as_i64(&self, key: &str) -> Option<i64> {
        match self.data.get(key)? {
            Value::String(text) => text.trim().parse::<i64>().ok(),
            value => value.as_i64(),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Copies every entry of `other` into these parameters; `other` wins.
    pub fn merge(&mut self, other: &Parameters) {
        for (key, value) in other.iter() {
            self.data.insert(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (key, value) in iter {
            params.put(key, value);
        }
        params
    }
}
