use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Nested key/value configuration.
///
/// Keys are flat strings where `.` separates section names, so
/// `connection.host` lives in the `connection` section. Sections can be extracted
/// with [`ConfigParams::get_section`] and read with the typed getters, which fall
/// back to a default when a key is missing or cannot be parsed.
///
/// # Examples
///
/// ```rust,ignore
/// let config = ConfigParams::from_tuples([
///     ("connection.host", "localhost"),
///     ("connection.port", "27017"),
///     ("options.max_page_size", "50"),
/// ]);
/// let connection = config.get_section("connection");
/// assert_eq!(connection.get("host"), Some("localhost"));
/// assert_eq!(config.get_as_u64_or("options.max_page_size", 100), 50);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigParams {
    data: IndexMap<String, String>,
}

impl ConfigParams {
    pub fn new() -> Self {
        ConfigParams {
            data: IndexMap::new(),
        }
    }

    /// Creates configuration from `(key, value)` pairs.
    pub fn from_tuples<K, V, I>(tuples: I) -> Self
    where
        K: Into<String>,
        V: ToString,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut config = ConfigParams::new();
        for (key, value) in tuples {
            config.set(key, value);
        }
        config
    }

    /// Creates configuration from a JSON object, flattening nested objects into
    /// dotted keys. Arrays are flattened with their index as the key segment.
    pub fn from_json(json: &serde_json::Value) -> Self {
        let mut config = ConfigParams::new();
        config.flatten_json("", json);
        config
    }

    fn flatten_json(&mut self, prefix: &str, json: &serde_json::Value) {
        let join = |key: &str| {
            if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", prefix, key)
            }
        };

        match json {
            serde_json::Value::Object(map) => {
                for (key, value) in map {
                    self.flatten_json(&join(key), value);
                }
            }
            serde_json::Value::Array(items) => {
                for (index, value) in items.iter().enumerate() {
                    self.flatten_json(&join(&index.to_string()), value);
                }
            }
            serde_json::Value::Null => {
                if !prefix.is_empty() {
                    self.data.insert(prefix.to_string(), String::new());
                }
            }
            serde_json::Value::String(value) => {
                self.data.insert(prefix.to_string(), value.clone());
            }
            other => {
                self.data.insert(prefix.to_string(), other.to_string());
            }
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.data.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|it| it.as_str())
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

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.data.iter()
    }

    pub fn get_as_string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn get_as_u64_or(&self, key: &str, default: u64) -> u64 {
        self.get(key)
            .and_then(|it| it.trim().parse::<u64>().ok())
            .unwrap_or(default)
    }

    pub fn get_as_bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|it| it.trim().to_ascii_lowercase()) {
            Some(value) if matches!(value.as_str(), "true" | "1" | "yes" | "t" | "y") => true,
            Some(value) if matches!(value.as_str(), "false" | "0" | "no" | "f" | "n") => false,
            _ => default,
        }
    }

    /// Returns the keys under `section`, with the section prefix removed.
    pub fn get_section(&self, section: &str) -> ConfigParams {
        let prefix = format!("{}.", section);
        let data = self
            .data
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect();
        ConfigParams { data }
    }

    /// Returns the names of the top-level sections, in first-seen order.
    pub fn section_names(&self) -> Vec<String> {
        let names: IndexSet<String> = self
            .data
            .keys()
            .filter_map(|key| key.split_once('.').map(|(head, _)| head.to_string()))
            .collect();
        names.into_iter().collect()
    }

    /// Copies every key of `other` into this configuration; `other` wins.
    pub fn override_with(mut self, other: &ConfigParams) -> ConfigParams {
        for (key, value) in other.iter() {
            self.data.insert(key.clone(), value.clone());
        }
        self
    }
}

impl Display for ConfigParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .data
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .join(";");
        write!(f, "{}", rendered)
    }
}
