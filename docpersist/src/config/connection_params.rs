use crate::common::{
    Value, PARAM_DATABASE, PARAM_DISCOVERY_KEY, PARAM_HOST, PARAM_PORT, PARAM_URI,
    SECTION_CONNECTION, SECTION_CONNECTIONS,
};
use crate::config::{ConfigParams, Parameters};
use std::ops::{Deref, DerefMut};

/// Describes one database endpoint: `host`, `port`, `uri`, `database`, an optional
/// `discovery_key`, and any number of extra driver options (e.g. `replicaSet`).
///
/// Several descriptors form a connection group that addresses the nodes of one
/// cluster. All other parameters are available through [`Parameters`].
///
/// # Examples
///
/// ```rust,ignore
/// let connection = ConnectionParams::new()
///     .with_host("localhost")
///     .with_port(27017)
///     .with_database("test");
/// assert_eq!(connection.port(), Some(27017));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectionParams {
    params: Parameters,
}

impl ConnectionParams {
    pub fn new() -> Self {
        ConnectionParams {
            params: Parameters::new(),
        }
    }

    pub fn from_parameters(params: Parameters) -> Self {
        ConnectionParams { params }
    }

    pub fn from_tuples<K: Into<String>, V: Into<Value>>(tuples: impl IntoIterator<Item = (K, V)>) -> Self {
        ConnectionParams {
            params: tuples.into_iter().collect(),
        }
    }

    /// Builds a descriptor from a flat configuration section.
    pub fn from_config(config: &ConfigParams) -> Self {
        ConnectionParams {
            params: Parameters::from_config(config),
        }
    }

    /// Reads every connection descriptor from configuration.
    ///
    /// A `connections` section yields one descriptor per sub-section, in
    /// configuration order; otherwise a non-empty `connection` section yields a
    /// single descriptor.
    pub fn many_from_config(config: &ConfigParams) -> Vec<ConnectionParams> {
        let connections = config.get_section(SECTION_CONNECTIONS);
        let names = connections.section_names();
        if !names.is_empty() {
            return names
                .iter()
                .map(|name| ConnectionParams::from_config(&connections.get_section(name)))
                .filter(|connection| !connection.is_empty())
                .collect();
        }

        let connection = config.get_section(SECTION_CONNECTION);
        if connection.is_empty() {
            Vec::new()
        } else {
            vec![ConnectionParams::from_config(&connection)]
        }
    }

    /// Reads the first connection descriptor from configuration.
    pub fn first_from_config(config: &ConfigParams) -> Option<ConnectionParams> {
        ConnectionParams::many_from_config(config).into_iter().next()
    }

    pub fn host(&self) -> Option<String> {
        self.params.get_as_string(PARAM_HOST)
    }

    pub fn set_host(&mut self, host: &str) {
        self.params.put(PARAM_HOST, host);
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.set_host(host);
        self
    }

    /// Returns the port, or [None] when it is unset, zero or not a valid port.
    pub fn port(&self) -> Option<u16> {
        self.params
            .get_as_i64(PARAM_PORT)
            .and_then(|port| u16::try_from(port).ok())
            .filter(|port| *port != 0)
    }

    pub fn set_port(&mut self, port: u16) {
        self.params.put(PARAM_PORT, port);
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.set_port(port);
        self
    }

    pub fn uri(&self) -> Option<String> {
        self.params.get_as_string(PARAM_URI)
    }

    pub fn set_uri(&mut self, uri: &str) {
        self.params.put(PARAM_URI, uri);
    }

    pub fn with_uri(mut self, uri: &str) -> Self {
        self.set_uri(uri);
        self
    }

    pub fn database(&self) -> Option<String> {
        self.params.get_as_string(PARAM_DATABASE)
    }

    pub fn set_database(&mut self, database: &str) {
        self.params.put(PARAM_DATABASE, database);
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.set_database(database);
        self
    }

    pub fn discovery_key(&self) -> Option<String> {
        self.params.get_as_string(PARAM_DISCOVERY_KEY)
    }

    pub fn set_discovery_key(&mut self, key: &str) {
        self.params.put(PARAM_DISCOVERY_KEY, key);
    }

    pub fn with_discovery_key(mut self, key: &str) -> Self {
        self.set_discovery_key(key);
        self
    }

    /// Returns `true` if this descriptor must be resolved through discovery.
    pub fn uses_discovery(&self) -> bool {
        self.discovery_key().is_some()
    }

    /// Sets an extra driver parameter.
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.put(key, value);
        self
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }
}

impl Deref for ConnectionParams {
    type Target = Parameters;

    fn deref(&self) -> &Self::Target {
        &self.params
    }
}

impl DerefMut for ConnectionParams {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.params
    }
}
