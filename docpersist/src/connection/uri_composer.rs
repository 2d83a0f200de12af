use crate::common::{Value, DEFAULT_SCHEME, RESERVED_URI_KEYS};
use crate::config::{ConnectionParams, CredentialParams, Parameters};
use itertools::Itertools;

/// Builds a connection string from connection descriptors and a credential.
///
/// The result has the form
/// `scheme://[username[:password]@]host1[:port1],host2[:port2]/database[?key=value&...]`.
///
/// - The first connection with a non-empty `uri` is returned verbatim.
/// - Hosts are listed in input order; a port is omitted when unset.
/// - The last non-empty database wins.
/// - All remaining parameters of the connections (later ones override earlier
///   ones) and of the credential (overriding the connections) become query
///   options, in first-seen order.
///
/// # Examples
///
/// ```rust,ignore
/// let composer = UriComposer::default();
/// let uri = composer.compose(
///     &[
///         ConnectionParams::new().with_host("a").with_port(1000),
///         ConnectionParams::new().with_host("b").with_port(2000).with_database("db"),
///     ],
///     Some(&CredentialParams::new().with_username("u").with_password("p")),
/// );
/// assert_eq!(uri, "mongodb://u:p@a:1000,b:2000/db");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriComposer {
    scheme: String,
}

impl Default for UriComposer {
    fn default() -> Self {
        UriComposer {
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl UriComposer {
    pub fn new(scheme: &str) -> Self {
        UriComposer {
            scheme: scheme.to_string(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn compose(&self, connections: &[ConnectionParams], credential: Option<&CredentialParams>) -> String {
        if let Some(uri) = connections.iter().find_map(|connection| connection.uri()) {
            return uri;
        }

        format!(
            "{}://{}{}{}{}",
            self.scheme,
            compose_auth(credential),
            compose_hosts(connections),
            compose_database(connections),
            compose_options(connections, credential),
        )
    }
}

fn compose_hosts(connections: &[ConnectionParams]) -> String {
    connections
        .iter()
        .filter_map(|connection| {
            let host = connection.host()?;
            Some(match connection.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host,
            })
        })
        .join(",")
}

fn compose_database(connections: &[ConnectionParams]) -> String {
    connections
        .iter()
        .filter_map(|connection| connection.database())
        .last()
        .map(|database| format!("/{}", database))
        .unwrap_or_default()
}

fn compose_auth(credential: Option<&CredentialParams>) -> String {
    let Some(credential) = credential else {
        return String::new();
    };
    match (credential.username(), credential.password()) {
        (Some(username), Some(password)) => format!("{}:{}@", username, password),
        (Some(username), None) => format!("{}@", username),
        (None, _) => String::new(),
    }
}

fn compose_options(connections: &[ConnectionParams], credential: Option<&CredentialParams>) -> String {
    let mut merged = Parameters::new();
    for connection in connections {
        merged.merge(connection.parameters());
    }
    if let Some(credential) = credential {
        merged.merge(credential.parameters());
    }
    for key in RESERVED_URI_KEYS {
        merged.remove(key);
    }

    if merged.is_empty() {
        return String::new();
    }

    let options = merged
        .iter()
        .map(|(key, value)| match value {
            Value::Null => key.clone(),
            value => format!("{}={}", key, value.to_plain_string()),
        })
        .join("&");
    format!("?{}", options)
}
