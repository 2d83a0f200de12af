use crate::common::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MAX_PAGE_SIZE, DEFAULT_MAX_POOL_SIZE, DEFAULT_SCHEME,
    SECTION_OPTIONS,
};
use crate::config::ConfigParams;
use std::time::Duration;

/// Driver options applied when a connection is opened, plus the paging limit
/// used by the persistence engine.
///
/// All values come from the `options` configuration section:
///
/// | key | default |
/// |---|---|
/// | `options.max_pool_size` | 2 |
/// | `options.keep_alive` | true |
/// | `options.connect_timeout` | 5000 ms |
/// | `options.auto_reconnect` | true |
/// | `options.max_page_size` | 100 |
/// | `options.debug` | false |
/// | `options.scheme` | `mongodb` |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub max_pool_size: u32,
    pub keep_alive: bool,
    pub connect_timeout: Duration,
    pub auto_reconnect: bool,
    pub max_page_size: u64,
    pub debug: bool,
    pub scheme: String,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        ConnectionOptions {
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            keep_alive: true,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            auto_reconnect: true,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            debug: false,
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl ConnectionOptions {
    pub fn new() -> Self {
        ConnectionOptions::default()
    }

    /// Reads the options from the `options` section of `config`; missing or
    /// invalid keys keep their defaults.
    pub fn from_config(config: &ConfigParams) -> Self {
        let options = config.get_section(SECTION_OPTIONS);
        let defaults = ConnectionOptions::default();

        let max_pool_size = options
            .get_as_u64_or("max_pool_size", defaults.max_pool_size as u64);
        ConnectionOptions {
            max_pool_size: u32::try_from(max_pool_size).unwrap_or(defaults.max_pool_size),
            keep_alive: options.get_as_bool_or("keep_alive", defaults.keep_alive),
            connect_timeout: Duration::from_millis(
                options.get_as_u64_or("connect_timeout", DEFAULT_CONNECT_TIMEOUT_MS),
            ),
            auto_reconnect: options.get_as_bool_or("auto_reconnect", defaults.auto_reconnect),
            max_page_size: options.get_as_u64_or("max_page_size", defaults.max_page_size),
            debug: options.get_as_bool_or("debug", defaults.debug),
            scheme: options.get_as_string_or("scheme", DEFAULT_SCHEME),
        }
    }

    pub fn with_max_pool_size(mut self, max_pool_size: u32) -> Self {
        self.max_pool_size = max_pool_size;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }
}
