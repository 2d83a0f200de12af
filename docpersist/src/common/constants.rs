// document constants
pub const DOC_ID: &str = "_id";
pub const FIELD_SEPARATOR: &str = ".";

// connection parameter keys
pub const PARAM_URI: &str = "uri";
pub const PARAM_HOST: &str = "host";
pub const PARAM_PORT: &str = "port";
pub const PARAM_DATABASE: &str = "database";
pub const PARAM_DISCOVERY_KEY: &str = "discovery_key";

// credential parameter keys
pub const PARAM_USERNAME: &str = "username";
pub const PARAM_PASSWORD: &str = "password";
pub const PARAM_STORE_KEY: &str = "store_key";

/// Keys that are consumed by the uri composer itself and never forwarded as
/// connection string options.
pub const RESERVED_URI_KEYS: [&str; 8] = [
    PARAM_URI,
    PARAM_HOST,
    PARAM_PORT,
    PARAM_DATABASE,
    PARAM_USERNAME,
    PARAM_PASSWORD,
    PARAM_DISCOVERY_KEY,
    PARAM_STORE_KEY,
];

// configuration sections
pub const SECTION_CONNECTION: &str = "connection";
pub const SECTION_CONNECTIONS: &str = "connections";
pub const SECTION_CREDENTIAL: &str = "credential";
pub const SECTION_CREDENTIALS: &str = "credentials";
pub const SECTION_OPTIONS: &str = "options";

// defaults
pub const DEFAULT_SCHEME: &str = "mongodb";
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_MAX_POOL_SIZE: u32 = 2;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
