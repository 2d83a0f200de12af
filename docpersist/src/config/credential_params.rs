use crate::common::{
    Value, PARAM_PASSWORD, PARAM_STORE_KEY, PARAM_USERNAME, SECTION_CREDENTIAL, SECTION_CREDENTIALS,
};
use crate::config::{ConfigParams, Parameters};
use std::ops::{Deref, DerefMut};

/// Credential used to authenticate against the database: `username`, `password`
/// and an optional `store_key` pointing into a credential store.
///
/// Extra keys are forwarded to the connection string like connection parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CredentialParams {
    params: Parameters,
}

impl CredentialParams {
    pub fn new() -> Self {
        CredentialParams {
            params: Parameters::new(),
        }
    }

    pub fn from_tuples<K: Into<String>, V: Into<Value>>(tuples: impl IntoIterator<Item = (K, V)>) -> Self {
        CredentialParams {
            params: tuples.into_iter().collect(),
        }
    }

    pub fn from_config(config: &ConfigParams) -> Self {
        CredentialParams {
            params: Parameters::from_config(config),
        }
    }

    /// Reads every credential from configuration: one per `credentials`
    /// sub-section, or the single `credential` section.
    pub fn many_from_config(config: &ConfigParams) -> Vec<CredentialParams> {
        let credentials = config.get_section(SECTION_CREDENTIALS);
        let names = credentials.section_names();
        if !names.is_empty() {
            return names
                .iter()
                .map(|name| CredentialParams::from_config(&credentials.get_section(name)))
                .filter(|credential| !credential.is_empty())
                .collect();
        }

        let credential = config.get_section(SECTION_CREDENTIAL);
        if credential.is_empty() {
            Vec::new()
        } else {
            vec![CredentialParams::from_config(&credential)]
        }
    }

    pub fn username(&self) -> Option<String> {
        self.params.get_as_string(PARAM_USERNAME)
    }

    pub fn set_username(&mut self, username: &str) {
        self.params.put(PARAM_USERNAME, username);
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.set_username(username);
        self
    }

    pub fn password(&self) -> Option<String> {
        self.params.get_as_string(PARAM_PASSWORD)
    }

    pub fn set_password(&mut self, password: &str) {
        self.params.put(PARAM_PASSWORD, password);
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.set_password(password);
        self
    }

    pub fn store_key(&self) -> Option<String> {
        self.params.get_as_string(PARAM_STORE_KEY)
    }

    pub fn set_store_key(&mut self, key: &str) {
        self.params.put(PARAM_STORE_KEY, key);
    }

    pub fn with_store_key(mut self, key: &str) -> Self {
        self.set_store_key(key);
        self
    }

    /// Returns `true` if this credential must be read from a credential store.
    pub fn uses_credential_store(&self) -> bool {
        self.store_key().is_some()
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.put(key, value);
        self
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }
}

impl Deref for CredentialParams {
    type Target = Parameters;

    fn deref(&self) -> &Self::Target {
        &self.params
    }
}

impl DerefMut for CredentialParams {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.params
    }
}
