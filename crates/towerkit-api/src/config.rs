//! Towerkit configuration
//!
//! Settings come from an optional YAML file (the `credentials.yaml` layout)
//! overlaid with `TOWERKIT_*` environment variables, nested keys separated
//! by `__`, e.g. `TOWERKIT_CREDENTIALS__DEFAULT__PASSWORD`.

use std::{collections::HashMap, path::Path};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::{Map, Value};
use towerkit_client::HttpClientConfig;

use crate::{error::Result, payload::URL_PROJECT_GIT, payload::URL_PROJECT_HG};

pub const ENV_PREFIX: &str = "TOWERKIT";
pub const DEFAULT_CONFIG_FILE: &str = "credentials.yaml";

/// Username/password pair plus optional key material for one credential kind
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CredentialSettings {
    pub username: String,
    pub password: String,
    pub ssh_key_data: Option<String>,
    pub ssh_key_unlock: Option<String>,
    pub become_method: Option<String>,
    pub become_username: Option<String>,
    pub become_password: Option<String>,
}

/// Configuration for talking to one server
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TowerkitConfig {
    /// Server address (e.g. "https://tower.example.com")
    pub base_url: String,
    /// Skip TLS certificate verification
    pub assume_untrusted: bool,
    /// Log in with an auth token instead of sending basic credentials
    pub use_token: bool,
    /// Connection timeout in milliseconds (default: 5000)
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds (default: 30000)
    pub read_timeout_ms: u64,
    /// Connect attempts before giving up (default: 5)
    pub max_attempts: u32,
    /// Delay before retrying a failed connect in milliseconds, doubled after
    /// each further failure (default: 500)
    pub retry_delay_ms: u64,
    /// Credential settings by kind; `default` is used to log in
    pub credentials: HashMap<String, CredentialSettings>,
    /// Project repository per scm type
    pub project_urls: HashMap<String, String>,
}

impl Default for TowerkitConfig {
    fn default() -> Self {
        let client = HttpClientConfig::default();
        let mut credentials = HashMap::new();
        credentials.insert(
            "default".to_string(),
            CredentialSettings {
                username: "admin".to_string(),
                password: "password".to_string(),
                ..Default::default()
            },
        );
        let project_urls = [("git", URL_PROJECT_GIT), ("hg", URL_PROJECT_HG)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            base_url: client.base_url,
            assume_untrusted: false,
            use_token: false,
            connect_timeout_ms: client.connect_timeout_ms,
            read_timeout_ms: client.read_timeout_ms,
            max_attempts: client.max_attempts,
            retry_delay_ms: client.retry_delay_ms,
            credentials,
            project_urls,
        }
    }
}

impl TowerkitConfig {
    /// Load from `path`, or from `credentials.yaml` in the working directory
    /// when it exists, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).format(FileFormat::Yaml).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE)
                .format(FileFormat::Yaml)
                .required(false),
        };
        let config = Config::builder().add_source(file).add_source(env).build()?;
        let mut loaded: TowerkitConfig = config.try_deserialize()?;

        // A partial file must not drop the built-in login and project urls
        let defaults = TowerkitConfig::default();
        for (kind, settings) in defaults.credentials {
            loaded.credentials.entry(kind).or_insert(settings);
        }
        for (scm, url) in defaults.project_urls {
            loaded.project_urls.entry(scm).or_insert(url);
        }
        loaded.base_url = loaded.base_url.trim_end_matches('/').to_string();
        Ok(loaded)
    }

    /// Settings used to log in
    pub fn default_credential(&self) -> CredentialSettings {
        self.credentials.get("default").cloned().unwrap_or_default()
    }

    /// Settings for a credential kind; "net" credentials live under "network"
    pub fn credential(&self, kind: &str) -> Option<&CredentialSettings> {
        let key = if kind == "net" { "network" } else { kind };
        self.credentials.get(key)
    }

    /// Credential fields to prefill for a credential of `kind`
    pub fn credential_fields(&self, kind: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        let Some(settings) = self.credential(kind) else {
            return fields;
        };
        if !settings.username.is_empty() {
            fields.insert("username".to_string(), Value::from(settings.username.clone()));
        }
        if !settings.password.is_empty() {
            fields.insert("password".to_string(), Value::from(settings.password.clone()));
        }
        let optional = [
            ("ssh_key_data", &settings.ssh_key_data),
            ("ssh_key_unlock", &settings.ssh_key_unlock),
            ("become_method", &settings.become_method),
            ("become_username", &settings.become_username),
            ("become_password", &settings.become_password),
        ];
        for (name, value) in optional {
            if let Some(v) = value {
                fields.insert(name.to_string(), Value::from(v.clone()));
            }
        }
        fields
    }

    pub fn project_url(&self, scm_type: &str) -> Option<&str> {
        self.project_urls.get(scm_type).map(String::as_str)
    }

    /// Connection settings derived from this configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::new(&self.base_url)
            .with_timeouts(self.connect_timeout_ms, self.read_timeout_ms)
            .with_verify_tls(!self.assume_untrusted)
            .with_max_attempts(self.max_attempts)
            .with_retry_delay(self.retry_delay_ms)
    }
}
