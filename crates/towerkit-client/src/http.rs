//! HTTP connection with credential storage and connect retries
//!
//! This module provides the transport used by every page object: it owns the
//! `reqwest` client, prefixes endpoints with the server address, attaches the
//! stored credentials and retries requests that never reached the server.

use std::{
    sync::RwLock,
    time::{Duration, Instant},
};

use reqwest::{Client, Method, StatusCode, header};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Query parameters as sent on the wire
pub type Params = [(String, String)];

/// Configuration for the HTTP connection
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Server address, e.g. "https://tower.example.com"
    pub base_url: String,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Verify the server TLS certificate
    pub verify_tls: bool,
    /// Attempts made when the server cannot be reached
    pub max_attempts: u32,
    /// Delay before the second attempt in milliseconds, doubled after each
    /// further failure
    pub retry_delay_ms: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
            verify_tls: true,
            max_attempts: 5,
            retry_delay_ms: 500,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config for a single server address
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }

    /// Enable or disable certificate verification
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set the number of connect attempts (at least one)
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the initial delay between connect attempts
    pub fn with_retry_delay(mut self, delay_ms: u64) -> Self {
        self.retry_delay_ms = delay_ms;
        self
    }

    /// Delay after failed attempt number `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(6);
        Duration::from_millis(self.retry_delay_ms.saturating_mul(factor))
    }
}

/// Credentials attached to every request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Auth {
    Basic { username: String, password: String },
    /// Legacy auth token, sent as `Authorization: Token <token>`
    Token(String),
    /// OAuth2 access token, sent as `Authorization: Bearer <token>`
    Bearer(String),
}

/// A response as received from the server, before any interpretation
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status: u16,
    pub method: Method,
    pub url: String,
    pub text: String,
}

impl RawResponse {
    /// Decode the body; an empty or non-JSON body decodes to `{}`
    pub fn json(&self) -> Value {
        if self.text.trim().is_empty() {
            return Value::Object(Map::new());
        }
        match serde_json::from_str(&self.text) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Unable to parse JSON response ({}): {} - '{}'",
                    self.status, e, self.text
                );
                Value::Object(Map::new())
            }
        }
    }

    /// Path and query of the requested url
    pub fn path_url(&self) -> String {
        match reqwest::Url::parse(&self.url) {
            Ok(url) => match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            },
            Err(_) => self.url.clone(),
        }
    }

    /// Canonical reason phrase for the status code
    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP connection shared by all page objects
pub struct Connection {
    client: Client,
    config: HttpClientConfig,
    auth: RwLock<Option<Auth>>,
}

impl Connection {
    /// Create a new connection without credentials
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            client,
            config,
            auth: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Store credentials for future requests; `None` clears them
    pub fn login(&self, auth: Option<Auth>) {
        let mut guard = self.auth.write().unwrap_or_else(|e| e.into_inner());
        *guard = auth;
    }

    /// Remove stored credentials
    pub fn logout(&self) {
        self.login(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn current_auth(&self) -> Option<Auth> {
        self.auth.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Build the full URL for an endpoint
    fn build_url(&self, endpoint: &str) -> Result<String> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(endpoint.to_string());
        }
        if !endpoint.starts_with('/') {
            return Err(ClientError::InvalidUrl(endpoint.to_string()));
        }
        Ok(format!("{}{}", self.config.base_url, endpoint))
    }

    /// Make a GET request
    pub async fn get(&self, endpoint: &str, params: &Params) -> Result<RawResponse> {
        self.request(Method::GET, endpoint, None, params).await
    }

    /// Make a HEAD request
    pub async fn head(&self, endpoint: &str) -> Result<RawResponse> {
        self.request(Method::HEAD, endpoint, None, &[]).await
    }

    /// Make an OPTIONS request
    pub async fn options(&self, endpoint: &str) -> Result<RawResponse> {
        self.request(Method::OPTIONS, endpoint, None, &[]).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<RawResponse> {
        self.request(Method::POST, endpoint, Some(body), &[]).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, endpoint: &str, body: &Value) -> Result<RawResponse> {
        self.request(Method::PUT, endpoint, Some(body), &[]).await
    }

    /// Make a PATCH request with a JSON body
    pub async fn patch(&self, endpoint: &str, body: &Value) -> Result<RawResponse> {
        self.request(Method::PATCH, endpoint, Some(body), &[]).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, endpoint: &str) -> Result<RawResponse> {
        self.request(Method::DELETE, endpoint, None, &[]).await
    }

    /// Generic request with retry on connection failures
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        params: &Params,
    ) -> Result<RawResponse> {
        let url = self.build_url(endpoint)?;
        let payload = body.map(serde_json::to_vec).transpose()?;
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            let mut builder = self
                .client
                .request(method.clone(), &url)
                .header(header::CONTENT_TYPE, "application/json");

            if !params.is_empty() {
                builder = builder.query(params);
            }
            if let Some(bytes) = &payload {
                builder = builder.body(bytes.clone());
            }
            builder = match self.current_auth() {
                Some(Auth::Basic { username, password }) => {
                    builder.basic_auth(username, Some(password))
                }
                Some(Auth::Token(token)) => {
                    builder.header(header::AUTHORIZATION, format!("Token {}", token))
                }
                Some(Auth::Bearer(token)) => builder.bearer_auth(token),
                None => builder,
            };

            let started = Instant::now();
            match builder.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let final_url = response.url().to_string();
                    let text = response.text().await?;
                    debug!("\"{} {}\" elapsed: {:?}", method, final_url, started.elapsed());
                    return Ok(RawResponse {
                        status,
                        method,
                        url: final_url,
                        text,
                    });
                }
                Err(e) if e.is_connect() => {
                    warn!(
                        "{}, url: {}, retrying (attempt {}/{})",
                        e, url, attempt, max_attempts
                    );
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.retry_delay(attempt)).await;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ClientError::Connection {
            url,
            attempts: max_attempts,
            message: last_error,
        })
    }
}
