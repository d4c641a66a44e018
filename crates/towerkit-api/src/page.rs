//! Page objects
//!
//! A [`Page`] wraps one REST resource: the endpoint it lives at, the JSON body
//! last received for it and the connection used to talk to the server. Every
//! request goes through [`Page::handle_response`], which turns error statuses
//! into [`ApiError`] variants and successful bodies into new pages whose kind
//! follows the request: GET keeps the kind of the requesting page, any other
//! method yields the item kind.

use std::{collections::BTreeSet, fmt, sync::Arc};

use serde_json::{Value, json};
use towerkit_client::{Auth, Connection, Method, Params, RawResponse};
use tracing::{debug, info};

use crate::{
    error::{ApiError, Result, classify},
    has_create::DependencyStore,
    kind::PageKind,
    pages::UnifiedJob,
    registry::PageRegistry,
    resources::v1,
    utils::{is_relative_endpoint, params},
};

/// A REST resource and the JSON last received for it
#[derive(Clone)]
pub struct Page {
    pub(crate) kind: PageKind,
    pub(crate) endpoint: String,
    pub(crate) json: Value,
    pub(crate) conn: Arc<Connection>,
    pub(crate) ds: DependencyStore,
    /// Kinds in `ds` that were created together with this page
    pub(crate) created: BTreeSet<PageKind>,
}

impl Page {
    /// Empty page of `kind` at the kind's default endpoint
    pub fn new(conn: Arc<Connection>, kind: PageKind) -> Self {
        let endpoint = PageRegistry::default_registry()
            .base_url(kind)
            .unwrap_or_default()
            .to_string();
        Self::with_json(conn, kind, endpoint, json!({}))
    }

    /// Empty page at `endpoint`, its kind resolved through the registry
    pub fn at(conn: Arc<Connection>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let kind = PageRegistry::default_registry().lookup(&endpoint);
        Self::with_json(conn, kind, endpoint, json!({}))
    }

    pub fn with_json(
        conn: Arc<Connection>,
        kind: PageKind,
        endpoint: impl Into<String>,
        json: Value,
    ) -> Self {
        Self {
            kind,
            endpoint: endpoint.into(),
            json,
            conn,
            ds: DependencyStore::new(),
            created: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn into_json(self) -> Value {
        self.json
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    /// Pages this one was created with, by kind
    pub fn dependency_store(&self) -> &DependencyStore {
        &self.ds
    }

    /// Whether the `kind` entry of the dependency store was created for this
    /// page rather than supplied by the caller
    pub fn created_with(&self, kind: PageKind) -> bool {
        self.created.contains(&kind)
    }

    // ========================================================================
    // Field access
    // ========================================================================

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.json.get(name)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }

    /// Boolean field; missing and null read as false
    pub fn bool_field(&self, name: &str) -> bool {
        self.field(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn id(&self) -> Result<i64> {
        self.i64_field("id")
            .ok_or_else(|| ApiError::MissingField("id".to_string()))
    }

    /// Canonical url of the resource, falling back to the endpoint
    pub fn url(&self) -> &str {
        self.str_field("url").unwrap_or(&self.endpoint)
    }

    pub fn related_endpoint(&self, name: &str) -> Option<&str> {
        self.json
            .get("related")
            .and_then(|r| r.get(name))
            .and_then(Value::as_str)
    }

    /// Lazy handle on `related.<name>`
    pub fn related(&self, name: &str) -> Option<TentativeEndpoint> {
        self.nested_endpoint("related", name)
    }

    /// Lazy handle on a top-level field holding an api path
    pub fn endpoint_field(&self, name: &str) -> Option<TentativeEndpoint> {
        self.field(name)
            .filter(|v| is_relative_endpoint(v))
            .and_then(Value::as_str)
            .map(|e| TentativeEndpoint::new(self.conn.clone(), e))
    }

    /// Lazy handle on an api path one level down, e.g. `summary_fields.<key>`
    pub fn nested_endpoint(&self, field: &str, key: &str) -> Option<TentativeEndpoint> {
        self.field(field)
            .and_then(|m| m.get(key))
            .filter(|v| is_relative_endpoint(v))
            .and_then(Value::as_str)
            .map(|e| TentativeEndpoint::new(self.conn.clone(), e))
    }

    /// Update an existing field on the server. Unknown fields are rejected,
    /// new fields must be sent with an explicit [`Page::patch`].
    pub async fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        if self.field(name).is_none() {
            return Err(ApiError::MissingField(name.to_string()));
        }
        let updated = self.patch(&json!({ name: value })).await?;
        self.json = updated.json;
        Ok(())
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Turn a raw response into a page, or into the error its status maps to
    pub fn handle_response(&self, resp: &RawResponse) -> Result<Page> {
        let data = resp.json();

        if !matches!(resp.status, 200..=202) {
            let message = format!("{} ({}) received", resp.reason(), resp.status);
            return Err(classify(resp.status, message, data));
        }

        let endpoint = data
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| resp.path_url());

        let kind = if resp.method == Method::GET {
            self.kind
        } else {
            self.kind.item()
        };
        let kind = match kind {
            PageKind::Base => PageRegistry::default_registry().lookup(&endpoint),
            other => other,
        };

        Ok(Page::with_json(self.conn.clone(), kind, endpoint, data))
    }

    /// Re-read the resource, replacing the local JSON
    pub async fn get(&mut self, params: &Params) -> Result<&mut Self> {
        let fresh = self.fetch(params).await?;
        self.json = fresh.json;
        Ok(self)
    }

    /// Read the resource into a new page at the url the server reports
    pub async fn fetch(&self, params: &Params) -> Result<Page> {
        let resp = self.conn.get(&self.endpoint, params).await?;
        self.handle_response(&resp)
    }

    pub async fn post(&self, payload: &Value) -> Result<Page> {
        let resp = self.conn.post(&self.endpoint, payload).await?;
        self.handle_response(&resp)
    }

    /// PUT `payload`, or the current JSON when none is given
    pub async fn put(&self, payload: Option<&Value>) -> Result<Page> {
        let payload = payload.unwrap_or(&self.json);
        let resp = self.conn.put(&self.endpoint, payload).await?;
        self.handle_response(&resp)
    }

    pub async fn patch(&self, payload: &Value) -> Result<Page> {
        let resp = self.conn.patch(&self.endpoint, payload).await?;
        self.handle_response(&resp)
    }

    /// Delete the resource; a 204 answer is success
    pub async fn delete(&self) -> Result<()> {
        let resp = self.conn.delete(&self.endpoint).await?;
        match self.handle_response(&resp) {
            Ok(_) | Err(ApiError::NoContent(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Delete the resource, ignoring that it may already be gone
    pub async fn silent_delete(&self) -> Result<()> {
        match self.delete().await {
            Err(ApiError::NotFound(_)) => Ok(()),
            // Notification templates with pending notifications refuse deletion
            Err(ApiError::MethodNotAllowed(_)) if self.kind == PageKind::NotificationTemplate => {
                Ok(())
            }
            other => other,
        }
    }

    pub async fn options(&self) -> Result<Page> {
        let resp = self.conn.options(&self.endpoint).await?;
        self.handle_response(&resp)
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// Item pages of a list body
    pub fn results(&self) -> Vec<Page> {
        let item_kind = self.kind.item();
        let registry = PageRegistry::default_registry();

        self.json
            .get("results")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|data| {
                        let endpoint = data
                            .get("url")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        // Unified lists mix jobs and templates of several kinds
                        let kind = match item_kind {
                            PageKind::Base | PageKind::UnifiedJob | PageKind::UnifiedJobTemplate => {
                                match registry.lookup(&endpoint) {
                                    PageKind::Base => item_kind,
                                    found => found,
                                }
                            }
                            other => other,
                        };
                        Page::with_json(self.conn.clone(), kind, endpoint, data.clone())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Server-side total, or the number of results held locally
    pub fn count(&self) -> u64 {
        self.json
            .get("count")
            .and_then(Value::as_u64)
            .unwrap_or_else(|| {
                self.json
                    .get("results")
                    .and_then(Value::as_array)
                    .map_or(0, |r| r.len() as u64)
            })
    }

    pub async fn next_page(&self) -> Result<Option<Page>> {
        self.follow("next").await
    }

    pub async fn previous_page(&self) -> Result<Option<Page>> {
        self.follow("previous").await
    }

    async fn follow(&self, field: &str) -> Result<Option<Page>> {
        match self.str_field(field) {
            Some(endpoint) if !endpoint.is_empty() => {
                let page = Page::with_json(self.conn.clone(), self.kind, endpoint, json!({}));
                page.fetch(&[]).await.map(Some)
            }
            _ => Ok(None),
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub async fn get_related(&self, name: &str, params: &Params) -> Result<Page> {
        let endpoint = self
            .related_endpoint(name)
            .ok_or_else(|| ApiError::MissingField(format!("related.{}", name)))?;
        self.walk(endpoint, params).await
    }

    /// Fetch any endpoint as the page kind registered for it
    pub async fn walk(&self, endpoint: &str, params: &Params) -> Result<Page> {
        Page::at(self.conn.clone(), endpoint).fetch(params).await
    }

    /// The single object role named `name`, e.g. "admin_role"
    pub async fn get_object_role(&self, name: &str) -> Result<Page> {
        let roles = self
            .get_related("object_roles", &params([("role_field", name)]))
            .await?;
        if roles.count() != 1 {
            return Err(ApiError::Lookup(format!("No role with name '{}' found.", name)));
        }
        roles
            .results()
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Lookup(format!("No role with name '{}' found.", name)))
    }

    /// Every object role of the resource, across all list pages
    pub async fn object_roles(&self) -> Result<Vec<Page>> {
        let current = self.fetch(&[]).await?;
        let mut page = current.get_related("object_roles", &[]).await?;
        let mut roles = page.results();
        while let Some(next) = page.next_page().await? {
            roles.extend(next.results());
            page = next;
        }
        Ok(roles)
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Delete the resource, cancelling jobs that block the deletion
    pub async fn cleanup(&self) -> Result<()> {
        self.cleanup_with(false).await
    }

    /// Like [`Page::cleanup`], ignoring resources that are already gone
    pub async fn silent_cleanup(&self) -> Result<()> {
        self.cleanup_with(true).await
    }

    async fn delete_with(&self, silent: bool) -> Result<()> {
        if silent {
            self.silent_delete().await
        } else {
            self.delete().await
        }
    }

    async fn cleanup_with(&self, silent: bool) -> Result<()> {
        let err = match self.delete_with(silent).await {
            Err(ApiError::Conflict(resp)) => resp,
            other => return other,
        };

        let running_jobs = err
            .payload
            .get("conflict")
            .and_then(Value::as_str)
            .is_some_and(|c| c.contains("running jobs"));
        if !running_jobs {
            return Err(ApiError::Conflict(err));
        }

        let active = err
            .payload
            .get("active_jobs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut jobs = Vec::with_capacity(active.len());
        for entry in &active {
            let (Some(job_type), Some(id)) = (
                entry.get("type").and_then(Value::as_str),
                entry.get("id").and_then(Value::as_i64),
            ) else {
                continue;
            };
            let endpoint = format!("/api/v1/{}s/{}/", job_type, id);
            let job = Page::at(self.conn.clone(), endpoint).fetch(&[]).await?;
            let job = UnifiedJob::try_from(job)?;
            info!("Cancelling {} blocking deletion of {}", job.url(), self.endpoint);
            job.cancel().await?;
            jobs.push(job);
        }

        for job in &mut jobs {
            job.wait_until_completed_or_fail().await?;
        }

        self.delete_with(silent).await
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Obtain an auth token for the given credentials and use it from now on
    pub async fn load_default_authtoken(&self, username: &str, password: &str) -> Result<String> {
        let auth_page = Page::with_json(self.conn.clone(), PageKind::AuthToken, v1::AUTHTOKEN, json!({}));
        let token_page = auth_page
            .post(&json!({"username": username, "password": password}))
            .await?;
        let token = token_page
            .str_field("token")
            .ok_or_else(|| ApiError::MissingField("token".to_string()))?
            .to_string();
        debug!("Logged in as {} with an auth token", username);
        self.conn.login(Some(Auth::Token(token.clone())));
        Ok(token)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("json", &self.json)
            .finish()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self.json) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}", self.json),
        }
    }
}

/// An api path found in a page body, resolved into a page on first use
#[derive(Clone)]
pub struct TentativeEndpoint {
    endpoint: String,
    conn: Arc<Connection>,
}

impl TentativeEndpoint {
    pub fn new(conn: Arc<Connection>, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            conn,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Empty page of the kind registered for the endpoint
    pub fn create(&self) -> Page {
        Page::at(self.conn.clone(), self.endpoint.clone())
    }

    pub async fn get(&self, params: &Params) -> Result<Page> {
        self.create().fetch(params).await
    }

    pub async fn post(&self, payload: &Value) -> Result<Page> {
        self.create().post(payload).await
    }

    pub async fn put(&self, payload: Option<&Value>) -> Result<Page> {
        self.create().put(payload).await
    }

    pub async fn patch(&self, payload: &Value) -> Result<Page> {
        self.create().patch(payload).await
    }

    pub async fn delete(&self) -> Result<()> {
        self.create().delete().await
    }
}

impl fmt::Debug for TentativeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TentativeEndpoint").field(&self.endpoint).finish()
    }
}

impl fmt::Display for TentativeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint)
    }
}

impl PartialEq<str> for TentativeEndpoint {
    fn eq(&self, other: &str) -> bool {
        self.endpoint == other
    }
}

impl PartialEq<&str> for TentativeEndpoint {
    fn eq(&self, other: &&str) -> bool {
        self.endpoint == *other
    }
}
