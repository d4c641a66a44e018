//! Resource factories
//!
//! A [`Factory`] creates resources of one kind with randomized defaults and
//! records everything it created in a [`Teardown`], so a test or a manifest
//! load can remove it all again. With key fields configured a factory reuses
//! matching resources instead of creating duplicates.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use towerkit_client::Connection;
use tracing::{debug, info, warn};

use crate::{
    config::TowerkitConfig,
    error::{ApiError, Result},
    has_create::{self, CreateArgs, PreparedPayload},
    kind::PageKind,
    page::Page,
    utils::query_value,
};

/// Factory behavior switches
#[derive(Clone, Debug, Default)]
pub struct FactoryOptions {
    /// Fields identifying an existing resource; when set, `create` reuses a
    /// resource whose fields match instead of creating a new one
    pub get_or_create: Vec<String>,
}

impl FactoryOptions {
    pub fn get_or_create(fields: &[&str]) -> Self {
        Self {
            get_or_create: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Pages to remove once they are no longer needed, in creation order
#[derive(Debug, Default)]
pub struct Teardown {
    pages: Mutex<Vec<Page>>,
}

impl Teardown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a page; a page already registered under the same endpoint
    /// keeps its original position
    pub fn register(&self, page: Page) {
        let mut pages = self.pages.lock().unwrap_or_else(|e| e.into_inner());
        if pages.iter().any(|p| p.endpoint() == page.endpoint()) {
            return;
        }
        debug!("Registered {} for teardown", page.endpoint());
        pages.push(page);
    }

    pub fn len(&self) -> usize {
        self.pages.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.pages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|p| p.endpoint().to_string())
            .collect()
    }

    /// Silently clean up every registered page, newest first.
    ///
    /// All pages are attempted; the first failure is returned.
    pub async fn run(&self) -> Result<()> {
        let pages = std::mem::take(&mut *self.pages.lock().unwrap_or_else(|e| e.into_inner()));
        let mut first_error = None;
        for page in pages.iter().rev() {
            match page.silent_cleanup().await {
                Ok(()) => info!("Removed {}", page.endpoint()),
                Err(e) => {
                    warn!("Unable to clean up {}: {}", page.endpoint(), e);
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Creates resources of one kind
#[derive(Clone)]
pub struct Factory {
    conn: Arc<Connection>,
    kind: PageKind,
    options: FactoryOptions,
    defaults: Map<String, Value>,
    config: Arc<TowerkitConfig>,
    teardown: Arc<Teardown>,
}

impl Factory {
    pub fn new(conn: Arc<Connection>, kind: PageKind) -> Self {
        Self {
            conn,
            kind,
            options: FactoryOptions::default(),
            defaults: Map::new(),
            config: Arc::new(TowerkitConfig::default()),
            teardown: Arc::new(Teardown::new()),
        }
    }

    pub fn with_options(mut self, options: FactoryOptions) -> Self {
        self.options = options;
        self
    }

    /// Share a teardown registry with other factories
    pub fn with_teardown(mut self, teardown: Arc<Teardown>) -> Self {
        self.teardown = teardown;
        self
    }

    /// Configuration providing credential secrets and project urls
    pub fn with_config(mut self, config: Arc<TowerkitConfig>) -> Self {
        self.config = config;
        self
    }

    /// Fields applied to every resource unless the caller sets them
    pub fn with_defaults(mut self, defaults: Map<String, Value>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn teardown(&self) -> &Arc<Teardown> {
        &self.teardown
    }

    fn merged(&self, mut args: CreateArgs) -> CreateArgs {
        for (name, value) in &self.defaults {
            args.fields
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        args
    }

    /// Create a resource, or reuse one when key fields are configured
    pub async fn create(&self, args: CreateArgs) -> Result<Page> {
        if !self.options.get_or_create.is_empty() {
            return self.get_or_create(args).await;
        }
        self.create_new(args).await
    }

    async fn create_new(&self, args: CreateArgs) -> Result<Page> {
        let args = self.merged(args);
        let (page, created) =
            has_create::create_reporting(&self.conn, &self.config, self.kind, &args).await?;
        for dependency in created {
            self.teardown.register(dependency);
        }
        self.teardown.register(page.clone());
        for related in has_create::related_pages(&page) {
            self.teardown.register(related);
        }
        Ok(page)
    }

    fn key_params(&self, args: &CreateArgs) -> Result<Vec<(String, String)>> {
        if self.options.get_or_create.is_empty() {
            return Err(ApiError::Factory(format!(
                "{} factory has no key fields configured",
                self.kind
            )));
        }
        self.options
            .get_or_create
            .iter()
            .map(|field| {
                args.fields
                    .get(field)
                    .map(|v| (field.clone(), query_value(v)))
                    .ok_or_else(|| {
                        ApiError::Factory(format!(
                            "{} initialization value '{}' not found",
                            self.kind, field
                        ))
                    })
            })
            .collect()
    }

    async fn matching(&self, args: &CreateArgs) -> Result<Vec<Page>> {
        let key = self.key_params(args)?;
        let list_kind = self.kind.list().ok_or_else(|| {
            ApiError::Factory(format!("{} has no list endpoint to search", self.kind))
        })?;
        let list = Page::new(self.conn.clone(), list_kind).fetch(&key).await?;
        Ok(list.results())
    }

    /// Reuse the resource matching the key fields, creating it when missing
    pub async fn get_or_create(&self, args: CreateArgs) -> Result<Page> {
        if let Some(existing) = self.matching(&args).await?.pop() {
            debug!("Reusing {} at {}", self.kind, existing.endpoint());
            return Ok(existing);
        }
        self.create_new(args).await
    }

    /// Remove every resource matching the key fields, then create a new one
    pub async fn create_or_replace(&self, args: CreateArgs) -> Result<Page> {
        for existing in self.matching(&args).await? {
            info!("Replacing {} at {}", self.kind, existing.endpoint());
            existing.silent_cleanup().await?;
        }
        self.create_new(args).await
    }

    /// Request body for a new resource. Dependencies are created and
    /// registered for teardown, the resource itself is not.
    pub async fn payload(&self, args: CreateArgs) -> Result<PreparedPayload> {
        let args = self.merged(args);
        let prepared =
            has_create::create_payload_with_config(&self.conn, &self.config, self.kind, &args).await?;
        for dependency in &prepared.created {
            self.teardown.register(dependency.clone());
        }
        Ok(prepared)
    }
}
