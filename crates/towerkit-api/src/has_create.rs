//! Dependency-aware resource creation
//!
//! Creating a resource first creates everything it depends on, in
//! topological order, reusing a single instance per kind. A job template
//! therefore gets one organization shared by its inventory, project and
//! credential. Callers can pin any dependency to an existing page with
//! [`Dependency::Use`] or request an optional one with
//! [`Dependency::Create`].
//!
//! Every created page remembers its direct dependencies in its
//! [`DependencyStore`]. Only the entries created along with the page are
//! followed by [`teardown`]; pages supplied by the caller are left alone.
//!
//! Some kinds create related resources right after they exist: an inventory
//! gets a `localhost` host unless created with `localhost: false`.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    sync::Arc,
};

use serde_json::{Map, Value};
use towerkit_client::Connection;
use tracing::{info, warn};

use crate::{
    config::TowerkitConfig,
    error::{ApiError, Result},
    graph::DependencyGraph,
    kind::PageKind,
    page::Page,
    pages::{Organization, UnifiedJobTemplate},
    payload,
};

/// Pages a resource was created with, by kind
pub type DependencyStore = BTreeMap<PageKind, Page>;

/// How to satisfy one dependency
#[derive(Clone, Debug)]
pub enum Dependency {
    /// Create a new resource of this kind
    Create(PageKind),
    /// Use an existing resource
    Use(Page),
}

impl Dependency {
    pub fn kind(&self) -> PageKind {
        match self {
            Dependency::Create(kind) => *kind,
            Dependency::Use(page) => page.kind(),
        }
    }
}

/// Fields and dependency choices for a new resource
#[derive(Clone, Debug, Default)]
pub struct CreateArgs {
    pub fields: Map<String, Value>,
    pub dependencies: Vec<Dependency>,
}

impl CreateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn fields(mut self, fields: Map<String, Value>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn using(mut self, page: Page) -> Self {
        self.dependencies.push(Dependency::Use(page));
        self
    }

    pub fn creating(mut self, kind: PageKind) -> Self {
        self.dependencies.push(Dependency::Create(kind));
        self
    }
}

/// Payload for a target whose dependencies now exist
#[derive(Clone, Debug)]
pub struct PreparedPayload {
    pub payload: Map<String, Value>,
    /// Every dependency the payload refers to, by kind
    pub store: DependencyStore,
    /// Dependencies created for this payload, in creation order
    pub created: Vec<Page>,
}

/// Create a resource of `kind` and every dependency it needs, using the
/// built-in defaults for credentials and project urls
pub async fn create(conn: &Arc<Connection>, kind: PageKind, args: &CreateArgs) -> Result<Page> {
    create_with_config(conn, &TowerkitConfig::default(), kind, args).await
}

/// Like [`create`], taking credential and project defaults from `config`
pub async fn create_with_config(
    conn: &Arc<Connection>,
    config: &TowerkitConfig,
    kind: PageKind,
    args: &CreateArgs,
) -> Result<Page> {
    let (page, _) = create_reporting(conn, config, kind, args).await?;
    Ok(page)
}

/// Like [`create_with_config`], also returning the dependencies created on
/// the way
pub(crate) async fn create_reporting(
    conn: &Arc<Connection>,
    config: &TowerkitConfig,
    kind: PageKind,
    args: &CreateArgs,
) -> Result<(Page, Vec<Page>)> {
    let prepared = resolve(conn, config, kind, args).await?;
    let created: BTreeSet<PageKind> = prepared.created.iter().map(Page::kind).collect();
    let page = create_one(conn, config, kind, &prepared.store, &args.fields, &created).await?;
    Ok((page, prepared.created))
}

/// Create the dependencies of `kind` and return the body that would create it
pub async fn create_payload(
    conn: &Arc<Connection>,
    kind: PageKind,
    args: &CreateArgs,
) -> Result<PreparedPayload> {
    create_payload_with_config(conn, &TowerkitConfig::default(), kind, args).await
}

/// Like [`create_payload`], taking defaults from `config`
pub async fn create_payload_with_config(
    conn: &Arc<Connection>,
    config: &TowerkitConfig,
    kind: PageKind,
    args: &CreateArgs,
) -> Result<PreparedPayload> {
    let mut prepared = resolve(conn, config, kind, args).await?;
    prepared.payload = payload::build(kind, &prepared.store, &args.fields, config)?;
    Ok(prepared)
}

fn explicit_dependencies(kind: PageKind, args: &CreateArgs) -> Result<BTreeMap<PageKind, Dependency>> {
    let mut explicit = BTreeMap::new();
    for dependency in &args.dependencies {
        let dep_kind = dependency.kind();
        if !kind.all_dependencies().any(|k| k == dep_kind) {
            return Err(ApiError::Dependency(format!(
                "{} does not depend on {}",
                kind, dep_kind
            )));
        }
        explicit.insert(dep_kind, dependency.clone());
    }
    Ok(explicit)
}

/// Dependencies created for `kind` when nothing was asked for explicitly.
///
/// A credential owned by a user or team needs no organization.
fn required_dependencies(kind: PageKind, explicit: &BTreeMap<PageKind, Dependency>) -> Vec<PageKind> {
    let owned_elsewhere = explicit.contains_key(&PageKind::User) || explicit.contains_key(&PageKind::Team);
    let mut deps: Vec<PageKind> = kind
        .dependencies()
        .iter()
        .copied()
        .filter(|d| {
            !(kind == PageKind::Credential
                && *d == PageKind::Organization
                && owned_elsewhere
                && !explicit.contains_key(d))
        })
        .collect();
    for dep in explicit.keys() {
        if !deps.contains(dep) {
            deps.push(*dep);
        }
    }
    deps
}

async fn resolve(
    conn: &Arc<Connection>,
    config: &TowerkitConfig,
    target: PageKind,
    args: &CreateArgs,
) -> Result<PreparedPayload> {
    if !target.is_creatable() {
        return Err(ApiError::Factory(format!("{} cannot be created", target)));
    }
    let explicit = explicit_dependencies(target, args)?;

    let mut store = DependencyStore::new();
    for dependency in explicit.values() {
        if let Dependency::Use(page) = dependency {
            store.insert(page.kind(), page.clone());
        }
    }
    // Existing pages share what they were created with, unless overridden
    for dependency in explicit.values() {
        if let Dependency::Use(page) = dependency {
            for (kind, shared) in &page.ds {
                if !explicit.contains_key(kind) && is_dependency(page.kind, *kind) {
                    store.entry(*kind).or_insert_with(|| shared.clone());
                }
            }
        }
    }

    let mut graph = DependencyGraph::new();
    graph.add_node(target);
    let mut queue = vec![target];
    while let Some(kind) = queue.pop() {
        if kind != target && store.contains_key(&kind) {
            continue;
        }
        let deps = if kind == target {
            required_dependencies(kind, &explicit)
        } else {
            kind.dependencies().to_vec()
        };
        for dep in deps {
            if !graph.contains(dep) {
                queue.push(dep);
            }
            graph.add_edge(dep, kind);
        }
    }

    let mut created = Vec::new();
    let mut created_kinds = BTreeSet::new();
    for kind in graph.toposort()? {
        if kind == target || store.contains_key(&kind) {
            continue;
        }
        let page = create_one(conn, config, kind, &store, &Map::new(), &created_kinds).await?;
        store.insert(kind, page.clone());
        created_kinds.insert(kind);
        created.push(page.clone());
        created.extend(related_pages(&page));
    }

    // The target only refers to its own direct dependencies
    let direct = required_dependencies(target, &explicit);
    store.retain(|kind, _| direct.contains(kind));

    Ok(PreparedPayload {
        payload: Map::new(),
        store,
        created,
    })
}

async fn create_one(
    conn: &Arc<Connection>,
    config: &TowerkitConfig,
    kind: PageKind,
    store: &DependencyStore,
    fields: &Map<String, Value>,
    created: &BTreeSet<PageKind>,
) -> Result<Page> {
    let body = payload::build(kind, store, fields, config)?;
    let endpoint = payload::create_endpoint(kind, store)?;
    let list = Page::with_json(
        conn.clone(),
        kind.list().unwrap_or(kind),
        endpoint,
        Value::Object(Map::new()),
    );
    let mut page = list.post(&Value::Object(body)).await?;
    page.kind = kind;
    page.ds = kind
        .all_dependencies()
        .filter_map(|dep| store.get(&dep).map(|p| (dep, p.clone())))
        .collect();
    page.created = page
        .ds
        .keys()
        .filter(|dep| created.contains(*dep))
        .copied()
        .collect();
    info!("Created {} at {}", kind, page.url());

    match kind {
        PageKind::Project => {
            let wait = fields.get("wait").and_then(Value::as_bool).unwrap_or(true);
            if wait && page.related_endpoint("current_update").is_some() {
                let template = UnifiedJobTemplate::try_from(page.clone())?;
                template.current_update().await?.wait_until_completed().await?;
            }
        }
        PageKind::User => {
            if let Some(org) = store.get(&PageKind::Organization) {
                Organization::try_from(org.clone())?.add_user(&page).await?;
            }
        }
        PageKind::Inventory => {
            let localhost = fields.get("localhost").and_then(Value::as_bool).unwrap_or(true);
            if localhost {
                let host = create_localhost(conn, config, &page).await?;
                page.ds.insert(PageKind::Host, host);
                page.created.insert(PageKind::Host);
            }
        }
        _ => {}
    }
    Ok(page)
}

/// Host named `localhost` in `inventory`, so job templates have a target
async fn create_localhost(
    conn: &Arc<Connection>,
    config: &TowerkitConfig,
    inventory: &Page,
) -> Result<Page> {
    let mut store = DependencyStore::new();
    store.insert(PageKind::Inventory, inventory.clone());
    let mut fields = Map::new();
    fields.insert("name".to_string(), Value::from("localhost"));
    Box::pin(create_one(conn, config, PageKind::Host, &store, &fields, &BTreeSet::new())).await
}

fn is_dependency(owner: PageKind, kind: PageKind) -> bool {
    owner.all_dependencies().any(|dep| dep == kind)
}

/// Resources created right after `page` that it does not depend on, such as
/// an inventory's `localhost` host
pub(crate) fn related_pages(page: &Page) -> Vec<Page> {
    page.ds
        .iter()
        .filter(|(kind, _)| page.created.contains(*kind) && !is_dependency(page.kind, **kind))
        .map(|(_, related)| related.clone())
        .collect()
}

/// Every page reachable through the dependency stores of `pages`,
/// deduplicated by endpoint, dependencies before dependents
pub fn all_instantiated_dependencies(pages: &[Page]) -> Vec<Page> {
    fn visit(page: &Page, seen: &mut HashSet<String>, out: &mut Vec<Page>) {
        if seen.contains(page.endpoint()) {
            return;
        }
        for dep in page.ds.values() {
            visit(dep, seen, out);
        }
        if seen.insert(page.endpoint().to_string()) {
            out.push(page.clone());
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for page in pages {
        visit(page, &mut seen, &mut out);
    }
    out
}

/// `page` and every page created along with it, in the order they are
/// removed: related resources and dependents before what they depend on
pub fn teardown_order(page: &Page) -> Vec<Page> {
    fn visit(page: &Page, seen: &mut HashSet<String>, out: &mut Vec<Page>) {
        if !seen.insert(page.endpoint().to_string()) {
            return;
        }
        for (kind, dep) in &page.ds {
            if page.created.contains(kind) && is_dependency(page.kind, *kind) {
                visit(dep, seen, out);
            }
        }
        out.push(page.clone());
        for related in related_pages(page) {
            visit(&related, seen, out);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    visit(page, &mut seen, &mut out);
    out.reverse();
    out
}

/// Silently clean up `page` and everything created for it, dependents first.
/// Caller-supplied dependencies are kept.
///
/// Every page is attempted; the first failure is returned.
pub async fn teardown(page: &Page) -> Result<()> {
    let mut first_error = None;
    for target in &teardown_order(page) {
        if let Err(e) = target.silent_cleanup().await {
            warn!("Unable to clean up {}: {}", target.endpoint(), e);
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

impl Page {
    /// See [`create`]
    pub async fn create(conn: &Arc<Connection>, kind: PageKind, args: &CreateArgs) -> Result<Page> {
        create(conn, kind, args).await
    }

    /// See [`teardown`]
    pub async fn teardown(&self) -> Result<()> {
        teardown(self).await
    }
}
