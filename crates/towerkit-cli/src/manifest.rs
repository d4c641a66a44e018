//! Resource manifests
//!
//! A manifest lists resources per section. Entries refer to one another by
//! name, so a host can say `inventory: staging` instead of carrying an id:
//!
//! ```yaml
//! organizations:
//!   - name: Default
//! inventories:
//!   - name: staging
//!     organization: Default
//! hosts:
//!   - name: web01
//!     inventory: staging
//! ```
//!
//! Any other keys of an entry are sent as resource fields.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_json::{Map, Value};
use towerkit_api::{PageKind, graph::DependencyGraph};

/// One manifest entry
pub type Resource = Map<String, Value>;

/// Kinds a manifest can describe
pub const SECTIONS: &[PageKind] = &[
    PageKind::Organization,
    PageKind::User,
    PageKind::Team,
    PageKind::Credential,
    PageKind::Project,
    PageKind::Inventory,
    PageKind::Host,
    PageKind::Group,
    PageKind::JobTemplate,
];

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    pub organizations: Vec<Resource>,
    pub users: Vec<Resource>,
    pub teams: Vec<Resource>,
    pub credentials: Vec<Resource>,
    pub projects: Vec<Resource>,
    pub inventories: Vec<Resource>,
    pub hosts: Vec<Resource>,
    pub groups: Vec<Resource>,
    pub job_templates: Vec<Resource>,
}

impl Manifest {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let manifest = serde_yaml::from_str::<Option<Manifest>>(text)
            .context("Invalid manifest")?
            .unwrap_or_default();
        Ok(manifest)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn section(&self, kind: PageKind) -> &[Resource] {
        match kind {
            PageKind::Organization => &self.organizations,
            PageKind::User => &self.users,
            PageKind::Team => &self.teams,
            PageKind::Credential => &self.credentials,
            PageKind::Project => &self.projects,
            PageKind::Inventory => &self.inventories,
            PageKind::Host => &self.hosts,
            PageKind::Group => &self.groups,
            PageKind::JobTemplate => &self.job_templates,
            _ => &[],
        }
    }

    /// Number of entries across all sections
    pub fn len(&self) -> usize {
        SECTIONS.iter().map(|k| self.section(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Field naming an entry, used for references and to find existing resources
pub fn key_field(kind: PageKind) -> &'static str {
    match kind {
        PageKind::User => "username",
        _ => "name",
    }
}

/// Sections ordered so that every entry's references are loaded before it
pub fn load_order() -> anyhow::Result<Vec<PageKind>> {
    let mut graph = DependencyGraph::new();
    for kind in SECTIONS {
        graph.add_node(*kind);
        for dep in kind.all_dependencies().filter(|d| SECTIONS.contains(d)) {
            graph.add_edge(dep, *kind);
        }
    }
    graph
        .toposort()
        .map_err(|e| anyhow::anyhow!("Manifest sections form a cycle: {}", e.remaining))
}

/// Named references of an entry: `(kind, name)` for every dependency field
/// holding a string
pub fn references(kind: PageKind, resource: &Resource) -> Vec<(PageKind, String)> {
    kind.all_dependencies()
        .filter(|d| SECTIONS.contains(d))
        .filter_map(|dep| {
            resource
                .get(dep.name())
                .and_then(Value::as_str)
                .map(|name| (dep, name.to_string()))
        })
        .collect()
}
