//! URL-pattern based page dispatch
//!
//! Pages are registered under one or more regex-friendly paths. The first
//! path registered for a kind becomes its default endpoint. Lookups match the
//! whole path, optionally followed by a query string.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use tracing::debug;

use crate::{error::Result, kind::PageKind, resources::v1};

/// Registration table of every page the client knows about
const DEFAULT_PAGES: &[(&[&str], PageKind)] = &[
    (&[v1::ROOT], PageKind::ApiRoot),
    (&[v1::AUTHTOKEN], PageKind::AuthToken),
    (&[v1::PING], PageKind::Ping),
    (&[v1::CONFIG], PageKind::Config),
    (&[v1::ME], PageKind::Me),
    (&[v1::DASHBOARD], PageKind::Dashboard),
    (&[v1::ORGANIZATION], PageKind::Organization),
    (&[v1::ORGANIZATIONS], PageKind::Organizations),
    (&[v1::USER], PageKind::User),
    (&[v1::USERS, v1::RELATED_USERS], PageKind::Users),
    (&[v1::TEAM], PageKind::Team),
    (&[v1::TEAMS, v1::RELATED_TEAMS], PageKind::Teams),
    (&[v1::CREDENTIAL], PageKind::Credential),
    (&[v1::CREDENTIALS, v1::RELATED_CREDENTIALS], PageKind::Credentials),
    (&[v1::PROJECT], PageKind::Project),
    (&[v1::PROJECTS, v1::RELATED_PROJECTS], PageKind::Projects),
    (&[v1::PROJECT_UPDATE_LAUNCH], PageKind::ProjectUpdateLaunch),
    (&[v1::PROJECT_UPDATE], PageKind::ProjectUpdate),
    (
        &[v1::PROJECT_UPDATES, v1::PROJECT_PROJECT_UPDATES],
        PageKind::ProjectUpdates,
    ),
    (&[v1::INVENTORY], PageKind::Inventory),
    (&[v1::INVENTORIES, v1::RELATED_INVENTORIES], PageKind::Inventories),
    (&[v1::INVENTORY_SCRIPT_VIEW], PageKind::InventoryScriptView),
    (&[v1::HOST], PageKind::Host),
    (&[v1::HOSTS, v1::RELATED_HOSTS], PageKind::Hosts),
    (&[v1::GROUP], PageKind::Group),
    (
        &[v1::GROUPS, v1::RELATED_GROUPS, v1::GROUP_CHILDREN],
        PageKind::Groups,
    ),
    (&[v1::INVENTORY_SCRIPT], PageKind::InventoryScript),
    (&[v1::INVENTORY_SCRIPTS], PageKind::InventoryScripts),
    (&[v1::INVENTORY_SOURCE], PageKind::InventorySource),
    (&[v1::INVENTORY_SOURCES], PageKind::InventorySources),
    (&[v1::INVENTORY_UPDATE], PageKind::InventoryUpdate),
    (
        &[v1::INVENTORY_UPDATES, v1::INVENTORY_SOURCE_UPDATES],
        PageKind::InventoryUpdates,
    ),
    (&[v1::JOB_TEMPLATE], PageKind::JobTemplate),
    (
        &[v1::JOB_TEMPLATES, v1::RELATED_JOB_TEMPLATES],
        PageKind::JobTemplates,
    ),
    (&[v1::JOB_TEMPLATE_LAUNCH], PageKind::JobTemplateLaunch),
    (&[v1::JOB_TEMPLATE_CALLBACK], PageKind::JobTemplateCallback),
    (&[v1::JOB_TEMPLATE_SURVEY_SPEC], PageKind::JobTemplateSurveySpec),
    (&[v1::JOB], PageKind::Job),
    (
        &[v1::JOBS, v1::JOB_TEMPLATE_JOBS, v1::SCHEDULE_JOBS],
        PageKind::Jobs,
    ),
    (&[v1::JOB_RELAUNCH], PageKind::JobRelaunch),
    (&[v1::JOB_STDOUT], PageKind::JobStdout),
    (&[v1::JOB_EVENT], PageKind::JobEvent),
    (
        &[v1::JOB_EVENTS, v1::JOB_JOB_EVENTS, v1::JOB_EVENT_CHILDREN],
        PageKind::JobEvents,
    ),
    (&[v1::JOB_HOST_SUMMARY], PageKind::JobHostSummary),
    (&[v1::JOB_HOST_SUMMARIES], PageKind::JobHostSummaries),
    (
        &[
            v1::JOB_CANCEL,
            v1::PROJECT_UPDATE_CANCEL,
            v1::INVENTORY_UPDATE_CANCEL,
            v1::WORKFLOW_JOB_CANCEL,
            v1::AD_HOC_COMMAND_CANCEL,
        ],
        PageKind::UnifiedJobCancel,
    ),
    (&[v1::UNIFIED_JOB_TEMPLATES], PageKind::UnifiedJobTemplates),
    (&[v1::UNIFIED_JOBS], PageKind::UnifiedJobs),
    (&[v1::WORKFLOW_JOB_TEMPLATE], PageKind::WorkflowJobTemplate),
    (&[v1::WORKFLOW_JOB_TEMPLATES], PageKind::WorkflowJobTemplates),
    (
        &[v1::WORKFLOW_JOB_TEMPLATE_LAUNCH],
        PageKind::WorkflowJobTemplateLaunch,
    ),
    (
        &[v1::WORKFLOW_JOB_TEMPLATE_NODE],
        PageKind::WorkflowJobTemplateNode,
    ),
    (
        &[
            v1::WORKFLOW_JOB_TEMPLATE_NODES,
            v1::WORKFLOW_JOB_TEMPLATE_WORKFLOW_NODES,
            v1::WORKFLOW_JOB_TEMPLATE_NODE_CHILDREN,
        ],
        PageKind::WorkflowJobTemplateNodes,
    ),
    (&[v1::WORKFLOW_JOB], PageKind::WorkflowJob),
    (
        &[v1::WORKFLOW_JOBS, v1::WORKFLOW_JOB_TEMPLATE_JOBS],
        PageKind::WorkflowJobs,
    ),
    (&[v1::SCHEDULE], PageKind::Schedule),
    (&[v1::SCHEDULES, v1::RELATED_SCHEDULES], PageKind::Schedules),
    (&[v1::LABEL], PageKind::Label),
    (&[v1::LABELS, v1::RELATED_LABELS], PageKind::Labels),
    (&[v1::ROLE], PageKind::Role),
    (
        &[v1::ROLES, v1::RELATED_ROLES, v1::OBJECT_ROLES],
        PageKind::Roles,
    ),
    (&[v1::INSTANCE_GROUP], PageKind::InstanceGroup),
    (
        &[v1::INSTANCE_GROUPS, v1::RELATED_INSTANCE_GROUPS],
        PageKind::InstanceGroups,
    ),
    (&[v1::INSTANCE], PageKind::Instance),
    (
        &[v1::INSTANCES, v1::INSTANCE_GROUP_INSTANCES],
        PageKind::Instances,
    ),
    (&[v1::NOTIFICATION_TEMPLATE], PageKind::NotificationTemplate),
    (
        &[v1::NOTIFICATION_TEMPLATES, v1::RELATED_NOTIFICATION_TEMPLATES],
        PageKind::NotificationTemplates,
    ),
    (
        &[v1::NOTIFICATION_TEMPLATE_TEST],
        PageKind::NotificationTemplateTest,
    ),
    (&[v1::NOTIFICATION], PageKind::Notification),
    (
        &[v1::NOTIFICATIONS, v1::RELATED_NOTIFICATIONS],
        PageKind::Notifications,
    ),
    (&[v1::AD_HOC_COMMAND], PageKind::AdHocCommand),
    (&[v1::AD_HOC_COMMANDS], PageKind::AdHocCommands),
    (&[v1::ACTIVITY_STREAM_ITEM], PageKind::ActivityStreamItem),
    (&[v1::ACTIVITY_STREAM], PageKind::ActivityStream),
];

static DEFAULT_REGISTRY: LazyLock<PageRegistry> = LazyLock::new(|| {
    PageRegistry::with_defaults().expect("Invalid default url pattern")
});

/// Mapping from compiled url patterns to page kinds
#[derive(Debug, Default)]
pub struct PageRegistry {
    entries: Vec<(Regex, PageKind)>,
    base_urls: HashMap<PageKind, String>,
}

impl PageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in page
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        for (urls, kind) in DEFAULT_PAGES {
            registry.register(urls, *kind)?;
        }
        Ok(registry)
    }

    /// Process-wide registry of built-in pages
    pub fn default_registry() -> &'static PageRegistry {
        &DEFAULT_REGISTRY
    }

    /// Register a kind under one or more url patterns.
    ///
    /// The first url becomes the kind's base url.
    pub fn register(&mut self, urls: &[&str], kind: PageKind) -> Result<()> {
        if let Some(first) = urls.first() {
            self.base_urls.insert(kind, (*first).to_string());
        }
        for url in urls {
            let pattern = format!(r"^{}(\?.*)*$", url);
            self.entries.push((Regex::new(&pattern)?, kind));
        }
        Ok(())
    }

    /// Match an api-provided url to a registered kind, `Base` when none matches
    pub fn lookup(&self, url: &str) -> PageKind {
        debug!("Querying page kind by url: {}", url);
        let path = strip_origin(url);
        let kind = self
            .entries
            .iter()
            .find(|(re, _)| re.is_match(path))
            .map(|(_, kind)| *kind)
            .unwrap_or(PageKind::Base);
        debug!("Retrieved {} by url: {}", kind, url);
        kind
    }

    /// Default endpoint of a kind (its first registered url)
    pub fn base_url(&self, kind: PageKind) -> Option<&str> {
        self.base_urls.get(&kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drop scheme and host from absolute urls
fn strip_origin(url: &str) -> &str {
    for scheme in ["http://", "https://"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            return rest.find('/').map(|i| &rest[i..]).unwrap_or("/");
        }
    }
    url
}
