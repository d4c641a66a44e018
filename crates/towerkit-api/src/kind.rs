//! Page kinds and their relationships
//!
//! A `PageKind` names the type of resource a page wraps. Lists know their
//! item kind, creatable kinds know which other resources must exist first.

use std::{fmt, str::FromStr};

macro_rules! page_kinds {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Type of resource wrapped by a page
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum PageKind {
            $($variant),*
        }

        impl PageKind {
            pub const ALL: &'static [PageKind] = &[$(PageKind::$variant),*];

            /// Snake-case name, e.g. "job_template"
            pub fn name(self) -> &'static str {
                match self {
                    $(PageKind::$variant => $name),*
                }
            }
        }
    };
}

page_kinds! {
    Base => "base",
    ApiRoot => "api_root",
    AuthToken => "authtoken",
    Ping => "ping",
    Config => "config",
    Me => "me",
    Dashboard => "dashboard",
    Organization => "organization",
    Organizations => "organizations",
    User => "user",
    Users => "users",
    Team => "team",
    Teams => "teams",
    Credential => "credential",
    Credentials => "credentials",
    Project => "project",
    Projects => "projects",
    ProjectUpdateLaunch => "project_update_launch",
    ProjectUpdate => "project_update",
    ProjectUpdates => "project_updates",
    Inventory => "inventory",
    Inventories => "inventories",
    InventoryScriptView => "inventory_script_view",
    Host => "host",
    Hosts => "hosts",
    Group => "group",
    Groups => "groups",
    InventoryScript => "inventory_script",
    InventoryScripts => "inventory_scripts",
    InventorySource => "inventory_source",
    InventorySources => "inventory_sources",
    InventoryUpdate => "inventory_update",
    InventoryUpdates => "inventory_updates",
    JobTemplate => "job_template",
    JobTemplates => "job_templates",
    JobTemplateLaunch => "job_template_launch",
    JobTemplateCallback => "job_template_callback",
    JobTemplateSurveySpec => "job_template_survey_spec",
    Job => "job",
    Jobs => "jobs",
    JobRelaunch => "job_relaunch",
    JobStdout => "job_stdout",
    JobEvent => "job_event",
    JobEvents => "job_events",
    JobHostSummary => "job_host_summary",
    JobHostSummaries => "job_host_summaries",
    UnifiedJobCancel => "unified_job_cancel",
    UnifiedJobTemplate => "unified_job_template",
    UnifiedJobTemplates => "unified_job_templates",
    UnifiedJob => "unified_job",
    UnifiedJobs => "unified_jobs",
    WorkflowJobTemplate => "workflow_job_template",
    WorkflowJobTemplates => "workflow_job_templates",
    WorkflowJobTemplateLaunch => "workflow_job_template_launch",
    WorkflowJobTemplateNode => "workflow_job_template_node",
    WorkflowJobTemplateNodes => "workflow_job_template_nodes",
    WorkflowJob => "workflow_job",
    WorkflowJobs => "workflow_jobs",
    Schedule => "schedule",
    Schedules => "schedules",
    Label => "label",
    Labels => "labels",
    Role => "role",
    Roles => "roles",
    InstanceGroup => "instance_group",
    InstanceGroups => "instance_groups",
    Instance => "instance",
    Instances => "instances",
    NotificationTemplate => "notification_template",
    NotificationTemplates => "notification_templates",
    NotificationTemplateTest => "notification_template_test",
    Notification => "notification",
    Notifications => "notifications",
    AdHocCommand => "ad_hoc_command",
    AdHocCommands => "ad_hoc_commands",
    ActivityStreamItem => "activity_stream_item",
    ActivityStream => "activity_stream",
}

impl PageKind {
    /// Kind of the elements of a list page; singular kinds map to themselves
    pub fn item(self) -> PageKind {
        use PageKind::*;
        match self {
            Organizations => Organization,
            Users => User,
            Teams => Team,
            Credentials => Credential,
            Projects => Project,
            ProjectUpdates => ProjectUpdate,
            Inventories => Inventory,
            Hosts => Host,
            Groups => Group,
            InventoryScripts => InventoryScript,
            InventorySources => InventorySource,
            InventoryUpdates => InventoryUpdate,
            JobTemplates => JobTemplate,
            Jobs => Job,
            JobEvents => JobEvent,
            JobHostSummaries => JobHostSummary,
            UnifiedJobTemplates => UnifiedJobTemplate,
            UnifiedJobs => UnifiedJob,
            WorkflowJobTemplates => WorkflowJobTemplate,
            WorkflowJobTemplateNodes => WorkflowJobTemplateNode,
            WorkflowJobs => WorkflowJob,
            Schedules => Schedule,
            Labels => Label,
            Roles => Role,
            InstanceGroups => InstanceGroup,
            Instances => Instance,
            NotificationTemplates => NotificationTemplate,
            Notifications => Notification,
            AdHocCommands => AdHocCommand,
            ActivityStream => ActivityStreamItem,
            other => other,
        }
    }

    /// List kind holding elements of this kind, if there is one
    pub fn list(self) -> Option<PageKind> {
        PageKind::ALL
            .iter()
            .copied()
            .find(|k| k.is_list() && k.item() == self)
    }

    pub fn is_list(self) -> bool {
        self.item() != self
    }

    /// Job-like pages that run and finish
    pub fn is_unified_job(self) -> bool {
        use PageKind::*;
        matches!(
            self,
            Job | ProjectUpdate | InventoryUpdate | WorkflowJob | AdHocCommand | UnifiedJob
        )
    }

    /// Templates that spawn unified jobs
    pub fn is_unified_job_template(self) -> bool {
        use PageKind::*;
        matches!(
            self,
            JobTemplate | Project | InventorySource | WorkflowJobTemplate | UnifiedJobTemplate
        )
    }

    /// Resources that must exist before this kind can be created
    pub fn dependencies(self) -> &'static [PageKind] {
        use PageKind::*;
        match self {
            Team | Label | Project | Inventory | InventoryScript | WorkflowJobTemplate
            | NotificationTemplate | Credential => &[Organization],
            Host | Group => &[Inventory],
            InventorySource => &[Inventory, InventoryScript],
            JobTemplate => &[Inventory, Project, Credential],
            Schedule => &[JobTemplate],
            WorkflowJobTemplateNode => &[WorkflowJobTemplate, JobTemplate],
            _ => &[],
        }
    }

    /// Resources that are only created when explicitly requested
    pub fn optional_dependencies(self) -> &'static [PageKind] {
        use PageKind::*;
        match self {
            Credential => &[User, Team],
            User => &[Organization],
            _ => &[],
        }
    }

    /// Every kind this kind may depend on, required or optional
    pub fn all_dependencies(self) -> impl Iterator<Item = PageKind> {
        self.dependencies()
            .iter()
            .chain(self.optional_dependencies())
            .copied()
    }

    /// Whether pages of this kind are created through a factory
    pub fn is_creatable(self) -> bool {
        use PageKind::*;
        matches!(
            self,
            Organization
                | User
                | Team
                | Credential
                | Project
                | Inventory
                | Host
                | Group
                | InventoryScript
                | InventorySource
                | JobTemplate
                | WorkflowJobTemplate
                | WorkflowJobTemplateNode
                | Schedule
                | Label
                | InstanceGroup
                | NotificationTemplate
        )
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        PageKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| format!("unknown page kind '{}'", s))
    }
}
