//! REST endpoint patterns for the v1 API.
//!
//! Each constant is a regex-friendly path: literal list endpoints double as
//! default endpoints, item endpoints use `\d+` for the primary key.

pub mod v1 {
    pub const ROOT: &str = "/api/v1/";
    pub const AUTHTOKEN: &str = "/api/v1/authtoken/";
    pub const PING: &str = "/api/v1/ping/";
    pub const CONFIG: &str = "/api/v1/config/";
    pub const ME: &str = "/api/v1/me/";
    pub const DASHBOARD: &str = "/api/v1/dashboard/";

    // Organizations
    pub const ORGANIZATIONS: &str = "/api/v1/organizations/";
    pub const ORGANIZATION: &str = r"/api/v1/organizations/\d+/";

    // Users
    pub const USERS: &str = "/api/v1/users/";
    pub const USER: &str = r"/api/v1/users/\d+/";
    pub const RELATED_USERS: &str =
        r"/api/v1/(organizations|teams|roles)/\d+/(users|admins|members)/";

    // Teams
    pub const TEAMS: &str = "/api/v1/teams/";
    pub const TEAM: &str = r"/api/v1/teams/\d+/";
    pub const RELATED_TEAMS: &str = r"/api/v1/(organizations|users|roles)/\d+/teams/";

    // Credentials
    pub const CREDENTIALS: &str = "/api/v1/credentials/";
    pub const CREDENTIAL: &str = r"/api/v1/credentials/\d+/";
    pub const RELATED_CREDENTIALS: &str = r"/api/v1/(organizations|users|teams)/\d+/credentials/";

    // Projects
    pub const PROJECTS: &str = "/api/v1/projects/";
    pub const PROJECT: &str = r"/api/v1/projects/\d+/";
    pub const RELATED_PROJECTS: &str = r"/api/v1/(organizations|users|teams)/\d+/projects/";
    pub const PROJECT_UPDATE_LAUNCH: &str = r"/api/v1/projects/\d+/update/";
    pub const PROJECT_UPDATES: &str = "/api/v1/project_updates/";
    pub const PROJECT_UPDATE: &str = r"/api/v1/project_updates/\d+/";
    pub const PROJECT_PROJECT_UPDATES: &str = r"/api/v1/projects/\d+/project_updates/";
    pub const PROJECT_UPDATE_CANCEL: &str = r"/api/v1/project_updates/\d+/cancel/";

    // Inventories
    pub const INVENTORIES: &str = "/api/v1/inventories/";
    pub const INVENTORY: &str = r"/api/v1/inventories/\d+/";
    pub const RELATED_INVENTORIES: &str = r"/api/v1/organizations/\d+/inventories/";
    pub const INVENTORY_SCRIPT_VIEW: &str = r"/api/v1/inventories/\d+/script/";

    // Hosts
    pub const HOSTS: &str = "/api/v1/hosts/";
    pub const HOST: &str = r"/api/v1/hosts/\d+/";
    pub const RELATED_HOSTS: &str = r"/api/v1/(groups|inventories)/\d+/(hosts|all_hosts)/";

    // Groups
    pub const GROUPS: &str = "/api/v1/groups/";
    pub const GROUP: &str = r"/api/v1/groups/\d+/";
    pub const RELATED_GROUPS: &str =
        r"/api/v1/(hosts|inventories)/\d+/(groups|all_groups|root_groups)/";
    pub const GROUP_CHILDREN: &str = r"/api/v1/groups/\d+/children/";

    // Inventory scripts and sources
    pub const INVENTORY_SCRIPTS: &str = "/api/v1/inventory_scripts/";
    pub const INVENTORY_SCRIPT: &str = r"/api/v1/inventory_scripts/\d+/";
    pub const INVENTORY_SOURCES: &str = "/api/v1/inventory_sources/";
    pub const INVENTORY_SOURCE: &str = r"/api/v1/inventory_sources/\d+/";
    pub const INVENTORY_UPDATES: &str = "/api/v1/inventory_updates/";
    pub const INVENTORY_UPDATE: &str = r"/api/v1/inventory_updates/\d+/";
    pub const INVENTORY_SOURCE_UPDATES: &str = r"/api/v1/inventory_sources/\d+/inventory_updates/";
    pub const INVENTORY_UPDATE_CANCEL: &str = r"/api/v1/inventory_updates/\d+/cancel/";

    // Job templates
    pub const JOB_TEMPLATES: &str = "/api/v1/job_templates/";
    pub const JOB_TEMPLATE: &str = r"/api/v1/job_templates/\d+/";
    pub const RELATED_JOB_TEMPLATES: &str =
        r"/api/v1/(organizations|projects|inventories|credentials|labels)/\d+/job_templates/";
    pub const JOB_TEMPLATE_LAUNCH: &str = r"/api/v1/job_templates/\d+/launch/";
    pub const JOB_TEMPLATE_CALLBACK: &str = r"/api/v1/job_templates/\d+/callback/";
    pub const JOB_TEMPLATE_SURVEY_SPEC: &str = r"/api/v1/job_templates/\d+/survey_spec/";

    // Jobs
    pub const JOBS: &str = "/api/v1/jobs/";
    pub const JOB: &str = r"/api/v1/jobs/\d+/";
    pub const JOB_TEMPLATE_JOBS: &str = r"/api/v1/job_templates/\d+/jobs/";
    pub const SCHEDULE_JOBS: &str = r"/api/v1/schedules/\d+/jobs/";
    pub const JOB_CANCEL: &str = r"/api/v1/jobs/\d+/cancel/";
    pub const JOB_RELAUNCH: &str = r"/api/v1/jobs/\d+/relaunch/";
    pub const JOB_STDOUT: &str = r"/api/v1/jobs/\d+/stdout/";
    pub const JOB_EVENTS: &str = "/api/v1/job_events/";
    pub const JOB_EVENT: &str = r"/api/v1/job_events/\d+/";
    pub const JOB_JOB_EVENTS: &str = r"/api/v1/jobs/\d+/job_events/";
    pub const JOB_EVENT_CHILDREN: &str = r"/api/v1/job_events/\d+/children/";
    pub const JOB_HOST_SUMMARIES: &str = r"/api/v1/(jobs|hosts|groups)/\d+/job_host_summaries/";
    pub const JOB_HOST_SUMMARY: &str = r"/api/v1/job_host_summaries/\d+/";

    // Unified jobs and templates
    pub const UNIFIED_JOB_TEMPLATES: &str = "/api/v1/unified_job_templates/";
    pub const UNIFIED_JOBS: &str = "/api/v1/unified_jobs/";

    // Workflows
    pub const WORKFLOW_JOB_TEMPLATES: &str = "/api/v1/workflow_job_templates/";
    pub const WORKFLOW_JOB_TEMPLATE: &str = r"/api/v1/workflow_job_templates/\d+/";
    pub const WORKFLOW_JOB_TEMPLATE_LAUNCH: &str = r"/api/v1/workflow_job_templates/\d+/launch/";
    pub const WORKFLOW_JOB_TEMPLATE_NODES: &str = "/api/v1/workflow_job_template_nodes/";
    pub const WORKFLOW_JOB_TEMPLATE_NODE: &str = r"/api/v1/workflow_job_template_nodes/\d+/";
    pub const WORKFLOW_JOB_TEMPLATE_WORKFLOW_NODES: &str =
        r"/api/v1/workflow_job_templates/\d+/workflow_nodes/";
    pub const WORKFLOW_JOB_TEMPLATE_NODE_CHILDREN: &str =
        r"/api/v1/workflow_job_template_nodes/\d+/(success|failure|always)_nodes/";
    pub const WORKFLOW_JOBS: &str = "/api/v1/workflow_jobs/";
    pub const WORKFLOW_JOB: &str = r"/api/v1/workflow_jobs/\d+/";
    pub const WORKFLOW_JOB_TEMPLATE_JOBS: &str =
        r"/api/v1/workflow_job_templates/\d+/workflow_jobs/";
    pub const WORKFLOW_JOB_CANCEL: &str = r"/api/v1/workflow_jobs/\d+/cancel/";

    // Schedules
    pub const SCHEDULES: &str = "/api/v1/schedules/";
    pub const SCHEDULE: &str = r"/api/v1/schedules/\d+/";
    pub const RELATED_SCHEDULES: &str =
        r"/api/v1/(job_templates|projects|inventory_sources|workflow_job_templates)/\d+/schedules/";

    // Labels
    pub const LABELS: &str = "/api/v1/labels/";
    pub const LABEL: &str = r"/api/v1/labels/\d+/";
    pub const RELATED_LABELS: &str = r"/api/v1/(job_templates|jobs|workflow_job_templates)/\d+/labels/";

    // Roles
    pub const ROLES: &str = "/api/v1/roles/";
    pub const ROLE: &str = r"/api/v1/roles/\d+/";
    pub const RELATED_ROLES: &str = r"/api/v1/(users|teams)/\d+/roles/";
    pub const OBJECT_ROLES: &str = r"/api/v1/\w+/\d+/object_roles/";

    // Instances
    pub const INSTANCE_GROUPS: &str = "/api/v1/instance_groups/";
    pub const INSTANCE_GROUP: &str = r"/api/v1/instance_groups/\d+/";
    pub const RELATED_INSTANCE_GROUPS: &str =
        r"/api/v1/(organizations|inventories|job_templates|instances)/\d+/instance_groups/";
    pub const INSTANCES: &str = "/api/v1/instances/";
    pub const INSTANCE: &str = r"/api/v1/instances/\d+/";
    pub const INSTANCE_GROUP_INSTANCES: &str = r"/api/v1/instance_groups/\d+/instances/";

    // Notifications
    pub const NOTIFICATION_TEMPLATES: &str = "/api/v1/notification_templates/";
    pub const NOTIFICATION_TEMPLATE: &str = r"/api/v1/notification_templates/\d+/";
    pub const RELATED_NOTIFICATION_TEMPLATES: &str =
        r"/api/v1/\w+/\d+/notification_templates(_any|_error|_success)?/";
    pub const NOTIFICATION_TEMPLATE_TEST: &str = r"/api/v1/notification_templates/\d+/test/";
    pub const NOTIFICATIONS: &str = "/api/v1/notifications/";
    pub const NOTIFICATION: &str = r"/api/v1/notifications/\d+/";
    pub const RELATED_NOTIFICATIONS: &str = r"/api/v1/\w+/\d+/notifications/";

    // Ad hoc commands
    pub const AD_HOC_COMMANDS: &str = "/api/v1/ad_hoc_commands/";
    pub const AD_HOC_COMMAND: &str = r"/api/v1/ad_hoc_commands/\d+/";
    pub const AD_HOC_COMMAND_CANCEL: &str = r"/api/v1/ad_hoc_commands/\d+/cancel/";

    // Activity stream
    pub const ACTIVITY_STREAM: &str = "/api/v1/activity_stream/";
    pub const ACTIVITY_STREAM_ITEM: &str = r"/api/v1/activity_stream/\d+/";
}
