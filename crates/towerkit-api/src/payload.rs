//! Default request bodies for creatable resources
//!
//! Every creatable kind gets a randomized body that the server accepts as
//! is. Credentials take their secrets from the configured section for their
//! kind and projects their repository from the configured url for their scm
//! type. Dependencies are referenced by id under the field name the server
//! expects, and caller supplied fields always win over the defaults.

use chrono::{Duration, Utc};
use serde_json::{Map, Value, json};

use crate::{
    config::TowerkitConfig,
    error::{ApiError, Result},
    has_create::DependencyStore,
    kind::PageKind,
    registry::PageRegistry,
    utils::{random_alphanumeric, random_name, update_payload},
};

pub const DEFAULT_PASSWORD: &str = "fo0m4nchU";
pub const URL_PROJECT_GIT: &str = "https://github.com/jlaska/ansible-playbooks.git";
pub const URL_PROJECT_HG: &str = "https://bitbucket.org/jlaska/ansible-helloworld";

/// Creation options that never reach the server
pub const CONTROL_FIELDS: &[&str] = &["wait", "localhost"];

/// Credential fields filled in from the configured credential section
pub const CREDENTIAL_SECRET_FIELDS: &[&str] = &[
    "username",
    "password",
    "ssh_key_data",
    "ssh_key_unlock",
    "become_method",
    "become_username",
    "become_password",
];

/// Field under which `owner` references a `dependency` by id
pub fn reference_field(owner: PageKind, dependency: PageKind) -> Option<&'static str> {
    use PageKind::*;
    match (owner, dependency) {
        (User, Organization) => None,
        (_, Organization) => Some("organization"),
        (_, Inventory) => Some("inventory"),
        (_, Project) => Some("project"),
        (_, Credential) => Some("credential"),
        (_, User) => Some("user"),
        (_, Team) => Some("team"),
        (InventorySource, InventoryScript) => Some("source_script"),
        (WorkflowJobTemplateNode, WorkflowJobTemplate) => Some("workflow_job_template"),
        (_, JobTemplate) => Some("unified_job_template"),
        _ => None,
    }
}

/// Endpoint a new resource of `kind` is posted to
pub fn create_endpoint(kind: PageKind, store: &DependencyStore) -> Result<String> {
    if kind == PageKind::Schedule
        && let Some(endpoint) = store
            .get(&PageKind::JobTemplate)
            .and_then(|jt| jt.related_endpoint("schedules"))
    {
        return Ok(endpoint.to_string());
    }

    kind.list()
        .and_then(|list| PageRegistry::default_registry().base_url(list))
        .map(str::to_string)
        .ok_or_else(|| ApiError::Factory(format!("{} has no list endpoint to create from", kind)))
}

/// Full request body for a new `kind`
pub fn build(
    kind: PageKind,
    store: &DependencyStore,
    fields: &Map<String, Value>,
    config: &TowerkitConfig,
) -> Result<Map<String, Value>> {
    let mut payload = defaults(kind, fields, config);

    for dependency in kind.all_dependencies() {
        if let Some(field) = reference_field(kind, dependency)
            && let Some(page) = store.get(&dependency)
        {
            payload.insert(field.to_string(), json!(page.id()?));
        }
    }

    for (name, value) in fields {
        if !CONTROL_FIELDS.contains(&name.as_str()) {
            payload.insert(name.clone(), value.clone());
        }
    }
    Ok(payload)
}

fn defaults(kind: PageKind, fields: &Map<String, Value>, config: &TowerkitConfig) -> Map<String, Value> {
    use PageKind::*;

    let value = match kind {
        Organization => json!({
            "name": random_name("Organization"),
            "description": random_alphanumeric(10),
        }),
        User => json!({
            "username": format!("user_{}", random_alphanumeric(8)),
            "password": DEFAULT_PASSWORD,
            "is_superuser": false,
            "first_name": random_alphanumeric(8),
            "last_name": random_alphanumeric(8),
            "email": format!("{}@example.com", random_alphanumeric(8).to_lowercase()),
        }),
        Team => json!({
            "name": random_name("Team"),
            "description": random_alphanumeric(10),
        }),
        Credential => {
            let credential_kind = fields.get("kind").and_then(Value::as_str).unwrap_or("ssh");
            let mut body = json!({
                "kind": credential_kind,
                "name": random_name("Credential"),
                "description": random_alphanumeric(10),
            });
            if credential_kind == "net" {
                body["password"] = json!(DEFAULT_PASSWORD);
            }
            if let Value::Object(map) = &mut body {
                let configured = config.credential_fields(credential_kind);
                update_payload(map, CREDENTIAL_SECRET_FIELDS, &configured);
            }
            body
        }
        Project => {
            let scm_type = fields.get("scm_type").and_then(Value::as_str).unwrap_or("git");
            let scm_url = config.project_url(scm_type).unwrap_or(match scm_type {
                "hg" => URL_PROJECT_HG,
                _ => URL_PROJECT_GIT,
            });
            json!({
                "name": random_name("Project"),
                "scm_type": scm_type,
                "scm_url": scm_url,
            })
        }
        Inventory => json!({
            "name": random_name("Inventory"),
            "description": random_alphanumeric(10),
        }),
        Host => json!({
            "name": random_name("Host"),
            "description": random_alphanumeric(10),
            "variables": json!({
                "ansible_ssh_host": "127.0.0.1",
                "ansible_connection": "local",
            })
            .to_string(),
        }),
        Group => json!({
            "name": random_alphanumeric(10),
            "description": random_alphanumeric(10),
        }),
        InventoryScript => json!({
            "name": random_name("Inventory Script"),
            "description": random_name("Description"),
            "script": inventory_script(),
        }),
        InventorySource => json!({
            "name": random_name("Inventory Source"),
            "source": "custom",
        }),
        JobTemplate => json!({
            "name": random_name("Job Template"),
            "description": random_alphanumeric(10),
            "job_type": "run",
            "playbook": "ping.yml",
        }),
        WorkflowJobTemplate => json!({
            "name": random_name("Workflow Job Template"),
            "description": random_alphanumeric(10),
        }),
        Schedule => {
            let start = (Utc::now() + Duration::days(1)).format("%Y%m%dT%H%M%SZ");
            json!({
                "name": random_name("Schedule"),
                "rrule": format!("DTSTART:{} RRULE:FREQ=DAILY;INTERVAL=1;COUNT=1", start),
            })
        }
        Label => json!({
            "name": random_alphanumeric(10),
        }),
        InstanceGroup => json!({
            "name": random_name("Instance Group"),
        }),
        NotificationTemplate => json!({
            "name": random_name("Notification Template"),
            "description": random_alphanumeric(10),
            "notification_type": "webhook",
            "notification_configuration": {
                "url": "http://127.0.0.1/webhook",
                "headers": {},
            },
        }),
        _ => json!({}),
    };

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Custom inventory script printing one group of five hosts
fn inventory_script() -> String {
    let group = format!("group-{}", random_alphanumeric(8));
    let mut lines = vec![
        "#!/usr/bin/env python".to_string(),
        "# -*- coding: utf-8 -*-".to_string(),
        "import json".to_string(),
        "inventory = dict()".to_string(),
        format!("inventory[\"{}\"] = list()", group),
    ];
    for _ in 0..5 {
        lines.push(format!(
            "inventory[\"{}\"].append(\"host-{}\")",
            group,
            random_alphanumeric(8)
        ));
    }
    lines.push("print(json.dumps(inventory))".to_string());
    lines.join("\n")
}
