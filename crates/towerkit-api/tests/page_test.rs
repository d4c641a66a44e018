//! Page Object Tests
//!
//! Drive page requests against a mock server.

use std::sync::Arc;

use serde_json::json;
use towerkit_api::{
    ApiError, Page, PageKind, TowerApi, TowerkitConfig,
    pages::{Group, JobTemplate, LicenseRequest, Organization, UnifiedJob, UnifiedJobTemplate},
};
use towerkit_client::{Connection, HttpClientConfig};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connection(server: &MockServer) -> Arc<Connection> {
    Arc::new(Connection::new(HttpClientConfig::new(&server.uri())).unwrap())
}

#[tokio::test]
async fn test_get_refreshes_in_place() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "url": "/api/v1/organizations/1/",
            "name": "Default",
            "related": {"users": "/api/v1/organizations/1/users/"},
        })))
        .mount(&server)
        .await;

    let mut org = Page::at(connection(&server), "/api/v1/organizations/1/");
    org.get(&[]).await?;

    assert_eq!(org.kind(), PageKind::Organization);
    assert_eq!(org.str_field("name"), Some("Default"));
    assert_eq!(org.id()?, 1);
    Ok(())
}

#[tokio::test]
async fn test_get_related_resolves_list_kind() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/1/users/"))
        .and(query_param("username", "bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "results": [{"id": 4, "url": "/api/v1/users/4/", "username": "bob"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let org = Page::with_json(
        connection(&server),
        PageKind::Organization,
        "/api/v1/organizations/1/",
        json!({"id": 1, "related": {"users": "/api/v1/organizations/1/users/"}}),
    );
    let users = org
        .get_related("users", &[("username".to_string(), "bob".to_string())])
        .await?;

    assert_eq!(users.kind(), PageKind::Users);
    assert_eq!(users.count(), 1);
    let results = users.results();
    assert_eq!(results[0].kind(), PageKind::User);
    assert_eq!(results[0].endpoint(), "/api/v1/users/4/");
    assert!(users.next_page().await?.is_none());

    let err = org.get_related("teams", &[]).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingField(_)));
    Ok(())
}

#[tokio::test]
async fn test_next_page() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/hosts/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "previous": "/api/v1/hosts/?page=1",
            "next": null,
            "results": [{"id": 3, "url": "/api/v1/hosts/3/"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let first = Page::with_json(
        connection(&server),
        PageKind::Hosts,
        "/api/v1/hosts/",
        json!({"count": 3, "next": "/api/v1/hosts/?page=2", "results": []}),
    );
    let second = first.next_page().await?.expect("second page");
    assert_eq!(second.kind(), PageKind::Hosts);
    assert_eq!(second.endpoint(), "/api/v1/hosts/?page=2");
    assert_eq!(second.results().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_post_returns_item_page() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/teams/"))
        .and(body_json(json!({"name": "ops", "organization": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 8,
            "url": "/api/v1/teams/8/",
            "name": "ops",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let teams = Page::new(connection(&server), PageKind::Teams);
    let team = teams.post(&json!({"name": "ops", "organization": 1})).await?;

    assert_eq!(team.kind(), PageKind::Team);
    assert_eq!(team.endpoint(), "/api/v1/teams/8/");
    Ok(())
}

#[tokio::test]
async fn test_set_field_patches_existing_fields_only() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/hosts/3/"))
        .and(body_json(json!({"enabled": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "url": "/api/v1/hosts/3/",
            "enabled": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut host = Page::with_json(
        connection(&server),
        PageKind::Host,
        "/api/v1/hosts/3/",
        json!({"id": 3, "enabled": true}),
    );
    host.set_field("enabled", json!(false)).await?;
    assert!(!host.bool_field("enabled"));

    let err = host.set_field("colour", json!("blue")).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingField(f) if f == "colour"));
    Ok(())
}

#[tokio::test]
async fn test_delete_variants() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/hosts/3/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/hosts/4/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let conn = connection(&server);
    Page::at(conn.clone(), "/api/v1/hosts/3/").delete().await?;

    let gone = Page::at(conn, "/api/v1/hosts/4/");
    assert!(gone.delete().await.unwrap_err().is_not_found());
    gone.silent_delete().await?;
    Ok(())
}

#[tokio::test]
async fn test_error_statuses_are_classified() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/organizations/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "__all__": ["Organization with this Name already exists."],
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/hosts/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "Host count exceeds available instances. License count of 10 exceeded.",
        })))
        .mount(&server)
        .await;

    let conn = connection(&server);
    let err = Page::new(conn.clone(), PageKind::Organizations)
        .post(&json!({"name": "Default"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Duplicate(_)));
    assert!(err.to_string().starts_with("Bad Request (400) received"));

    let err = Page::new(conn, PageKind::Hosts)
        .post(&json!({"name": "h"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::LicenseExceeded(_)));
    Ok(())
}

#[tokio::test]
async fn test_get_object_role() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/teams/2/object_roles/"))
        .and(query_param("role_field", "admin_role"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 30, "url": "/api/v1/roles/30/", "name": "Admin"}],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/teams/2/object_roles/"))
        .and(query_param("role_field", "nope_role"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .mount(&server)
        .await;

    let team = Page::with_json(
        connection(&server),
        PageKind::Team,
        "/api/v1/teams/2/",
        json!({"id": 2, "related": {"object_roles": "/api/v1/teams/2/object_roles/"}}),
    );
    let role = team.get_object_role("admin_role").await?;
    assert_eq!(role.kind(), PageKind::Role);
    assert_eq!(role.id()?, 30);

    let err = team.get_object_role("nope_role").await.unwrap_err();
    assert_eq!(err.to_string(), "lookup failed: No role with name 'nope_role' found.");
    Ok(())
}

#[tokio::test]
async fn test_load_default_authtoken() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/authtoken/"))
        .and(body_json(json!({"username": "admin", "password": "password"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc123",
            "expires": "2030-01-01T00:00:00Z",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me/"))
        .and(header("authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 1, "results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let conn = connection(&server);
    let root = Page::at(conn.clone(), "/api/v1/");
    let token = root.load_default_authtoken("admin", "password").await?;
    assert_eq!(token, "abc123");
    assert!(conn.is_authenticated());

    let me = Page::new(conn, PageKind::Me).fetch(&[]).await?;
    assert_eq!(me.kind(), PageKind::Me);
    Ok(())
}

#[tokio::test]
async fn test_cleanup_cancels_running_jobs() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/inventories/2/"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "conflict": "Resource is being used by running jobs",
            "active_jobs": [{"type": "job", "id": 9}],
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/inventories/2/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/9/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "url": "/api/v1/jobs/9/",
            "status": "canceled",
            "related": {"cancel": "/api/v1/jobs/9/cancel/"},
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/9/cancel/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"can_cancel": true})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/jobs/9/cancel/"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let inventory = Page::at(connection(&server), "/api/v1/inventories/2/");
    inventory.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn test_other_conflicts_propagate() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/projects/5/"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"conflict": "something else"})))
        .mount(&server)
        .await;

    let project = Page::at(connection(&server), "/api/v1/projects/5/");
    let err = project.silent_cleanup().await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn test_job_template_launch() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/job_templates/5/launch/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"can_start_without_user_input": true})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/job_templates/5/launch/"))
        .and(body_json(json!({"extra_vars": "{}"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"job": 11})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/job_templates/5/jobs/"))
        .and(query_param("id", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 11, "url": "/api/v1/jobs/11/", "status": "pending"}],
        })))
        .mount(&server)
        .await;

    let page = Page::with_json(
        connection(&server),
        PageKind::JobTemplate,
        "/api/v1/job_templates/5/",
        json!({
            "id": 5,
            "url": "/api/v1/job_templates/5/",
            "related": {
                "launch": "/api/v1/job_templates/5/launch/",
                "jobs": "/api/v1/job_templates/5/jobs/",
            },
        }),
    );
    let template = JobTemplate::try_from(page)?;
    let job = template.launch(&json!({"extra_vars": "{}"})).await?;

    assert_eq!(job.kind(), PageKind::Job);
    assert_eq!(job.status(), "pending");
    assert!(!job.is_completed());
    Ok(())
}

fn job_template(server: &MockServer) -> anyhow::Result<JobTemplate> {
    let page = Page::with_json(
        connection(server),
        PageKind::JobTemplate,
        "/api/v1/job_templates/5/",
        json!({
            "id": 5,
            "url": "/api/v1/job_templates/5/",
            "related": {
                "launch": "/api/v1/job_templates/5/launch/",
                "jobs": "/api/v1/job_templates/5/jobs/",
            },
        }),
    );
    Ok(JobTemplate::try_from(page)?)
}

#[tokio::test]
async fn test_launch_without_job_id() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/job_templates/5/launch/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/job_templates/5/launch/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ignored_fields": {}})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/job_templates/5/jobs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .expect(0)
        .mount(&server)
        .await;

    let err = job_template(&server)?.launch(&json!({})).await.unwrap_err();
    match err {
        ApiError::MissingField(field) => assert_eq!(field, "job"),
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_job_template_post_job() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/job_templates/5/jobs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/job_templates/5/jobs/"))
        .and(body_json(json!({"job_template": 5, "limit": "web"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 13,
            "url": "/api/v1/jobs/13/",
            "status": "new",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut fields = serde_json::Map::new();
    fields.insert("limit".to_string(), json!("web"));
    let job = job_template(&server)?.post_job(fields).await?;

    assert_eq!(job.kind(), PageKind::Job);
    assert_eq!(job.endpoint(), "/api/v1/jobs/13/");
    Ok(())
}

#[tokio::test]
async fn test_job_relaunch() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/11/relaunch/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"passwords_needed_to_start": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/jobs/11/relaunch/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/job_templates/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "url": "/api/v1/job_templates/5/",
            "related": {"jobs": "/api/v1/job_templates/5/jobs/"},
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/job_templates/5/jobs/"))
        .and(query_param("id", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 12, "url": "/api/v1/jobs/12/", "status": "pending"}],
        })))
        .mount(&server)
        .await;

    let job = UnifiedJob::try_from(Page::with_json(
        connection(&server),
        PageKind::Job,
        "/api/v1/jobs/11/",
        json!({
            "id": 11,
            "url": "/api/v1/jobs/11/",
            "status": "failed",
            "related": {
                "relaunch": "/api/v1/jobs/11/relaunch/",
                "job_template": "/api/v1/job_templates/5/",
            },
        }),
    ))?;
    let relaunched = job.relaunch(&json!({})).await?;

    assert_eq!(relaunched.endpoint(), "/api/v1/jobs/12/");
    assert_eq!(relaunched.status(), "pending");
    Ok(())
}

#[tokio::test]
async fn test_relaunch_requires_a_job() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let update = UnifiedJob::try_from(Page::with_json(
        connection(&server),
        PageKind::ProjectUpdate,
        "/api/v1/project_updates/21/",
        json!({"id": 21, "url": "/api/v1/project_updates/21/"}),
    ))?;

    let err = update.relaunch(&json!({})).await.unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedPage { .. }));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
}

fn project(server: &MockServer) -> anyhow::Result<UnifiedJobTemplate> {
    let page = Page::with_json(
        connection(server),
        PageKind::Project,
        "/api/v1/projects/3/",
        json!({
            "id": 3,
            "url": "/api/v1/projects/3/",
            "related": {
                "update": "/api/v1/projects/3/update/",
                "project_updates": "/api/v1/projects/3/project_updates/",
            },
        }),
    );
    Ok(UnifiedJobTemplate::try_from(page)?)
}

#[tokio::test]
async fn test_project_update() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/3/update/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"can_update": true})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects/3/update/"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"project_update": 21})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/3/project_updates/"))
        .and(query_param("id", "21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 21, "url": "/api/v1/project_updates/21/", "status": "pending"}],
        })))
        .mount(&server)
        .await;

    let update = project(&server)?.update().await?;
    assert_eq!(update.kind(), PageKind::ProjectUpdate);
    assert_eq!(update.id()?, 21);
    Ok(())
}

#[tokio::test]
async fn test_update_refused_when_not_updatable() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/3/update/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"can_update": false})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects/3/update/"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let err = project(&server)?.update().await.unwrap_err();
    match err {
        ApiError::InvalidState(message) => assert!(message.contains("can_update: false"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_install_license() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/config/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"license_info": {}})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/config/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "license_info": {
                "valid_key": true,
                "license_key": "k",
                "instance_count": 20,
                "license_type": "basic",
            },
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/config/"))
        .and(body_partial_json(json!({
            "license_type": "basic",
            "instance_count": 20,
            "eula_accepted": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let api = TowerApi::with_connection(connection(&server), TowerkitConfig::default());
    let mut config = api.config_page().await?;
    assert!(!config.is_valid_license());

    let installed = config.install_license(&LicenseRequest::new("basic", 20, 30)).await?;
    assert!(installed);
    assert!(config.is_basic_license());
    Ok(())
}

#[tokio::test]
async fn test_group_ancestry() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/inventories/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "url": "/api/v1/inventories/2/",
            "related": {
                "groups": "/api/v1/inventories/2/groups/",
                "root_groups": "/api/v1/inventories/2/root_groups/",
            },
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/inventories/2/root_groups/"))
        .and(query_param("id", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/inventories/2/groups/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "results": [
                {"id": 5, "url": "/api/v1/groups/5/", "related": {"children": "/api/v1/groups/5/children/"}},
                {"id": 7, "url": "/api/v1/groups/7/", "related": {"children": "/api/v1/groups/7/children/"}},
            ],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/groups/5/children/"))
        .and(query_param("id", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 6, "url": "/api/v1/groups/6/"}],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/groups/7/children/"))
        .and(query_param("id", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .mount(&server)
        .await;

    let group = Group::try_from(Page::with_json(
        connection(&server),
        PageKind::Group,
        "/api/v1/groups/6/",
        json!({
            "id": 6,
            "url": "/api/v1/groups/6/",
            "related": {"inventory": "/api/v1/inventories/2/"},
        }),
    ))?;

    assert!(!group.is_root_group().await?);
    assert_eq!(group.parents().await?, vec![5]);
    Ok(())
}

#[tokio::test]
async fn test_organization_add_admin() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/organizations/1/admins/"))
        .and(body_json(json!({"id": 4})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let conn = connection(&server);
    let org = Organization::try_from(Page::with_json(
        conn.clone(),
        PageKind::Organization,
        "/api/v1/organizations/1/",
        json!({"id": 1, "related": {"admins": "/api/v1/organizations/1/admins/"}}),
    ))?;
    let user = Page::with_json(conn, PageKind::User, "/api/v1/users/4/", json!({"id": 4}));

    org.add_admin(&user).await?;
    Ok(())
}
