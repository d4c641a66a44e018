//! Polling Tests
//!
//! Wait for fields to change on a mock server.

use std::{sync::Arc, time::Duration};

use serde_json::json;
use towerkit_api::{
    ApiError, Page, PageKind, WaitOptions,
    pages::{Notification, NotificationTemplate},
    wait::wait_until,
};
use towerkit_client::{Connection, HttpClientConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connection(server: &MockServer) -> Arc<Connection> {
    Arc::new(Connection::new(HttpClientConfig::new(&server.uri())).unwrap())
}

fn job(status: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": 3,
        "url": "/api/v1/jobs/3/",
        "status": status,
    }))
}

fn quick() -> WaitOptions {
    WaitOptions::new(Duration::from_millis(10), Duration::from_secs(5))
}

#[tokio::test]
async fn test_wait_until_value_changes() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/3/"))
        .respond_with(job("running"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/3/"))
        .respond_with(job("successful"))
        .mount(&server)
        .await;

    let mut page = Page::at(connection(&server), "/api/v1/jobs/3/");
    let reached = wait_until(&mut page, "status", &["successful", "failed"], &quick()).await?;

    assert!(reached);
    assert_eq!(page.str_field("status"), Some("successful"));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_wait_gives_up_after_attempts() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/3/"))
        .respond_with(job("running"))
        .expect(2)
        .mount(&server)
        .await;

    let mut page = Page::at(connection(&server), "/api/v1/jobs/3/");
    let reached = wait_until(&mut page, "status", &["successful"], &quick().with_attempts(2)).await?;
    assert!(!reached);
    Ok(())
}

#[tokio::test]
async fn test_wait_raises_on_timeout() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/3/"))
        .respond_with(job("pending"))
        .mount(&server)
        .await;

    let options = WaitOptions::new(Duration::from_millis(10), Duration::from_millis(30))
        .with_raise_on_timeout(true);
    let mut page = Page::at(connection(&server), "/api/v1/jobs/3/");
    let err = wait_until(&mut page, "status", &["successful"], &options)
        .await
        .unwrap_err();

    match err {
        ApiError::WaitTimeout(message) => {
            assert!(message.contains("/api/v1/jobs/3/"), "{message}");
            assert!(message.contains("(pending)"), "{message}");
        }
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_notification_template_test() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/notification_templates/2/test/"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"notification": 7})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/notification_templates/2/test/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/notification_templates/2/notifications/"))
        .and(query_param("id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{
                "id": 7,
                "url": "/api/v1/notifications/7/",
                "status": "successful",
                "error": "",
            }],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/notifications/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "url": "/api/v1/notifications/7/",
            "status": "successful",
            "error": "",
        })))
        .mount(&server)
        .await;

    let template = NotificationTemplate::try_from(Page::with_json(
        connection(&server),
        PageKind::NotificationTemplate,
        "/api/v1/notification_templates/2/",
        json!({
            "id": 2,
            "url": "/api/v1/notification_templates/2/",
            "related": {
                "test": "/api/v1/notification_templates/2/test/",
                "notifications": "/api/v1/notification_templates/2/notifications/",
            },
        }),
    ))?;

    let mut notification: Notification = template.test().await?;
    assert_eq!(notification.id()?, 7);
    assert!(notification.wait_until_completed().await?);
    assert!(notification.is_completed());
    assert!(notification.is_successful());
    Ok(())
}
