//! Job Tests
//!
//! Launch and cancel jobs on a running server.

mod common;

use serde_json::json;
use towerkit_api::{CreateArgs, PageKind, pages::JobTemplate};

async fn job_template(api: &towerkit_api::TowerApi) -> JobTemplate {
    let page = api
        .factory(PageKind::JobTemplate)
        .create(CreateArgs::new())
        .await
        .expect("Failed to create job template");
    JobTemplate::try_from(page).expect("job template page")
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_launch_and_wait() {
    let api = common::connect().await;
    let template = job_template(&api).await;

    let mut job = template.launch(&json!({})).await.expect("Failed to launch");
    job.wait_until_completed().await.expect("Failed to poll job");
    assert!(job.is_completed(), "job should finish, status: {}", job.status());

    api.teardown().run().await.expect("Teardown failed");
}

#[tokio::test]
#[ignore = "requires running server"]
async fn test_cleanup_cancels_running_job() {
    let api = common::connect().await;
    let template = job_template(&api).await;

    let mut job = template.launch(&json!({})).await.expect("Failed to launch");
    job.wait_until_started().await.expect("Failed to poll job");

    // Deleting the inventory while the job runs cancels the job first
    let inventory = template.dependency_store()[&PageKind::Inventory].clone();
    inventory.cleanup().await.expect("Failed to clean up inventory");

    job.get(&[]).await.expect("Failed to refresh job");
    assert!(job.is_completed());

    api.teardown().run().await.ok();
}
