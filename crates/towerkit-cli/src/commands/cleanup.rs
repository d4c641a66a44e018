use anyhow::Context;
use towerkit_api::TowerApi;
use tracing::info;

/// Delete the resource at `endpoint`; a resource that is already gone is fine
pub async fn run(api: &TowerApi, endpoint: &str) -> anyhow::Result<()> {
    api.at(endpoint)
        .silent_cleanup()
        .await
        .with_context(|| format!("Failed to clean up {}", endpoint))?;
    info!("Removed {}", endpoint);
    Ok(())
}
