use anyhow::Context;
use towerkit_api::{Page, TowerApi};
use tracing::debug;

/// Fetch `endpoint` as the page kind registered for it
pub async fn run(api: &TowerApi, endpoint: &str, params: &[(String, String)]) -> anyhow::Result<Page> {
    let page = api
        .at(endpoint)
        .fetch(params)
        .await
        .with_context(|| format!("GET {} failed", endpoint))?;
    debug!("Fetched {} as {}", page.endpoint(), page.kind());
    Ok(page)
}
