use serde_json::json;
use tracing::debug;

use crate::{
    error::{ApiError, Result},
    kind::PageKind,
    page::Page,
};

page_view!(Organization, "organization", |kind| kind == PageKind::Organization);

impl Organization {
    pub async fn add_user(&self, user: &Page) -> Result<()> {
        associate(self, "users", user).await
    }

    pub async fn add_admin(&self, user: &Page) -> Result<()> {
        associate(self, "admins", user).await
    }
}

page_view!(Team, "team", |kind| kind == PageKind::Team);

impl Team {
    pub async fn add_user(&self, user: &Page) -> Result<()> {
        associate(self, "users", user).await
    }
}

/// Attach `other` to the related list `name` of `owner`; the server answers 204
async fn associate(owner: &Page, name: &str, other: &Page) -> Result<()> {
    let endpoint = owner
        .related_endpoint(name)
        .ok_or_else(|| ApiError::MissingField(format!("related.{}", name)))?;
    let list = Page::at(owner.connection().clone(), endpoint);
    match list.post(&json!({ "id": other.id()? })).await {
        Ok(_) | Err(ApiError::NoContent(_)) => {
            debug!("Associated {} with {}", other.url(), endpoint);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
