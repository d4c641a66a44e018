use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use super::single_result;
use crate::{
    error::{ApiError, Result},
    kind::PageKind,
    utils::params,
    wait::{WaitOptions, wait_until},
};

page_view!(
    NotificationTemplate,
    "notification_template",
    |kind| kind == PageKind::NotificationTemplate
);

impl NotificationTemplate {
    /// Send a test notification and return it once the server recorded it
    pub async fn test(&self) -> Result<Notification> {
        let result = self.get_related("test", &[]).await?.post(&json!({})).await?;
        let notification_id = result
            .i64_field("notification")
            .ok_or_else(|| ApiError::MissingField("notification".to_string()))?;

        let mut notifications = self
            .get_related("notifications", &params([("id", notification_id)]))
            .await?;
        let options = WaitOptions::new(Duration::from_secs(10), Duration::from_secs(180));
        wait_until(&mut notifications, "count", &["1"], &options).await?;

        let notification = single_result(&notifications, || {
            format!(
                "test notification triggered (id:{}) but notification not found in response at {}notifications/",
                notification_id,
                self.url()
            )
        })?;
        Notification::try_from(notification)
    }
}

page_view!(Notification, "notification", |kind| kind == PageKind::Notification);

impl Notification {
    pub fn status(&self) -> &str {
        self.str_field("status").unwrap_or_default()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status(), "successful" | "failed")
    }

    /// Delivered without an error message
    pub fn is_successful(&self) -> bool {
        let errored = match self.field("error") {
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Bool(b)) => *b,
            _ => false,
        };
        self.status() == "successful" && !errored
    }

    pub async fn wait_until_completed(&mut self) -> Result<bool> {
        let start = self
            .str_field("created")
            .and_then(|c| DateTime::parse_from_rfc3339(c).ok())
            .map(|c| c.with_timezone(&Utc));
        let options = WaitOptions::new(Duration::from_secs(5), Duration::from_secs(30)).with_start(start);
        wait_until(&mut self.0, "status", &["successful", "failed"], &options).await
    }
}
