use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::single_result;
use crate::{
    error::{ApiError, Result},
    kind::PageKind,
    utils::params,
    wait::{WaitOptions, wait_until},
};

const STARTED: &[&str] = &["pending", "running", "successful", "failed", "error", "canceled"];
const COMPLETED: &[&str] = &["successful", "failed", "error", "canceled"];
const TEMPLATE_STARTED: &[&str] = &["new", "pending", "waiting", "running"];

page_view!(
    /// A job, project update, inventory update or any other unified job
    UnifiedJob,
    "unified job",
    |kind| kind.is_unified_job()
);

impl UnifiedJob {
    pub fn status(&self) -> &str {
        self.str_field("status").unwrap_or_default()
    }

    /// Finished, whatever the outcome
    pub fn is_completed(&self) -> bool {
        COMPLETED.contains(&self.status().to_lowercase().as_str())
    }

    pub fn is_successful(&self) -> bool {
        self.status().eq_ignore_ascii_case("successful")
            && !(self.has_traceback() || self.bool_field("failed"))
    }

    pub fn has_traceback(&self) -> bool {
        ["result_traceback", "result_stdout"]
            .iter()
            .any(|f| self.str_field(f).is_some_and(|s| s.contains("Traceback")))
    }

    fn created(&self) -> Option<DateTime<Utc>> {
        self.str_field("created")
            .and_then(|c| DateTime::parse_from_rfc3339(c).ok())
            .map(|c| c.with_timezone(&Utc))
    }

    /// Poll until the status is one of `statuses`. The timeout counts from
    /// the job creation time unless `options.start` is set.
    pub async fn wait_until_status(
        &mut self,
        statuses: &[&str],
        mut options: WaitOptions,
    ) -> Result<bool> {
        if options.start.is_none() {
            options.start = self.created();
        }
        wait_until(&mut self.0, "status", statuses, &options).await
    }

    pub async fn wait_until_started(&mut self) -> Result<bool> {
        let options = WaitOptions::new(Duration::from_secs(1), Duration::from_secs(60));
        self.wait_until_status(STARTED, options).await
    }

    pub async fn wait_until_completed(&mut self) -> Result<bool> {
        self.wait_until_status(COMPLETED, Self::completion_wait()).await
    }

    pub(crate) async fn wait_until_completed_or_fail(&mut self) -> Result<bool> {
        let options = Self::completion_wait().with_raise_on_timeout(true);
        self.wait_until_status(COMPLETED, options).await
    }

    fn completion_wait() -> WaitOptions {
        WaitOptions::new(Duration::from_secs(5), Duration::from_secs(120))
    }

    /// Cancel the job if the server still allows it
    pub async fn cancel(&self) -> Result<()> {
        let cancel = self.get_related("cancel", &[]).await?;
        if !cancel.bool_field("can_cancel") {
            debug!("{} can no longer be cancelled", self.url());
            return Ok(());
        }
        match cancel.post(&json!({})).await {
            Ok(_) => Ok(()),
            // The job finished between the check and the request
            Err(ApiError::MethodNotAllowed(resp))
                if resp
                    .payload
                    .get("error")
                    .and_then(Value::as_str)
                    .is_some_and(|e| e.contains("not allowed")) =>
            {
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Launch the job again; only playbook runs support this
    pub async fn relaunch(&self, payload: &Value) -> Result<UnifiedJob> {
        if self.kind() != PageKind::Job {
            return Err(ApiError::UnexpectedPage {
                expected: PageKind::Job.to_string(),
                found: self.kind().to_string(),
            });
        }
        let result = self.get_related("relaunch", &[]).await?.post(payload).await?;
        let job_id = result
            .i64_field("job")
            .or_else(|| result.i64_field("id"))
            .ok_or_else(|| ApiError::MissingField("job".to_string()))?;

        let template = self.get_related("job_template", &[]).await?;
        let jobs = template
            .get_related("jobs", &params([("id", job_id)]))
            .await?;
        let job = single_result(&jobs, || {
            format!(
                "unified_job id:{} was relaunched (id:{}) but no matching unified_job found",
                self.i64_field("id").unwrap_or_default(),
                job_id
            )
        })?;
        info!("Relaunched {} as job {}", self.url(), job_id);
        UnifiedJob::try_from(job)
    }
}

page_view!(
    /// A job template, project, inventory source or workflow job template
    UnifiedJobTemplate,
    "unified job template",
    |kind| kind.is_unified_job_template()
);

impl UnifiedJobTemplate {
    pub fn status(&self) -> &str {
        self.str_field("status").unwrap_or_default()
    }

    /// Last run succeeded; projects also need an scm type and inventory
    /// sources a source
    pub fn is_successful(&self) -> bool {
        let ran = self.status() == "successful"
            && !self.bool_field("last_update_failed")
            && self.field("last_updated").is_some_and(|v| !v.is_null());
        match self.kind() {
            PageKind::Project => ran && self.str_field("scm_type").is_some_and(|s| !s.is_empty()),
            PageKind::InventorySource => ran && self.str_field("source").is_some_and(|s| !s.is_empty()),
            _ => ran,
        }
    }

    pub async fn wait_until_started(&mut self) -> Result<bool> {
        let options = WaitOptions::new(Duration::from_secs(1), Duration::from_secs(60));
        wait_until(&mut self.0, "status", TEMPLATE_STARTED, &options).await
    }

    pub async fn wait_until_completed(&mut self) -> Result<bool> {
        let options = WaitOptions::new(Duration::from_secs(5), Duration::from_secs(480));
        wait_until(&mut self.0, "status", COMPLETED, &options).await
    }

    /// The update currently running or last run for this template
    pub async fn current_update(&self) -> Result<UnifiedJob> {
        UnifiedJob::try_from(self.get_related("current_update", &[]).await?)
    }

    /// Start an scm or inventory update and return the update job
    pub async fn update(&self) -> Result<UnifiedJob> {
        let (field, list) = match self.kind() {
            PageKind::Project => ("project_update", "project_updates"),
            PageKind::InventorySource => ("inventory_update", "inventory_updates"),
            other => {
                return Err(ApiError::UnexpectedPage {
                    expected: "project or inventory source".to_string(),
                    found: other.to_string(),
                });
            }
        };

        let update = self.get_related("update", &[]).await?;
        if !update.bool_field("can_update") {
            return Err(ApiError::InvalidState(format!(
                "{} is not able to update (can_update: false)",
                self.url()
            )));
        }

        let result = update.post(&json!({})).await?;
        let update_id = result
            .i64_field(field)
            .ok_or_else(|| ApiError::MissingField(field.to_string()))?;
        let updates = self.get_related(list, &params([("id", update_id)])).await?;
        let job = single_result(&updates, || {
            format!(
                "{} {} started but not found under {}{}/",
                field,
                update_id,
                self.url(),
                list
            )
        })?;
        UnifiedJob::try_from(job)
    }
}
