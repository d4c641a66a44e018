use serde_json::{Map, Value};
use tracing::info;

use super::{UnifiedJob, single_result};
use crate::{
    error::{ApiError, Result},
    kind::PageKind,
    page::Page,
    utils::params,
};

page_view!(
    /// A saved playbook run configuration
    JobTemplate,
    "job_template",
    |kind| kind == PageKind::JobTemplate
);

impl JobTemplate {
    /// Launch the template and return the job it started
    pub async fn launch(&self, payload: &Value) -> Result<UnifiedJob> {
        let result = self.get_related("launch", &[]).await?.post(payload).await?;
        let job_id = result
            .i64_field("job")
            .ok_or_else(|| ApiError::MissingField("job".to_string()))?;

        let jobs = self.get_related("jobs", &params([("id", job_id)])).await?;
        let job = single_result(&jobs, || {
            format!(
                "job_template launched (id:{}) but job not found in response at {}jobs/",
                job_id,
                self.url()
            )
        })?;
        info!("Launched {} as job {}", self.url(), job_id);
        UnifiedJob::try_from(job)
    }

    /// Create a job from this template without starting it
    pub async fn post_job(&self, mut fields: Map<String, Value>) -> Result<Page> {
        if !fields.contains_key("job_template") {
            fields.insert("job_template".to_string(), Value::from(self.id()?));
        }
        self.get_related("jobs", &[])
            .await?
            .post(&Value::Object(fields))
            .await
    }
}
