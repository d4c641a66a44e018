//! Polling a page until one of its fields reaches a wanted value

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    error::{ApiError, Result},
    page::Page,
    utils::query_value,
};

/// How long and how often to poll
#[derive(Clone, Debug)]
pub struct WaitOptions {
    /// Pause between two reads
    pub interval: Duration,
    /// Give up once this much time has passed since `start`
    pub timeout: Option<Duration>,
    /// Maximum number of reads, 0 for unlimited
    pub attempts: u32,
    /// Return `ApiError::WaitTimeout` instead of `Ok(false)` when giving up
    pub raise_on_timeout: bool,
    /// Reference point for the timeout, defaults to the call time
    pub start: Option<DateTime<Utc>>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: None,
            attempts: 0,
            raise_on_timeout: false,
            start: None,
        }
    }
}

impl WaitOptions {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout: Some(timeout),
            ..Default::default()
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_raise_on_timeout(mut self, raise: bool) -> Self {
        self.raise_on_timeout = raise;
        self
    }

    pub fn with_start(mut self, start: Option<DateTime<Utc>>) -> Self {
        self.start = start;
        self
    }
}

/// Re-read `page` until `field` equals one of `desired`.
///
/// Returns `Ok(true)` once the value is reached and `Ok(false)` when the
/// attempts or the timeout ran out, unless `raise_on_timeout` is set.
pub async fn wait_until(
    page: &mut Page,
    field: &str,
    desired: &[&str],
    options: &WaitOptions,
) -> Result<bool> {
    let start = options.start.unwrap_or_else(Utc::now);
    let infinite = options.attempts == 0;
    let mut attempt = 0;
    let mut current = String::new();

    while infinite || attempt < options.attempts {
        page.get(&[]).await?;
        current = page.field(field).map(query_value).unwrap_or_default();
        let elapsed = (Utc::now() - start).to_std().unwrap_or_default();
        debug!(
            "Current value of {}: {} (elapsed: {:.1} seconds)",
            field,
            current,
            elapsed.as_secs_f64()
        );

        if desired.contains(&current.as_str()) {
            return Ok(true);
        }

        if options.timeout.is_some_and(|t| elapsed > t) {
            break;
        }

        debug!("Sleeping for {:?}", options.interval);
        tokio::time::sleep(options.interval).await;
        attempt += 1;
    }

    if options.raise_on_timeout {
        return Err(ApiError::WaitTimeout(format!(
            "{} attribute \"{}\" ({}) failed to become (one of) {:?} in {:?}",
            page.endpoint(),
            field,
            current,
            desired,
            options.timeout.unwrap_or_default()
        )));
    }
    Ok(false)
}
