//! Typed views over pages of a known kind
//!
//! Each view is a thin wrapper around a `Page` that is only built when the
//! page kind fits, and adds the behavior specific to that resource.

use crate::{
    error::{ApiError, Result},
    page::Page,
};

macro_rules! page_view {
    ($(#[$meta:meta])* $name:ident, $expected:literal, |$kind:ident| $accept:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name(crate::page::Page);

        impl $name {
            pub fn into_page(self) -> crate::page::Page {
                self.0
            }
        }

        impl TryFrom<crate::page::Page> for $name {
            type Error = crate::error::ApiError;

            fn try_from(page: crate::page::Page) -> crate::error::Result<Self> {
                let $kind = page.kind();
                if $accept {
                    Ok(Self(page))
                } else {
                    Err(crate::error::ApiError::UnexpectedPage {
                        expected: $expected.to_string(),
                        found: $kind.to_string(),
                    })
                }
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::page::Page;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

mod config;
mod credential;
mod inventory;
mod job_template;
mod notification;
mod organization;
mod unified_job;

pub use config::{ConfigPage, LicenseRequest};
pub use credential::Credential;
pub use inventory::{Group, Inventory};
pub use job_template::JobTemplate;
pub use notification::{Notification, NotificationTemplate};
pub use organization::{Organization, Team};
pub use unified_job::{UnifiedJob, UnifiedJobTemplate};

/// The only element of a filtered list, e.g. a job looked up by id
pub(crate) fn single_result(list: &Page, what: impl FnOnce() -> String) -> Result<Page> {
    if list.count() != 1 {
        return Err(ApiError::Lookup(what()));
    }
    list.results()
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Lookup(what()))
}
