//! Server configuration and license handling

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::info;

use crate::{error::Result, kind::PageKind, utils::random_alphanumeric};

const LICENSE_FEATURES: &[&str] = &[
    "activity_streams",
    "enterprise_auth",
    "ha",
    "ldap",
    "multiple_organizations",
    "rebranding",
    "surveys",
    "system_tracking",
    "workflows",
];

page_view!(
    /// `/api/v1/config/`
    ConfigPage,
    "config",
    |kind| kind == PageKind::Config
);

impl ConfigPage {
    pub fn license_info(&self) -> Map<String, Value> {
        self.field("license_info")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    fn license_flag(&self, name: &str) -> bool {
        self.license_info()
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn license_type_is(&self, license_type: &str) -> bool {
        self.is_valid_license()
            && self.license_info().get("license_type").and_then(Value::as_str) == Some(license_type)
    }

    pub fn is_aws_license(&self) -> bool {
        let info = self.license_info();
        self.license_flag("is_aws") || info.contains_key("ami-id") || info.contains_key("instance-id")
    }

    pub fn is_demo_license(&self) -> bool {
        self.license_flag("demo") || self.license_flag("key_present")
    }

    pub fn is_valid_license(&self) -> bool {
        let info = self.license_info();
        self.license_flag("valid_key")
            && info.contains_key("license_key")
            && info.contains_key("instance_count")
    }

    pub fn is_trial_license(&self) -> bool {
        self.is_valid_license() && self.license_flag("trial")
    }

    pub fn is_legacy_license(&self) -> bool {
        self.license_type_is("legacy")
    }

    pub fn is_basic_license(&self) -> bool {
        self.license_type_is("basic")
    }

    pub fn is_enterprise_license(&self) -> bool {
        self.license_type_is("enterprise")
    }

    /// Names of the enabled license features
    pub fn features(&self) -> Vec<String> {
        self.license_info()
            .get("features")
            .and_then(Value::as_object)
            .map(|f| {
                f.iter()
                    .filter(|(_, enabled)| enabled.as_bool().unwrap_or(false))
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Post a license and report whether the server now holds a valid one
    pub async fn install_license(&mut self, request: &LicenseRequest) -> Result<bool> {
        self.post(&request.to_payload()).await?;
        self.get(&[]).await?;
        info!(
            "Installed {} license for {} instances",
            request.license_type, request.instance_count
        );
        Ok(self.is_valid_license())
    }
}

/// Fields of a license to install
#[derive(Clone, Debug, Serialize)]
pub struct LicenseRequest {
    pub instance_count: u64,
    pub days: i64,
    pub license_type: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub trial: bool,
    pub eula_accepted: bool,
}

impl Default for LicenseRequest {
    fn default() -> Self {
        Self {
            instance_count: 9_999_999,
            days: 365,
            license_type: "enterprise".to_string(),
            company_name: "Towerkit".to_string(),
            contact_name: "Towerkit Tests".to_string(),
            contact_email: "towerkit@example.com".to_string(),
            trial: false,
            eula_accepted: true,
        }
    }
}

impl LicenseRequest {
    pub fn new(license_type: &str, instance_count: u64, days: i64) -> Self {
        Self {
            license_type: license_type.to_string(),
            instance_count,
            days,
            ..Default::default()
        }
    }

    /// License body as posted to the config endpoint. Only enterprise
    /// licenses enable the licensed features.
    pub fn to_payload(&self) -> Value {
        let enabled = self.license_type == "enterprise";
        let features: Map<String, Value> = LICENSE_FEATURES
            .iter()
            .map(|f| ((*f).to_string(), Value::Bool(enabled)))
            .collect();
        let license_date = (Utc::now() + Duration::days(self.days)).timestamp();

        let mut payload = serde_json::to_value(self).unwrap_or_else(|_| json!({}));
        if let Some(obj) = payload.as_object_mut() {
            obj.remove("days");
            obj.insert("license_date".to_string(), json!(license_date));
            obj.insert("license_key".to_string(), json!(random_alphanumeric(64)));
            obj.insert("features".to_string(), Value::Object(features));
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use towerkit_client::{Connection, HttpClientConfig};

    use super::*;
    use crate::page::Page;

    fn config(license_info: Value) -> ConfigPage {
        let conn = Arc::new(Connection::new(HttpClientConfig::default()).unwrap());
        let page = Page::with_json(
            conn,
            PageKind::Config,
            "/api/v1/config/",
            json!({ "license_info": license_info }),
        );
        ConfigPage::try_from(page).unwrap()
    }

    #[test]
    fn test_license_predicates() {
        let page = config(json!({
            "valid_key": true,
            "license_key": "abc",
            "instance_count": 10,
            "license_type": "enterprise",
            "trial": true,
            "features": {"ldap": true, "surveys": false},
        }));
        assert!(page.is_valid_license());
        assert!(page.is_enterprise_license());
        assert!(page.is_trial_license());
        assert!(!page.is_basic_license());
        assert!(!page.is_aws_license());
        assert_eq!(page.features(), vec!["ldap".to_string()]);
    }

    #[test]
    fn test_missing_license() {
        let page = config(json!({}));
        assert!(!page.is_valid_license());
        assert!(!page.is_legacy_license());
        assert!(!page.is_demo_license());
        assert!(page.features().is_empty());

        assert!(config(json!({"instance-id": "i-123"})).is_aws_license());
        assert!(config(json!({"key_present": true})).is_demo_license());
    }

    #[test]
    fn test_license_payload() {
        let payload = LicenseRequest::new("basic", 20, 30).to_payload();
        assert_eq!(payload["license_type"], "basic");
        assert_eq!(payload["instance_count"], 20);
        assert_eq!(payload["eula_accepted"], true);
        assert_eq!(payload["features"]["ldap"], false);
        assert!(payload.get("days").is_none());
        assert_eq!(payload["license_key"].as_str().unwrap().len(), 64);
        assert!(payload["license_date"].as_i64().unwrap() > Utc::now().timestamp());
    }
}
