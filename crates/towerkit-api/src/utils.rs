//! Small helpers shared by pages, payload builders and factories

use rand::{Rng, distr::Alphanumeric};
use serde_json::{Map, Value};

/// Whether a JSON value is an api path such as "/api/v1/hosts/3/"
pub fn is_relative_endpoint(candidate: &Value) -> bool {
    candidate
        .as_str()
        .is_some_and(|s| s.starts_with("/api/") && s.ends_with('/'))
}

/// Build owned query parameters from borrowed pairs
pub fn params<K, V, I>(pairs: I) -> Vec<(String, String)>
where
    K: Into<String>,
    V: ToString,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

/// Copy the listed fields from `fields` into `payload` when present
pub fn update_payload(payload: &mut Map<String, Value>, names: &[&str], fields: &Map<String, Value>) {
    for name in names {
        if let Some(value) = fields.get(*name) {
            payload.insert((*name).to_string(), value.clone());
        }
    }
}

/// Render a JSON scalar the way it appears in a query string
pub fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// "<prefix> - <random>" style display name
pub fn random_name(prefix: &str) -> String {
    format!("{} - {}", prefix, random_alphanumeric(10))
}

pub fn random_int(max: u32) -> u32 {
    rand::rng().random_range(0..=max)
}

pub fn random_ipv4() -> String {
    let mut rng = rand::rng();
    (0..4)
        .map(|_| rng.random_range(1..=255u8).to_string())
        .collect::<Vec<_>>()
        .join(".")
}

pub fn random_ipv6() -> String {
    let mut rng = rand::rng();
    (0..8)
        .map(|_| format!("{:x}", rng.random_range(0..=u16::MAX)))
        .collect::<Vec<_>>()
        .join(":")
}

pub fn random_loopback_ip() -> String {
    format!(
        "127.{}.{}.{}",
        random_int(255),
        random_int(255),
        random_int(255)
    )
}
