//! Error types for page operations
//!
//! Every non-success HTTP status is mapped onto an `ApiError` variant so
//! callers can match on the outcome the same way the server reports it.
//! 403 and 400 bodies are inspected further to tell license and duplicate
//! failures apart from generic ones.

use std::fmt::{Display, Formatter};

use serde_json::Value;
use towerkit_client::ClientError;

/// Message and decoded body of a failed response
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub message: String,
    pub payload: Value,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, payload: Value) -> Self {
        Self {
            message: message.into(),
            payload,
        }
    }
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.payload.as_object().is_some_and(|o| o.is_empty()) || self.payload.is_null() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.message, self.payload)
        }
    }
}

/// Errors returned by page and factory operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NoContent(ErrorResponse),

    #[error("{0}")]
    BadRequest(ErrorResponse),

    #[error("{0}")]
    Unauthorized(ErrorResponse),

    #[error("{0}")]
    PaymentRequired(ErrorResponse),

    #[error("{0}")]
    Forbidden(ErrorResponse),

    #[error("{0}")]
    NotFound(ErrorResponse),

    #[error("{0}")]
    MethodNotAllowed(ErrorResponse),

    #[error("{0}")]
    Conflict(ErrorResponse),

    #[error("{0}")]
    InternalServerError(ErrorResponse),

    #[error("{0}")]
    LicenseExceeded(ErrorResponse),

    #[error("{0}")]
    LicenseInvalid(ErrorResponse),

    #[error("{0}")]
    Duplicate(ErrorResponse),

    #[error("{0}")]
    Unknown(ErrorResponse),

    #[error("wait timed out: {0}")]
    WaitTimeout(String),

    #[error("dependency error: {0}")]
    Dependency(String),

    #[error("expected a {expected} page, got {found}")]
    UnexpectedPage { expected: String, found: String },

    #[error("page has no field '{0}'")]
    MissingField(String),

    #[error("factory error: {0}")]
    Factory(String),

    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("invalid url pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Constructor for a status-mapped error
pub type ErrorCtor = fn(ErrorResponse) -> ApiError;

/// Fixed status-code lookup table.
///
/// 400 and 403 are absent on purpose: their variant depends on the body,
/// see [`classify`].
pub fn error_from_status(status: u16) -> Option<ErrorCtor> {
    match status {
        204 => Some(ApiError::NoContent),
        401 => Some(ApiError::Unauthorized),
        402 => Some(ApiError::PaymentRequired),
        404 => Some(ApiError::NotFound),
        405 => Some(ApiError::MethodNotAllowed),
        409 => Some(ApiError::Conflict),
        500 => Some(ApiError::InternalServerError),
        _ => None,
    }
}

const DUPLICATE_SUFFIX: &str =
    ". However, JSON validation determined the cause was a duplicate object already exists.";

/// Map a non-success response onto its error variant
pub fn classify(status: u16, message: String, payload: Value) -> ApiError {
    if let Some(ctor) = error_from_status(status) {
        return ctor(ErrorResponse::new(message, payload));
    }
    match status {
        403 => {
            if is_license_exceeded(&payload) {
                ApiError::LicenseExceeded(ErrorResponse::new(message, payload))
            } else {
                ApiError::Forbidden(ErrorResponse::new(message, payload))
            }
        }
        400 => {
            if is_license_invalid(&payload) {
                ApiError::LicenseInvalid(ErrorResponse::new(message, payload))
            } else if is_duplicate(&payload) {
                ApiError::Duplicate(ErrorResponse::new(message + DUPLICATE_SUFFIX, payload))
            } else {
                ApiError::BadRequest(ErrorResponse::new(message, payload))
            }
        }
        _ => ApiError::Unknown(ErrorResponse::new(message, payload)),
    }
}

fn top_level_strings(payload: &Value) -> impl Iterator<Item = String> + '_ {
    payload
        .as_object()
        .into_iter()
        .flat_map(|o| o.values())
        .flat_map(|v| match v {
            Value::String(s) => vec![s.to_lowercase()],
            Value::Array(items) => items
                .iter()
                .filter_map(|i| i.as_str().map(str::to_lowercase))
                .collect(),
            _ => Vec::new(),
        })
}

fn is_license_exceeded(payload: &Value) -> bool {
    payload
        .get("detail")
        .and_then(Value::as_str)
        .is_some_and(|d| d.to_lowercase().contains("license"))
}

fn is_license_invalid(payload: &Value) -> bool {
    top_level_strings(payload).any(|s| s.contains("invalid license"))
}

fn is_duplicate(payload: &Value) -> bool {
    top_level_strings(payload).any(|s| s.contains("already exists"))
}

impl ApiError {
    /// Body details for status-mapped errors
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            ApiError::NoContent(r)
            | ApiError::BadRequest(r)
            | ApiError::Unauthorized(r)
            | ApiError::PaymentRequired(r)
            | ApiError::Forbidden(r)
            | ApiError::NotFound(r)
            | ApiError::MethodNotAllowed(r)
            | ApiError::Conflict(r)
            | ApiError::InternalServerError(r)
            | ApiError::LicenseExceeded(r)
            | ApiError::LicenseInvalid(r)
            | ApiError::Duplicate(r)
            | ApiError::Unknown(r) => Some(r),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        self.response().map(|r| &r.payload)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, ApiError::NoContent(_))
    }
}
