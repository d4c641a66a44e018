//! Towerkit Client - HTTP transport for the towerkit resource model
//!
//! This crate provides:
//! - A shared `Connection` with basic, token or bearer credentials
//! - JSON request bodies and raw responses for the page layer to interpret
//! - Retries for requests that could not reach the server

pub mod error;
pub mod http;

pub use error::ClientError;
pub use http::{Auth, Connection, HttpClientConfig, Params, RawResponse};

pub use reqwest::Method;
