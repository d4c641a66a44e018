//! towerkit-api: page objects and resource factories for the Tower REST API

pub mod api;
pub mod config;
pub mod error;
pub mod factory;
pub mod graph;
pub mod has_create;
pub mod kind;
pub mod page;
pub mod pages;
pub mod payload;
pub mod registry;
pub mod resources;
pub mod utils;
pub mod wait;

pub use api::TowerApi;
pub use config::TowerkitConfig;
pub use error::{ApiError, ErrorResponse, Result};
pub use factory::{Factory, FactoryOptions, Teardown};
pub use has_create::{CreateArgs, Dependency, DependencyStore};
pub use kind::PageKind;
pub use page::{Page, TentativeEndpoint};
pub use registry::PageRegistry;
pub use wait::WaitOptions;

pub use towerkit_client::{Auth, Connection, HttpClientConfig};
