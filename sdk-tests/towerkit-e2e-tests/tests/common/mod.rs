//! Shared helpers for live-server tests
//!
//! Settings come from `credentials.yaml` in the working directory and
//! `TOWERKIT_*` variables, e.g. `TOWERKIT_BASE_URL=https://tower.example.com`.

use std::sync::Once;

use towerkit_api::{TowerApi, TowerkitConfig};

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Logged-in api for the configured server
pub async fn connect() -> TowerApi {
    init_logging();
    let config = TowerkitConfig::load(None).expect("Failed to load configuration");
    TowerApi::new(config).await.expect("Failed to login")
}
