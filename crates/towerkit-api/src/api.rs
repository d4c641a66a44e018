//! TowerApi - entry point bundling a logged-in connection and its configuration

use std::sync::Arc;

use serde_json::Value;
use towerkit_client::{Auth, Connection};
use tracing::info;

use crate::{
    config::TowerkitConfig,
    error::Result,
    factory::{Factory, Teardown},
    kind::PageKind,
    page::Page,
    pages::ConfigPage,
    resources::v1,
};

/// Logged-in access to one server
pub struct TowerApi {
    conn: Arc<Connection>,
    config: Arc<TowerkitConfig>,
    teardown: Arc<Teardown>,
}

impl TowerApi {
    /// Connect and log in with the default credentials, fetching an auth
    /// token first when `use_token` is set
    pub async fn new(config: TowerkitConfig) -> Result<Self> {
        let conn = Arc::new(Connection::new(config.http_client_config())?);
        let default = config.default_credential();
        let api = Self {
            conn,
            config: Arc::new(config),
            teardown: Arc::new(Teardown::new()),
        };

        if api.config.use_token {
            api.root()
                .load_default_authtoken(&default.username, &default.password)
                .await?;
        } else {
            api.conn.login(Some(Auth::Basic {
                username: default.username.clone(),
                password: default.password,
            }));
        }
        info!("Connected to {} as {}", api.conn.base_url(), default.username);
        Ok(api)
    }

    /// Wrap an existing connection without touching its credentials
    pub fn with_connection(conn: Arc<Connection>, config: TowerkitConfig) -> Self {
        Self {
            conn,
            config: Arc::new(config),
            teardown: Arc::new(Teardown::new()),
        }
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    pub fn config(&self) -> &TowerkitConfig {
        &self.config
    }

    /// Registry shared by every factory handed out by this api
    pub fn teardown(&self) -> &Arc<Teardown> {
        &self.teardown
    }

    /// `/api/v1/`
    pub fn root(&self) -> Page {
        Page::at(self.conn.clone(), v1::ROOT)
    }

    /// Empty page of `kind` at its default endpoint
    pub fn page(&self, kind: PageKind) -> Page {
        Page::new(self.conn.clone(), kind)
    }

    /// Empty page at `endpoint`
    pub fn at(&self, endpoint: &str) -> Page {
        Page::at(self.conn.clone(), endpoint)
    }

    /// Factory for `kind` sharing this api's teardown registry and
    /// configuration. Credentials, including the ones created as
    /// dependencies, take their secrets from the section for their kind.
    pub fn factory(&self, kind: PageKind) -> Factory {
        Factory::new(self.conn.clone(), kind)
            .with_config(self.config.clone())
            .with_teardown(self.teardown.clone())
    }

    pub async fn config_page(&self) -> Result<ConfigPage> {
        let page = self.page(PageKind::Config).fetch(&[]).await?;
        ConfigPage::try_from(page)
    }

    /// `/api/v1/ping/` body
    pub async fn ping(&self) -> Result<Value> {
        Ok(self.page(PageKind::Ping).fetch(&[]).await?.into_json())
    }
}
