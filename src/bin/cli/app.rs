use anyhow::{Context, Result};

use tutorly_lib::api::{ApiClient, Resource, ResourceClient};
use tutorly_lib::auth::{AuthContext, Session};
use tutorly_lib::config::Config;
use tutorly_lib::storage::LocalStore;

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub api: ApiClient,
    pub store: LocalStore,
    pub auth: AuthContext,
}

impl App {
    /// Load config, open local storage and restore the stored session
    pub fn new(api_url: Option<&str>) -> Result<Self> {
        let mut config = Config::load().context("Failed to load config")?;
        if let Some(url) = api_url {
            config.api_base_url = url.to_string();
        }

        let data_dir = config.data_dir().context("Failed to get data directory")?;
        let store = LocalStore::new(&data_dir);
        log::debug!("Local storage at {}", store.path().display());

        let api = ApiClient::new(&config, Session::new().shared())
            .context(format!("Invalid API URL '{}'", config.api_base_url))?;
        let auth = AuthContext::init(api.clone(), store.clone())
            .context("Failed to restore session")?;

        Ok(Self {
            config,
            api,
            store,
            auth,
        })
    }

    pub fn client<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient::new(self.api.clone())
    }
}
