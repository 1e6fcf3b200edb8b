use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::clients::MediaListSource;
use crate::clients::anilist::AnilistClient;
use crate::config::Config;
use crate::db::Store;
use crate::graph::GraphResolver;
use crate::services::SyncService;

/// Long-lived services shared by the CLI commands and the HTTP server.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub sync_service: SyncService,

    pub resolver: GraphResolver,

    /// Held for the duration of a sync; a second sync is refused, not queued.
    pub sync_lock: Arc<Mutex<()>>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let anilist = Arc::new(AnilistClient::with_endpoint(
            &config.anilist.api_url,
            &config.anilist.user_agent,
        ));

        Ok(Self::with_source(config, store, anilist))
    }

    /// Builds the state around an already connected store and any page source.
    pub fn with_source(config: Config, store: Store, source: Arc<dyn MediaListSource>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            sync_service: SyncService::new(source, store.clone()),
            resolver: GraphResolver::new(store.clone()),
            store,
            sync_lock: Arc::new(Mutex::new(())),
        }
    }
}
