use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use crate::api::NotificationEvent;
use crate::clients::inference::InferenceClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, GenerationService, StoreAuthService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub inference: Arc<InferenceClient>,

    pub auth: Arc<dyn AuthService>,

    pub generation: Arc<GenerationService>,

    pub event_bus: broadcast::Sender<NotificationEvent>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);
        Self::with_event_bus(config, event_bus).await
    }

    pub async fn with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let inference = Arc::new(InferenceClient::new(config.inference.clone())?);

        let auth: Arc<dyn AuthService> = Arc::new(StoreAuthService::new(
            store.clone(),
            config.security.clone(),
        ));

        let generation = Arc::new(GenerationService::new(
            store.clone(),
            inference.clone(),
            event_bus.clone(),
        ));

        let config = Arc::new(RwLock::new(config));

        Ok(Self {
            config,
            store,
            inference,
            auth,
            generation,
            event_bus,
        })
    }
}
