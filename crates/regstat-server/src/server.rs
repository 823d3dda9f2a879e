use std::sync::Arc;

use tokio::net::TcpListener;

use regstat_ingest::EnvelopeIntake;
use regstat_store::StatsStore;

use crate::config::CollectorConfig;
use crate::error::ServerResult;
use crate::handler::AppState;
use crate::router::build_router;

/// Registry notification collector server.
///
/// Owns the configuration and the store handle for the process lifetime.
/// The listener itself speaks plain HTTP; when TLS is configured, the
/// fronting transport terminates it.
pub struct CollectorServer {
    config: CollectorConfig,
    store: Arc<dyn StatsStore>,
}

impl CollectorServer {
    pub fn new(config: CollectorConfig, store: Arc<dyn StatsStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let intake = Arc::new(EnvelopeIntake::new(self.store.clone()));
        build_router(&self.config.server.route, AppState { intake })
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.server.bind_addr).await?;
        tracing::info!(
            addr = %self.config.server.bind_addr,
            route = %self.config.server.route,
            "registry notification collector listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| crate::error::ServerError::Internal(e.to_string()))
    }
}
