//! HTTP server for the reference campaign API.

use crate::ads::AdsGateway;
use crate::handlers::ManagementState;
use crate::router::management_router;
use crate::store::CampaignStore;
use axum::Router;
use campaign_core::config::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub struct ManagementServer {
    config: AppConfig,
    state: ManagementState,
}

impl ManagementServer {
    pub fn new(config: AppConfig, ads: Arc<dyn AdsGateway>) -> Self {
        let state = ManagementState {
            store: Arc::new(CampaignStore::new()),
            ads,
            customer_id: config.server.customer_id.clone().filter(|id| !id.is_empty()),
            minimum_daily_budget: config.budget.minimum_daily_budget_micros,
        };
        Self { config, state }
    }

    /// Router with the middleware stack applied.
    pub fn app(&self) -> Router {
        management_router(self.state.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until the process is stopped.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.server.host.parse()?, self.config.server.http_port);

        if self.state.customer_id.is_none() {
            warn!("No ads customer ID configured; publish/enable/pause will be refused");
        }
        info!(addr = %addr, "Starting campaign API server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app()).await?;

        Ok(())
    }
}
