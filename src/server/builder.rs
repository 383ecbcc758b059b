//! ServerBuilder for fluent API to build the HTTP server

use super::router::{AppState, build_page_routes};
use crate::config::BilledConfig;
use crate::core::session::{InMemorySessionStorage, SessionStorage};
use crate::core::store::BillStore;
use crate::router::App;
use crate::storage::InMemoryBillStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder for the employee pages server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(BilledConfig::from_yaml_file("billed.yaml")?)
///     .with_store(InMemoryBillStore::default())
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: BilledConfig,
    store: Option<Arc<dyn BillStore>>,
    sessions: Option<Arc<dyn SessionStorage>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: BilledConfig::default_config(),
            store: None,
            sessions: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: BilledConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the bill store
    ///
    /// Defaults to an empty [`InMemoryBillStore`] whose file URLs start with
    /// the configured upload base URL.
    pub fn with_store(mut self, store: impl BillStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set the session storage
    ///
    /// Defaults to in-memory storage holding the configured user.
    pub fn with_session_storage(mut self, sessions: impl SessionStorage + 'static) -> Self {
        self.sessions = Some(Arc::new(sessions));
        self
    }

    /// Add routes next to the page routes
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    pub fn config(&self) -> &BilledConfig {
        &self.config
    }

    /// Build the application shell shared by every request
    pub fn build_app(&mut self) -> Result<App> {
        let store = match self.store.take() {
            Some(store) => store,
            None => Arc::new(InMemoryBillStore::new(self.config.uploads.base_url.clone())),
        };

        let sessions = match self.sessions.take() {
            Some(sessions) => sessions,
            None => Arc::new(InMemorySessionStorage::with_user(&self.config.session.user())?),
        };

        Ok(App::new(store, sessions, self.config.uploads.policy())?)
    }

    /// Build the router with request tracing
    pub fn build(mut self) -> Result<Router> {
        let app = self.build_app()?;
        let mut router = build_page_routes(AppState { app });

        for custom in std::mem::take(&mut self.custom_routes) {
            router = router.merge(custom);
        }

        Ok(router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
    }

    /// Serve on the configured address with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.addr();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
