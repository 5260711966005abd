//! HTTP server hosting the plugin's routes.
//!
//! # Responsibilities
//! - Run plugin setup against an [`AxumRouter`]
//! - Mount the routes under the configured base path
//! - Wire up middleware (request ID, tracing)
//! - Serve on a listener until the shutdown future resolves

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::PluginConfig;
use crate::http::router::AxumRouter;
use crate::plugin::{self, PluginError, RendererContext};

/// HTTP server for a configured plugin.
pub struct PluginServer {
    router: Router,
    base_path: String,
}

impl PluginServer {
    /// Register the configuration's routes and build a server for them.
    pub async fn from_config(
        config: PluginConfig,
        context: &RendererContext,
    ) -> Result<Self, PluginError> {
        let base_path = config.path.clone();
        let mut router = AxumRouter::new();
        plugin::setup(config, &mut router, context).await?;
        Ok(Self::new(router, &base_path))
    }

    /// Create a server for an already populated router.
    pub fn new(router: AxumRouter, base_path: &str) -> Self {
        let trimmed = base_path.trim_matches('/');
        let base_path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self {
            router: router.into_router(),
            base_path,
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The complete application with middleware layers.
    pub fn app(&self) -> Router {
        let routes = if self.base_path == "/" {
            self.router.clone()
        } else {
            Router::new().nest(&self.base_path, self.router.clone())
        };

        routes
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_path = %self.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
