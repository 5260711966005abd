//! Plugin entry points.
//!
//! # Responsibilities
//! - Expose the plugin identity (`name`)
//! - Complete configuration (`get_defaults`)
//! - Translate routes and register them with a router (`setup`)
//!
//! # Design Decisions
//! - Setup performs no I/O; it is async so hosts can sequence plugin setups
//! - Configuration errors abort before the router is touched
//! - Router errors are returned unchanged

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{PartialPluginConfig, PluginConfig};
use crate::render::RenderAdapter;
use crate::routing::{translate, ConfigurationError, RouterError, RouterHandle};

/// Name under which the plugin is registered with a host.
pub const PLUGIN_NAME: &str = "react";

/// Host-level context passed to setup.
#[derive(Clone)]
pub struct RendererContext {
    adapter: Arc<dyn RenderAdapter>,
    /// Application directory of the host, when it has one.
    pub dir: Option<PathBuf>,
}

impl RendererContext {
    pub fn new(adapter: Arc<dyn RenderAdapter>) -> Self {
        Self { adapter, dir: None }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn adapter(&self) -> &Arc<dyn RenderAdapter> {
        &self.adapter
    }
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Registration(#[from] RouterError),
}

/// A plugin that contributes routes to a host application.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn get_defaults(&self, input: PartialPluginConfig) -> PluginConfig;

    async fn setup(
        &self,
        config: PluginConfig,
        router: &mut (dyn RouterHandle + Send),
        context: &RendererContext,
    ) -> Result<(), PluginError>;
}

/// Plugin serving component, relay container and plain handler routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactPlugin;

#[async_trait]
impl Plugin for ReactPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn get_defaults(&self, input: PartialPluginConfig) -> PluginConfig {
        crate::config::get_defaults(input)
    }

    async fn setup(
        &self,
        config: PluginConfig,
        router: &mut (dyn RouterHandle + Send),
        context: &RendererContext,
    ) -> Result<(), PluginError> {
        setup(config, router, context).await
    }
}

/// Translate the configured routes and register them in one batch.
pub async fn setup(
    config: PluginConfig,
    router: &mut (dyn RouterHandle + Send),
    context: &RendererContext,
) -> Result<(), PluginError> {
    let options = config.render_options();
    let registrations = translate(config.routes, &options, context.adapter())?;
    let count = registrations.len();

    router.add(registrations)?;

    tracing::info!(
        plugin = PLUGIN_NAME,
        path = %config.path,
        routes = count,
        render_to_static_markup = options.render_to_static_markup,
        "Routes registered"
    );
    Ok(())
}
