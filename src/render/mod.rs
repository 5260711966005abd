//! Rendering adapter seam.
//!
//! # Data Flow
//! ```text
//! Incoming request (matched by the router)
//!     → generated route handler (routing::translator)
//!     → RenderAdapter::render / render_relay_container
//!     → Response<Body> produced by the adapter
//! ```
//!
//! # Design Decisions
//! - The crate never renders anything itself; adapters are injected
//! - Components and relay containers are opaque handles the adapter downcasts
//! - Render options are fixed per route at setup time and shared read-only

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use thiserror::Error;
use url::Url;

use crate::routing::RouteArgsMap;

/// Opaque handle to a renderable unit (a component or a relay container).
///
/// The handle carries a display name for logs and the value itself behind an
/// `Arc<dyn Any>`, so cloning is cheap and adapters can recover the concrete
/// type with [`ComponentRef::downcast_ref`].
#[derive(Clone)]
pub struct ComponentRef {
    name: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ComponentRef {
    pub fn new<T>(name: impl Into<Arc<str>>, component: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            name: name.into(),
            inner: Arc::new(component),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns true if both handles point at the same component value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentRef").field(&self.name).finish()
    }
}

type ToHtmlFn = dyn Fn(&str, Option<&serde_json::Value>) -> String + Send + Sync;

/// Output transform applied by adapters to rendered markup.
///
/// Receives the rendered html and, when the adapter has them, the props the
/// component was rendered with.
#[derive(Clone)]
pub struct ToHtml(Arc<ToHtmlFn>);

impl ToHtml {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, Option<&serde_json::Value>) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Returns the markup unchanged.
    pub fn identity() -> Self {
        Self::new(|html, _| html.to_string())
    }

    pub fn apply(&self, html: &str, props: Option<&serde_json::Value>) -> String {
        (self.0)(html, props)
    }
}

impl Default for ToHtml {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for ToHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToHtml(..)")
    }
}

/// Render options handed to the adapter with every render call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Render without hydration markers (static html only).
    pub render_to_static_markup: bool,
    pub to_html: ToHtml,
    /// DOM selector of the client-side mount point.
    pub element_selector: String,
}

/// A request to render a component route.
#[derive(Debug)]
pub struct RenderRequest {
    pub component: ComponentRef,
    pub request: Request<Body>,
    pub args: RouteArgsMap,
    pub options: RenderOptions,
}

/// A request to render a data-fetching container route.
#[derive(Debug)]
pub struct RelayRenderRequest {
    pub relay_container: ComponentRef,
    pub relay_route: serde_json::Value,
    pub graphql_url: Url,
    pub request: Request<Body>,
    pub args: RouteArgsMap,
    pub options: RenderOptions,
}

/// Errors raised by a rendering adapter while serving a request.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The adapter does not know how to render this component.
    #[error("Unsupported component: {0}")]
    UnsupportedComponent(String),

    /// Fetching data from the GraphQL endpoint failed.
    #[error("Data fetch from {url} failed: {reason}")]
    DataFetch { url: String, reason: String },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// External collaborator that turns components into HTTP responses.
#[async_trait]
pub trait RenderAdapter: Send + Sync {
    async fn render(&self, request: RenderRequest) -> Result<Response<Body>, RenderError>;

    async fn render_relay_container(
        &self,
        request: RelayRenderRequest,
    ) -> Result<Response<Body>, RenderError>;
}
