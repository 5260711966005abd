//! Route descriptors and their classification.
//!
//! # Responsibilities
//! - Accept loosely-typed route descriptors from callers
//! - Classify each descriptor into exactly one route variant
//! - Validate the variant's required fields once, at the boundary
//!
//! # Design Decisions
//! - Discriminator priority: `handler`, then `component`, then `relay_container`
//! - Classification keeps every caller field (args, options) on the variant
//! - Errors are raised at setup time, never at request time

use std::fmt;

use axum::http::Method;
use thiserror::Error;
use url::Url;

use crate::render::ComponentRef;
use crate::routing::registration::{RouteArgsMap, RouteHandler, RouteOptions};

/// Caller-supplied description of one route.
///
/// Exactly one of `handler`, `component` or `relay_container` is expected to
/// be set. Use [`RouteDescriptor::handler`], [`RouteDescriptor::component`] or
/// [`RouteDescriptor::relay`] to build well-formed descriptors.
#[derive(Clone, Default)]
pub struct RouteDescriptor {
    pub url: String,
    pub method: String,
    pub handler: Option<RouteHandler>,
    pub component: Option<ComponentRef>,
    pub relay_container: Option<ComponentRef>,
    /// Data-fetching route descriptor passed through to the adapter.
    pub relay_route: Option<serde_json::Value>,
    pub graphql_url: Option<String>,
    /// Static arguments merged under the request's arguments.
    pub args: Option<RouteArgsMap>,
    pub options: Option<RouteOptions>,
}

impl RouteDescriptor {
    pub fn handler(method: impl Into<String>, url: impl Into<String>, handler: RouteHandler) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            handler: Some(handler),
            ..Default::default()
        }
    }

    pub fn component(method: impl Into<String>, url: impl Into<String>, component: ComponentRef) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            component: Some(component),
            ..Default::default()
        }
    }

    pub fn relay(
        method: impl Into<String>,
        url: impl Into<String>,
        relay_container: ComponentRef,
        relay_route: serde_json::Value,
        graphql_url: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            relay_container: Some(relay_container),
            relay_route: Some(relay_route),
            graphql_url: Some(graphql_url.into()),
            ..Default::default()
        }
    }

    pub fn with_args(mut self, args: RouteArgsMap) -> Self {
        self.args = Some(args);
        self
    }

    pub fn with_options(mut self, options: RouteOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Classify the descriptor into its route variant.
    ///
    /// `index` is the descriptor's position in the route list and is only
    /// used for error reporting.
    pub fn classify(self, index: usize) -> Result<AppRoute, ConfigurationError> {
        let discriminators = [
            self.handler.is_some(),
            self.component.is_some(),
            self.relay_container.is_some(),
        ];
        if discriminators.iter().filter(|present| **present).count() > 1 {
            tracing::warn!(
                index,
                url = %self.url,
                "Route sets more than one of handler, component and relay_container; using the first by priority"
            );
        }

        let Self {
            url,
            method,
            handler,
            component,
            relay_container,
            relay_route,
            graphql_url,
            args,
            options,
        } = self;

        if let Some(handler) = handler {
            let method = parse_method(&url, &method, RouteKind::Handler)?;
            require_url(&url, RouteKind::Handler)?;
            return Ok(AppRoute::Handler(HandlerRoute {
                url,
                method,
                handler,
                args,
                options,
            }));
        }

        if let Some(component) = component {
            let method = parse_method(&url, &method, RouteKind::React)?;
            require_url(&url, RouteKind::React)?;
            return Ok(AppRoute::React(ComponentRoute {
                url,
                method,
                component,
                args,
                options,
            }));
        }

        if let Some(relay_container) = relay_container {
            let method = parse_method(&url, &method, RouteKind::Relay)?;
            require_url(&url, RouteKind::Relay)?;
            let relay_route = relay_route.ok_or_else(|| ConfigurationError::MissingField {
                url: url.clone(),
                kind: RouteKind::Relay,
                field: "relay_route",
            })?;
            let graphql_url = graphql_url.ok_or_else(|| ConfigurationError::MissingField {
                url: url.clone(),
                kind: RouteKind::Relay,
                field: "graphql_url",
            })?;
            let graphql_url = Url::parse(&graphql_url).map_err(|source| {
                ConfigurationError::InvalidGraphqlUrl {
                    url: url.clone(),
                    value: graphql_url.clone(),
                    source,
                }
            })?;
            return Ok(AppRoute::Relay(RelayContainerRoute {
                url,
                method,
                relay_container,
                relay_route,
                graphql_url,
                args,
                options,
            }));
        }

        Err(ConfigurationError::UnknownRouteType { index, url })
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("handler", &self.handler.as_ref().map(|_| ".."))
            .field("component", &self.component)
            .field("relay_container", &self.relay_container)
            .field("relay_route", &self.relay_route)
            .field("graphql_url", &self.graphql_url)
            .field("args", &self.args)
            .field("options", &self.options)
            .finish()
    }
}

fn parse_method(url: &str, method: &str, kind: RouteKind) -> Result<Method, ConfigurationError> {
    if method.is_empty() {
        return Err(ConfigurationError::MissingField {
            url: url.to_string(),
            kind,
            field: "method",
        });
    }
    Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| {
        ConfigurationError::InvalidMethod {
            url: url.to_string(),
            method: method.to_string(),
        }
    })
}

fn require_url(url: &str, kind: RouteKind) -> Result<(), ConfigurationError> {
    if url.is_empty() {
        return Err(ConfigurationError::MissingField {
            url: String::new(),
            kind,
            field: "url",
        });
    }
    Ok(())
}

/// Variant tag of a classified route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Handler,
    React,
    Relay,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Handler => "handler",
            RouteKind::React => "react",
            RouteKind::Relay => "relay",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route served by a caller-supplied handler.
#[derive(Clone)]
pub struct HandlerRoute {
    pub url: String,
    pub method: Method,
    pub handler: RouteHandler,
    pub args: Option<RouteArgsMap>,
    pub options: Option<RouteOptions>,
}

/// Route rendered from a component.
#[derive(Debug, Clone)]
pub struct ComponentRoute {
    pub url: String,
    pub method: Method,
    pub component: ComponentRef,
    pub args: Option<RouteArgsMap>,
    pub options: Option<RouteOptions>,
}

/// Route rendered from a data-fetching container.
#[derive(Debug, Clone)]
pub struct RelayContainerRoute {
    pub url: String,
    pub method: Method,
    pub relay_container: ComponentRef,
    pub relay_route: serde_json::Value,
    pub graphql_url: Url,
    pub args: Option<RouteArgsMap>,
    pub options: Option<RouteOptions>,
}

/// A classified route.
#[derive(Clone)]
pub enum AppRoute {
    Handler(HandlerRoute),
    React(ComponentRoute),
    Relay(RelayContainerRoute),
}

impl AppRoute {
    pub fn kind(&self) -> RouteKind {
        match self {
            AppRoute::Handler(_) => RouteKind::Handler,
            AppRoute::React(_) => RouteKind::React,
            AppRoute::Relay(_) => RouteKind::Relay,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            AppRoute::Handler(r) => &r.url,
            AppRoute::React(r) => &r.url,
            AppRoute::Relay(r) => &r.url,
        }
    }

    pub fn method(&self) -> &Method {
        match self {
            AppRoute::Handler(r) => &r.method,
            AppRoute::React(r) => &r.method,
            AppRoute::Relay(r) => &r.method,
        }
    }
}

impl fmt::Debug for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRoute")
            .field("kind", &self.kind())
            .field("method", self.method())
            .field("url", &self.url())
            .finish_non_exhaustive()
    }
}

/// Invalid route configuration, detected during setup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// None of `handler`, `component` or `relay_container` is set.
    #[error("Unknown type. Route type must be handler, react or relay.")]
    UnknownRouteType { index: usize, url: String },

    #[error("Route {url:?}: {kind} route requires field `{field}`")]
    MissingField {
        url: String,
        kind: RouteKind,
        field: &'static str,
    },

    #[error("Route {url:?}: invalid HTTP method {method:?}")]
    InvalidMethod { url: String, method: String },

    #[error("Route {url:?}: invalid GraphQL endpoint {value:?}: {source}")]
    InvalidGraphqlUrl {
        url: String,
        value: String,
        source: url::ParseError,
    },
}
