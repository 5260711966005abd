//! Router registration records and the router seam.
//!
//! # Responsibilities
//! - Define the record handed to the router for each route
//! - Define the handler signature the router invokes
//! - Define the `RouterHandle` capability consumed by setup

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;

use crate::render::RenderError;

/// Named route arguments (path parameters, query values, static args).
pub type RouteArgsMap = BTreeMap<String, String>;

/// Arguments extracted by the router for a matched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteArgs {
    /// Delivered when the registration asked for `arguments_as_object`.
    Object(RouteArgsMap),
    /// Path parameter values in pattern order.
    Positional(Vec<String>),
}

impl RouteArgs {
    /// Look up a named argument. Positional arguments have no names.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            RouteArgs::Object(map) => map.get(name).map(String::as_str),
            RouteArgs::Positional(_) => None,
        }
    }

    /// Convert into a map; positional values are keyed by their index.
    pub fn into_map(self) -> RouteArgsMap {
        match self {
            RouteArgs::Object(map) => map,
            RouteArgs::Positional(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        }
    }
}

impl Default for RouteArgs {
    fn default() -> Self {
        RouteArgs::Object(RouteArgsMap::new())
    }
}

/// Router options attached to a registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Deliver matched parameters as one object instead of positional values.
    pub arguments_as_object: bool,
}

/// Errors returned by route handlers at request time.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The rendering adapter failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

pub type HandlerFuture = BoxFuture<'static, Result<Response<Body>, HandlerError>>;

/// Handler invoked by the router with the live request and extracted arguments.
pub type RouteHandler = Arc<dyn Fn(Request<Body>, RouteArgs) -> HandlerFuture + Send + Sync>;

/// Wrap an async function or closure as a [`RouteHandler`].
pub fn handler_fn<F, Fut>(f: F) -> RouteHandler
where
    F: Fn(Request<Body>, RouteArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response<Body>, HandlerError>> + Send + 'static,
{
    Arc::new(move |request, args| f(request, args).boxed())
}

/// Registration kind understood by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    /// URL pattern with `:param` and `*rest` segments.
    Pattern,
}

/// One entry of the router's dispatch table.
#[derive(Clone)]
pub struct RouterRegistration {
    pub kind: RegistrationKind,
    pub method: Method,
    pub url: String,
    pub handler: RouteHandler,
    pub options: Option<RouteOptions>,
}

impl RouterRegistration {
    /// Whether the router should deliver arguments as one object.
    pub fn arguments_as_object(&self) -> bool {
        self.options.map(|o| o.arguments_as_object).unwrap_or(false)
    }
}

impl fmt::Debug for RouterRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterRegistration")
            .field("kind", &self.kind)
            .field("method", &self.method)
            .field("url", &self.url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Errors raised by a router while accepting registrations.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The same method and URL were registered twice.
    #[error("Route {method} {url} is already registered")]
    Duplicate { method: Method, url: String },

    #[error("Invalid route pattern {url}: {reason}")]
    InvalidPattern { url: String, reason: String },

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Router capability consumed by setup.
///
/// Implementations must keep registration order and invoke
/// `handler(request, args)` for matching requests.
pub trait RouterHandle {
    fn add(&mut self, registrations: Vec<RouterRegistration>) -> Result<(), RouterError>;
}
