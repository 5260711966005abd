//! Axum-hosted implementation of [`RouterHandle`].
//!
//! # Responsibilities
//! - Translate `:param` / `*rest` patterns into matchit's `{param}` / `{*rest}`
//! - Keep registrations in order; the first matching registration wins
//! - Extract path and query arguments for each matched request
//!
//! # Design Decisions
//! - Each pattern compiles into its own matchit tree, so patterns never
//!   conflict with each other and precedence is registration order
//! - A batch is compiled completely before any route is added
//! - Axum only provides the catch-all entry point and the server plumbing

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;

use crate::routing::{
    RouteArgs, RouteArgsMap, RouteHandler, RouterError, RouterHandle, RouterRegistration,
};

/// A registration compiled for dispatch.
struct CompiledRoute {
    method: Method,
    url: String,
    matcher: matchit::Router<()>,
    handler: RouteHandler,
    arguments_as_object: bool,
}

impl CompiledRoute {
    fn compile(registration: RouterRegistration) -> Result<Self, RouterError> {
        let path = to_matchit_path(&registration.url)?;
        let mut matcher = matchit::Router::new();
        matcher
            .insert(path, ())
            .map_err(|err| RouterError::InvalidPattern {
                url: registration.url.clone(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            arguments_as_object: registration.arguments_as_object(),
            method: registration.method,
            url: registration.url,
            matcher,
            handler: registration.handler,
        })
    }
}

/// Ordered dispatch table served through an [`axum::Router`].
#[derive(Default)]
pub struct AxumRouter {
    routes: Vec<CompiledRoute>,
}

impl AxumRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered method + pattern pairs.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freeze the table into an axum router that dispatches every path.
    pub fn into_router(self) -> Router {
        let table: Arc<[CompiledRoute]> = self.routes.into();
        Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(table)
    }
}

impl RouterHandle for AxumRouter {
    fn add(&mut self, registrations: Vec<RouterRegistration>) -> Result<(), RouterError> {
        let mut seen: HashSet<(Method, String)> = self
            .routes
            .iter()
            .map(|r| (r.method.clone(), r.url.clone()))
            .collect();

        let mut compiled = Vec::with_capacity(registrations.len());
        for registration in registrations {
            if !seen.insert((registration.method.clone(), registration.url.clone())) {
                return Err(RouterError::Duplicate {
                    method: registration.method,
                    url: registration.url,
                });
            }
            compiled.push(CompiledRoute::compile(registration)?);
        }

        for route in &compiled {
            tracing::debug!(method = %route.method, url = %route.url, "Route added");
        }
        self.routes.extend(compiled);
        Ok(())
    }
}

enum Lookup {
    Found {
        handler: RouteHandler,
        params: Vec<(String, String)>,
        arguments_as_object: bool,
    },
    MethodNotAllowed,
    NotFound,
}

/// Find the first registration whose pattern and method match.
fn lookup(table: &[CompiledRoute], method: &Method, path: &str) -> Lookup {
    let mut path_matched = false;
    for route in table {
        let Ok(matched) = route.matcher.at(path) else {
            continue;
        };
        path_matched = true;
        if route.method != *method {
            continue;
        }
        return Lookup::Found {
            handler: Arc::clone(&route.handler),
            params: matched
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            arguments_as_object: route.arguments_as_object,
        };
    }

    if path_matched {
        Lookup::MethodNotAllowed
    } else {
        Lookup::NotFound
    }
}

async fn dispatch(State(table): State<Arc<[CompiledRoute]>>, request: Request<Body>) -> Response {
    let found = lookup(&table, request.method(), request.uri().path());
    let (handler, params, arguments_as_object) = match found {
        Lookup::Found {
            handler,
            params,
            arguments_as_object,
        } => (handler, params, arguments_as_object),
        Lookup::MethodNotAllowed => return StatusCode::METHOD_NOT_ALLOWED.into_response(),
        Lookup::NotFound => return StatusCode::NOT_FOUND.into_response(),
    };

    let args = match route_args(params, request.uri(), arguments_as_object) {
        Ok(args) => args,
        Err(rejection) => return rejection,
    };

    match handler(request, args).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Build handler arguments from the matched path and the query string.
///
/// Object arguments merge query values and path parameters (path wins);
/// positional arguments are the path parameter values in pattern order.
/// Undecodable parameters or query strings are rejected with 400.
fn route_args(
    params: Vec<(String, String)>,
    uri: &Uri,
    as_object: bool,
) -> Result<RouteArgs, Response> {
    let mut path = Vec::with_capacity(params.len());
    for (name, raw) in params {
        let value = urlencoding::decode(&raw).map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                format!("Invalid UTF-8 in path parameter `{}`", name),
            )
                .into_response()
        })?;
        path.push((name, value.into_owned()));
    }

    if !as_object {
        return Ok(RouteArgs::Positional(
            path.into_iter().map(|(_, v)| v).collect(),
        ));
    }

    let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(IntoResponse::into_response)?;
    let mut args = RouteArgsMap::new();
    args.extend(query);
    args.extend(path);
    Ok(RouteArgs::Object(args))
}

/// Convert a `:param` / `*rest` URL pattern into matchit path syntax.
pub fn to_matchit_path(url: &str) -> Result<String, RouterError> {
    let invalid = |reason: String| RouterError::InvalidPattern {
        url: url.to_string(),
        reason,
    };

    if !url.starts_with('/') {
        return Err(invalid("pattern must start with '/'".into()));
    }

    let segments: Vec<&str> = url[1..].split('/').collect();
    let last = segments.len() - 1;
    let mut names = HashSet::new();
    let mut converted = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        if segment.contains('{') || segment.contains('}') {
            return Err(invalid("braces are not allowed in patterns".into()));
        }
        let (name, wildcard) = match (segment.strip_prefix(':'), segment.strip_prefix('*')) {
            (Some(name), _) => (name, false),
            (None, Some(name)) => (name, true),
            (None, None) => {
                converted.push(segment.to_string());
                continue;
            }
        };

        if name.is_empty() {
            return Err(invalid("parameter name is empty".into()));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid(format!("invalid parameter name `{}`", name)));
        }
        if !names.insert(name) {
            return Err(invalid(format!("parameter `{}` appears twice", name)));
        }
        if wildcard {
            if i != last {
                return Err(invalid("wildcard must be the last segment".into()));
            }
            converted.push(format!("{{*{}}}", name));
        } else {
            converted.push(format!("{{{}}}", name));
        }
    }

    Ok(format!("/{}", converted.join("/")))
}
