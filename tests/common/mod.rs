//! Shared fixtures for plugin integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Response};
use isotropy_plugin_react::render::{
    RelayRenderRequest, RenderAdapter, RenderError, RenderRequest,
};
use isotropy_plugin_react::routing::RouteArgsMap;

/// Component greeting the `name` argument.
#[derive(Debug)]
pub struct Greeting;

/// One adapter invocation, as seen by the adapter.
#[derive(Debug, Clone)]
pub enum AdapterCall {
    Render {
        component: String,
        args: RouteArgsMap,
        render_to_static_markup: bool,
        element_selector: String,
    },
    Relay {
        relay_container: String,
        relay_route: serde_json::Value,
        graphql_url: String,
        args: RouteArgsMap,
    },
}

/// Adapter that renders [`Greeting`] and records every call.
#[derive(Default)]
pub struct GreetingAdapter {
    calls: Mutex<Vec<AdapterCall>>,
}

impl GreetingAdapter {
    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().unwrap().clone()
    }

    fn html(name: &str, static_markup: bool) -> String {
        if static_markup {
            format!("<html><body>Hello {}</body></html>", name)
        } else {
            format!("<html data-reactroot=\"\"><body>Hello {}</body></html>", name)
        }
    }

    fn respond(html: String) -> Response<Body> {
        let mut response = Response::new(Body::from(html));
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("text/html; charset=utf-8"),
        );
        response
    }
}

#[async_trait]
impl RenderAdapter for GreetingAdapter {
    async fn render(&self, request: RenderRequest) -> Result<Response<Body>, RenderError> {
        self.calls.lock().unwrap().push(AdapterCall::Render {
            component: request.component.name().to_string(),
            args: request.args.clone(),
            render_to_static_markup: request.options.render_to_static_markup,
            element_selector: request.options.element_selector.clone(),
        });

        if request.component.downcast_ref::<Greeting>().is_none() {
            return Err(RenderError::UnsupportedComponent(
                request.component.name().to_string(),
            ));
        }

        let name = request.args.get("name").map(String::as_str).unwrap_or("world");
        let html = Self::html(name, request.options.render_to_static_markup);
        Ok(Self::respond(request.options.to_html.apply(&html, None)))
    }

    async fn render_relay_container(
        &self,
        request: RelayRenderRequest,
    ) -> Result<Response<Body>, RenderError> {
        self.calls.lock().unwrap().push(AdapterCall::Relay {
            relay_container: request.relay_container.name().to_string(),
            relay_route: request.relay_route.clone(),
            graphql_url: request.graphql_url.to_string(),
            args: request.args.clone(),
        });
        Ok(Self::respond(format!(
            "<html><body>{}</body></html>",
            request.relay_container.name()
        )))
    }
}
