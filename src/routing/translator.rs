//! Translation of classified routes into router registrations.
//!
//! # Responsibilities
//! - Classify every descriptor, in input order
//! - Build one registration per route with the variant's handler strategy
//! - Fail the whole batch on the first invalid descriptor
//!
//! # Design Decisions
//! - Generated handlers capture an immutable per-route context only
//! - Render options come from the plugin config, never from the route
//! - Adapter failures are returned to the router untouched

use std::sync::Arc;

use crate::render::{ComponentRef, RelayRenderRequest, RenderAdapter, RenderOptions, RenderRequest};
use crate::routing::descriptor::{
    AppRoute, ComponentRoute, ConfigurationError, HandlerRoute, RelayContainerRoute, RouteDescriptor,
};
use crate::routing::registration::{
    handler_fn, HandlerError, RegistrationKind, RouteArgs, RouteArgsMap, RouteHandler,
    RouteOptions, RouterRegistration,
};

/// Options attached to every generated (component and relay) registration.
pub const RENDER_ROUTE_OPTIONS: RouteOptions = RouteOptions {
    arguments_as_object: true,
};

/// Translate a route list into registrations, preserving order.
///
/// Returns the first configuration error; no registration is produced in
/// that case.
pub fn translate(
    routes: Vec<RouteDescriptor>,
    options: &RenderOptions,
    adapter: &Arc<dyn RenderAdapter>,
) -> Result<Vec<RouterRegistration>, ConfigurationError> {
    let routes = routes
        .into_iter()
        .enumerate()
        .map(|(index, route)| route.classify(index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(routes
        .into_iter()
        .map(|route| {
            tracing::debug!(
                kind = %route.kind(),
                method = %route.method(),
                url = %route.url(),
                "Registering route"
            );
            build_registration(route, options, adapter)
        })
        .collect())
}

/// Build the registration for one classified route.
pub fn build_registration(
    route: AppRoute,
    options: &RenderOptions,
    adapter: &Arc<dyn RenderAdapter>,
) -> RouterRegistration {
    match route {
        AppRoute::Handler(route) => handler_registration(route),
        AppRoute::React(route) => component_registration(route, options, adapter),
        AppRoute::Relay(route) => relay_registration(route, options, adapter),
    }
}

fn handler_registration(route: HandlerRoute) -> RouterRegistration {
    RouterRegistration {
        kind: RegistrationKind::Pattern,
        method: route.method,
        url: route.url,
        handler: route.handler,
        options: None,
    }
}

fn component_registration(
    route: ComponentRoute,
    options: &RenderOptions,
    adapter: &Arc<dyn RenderAdapter>,
) -> RouterRegistration {
    warn_ignored_options(&route.url, route.options);
    let context = ComponentContext {
        component: route.component,
        static_args: route.args.unwrap_or_default(),
        options: options.clone(),
        adapter: Arc::clone(adapter),
    };
    RouterRegistration {
        kind: RegistrationKind::Pattern,
        method: route.method,
        url: route.url,
        handler: component_handler(Arc::new(context)),
        options: Some(RENDER_ROUTE_OPTIONS),
    }
}

fn relay_registration(
    route: RelayContainerRoute,
    options: &RenderOptions,
    adapter: &Arc<dyn RenderAdapter>,
) -> RouterRegistration {
    warn_ignored_options(&route.url, route.options);
    let context = RelayContext {
        relay_container: route.relay_container,
        relay_route: route.relay_route,
        graphql_url: route.graphql_url,
        static_args: route.args.unwrap_or_default(),
        options: options.clone(),
        adapter: Arc::clone(adapter),
    };
    RouterRegistration {
        kind: RegistrationKind::Pattern,
        method: route.method,
        url: route.url,
        handler: relay_handler(Arc::new(context)),
        options: Some(RENDER_ROUTE_OPTIONS),
    }
}

fn warn_ignored_options(url: &str, options: Option<RouteOptions>) {
    if let Some(options) = options {
        tracing::warn!(
            url = %url,
            ?options,
            "Per-route options are not applied to render routes"
        );
    }
}

/// Static data a component route handler needs at request time.
struct ComponentContext {
    component: ComponentRef,
    static_args: RouteArgsMap,
    options: RenderOptions,
    adapter: Arc<dyn RenderAdapter>,
}

/// Static data a relay route handler needs at request time.
struct RelayContext {
    relay_container: ComponentRef,
    relay_route: serde_json::Value,
    graphql_url: url::Url,
    static_args: RouteArgsMap,
    options: RenderOptions,
    adapter: Arc<dyn RenderAdapter>,
}

fn component_handler(context: Arc<ComponentContext>) -> RouteHandler {
    handler_fn(move |request, args| {
        let context = Arc::clone(&context);
        async move {
            let request = RenderRequest {
                component: context.component.clone(),
                request,
                args: merge_args(&context.static_args, args),
                options: context.options.clone(),
            };
            context
                .adapter
                .render(request)
                .await
                .map_err(HandlerError::from)
        }
    })
}

fn relay_handler(context: Arc<RelayContext>) -> RouteHandler {
    handler_fn(move |request, args| {
        let context = Arc::clone(&context);
        async move {
            let request = RelayRenderRequest {
                relay_container: context.relay_container.clone(),
                relay_route: context.relay_route.clone(),
                graphql_url: context.graphql_url.clone(),
                request,
                args: merge_args(&context.static_args, args),
                options: context.options.clone(),
            };
            context
                .adapter
                .render_relay_container(request)
                .await
                .map_err(HandlerError::from)
        }
    })
}

/// Overlay request arguments on the route's static arguments.
fn merge_args(static_args: &RouteArgsMap, args: RouteArgs) -> RouteArgsMap {
    let mut merged = static_args.clone();
    merged.extend(args.into_map());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderError, ToHtml};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, Response};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    #[derive(Debug, Clone)]
    enum Call {
        Render {
            component: String,
            args: RouteArgsMap,
            static_markup: bool,
            selector: String,
        },
        Relay {
            container: String,
            relay_route: serde_json::Value,
            graphql_url: String,
            args: RouteArgsMap,
        },
    }

    #[derive(Default)]
    struct RecordingAdapter {
        calls: Mutex<Vec<Call>>,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
        fail: bool,
    }

    #[async_trait]
    impl RenderAdapter for RecordingAdapter {
        async fn render(&self, request: RenderRequest) -> Result<Response<Body>, RenderError> {
            self.calls.lock().unwrap().push(Call::Render {
                component: request.component.name().to_string(),
                args: request.args,
                static_markup: request.options.render_to_static_markup,
                selector: request.options.element_selector.clone(),
            });
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if self.fail {
                return Err(RenderError::UnsupportedComponent(request.component.name().into()));
            }
            let html = request.options.to_html.apply("<div>ok</div>", None);
            Ok(Response::new(Body::from(html)))
        }

        async fn render_relay_container(
            &self,
            request: RelayRenderRequest,
        ) -> Result<Response<Body>, RenderError> {
            self.calls.lock().unwrap().push(Call::Relay {
                container: request.relay_container.name().to_string(),
                relay_route: request.relay_route,
                graphql_url: request.graphql_url.to_string(),
                args: request.args,
            });
            Ok(Response::new(Body::from("relay")))
        }
    }

    fn options(static_markup: bool) -> RenderOptions {
        RenderOptions {
            render_to_static_markup: static_markup,
            to_html: ToHtml::new(|html, _| format!("<html>{}</html>", html)),
            element_selector: "#app".into(),
        }
    }

    fn object(pairs: &[(&str, &str)]) -> RouteArgs {
        RouteArgs::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    async fn body_string(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_translate_preserves_order_and_options() {
        let adapter: Arc<dyn RenderAdapter> = Arc::new(RecordingAdapter::default());
        let handler = handler_fn(|_, _| async { Ok::<_, HandlerError>(Response::new(Body::empty())) });
        let routes = vec![
            RouteDescriptor::component("GET", "/a", ComponentRef::new("A", ())),
            RouteDescriptor::handler("POST", "/b", handler.clone()),
            RouteDescriptor::relay(
                "GET",
                "/c/:id",
                ComponentRef::new("C", ()),
                serde_json::json!({}),
                "http://localhost:4000/graphql",
            ),
        ];

        let registrations = translate(routes, &options(false), &adapter).unwrap();
        let urls: Vec<_> = registrations.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["/a", "/b", "/c/:id"]);

        assert_eq!(registrations[0].method, Method::GET);
        assert_eq!(registrations[0].options, Some(RENDER_ROUTE_OPTIONS));
        assert_eq!(registrations[1].method, Method::POST);
        assert_eq!(registrations[1].options, None);
        assert!(Arc::ptr_eq(&registrations[1].handler, &handler));
        assert_eq!(registrations[2].options, Some(RENDER_ROUTE_OPTIONS));
        assert!(registrations
            .iter()
            .all(|r| r.kind == RegistrationKind::Pattern));
    }

    #[test]
    fn test_translate_fails_whole_batch() {
        let adapter: Arc<dyn RenderAdapter> = Arc::new(RecordingAdapter::default());
        let routes = vec![
            RouteDescriptor::component("GET", "/a", ComponentRef::new("A", ())),
            RouteDescriptor {
                url: "/b".into(),
                method: "GET".into(),
                ..Default::default()
            },
        ];
        let err = translate(routes, &options(false), &adapter).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownRouteType { index: 1, .. }));
    }

    #[tokio::test]
    async fn test_component_handler_delegates_with_merged_args() {
        let recording = Arc::new(RecordingAdapter::default());
        let adapter: Arc<dyn RenderAdapter> = recording.clone();
        let static_args = RouteArgsMap::from([
            ("lang".to_string(), "en".to_string()),
            ("name".to_string(), "default".to_string()),
        ]);
        let routes = vec![
            RouteDescriptor::component("GET", "/hello/:name", ComponentRef::new("Hello", ()))
                .with_args(static_args),
        ];
        let registration = translate(routes, &options(true), &adapter)
            .unwrap()
            .remove(0);

        let response = (registration.handler)(Request::new(Body::empty()), object(&[("name", "mister")]))
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "<html><div>ok</div></html>");

        let calls = recording.calls.lock().unwrap().clone();
        match &calls[..] {
            [Call::Render {
                component,
                args,
                static_markup,
                selector,
            }] => {
                assert_eq!(component, "Hello");
                assert_eq!(args.get("name").map(String::as_str), Some("mister"));
                assert_eq!(args.get("lang").map(String::as_str), Some("en"));
                assert!(*static_markup);
                assert_eq!(selector, "#app");
            }
            other => panic!("unexpected calls: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_relay_handler_passes_route_and_endpoint() {
        let recording = Arc::new(RecordingAdapter::default());
        let adapter: Arc<dyn RenderAdapter> = recording.clone();
        let routes = vec![RouteDescriptor::relay(
            "GET",
            "/r/:id",
            ComponentRef::new("TodoList", ()),
            serde_json::json!({"queries": ["viewer"]}),
            "http://localhost:4000/graphql",
        )];
        let registration = translate(routes, &options(false), &adapter)
            .unwrap()
            .remove(0);

        (registration.handler)(Request::new(Body::empty()), object(&[("id", "7")]))
            .await
            .unwrap();

        let calls = recording.calls.lock().unwrap().clone();
        match &calls[..] {
            [Call::Relay {
                container,
                relay_route,
                graphql_url,
                args,
            }] => {
                assert_eq!(container, "TodoList");
                assert_eq!(relay_route["queries"][0], "viewer");
                assert_eq!(graphql_url, "http://localhost:4000/graphql");
                assert_eq!(args.get("id").map(String::as_str), Some("7"));
            }
            other => panic!("unexpected calls: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handler_waits_for_adapter() {
        let (release, gate) = oneshot::channel();
        let recording = Arc::new(RecordingAdapter {
            gate: Mutex::new(Some(gate)),
            ..Default::default()
        });
        let adapter: Arc<dyn RenderAdapter> = recording.clone();
        let routes = vec![RouteDescriptor::component("GET", "/hello", ComponentRef::new("Hello", ()))];
        let registration = translate(routes, &options(false), &adapter)
            .unwrap()
            .remove(0);

        let task = tokio::spawn((registration.handler)(
            Request::new(Body::empty()),
            RouteArgs::default(),
        ));
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!task.is_finished());

        release.send(()).unwrap();
        let response = task.await.unwrap().unwrap();
        assert_eq!(body_string(response).await, "<html><div>ok</div></html>");
    }

    #[tokio::test]
    async fn test_adapter_error_propagates() {
        let adapter: Arc<dyn RenderAdapter> = Arc::new(RecordingAdapter {
            fail: true,
            ..Default::default()
        });
        let routes = vec![RouteDescriptor::component("GET", "/x", ComponentRef::new("Broken", ()))];
        let registration = translate(routes, &options(false), &adapter)
            .unwrap()
            .remove(0);

        let err = (registration.handler)(Request::new(Body::empty()), RouteArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HandlerError::Render(RenderError::UnsupportedComponent(ref name)) if name == "Broken"
        ));
    }
}
