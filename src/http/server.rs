//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all session handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve until the shutdown signal, then tear every session down

use axum::body::Body;
use axum::http::Request;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::geocoding::Geocoder;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::widget::SessionRegistry;

/// Application state injected into handlers.
pub struct AppState<G> {
    pub registry: Arc<SessionRegistry<G>>,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

/// HTTP front of the widget sessions.
pub struct WidgetServer<G> {
    router: Router,
    registry: Arc<SessionRegistry<G>>,
}

impl<G: Geocoder> WidgetServer<G> {
    pub fn new(registry: Arc<SessionRegistry<G>>) -> Self {
        let timeout = Duration::from_secs(registry.config().server.request_timeout_secs);
        let state = AppState {
            registry: registry.clone(),
        };
        Self {
            router: Self::build_router(state, timeout),
            registry,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState<G>, timeout: Duration) -> Router {
        Router::new()
            .route("/health", get(handlers::health::<G>))
            .route("/widgets", post(handlers::create_session::<G>))
            .route("/widgets/{id}", delete(handlers::close_session::<G>))
            .route("/widgets/{id}/inputs/{field}", put(handlers::update_input::<G>))
            .route(
                "/widgets/{id}/suggestions/{field}",
                get(handlers::get_suggestions::<G>),
            )
            .route(
                "/widgets/{id}/suggestions/{field}/select",
                post(handlers::select_suggestion::<G>),
            )
            .route(
                "/widgets/{id}/suggestions/{field}/dismiss",
                post(handlers::dismiss_suggestions::<G>),
            )
            .route("/widgets/{id}/route", post(handlers::submit_route::<G>))
            .route("/widgets/{id}/overlay", get(handlers::get_overlay::<G>))
            .route("/widgets/{id}/share", get(handlers::share::<G>))
            .route("/widgets/{id}/open", post(handlers::open_link::<G>))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id(request),
                        )
                    }))
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(timeout)),
            )
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        self.registry.close_all();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::testing::ScriptedGeocoder;
    use axum::http::{Method, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn server() -> WidgetServer<ScriptedGeocoder> {
        let geocoder = ScriptedGeocoder::new()
            .with("Paris", &[("Paris, France", 48.8, 2.3)])
            .with("London", &[("London, UK", 51.5, -0.1)]);
        let registry = Arc::new(SessionRegistry::new(Arc::new(geocoder), WidgetConfig::default()));
        WidgetServer::new(registry)
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn new_session(router: &Router) -> String {
        let response = call(router, Method::POST, "/widgets", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_and_request_id() {
        let router = server().router();
        let response = call(&router, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(json_body(response).await["status"], "operational");
    }

    #[tokio::test]
    async fn test_route_then_share() {
        let router = server().router();
        let id = new_session(&router).await;

        let response = call(&router, Method::GET, &format!("/widgets/{id}/share"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "nothing_to_share");

        let response = call(
            &router,
            Method::POST,
            &format!("/widgets/{id}/route"),
            Some(json!({ "start": "Paris", "end": "London" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["applied"], true);
        assert_eq!(body["overlay"]["state"], "attached");
        assert_eq!(body["overlay"]["spec"]["line"]["color"], "blue");

        let response = call(&router, Method::GET, &format!("/widgets/{id}/share"), None).await;
        assert_eq!(
            json_body(response).await["url"],
            "http://localhost:3000/?start=48.8,2.3&end=51.5,-0.1"
        );
    }

    #[tokio::test]
    async fn test_no_match_is_unprocessable() {
        let router = server().router();
        let id = new_session(&router).await;

        let response = call(
            &router,
            Method::POST,
            &format!("/widgets/{id}/route"),
            Some(json!({ "start": "Qxzzy123", "end": "London" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"], "no_match");

        let response = call(&router, Method::GET, &format!("/widgets/{id}/overlay"), None).await;
        assert_eq!(json_body(response).await["state"], "empty");
    }

    #[tokio::test]
    async fn test_open_link_and_close() {
        let router = server().router();
        let id = new_session(&router).await;

        let response = call(
            &router,
            Method::POST,
            &format!("/widgets/{id}/open"),
            Some(json!({ "url": "http://localhost:3000/?start=48.8,2.3&end=51.5,-0.1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["route"]["start"]["lat"], 48.8);

        let response = call(&router, Method::DELETE, &format!("/widgets/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = call(&router, Method::GET, &format!("/widgets/{id}/overlay"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dismiss_suggestions() {
        let router = server().router();
        let id = new_session(&router).await;

        let response = call(
            &router,
            Method::POST,
            &format!("/widgets/{id}/suggestions/end/dismiss"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = call(&router, Method::GET, &format!("/widgets/{id}/suggestions/end"), None).await;
        assert_eq!(json_body(response).await["state"], "closed");

        let response = call(
            &router,
            Method::POST,
            "/widgets/00000000-0000-0000-0000-000000000000/suggestions/end/dismiss",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let router = server().router();
        let id = new_session(&router).await;
        let response = call(
            &router,
            Method::GET,
            &format!("/widgets/{id}/suggestions/middle"),
            None,
        )
        .await;
        assert!(response.status().is_client_error());
    }
}
