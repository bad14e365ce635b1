use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::healthz;
use super::handlers::login::login;
use super::handlers::refresh::refresh;
use super::handlers::reset::reset;
use super::handlers::revoke::revoke;
use super::handlers::update_credentials::update_credentials;
use crate::domain::session::ports::SessionServicePort;

pub struct AppState<S: SessionServicePort> {
    pub session_service: Arc<S>,
}

impl<S: SessionServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            session_service: Arc::clone(&self.session_service),
        }
    }
}

pub fn create_router<S: SessionServicePort>(session_service: Arc<S>) -> Router {
    let state = AppState { session_service };

    let api_routes = Router::new()
        .route("/api/healthz", get(healthz))
        .route("/api/login", post(login::<S>))
        .route("/api/refresh", post(refresh::<S>))
        .route("/api/revoke", post(revoke::<S>))
        .route("/api/users", put(update_credentials::<S>));

    let admin_routes = Router::new().route("/admin/reset", post(reset::<S>));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(api_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
