use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::validate::validate;
use crate::identity::ports::IdentityServicePort;

pub struct AppState<S: IdentityServicePort> {
    pub identity_service: Arc<S>,
}

impl<S: IdentityServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            identity_service: Arc::clone(&self.identity_service),
        }
    }
}

pub fn create_router<S: IdentityServicePort>(identity_service: Arc<S>) -> Router {
    let state = AppState { identity_service };

    // Headers are not recorded: Authorization carries bearer tokens.
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
        .route("/login", post(login::<S>))
        .route("/validate", get(validate::<S>))
        .layer(trace_layer)
        .with_state(state)
}
