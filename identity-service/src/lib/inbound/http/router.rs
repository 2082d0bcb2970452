use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::refresh_token::refresh_token;
use super::handlers::request_password_reset::request_password_reset;
use super::handlers::reset_password::reset_password;
use super::handlers::signup::signup;
use super::handlers::update_user::update_user;
use super::handlers::verify_email::verify_email;
use super::middleware::authenticate as auth_middleware;
use crate::domain::user::service::CredentialService;
use crate::outbound::events::BroadcastEventBus;
use crate::outbound::repositories::PostgresLoginAttemptRepository;
use crate::outbound::repositories::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<
        CredentialService<
            PostgresUserRepository,
            PostgresLoginAttemptRepository,
            BroadcastEventBus,
        >,
    >,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    credential_service: Arc<
        CredentialService<
            PostgresUserRepository,
            PostgresLoginAttemptRepository,
            BroadcastEventBus,
        >,
    >,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        credential_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh_token))
        .route("/api/auth/reset-password", post(request_password_reset))
        .route("/api/auth/reset-password/confirm", post(reset_password))
        .route("/api/auth/verify-email/:token", get(verify_email));

    let protected_routes = Router::new()
        .route("/api/auth/user", get(get_user))
        .route("/api/auth/user", put(update_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

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
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
