use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::Role;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_discovery::create_discovery;
use super::handlers::create_user::create_user;
use super::handlers::delete_discovery::delete_discovery;
use super::handlers::delete_user::delete_user;
use super::handlers::get_discovery::get_discovery;
use super::handlers::get_user::get_user;
use super::handlers::list_all_discoveries::list_all_discoveries;
use super::handlers::list_discoveries::list_discoveries;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::promote_user::promote_user;
use super::handlers::register::register;
use super::handlers::set_user_active::set_user_active;
use super::handlers::set_user_role::set_user_role;
use super::handlers::submit_contact::submit_contact;
use super::handlers::update_discovery::update_discovery;
use super::handlers::update_user::update_user;
use super::middleware::optional_auth;
use super::middleware::require_auth;
use super::middleware::require_role;
use crate::contact::ports::ContactServicePort;
use crate::discovery::ports::DiscoveryServicePort;
use crate::user::ports::UserServicePort;

/// Unified application state shared by every handler.
///
/// Services are held behind their ports so that the same router runs over
/// Postgres adapters in production and in-memory adapters in tests.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub discovery_service: Arc<dyn DiscoveryServicePort>,
    pub contact_service: Arc<dyn ContactServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    // reachable anonymously, personalized when a valid token is present
    let contact_routes = Router::new()
        .route("/api/contact", post(submit_contact))
        .route_layer(middleware::from_fn_with_state(
            state.authenticator.clone(),
            optional_auth,
        ));

    let authenticated_routes = Router::new()
        .route(
            "/api/discoveries",
            get(list_discoveries).post(create_discovery),
        )
        .route(
            "/api/discoveries/:discovery_id",
            get(get_discovery)
                .put(update_discovery)
                .delete(delete_discovery),
        )
        .route_layer(middleware::from_fn_with_state(
            state.authenticator.clone(),
            require_auth,
        ));

    // layering order: require_auth runs first and attaches the principal the
    // role guard checks
    let admin_routes = Router::new()
        .route("/api/auth/promote/:user_id", put(promote_user))
        .route("/api/admin/discoveries", get(list_all_discoveries))
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:user_id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/api/users/:user_id/role", patch(set_user_role))
        .route("/api/users/:user_id/active", patch(set_user_active))
        .route_layer(middleware::from_fn(require_role(&[Role::Admin])))
        .route_layer(middleware::from_fn_with_state(
            state.authenticator.clone(),
            require_auth,
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
        .merge(contact_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
