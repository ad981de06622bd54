use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use auth::policy;
use auth::AuthError;
use auth::Authenticator;
use auth::Principal;
use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;

/// Principal attached by the permissive guard; `None` means the caller is
/// anonymous.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

fn bearer_header(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Mandatory-auth guard.
///
/// Resolves the `Authorization` header into a [`Principal`] and attaches it
/// to the request extensions, from which handlers take it as
/// `Extension<Principal>`. A missing or invalid token short-circuits with
/// 401 before the handler runs.
pub async fn require_auth(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let principal = authenticator
        .resolve_bearer(bearer_header(&req))
        .map_err(|e| {
            tracing::warn!("Bearer resolution failed: {}", e);
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Optional-auth guard.
///
/// Always continues; an absent or invalid token simply leaves the caller
/// anonymous.
pub async fn optional_auth(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    let principal = authenticator.resolve_bearer_optional(bearer_header(&req));
    req.extensions_mut().insert(MaybePrincipal(principal));

    next.run(req).await
}

/// Role guard, layered after [`require_auth`].
///
/// A missing principal extension means the guard ran without a prior
/// mandatory-auth step; that fails closed as 401, which is a different
/// rejection than the 403 a role mismatch produces.
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, Response>> + Send>>
       + Clone
       + Send
       + Sync
       + 'static {
    move |req: Request, next: Next| {
        Box::pin(async move {
            match req.extensions().get::<Principal>() {
                None => {
                    tracing::error!("Role guard reached without an authenticated principal");
                    return Err(ApiError::from(AuthError::Unauthenticated).into_response());
                }
                Some(principal) => {
                    if !policy::require_role(principal, allowed) {
                        return Err(ApiError::from(AuthError::Forbidden).into_response());
                    }
                }
            }

            Ok(next.run(req).await)
        })
    }
}
