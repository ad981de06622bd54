use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use crate::discovery::models::DiscoveryId;
use crate::discovery::ports::DiscoveryServicePort;
use crate::inbound::http::router::AppState;

pub async fn delete_discovery(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(discovery_id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let discovery_id = DiscoveryId::from_string(&discovery_id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .discovery_service
        .delete_discovery(&principal, &discovery_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
