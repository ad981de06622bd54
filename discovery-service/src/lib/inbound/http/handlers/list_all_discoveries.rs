use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::DiscoveryResponseData;
use crate::discovery::ports::DiscoveryServicePort;
use crate::inbound::http::router::AppState;

/// Administrative listing: every discovery regardless of status.
pub async fn list_all_discoveries(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<DiscoveryResponseData>>, ApiError> {
    state
        .discovery_service
        .list_all()
        .await
        .map_err(ApiError::from)
        .map(|discoveries| {
            let data: Vec<DiscoveryResponseData> =
                discoveries.iter().map(|d| d.into()).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}
