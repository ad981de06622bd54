use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::DiscoveryResponseData;
use crate::discovery::ports::DiscoveryServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_discoveries(
    State(state): State<AppState>,
    Query(query): Query<ListDiscoveriesQuery>,
) -> Result<ApiSuccess<Vec<DiscoveryResponseData>>, ApiError> {
    state
        .discovery_service
        .list_published(query.limit)
        .await
        .map_err(ApiError::from)
        .map(|discoveries| {
            let data: Vec<DiscoveryResponseData> =
                discoveries.iter().map(|d| d.into()).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListDiscoveriesQuery {
    pub limit: Option<u32>,
}
