use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::DiscoveryResponseData;
use crate::discovery::models::AuthorSummary;
use crate::discovery::models::DiscoveryId;
use crate::discovery::models::DiscoveryWithAuthor;
use crate::discovery::ports::DiscoveryServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_discovery(
    State(state): State<AppState>,
    Path(discovery_id): Path<String>,
) -> Result<ApiSuccess<DiscoveryDetailResponseData>, ApiError> {
    let discovery_id = DiscoveryId::from_string(&discovery_id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .discovery_service
        .get_discovery(&discovery_id)
        .await
        .map_err(ApiError::from)
        .map(|ref detail| ApiSuccess::new(StatusCode::OK, detail.into()))
}

/// Discovery detail including an author summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryDetailResponseData {
    #[serde(flatten)]
    pub discovery: DiscoveryResponseData,
    pub author: Option<AuthorResponseData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorResponseData {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&AuthorSummary> for AuthorResponseData {
    fn from(author: &AuthorSummary) -> Self {
        Self {
            id: author.id.to_string(),
            username: author.username.as_str().to_string(),
            email: author.email.as_str().to_string(),
        }
    }
}

impl From<&DiscoveryWithAuthor> for DiscoveryDetailResponseData {
    fn from(detail: &DiscoveryWithAuthor) -> Self {
        Self {
            discovery: (&detail.discovery).into(),
            author: detail.author.as_ref().map(|author| author.into()),
        }
    }
}
