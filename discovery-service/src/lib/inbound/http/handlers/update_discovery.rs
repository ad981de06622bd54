use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::DiscoveryResponseData;
use crate::discovery::errors::DiscoveryError;
use crate::discovery::models::Content;
use crate::discovery::models::DiscoveryId;
use crate::discovery::models::DiscoveryStatus;
use crate::discovery::models::ImageUrl;
use crate::discovery::models::Title;
use crate::discovery::models::UpdateDiscoveryCommand;
use crate::discovery::ports::DiscoveryServicePort;
use crate::inbound::http::router::AppState;

pub async fn update_discovery(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(discovery_id): Path<String>,
    Json(body): Json<UpdateDiscoveryRequest>,
) -> Result<ApiSuccess<DiscoveryResponseData>, ApiError> {
    let discovery_id = DiscoveryId::from_string(&discovery_id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let command = body.try_into_command()?;

    state
        .discovery_service
        .update_discovery(&principal, &discovery_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref discovery| ApiSuccess::new(StatusCode::OK, discovery.into()))
}

/// HTTP request body for updating a discovery (raw JSON)
///
/// An empty `image_url` string clears the stored URL; omitting the field
/// leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateDiscoveryRequest {
    title: Option<String>,
    excerpt: Option<String>,
    content_md: Option<String>,
    status: Option<String>,
    image_url: Option<String>,
}

impl UpdateDiscoveryRequest {
    fn try_into_command(self) -> Result<UpdateDiscoveryCommand, DiscoveryError> {
        let title = self.title.map(Title::new).transpose()?;
        let content_md = self.content_md.map(Content::new).transpose()?;
        let status = self
            .status
            .map(|status| status.parse::<DiscoveryStatus>())
            .transpose()?;

        let image_url = match self.image_url {
            None => None,
            Some(url) if url.is_empty() => Some(None),
            Some(url) => Some(Some(ImageUrl::new(url)?)),
        };

        Ok(UpdateDiscoveryCommand {
            title,
            excerpt: self.excerpt,
            content_md,
            status,
            image_url,
        })
    }
}
