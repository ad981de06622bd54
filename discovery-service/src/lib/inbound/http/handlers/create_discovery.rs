use auth::Principal;
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
use crate::discovery::models::CreateDiscoveryCommand;
use crate::discovery::models::DiscoveryStatus;
use crate::discovery::models::ImageUrl;
use crate::discovery::models::Title;
use crate::discovery::ports::DiscoveryServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_discovery(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateDiscoveryRequest>,
) -> Result<ApiSuccess<DiscoveryResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .discovery_service
        .create_discovery(&principal, command)
        .await
        .map_err(ApiError::from)
        .map(|ref discovery| ApiSuccess::new(StatusCode::CREATED, discovery.into()))
}

/// HTTP request body for creating a discovery (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateDiscoveryRequest {
    title: String,
    excerpt: Option<String>,
    content_md: String,
    /// Defaults to `draft` when omitted
    status: Option<String>,
    image_url: Option<String>,
}

impl CreateDiscoveryRequest {
    fn try_into_command(self) -> Result<CreateDiscoveryCommand, DiscoveryError> {
        let title = Title::new(self.title)?;
        let content_md = Content::new(self.content_md)?;

        let status = match self.status {
            Some(status) => status.parse::<DiscoveryStatus>()?,
            None => DiscoveryStatus::Draft,
        };

        let image_url = self
            .image_url
            .filter(|url| !url.is_empty())
            .map(ImageUrl::new)
            .transpose()?;

        Ok(CreateDiscoveryCommand {
            title,
            excerpt: self.excerpt.filter(|excerpt| !excerpt.is_empty()),
            content_md,
            status,
            image_url,
        })
    }
}
