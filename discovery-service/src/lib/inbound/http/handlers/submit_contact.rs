use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::contact::errors::ContactError;
use crate::contact::models::SubmitContactCommand;
use crate::contact::ports::ContactServicePort;
use crate::inbound::http::middleware::MaybePrincipal;
use crate::inbound::http::router::AppState;

pub async fn submit_contact(
    State(state): State<AppState>,
    Extension(MaybePrincipal(principal)): Extension<MaybePrincipal>,
    Json(body): Json<SubmitContactRequest>,
) -> Result<ApiSuccess<SubmitContactResponseData>, ApiError> {
    let command = SubmitContactCommand::new(
        body.name,
        body.email,
        body.subject,
        body.message,
        body.source,
    )
    .map_err(ContactError::from)?;

    state
        .contact_service
        .submit(principal.as_ref(), command)
        .await
        .map_err(ApiError::from)
        .map(|message| {
            ApiSuccess::new(
                StatusCode::CREATED,
                SubmitContactResponseData {
                    id: message.id.to_string(),
                    status: "ok".to_string(),
                },
            )
        })
}

/// HTTP request body for a contact submission (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitContactRequest {
    name: String,
    email: String,
    subject: Option<String>,
    message: String,
    source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitContactResponseData {
    pub id: String,
    pub status: String,
}
