use auth::Role;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::inbound::http::router::AppState;
use crate::user::models::UserListFilter;
use crate::user::ports::UserServicePort;

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiSuccess<ListUsersResponseData>, ApiError> {
    let role = query
        .role
        .map(|role| role.parse::<Role>())
        .transpose()
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    let filter = UserListFilter::new(query.q, role, query.active, query.page, query.page_size);

    state
        .user_service
        .list_users(filter)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            let data = ListUsersResponseData {
                data: page.users.iter().map(UserResponseData::from).collect(),
                pagination: PaginationData {
                    page: page.page,
                    page_size: page.page_size,
                    total: page.total,
                    total_pages: page.total_pages(),
                },
            };
            ApiSuccess::new(StatusCode::OK, data)
        })
}

/// Query string for the administrative user listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListUsersQuery {
    pub q: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListUsersResponseData {
    pub data: Vec<UserResponseData>,
    pub pagination: PaginationData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationData {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}
