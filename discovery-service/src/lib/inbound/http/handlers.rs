use auth::AuthError;
use auth::TokenError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::contact::errors::ContactError;
use crate::discovery::errors::DiscoveryError;
use crate::discovery::models::Discovery;
use crate::user::errors::UserError;
use crate::user::models::User;

pub mod create_discovery;
pub mod create_user;
pub mod delete_discovery;
pub mod delete_user;
pub mod get_discovery;
pub mod get_user;
pub mod list_all_discoveries;
pub mod list_discoveries;
pub mod list_users;
pub mod login;
pub mod promote_user;
pub mod register;
pub mod set_user_active;
pub mod set_user_role;
pub mod submit_contact;
pub mod update_discovery;
pub mod update_user;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // one credential rejection for every cause: no enumeration signal
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            // missing and invalid tokens collapse to one external signal
            AuthError::NoToken | AuthError::InvalidToken => {
                ApiError::Unauthorized("Invalid or missing token".to_string())
            }
            AuthError::Unauthenticated => {
                ApiError::Unauthorized("Authentication required".to_string())
            }
            AuthError::Forbidden => ApiError::Forbidden("Insufficient permissions".to_string()),
            AuthError::Token(TokenError::Invalid) => {
                ApiError::Unauthorized("Invalid or missing token".to_string())
            }
            AuthError::Token(e) => ApiError::InternalServerError(e.to_string()),
            AuthError::Password(e) => ApiError::InternalServerError(e.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::OwnAccount(_) => ApiError::BadRequest(err.to_string()),
            UserError::Auth(e) => ApiError::from(e),
            UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidRole(_)
            | UserError::InvalidUserId(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<DiscoveryError> for ApiError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DiscoveryError::SlugAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            // the denial never names the owner
            DiscoveryError::Forbidden => {
                ApiError::Forbidden("Insufficient permissions".to_string())
            }
            DiscoveryError::InvalidId(_)
            | DiscoveryError::InvalidTitle(_)
            | DiscoveryError::InvalidContent(_)
            | DiscoveryError::InvalidSlug(_)
            | DiscoveryError::InvalidImageUrl(_)
            | DiscoveryError::InvalidStatus(_) => ApiError::UnprocessableEntity(err.to_string()),
            DiscoveryError::InvalidAuthor(_) | DiscoveryError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Validation(_) => ApiError::UnprocessableEntity(err.to_string()),
            ContactError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// User fields exposed over HTTP. The password hash never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            display_name: user.display_name.clone(),
            role: user.role.as_str().to_string(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Login/registration response: the issued token plus a user summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub token: String,
    pub user: UserResponseData,
}

impl From<&crate::user::models::UserSession> for SessionResponseData {
    fn from(session: &crate::user::models::UserSession) -> Self {
        Self {
            token: session.token.clone(),
            user: (&session.user).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryResponseData {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content_md: String,
    pub status: String,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Discovery> for DiscoveryResponseData {
    fn from(discovery: &Discovery) -> Self {
        Self {
            id: discovery.id.to_string(),
            author_id: discovery.author_id.to_string(),
            title: discovery.title.as_str().to_string(),
            slug: discovery.slug.as_str().to_string(),
            excerpt: discovery.excerpt.clone(),
            content_md: discovery.content_md.as_str().to_string(),
            status: discovery.status.as_str().to_string(),
            image_url: discovery
                .image_url
                .as_ref()
                .map(|url| url.as_str().to_string()),
            published_at: discovery.published_at,
            like_count: discovery.like_count,
            created_at: discovery.created_at,
            updated_at: discovery.updated_at,
        }
    }
}
