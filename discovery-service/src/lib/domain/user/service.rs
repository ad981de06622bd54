use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthError;
use auth::Authenticator;
use auth::Principal;
use auth::Role;
use chrono::Utc;

use crate::user::errors::UserError;
use crate::user::models::CreateUserCommand;
use crate::user::models::EmailAddress;
use crate::user::models::RegisterUserCommand;
use crate::user::models::UpdateUserCommand;
use crate::user::models::User;
use crate::user::models::UserCredentials;
use crate::user::models::UserId;
use crate::user::models::UserListFilter;
use crate::user::models::UserPage;
use crate::user::models::UserSession;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Shared credential/token coordinator
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn issue_session(&self, user: User) -> Result<UserSession, UserError> {
        let token = self
            .authenticator
            .issue_token(&user.id.to_string(), user.role)
            .map_err(|e| UserError::Auth(e.into()))?;

        Ok(UserSession { user, token })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<UserSession, UserError> {
        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| UserError::Auth(e.into()))?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            display_name: command.display_name,
            // self-service registration never grants anything but `user`
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user, password_hash).await?;

        self.issue_session(created_user)
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<UserSession, UserError> {
        let credentials = self.repository.find_by_email_with_secret(email).await?;

        // An unknown email takes the exact same error path as a wrong
        // password below; the response shape must not differ.
        let Some(UserCredentials {
            user,
            password_hash,
        }) = credentials
        else {
            return Err(UserError::Auth(AuthError::InvalidCredentials));
        };

        let issued =
            self.authenticator
                .login(password, &password_hash, &user.id.to_string(), user.role)?;

        Ok(UserSession {
            user,
            token: issued.access_token,
        })
    }

    async fn list_users(&self, filter: UserListFilter) -> Result<UserPage, UserError> {
        let (users, total) = self.repository.list(&filter).await?;

        Ok(UserPage {
            users,
            total,
            page: filter.page,
            page_size: filter.page_size,
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| UserError::Auth(e.into()))?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            display_name: command.display_name,
            role: command.role,
            is_active: true,
            created_at: Utc::now(),
        };

        self.repository.create(user, password_hash).await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_username) = command.username {
            user.username = new_username;
        }

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        if let Some(new_display_name) = command.display_name {
            user.display_name = Some(new_display_name);
        }

        if let Some(new_role) = command.role {
            user.role = new_role;
        }

        if let Some(active) = command.is_active {
            user.is_active = active;
        }

        let updated_user = self.repository.update(user).await?;

        if let Some(new_password) = command.password {
            let password_hash = self
                .authenticator
                .hash_password(&new_password)
                .map_err(|e| UserError::Auth(e.into()))?;
            self.repository
                .update_password_hash(id, password_hash)
                .await?;
        }

        Ok(updated_user)
    }

    async fn delete_user(&self, actor: &Principal, id: &UserId) -> Result<(), UserError> {
        if actor.subject_id == id.to_string() {
            return Err(UserError::OwnAccount(
                "Cannot delete your own account".to_string(),
            ));
        }

        self.repository.delete(id).await
    }

    async fn set_role(
        &self,
        actor: &Principal,
        id: &UserId,
        role: Role,
    ) -> Result<User, UserError> {
        if actor.subject_id == id.to_string() && role == Role::User {
            return Err(UserError::OwnAccount(
                "Cannot demote your own account".to_string(),
            ));
        }

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        user.role = role;
        self.repository.update(user).await
    }

    async fn set_active(&self, id: &UserId, is_active: bool) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        user.is_active = is_active;
        self.repository.update(user).await
    }

    async fn promote_to_admin(&self, id: &UserId) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        user.role = Role::Admin;
        self.repository.update(user).await
    }
}
