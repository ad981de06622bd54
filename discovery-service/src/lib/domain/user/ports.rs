use async_trait::async_trait;

use auth::Principal;
use auth::Role;

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
use crate::user::models::Username;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account with the fixed `user` role and issue a token.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - uniqueness violation
    /// * `Auth` - password hashing or token signing failed
    /// * `DatabaseError` - storage operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<UserSession, UserError>;

    /// Verify credentials by email and issue a token.
    ///
    /// An unknown email and a wrong password both produce
    /// `Auth(InvalidCredentials)`; callers must not be able to tell which
    /// case occurred.
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<UserSession, UserError>;

    /// Administrative listing with filters and pagination.
    async fn list_users(&self, filter: UserListFilter) -> Result<UserPage, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Administrative creation with an assignable role.
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Update existing user with optional fields.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - uniqueness violation
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Delete a user. The acting admin may not delete their own account.
    ///
    /// # Errors
    /// * `OwnAccount` - `id` is the actor's own account
    /// * `NotFound` - User does not exist
    async fn delete_user(&self, actor: &Principal, id: &UserId) -> Result<(), UserError>;

    /// Set a user's role. The acting admin may not demote themselves.
    async fn set_role(&self, actor: &Principal, id: &UserId, role: Role)
        -> Result<User, UserError>;

    /// Enable or disable an account.
    async fn set_active(&self, id: &UserId, is_active: bool) -> Result<User, UserError>;

    /// Grant the `admin` role to an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn promote_to_admin(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for the user aggregate.
///
/// Storage enforces uniqueness on username and email and reports violations
/// as the distinct `UsernameAlreadyExists` / `EmailAlreadyExists` errors.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user together with its password hash.
    async fn create(&self, user: User, password_hash: String) -> Result<User, UserError>;

    /// Retrieve user by identifier (None if not found).
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username (None if not found).
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address (None if not found).
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address including the stored password hash.
    ///
    /// This is the only retrieval that exposes the hash; it exists for the
    /// login path and must not be used anywhere else.
    async fn find_by_email_with_secret(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserError>;

    /// Retrieve one page of users matching `filter`, plus the total count.
    async fn list(&self, filter: &UserListFilter) -> Result<(Vec<User>, u64), UserError>;

    /// Update an existing user's non-secret fields.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - uniqueness violation
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Replace a user's password hash.
    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: String,
    ) -> Result<(), UserError>;

    /// Remove a user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
