//! In-memory repository adapters.
//!
//! Drop-in implementations of the persistence ports backed by process
//! memory. Integration tests spawn the full HTTP stack over these instead
//! of Postgres; they enforce the same uniqueness rules and return the same
//! errors as the SQL adapters.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::contact::errors::ContactError;
use crate::contact::models::ContactMessage;
use crate::contact::ports::ContactRepository;
use crate::discovery::errors::DiscoveryError;
use crate::discovery::models::Discovery;
use crate::discovery::models::DiscoveryId;
use crate::discovery::models::DiscoveryStatus;
use crate::discovery::ports::DiscoveryRepository;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;
use crate::user::models::User;
use crate::user::models::UserCredentials;
use crate::user::models::UserId;
use crate::user::models::UserListFilter;
use crate::user::models::Username;
use crate::user::ports::UserRepository;

#[derive(Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// In-memory user store with email/username uniqueness.
#[derive(Default)]
pub struct InMemoryUserRepository {
    records: RwLock<HashMap<Uuid, StoredUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(filter: &UserListFilter, user: &User) -> bool {
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let display_name = user.display_name.as_deref().unwrap_or("").to_lowercase();
            if !user.email.as_str().contains(&needle)
                && !user.username.as_str().to_lowercase().contains(&needle)
                && !display_name.contains(&needle)
            {
                return false;
            }
        }
        if let Some(role) = filter.role {
            if user.role != role {
                return false;
            }
        }
        if let Some(active) = filter.active {
            if user.is_active != active {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User, password_hash: String) -> Result<User, UserError> {
        let mut records = self.records.write().unwrap();

        for stored in records.values() {
            if stored.user.username == user.username {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
            if stored.user.email == user.email {
                return Err(UserError::EmailAlreadyExists(
                    user.email.as_str().to_string(),
                ));
            }
        }

        records.insert(
            user.id.0,
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let records = self.records.read().unwrap();
        Ok(records.get(&id.0).map(|stored| stored.user.clone()))
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .find(|stored| &stored.user.username == username)
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .find(|stored| &stored.user.email == email)
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_email_with_secret(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserError> {
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .find(|stored| &stored.user.email == email)
            .map(|stored| UserCredentials {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn list(&self, filter: &UserListFilter) -> Result<(Vec<User>, u64), UserError> {
        let records = self.records.read().unwrap();

        let mut users: Vec<User> = records
            .values()
            .map(|stored| stored.user.clone())
            .filter(|user| Self::matches(filter, user))
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = users.len() as u64;
        let page: Vec<User> = users
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.page_size as usize)
            .collect();

        Ok((page, total))
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut records = self.records.write().unwrap();

        for stored in records.values() {
            if stored.user.id != user.id {
                if stored.user.username == user.username {
                    return Err(UserError::UsernameAlreadyExists(
                        user.username.as_str().to_string(),
                    ));
                }
                if stored.user.email == user.email {
                    return Err(UserError::EmailAlreadyExists(
                        user.email.as_str().to_string(),
                    ));
                }
            }
        }

        match records.get_mut(&user.id.0) {
            Some(stored) => {
                stored.user = user.clone();
                Ok(user)
            }
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: String,
    ) -> Result<(), UserError> {
        let mut records = self.records.write().unwrap();
        match records.get_mut(&id.0) {
            Some(stored) => {
                stored.password_hash = password_hash;
                Ok(())
            }
            None => Err(UserError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut records = self.records.write().unwrap();
        records
            .remove(&id.0)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

/// In-memory discovery store with slug uniqueness.
#[derive(Default)]
pub struct InMemoryDiscoveryRepository {
    records: RwLock<HashMap<Uuid, Discovery>>,
}

impl InMemoryDiscoveryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiscoveryRepository for InMemoryDiscoveryRepository {
    async fn create(&self, discovery: Discovery) -> Result<Discovery, DiscoveryError> {
        let mut records = self.records.write().unwrap();

        if records
            .values()
            .any(|stored| stored.slug == discovery.slug)
        {
            return Err(DiscoveryError::SlugAlreadyExists(
                discovery.slug.as_str().to_string(),
            ));
        }

        records.insert(discovery.id.0, discovery.clone());
        Ok(discovery)
    }

    async fn find_by_id(&self, id: &DiscoveryId) -> Result<Option<Discovery>, DiscoveryError> {
        let records = self.records.read().unwrap();
        Ok(records.get(&id.0).cloned())
    }

    async fn list_published(&self, limit: i64) -> Result<Vec<Discovery>, DiscoveryError> {
        let records = self.records.read().unwrap();

        let mut published: Vec<Discovery> = records
            .values()
            .filter(|discovery| discovery.status == DiscoveryStatus::Published)
            .cloned()
            .collect();
        published.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        published.truncate(limit as usize);

        Ok(published)
    }

    async fn list_all(&self) -> Result<Vec<Discovery>, DiscoveryError> {
        let records = self.records.read().unwrap();

        let mut all: Vec<Discovery> = records.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(all)
    }

    async fn update(&self, discovery: Discovery) -> Result<Discovery, DiscoveryError> {
        let mut records = self.records.write().unwrap();
        match records.get_mut(&discovery.id.0) {
            Some(stored) => {
                *stored = discovery.clone();
                Ok(discovery)
            }
            None => Err(DiscoveryError::NotFound(discovery.id.to_string())),
        }
    }

    async fn delete(&self, id: &DiscoveryId) -> Result<(), DiscoveryError> {
        let mut records = self.records.write().unwrap();
        records
            .remove(&id.0)
            .map(|_| ())
            .ok_or(DiscoveryError::NotFound(id.to_string()))
    }
}

/// In-memory contact message store.
#[derive(Default)]
pub struct InMemoryContactRepository {
    records: RwLock<Vec<ContactMessage>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored messages, in insertion order.
    pub fn all(&self) -> Vec<ContactMessage> {
        self.records.read().unwrap().clone()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn create(&self, message: ContactMessage) -> Result<ContactMessage, ContactError> {
        self.records.write().unwrap().push(message.clone());
        Ok(message)
    }
}
