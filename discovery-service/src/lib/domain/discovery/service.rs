use std::sync::Arc;

use async_trait::async_trait;
use auth::policy;
use auth::Principal;
use auth::Role;
use chrono::Utc;

use crate::discovery::errors::DiscoveryError;
use crate::discovery::models::AuthorSummary;
use crate::discovery::models::CreateDiscoveryCommand;
use crate::discovery::models::Discovery;
use crate::discovery::models::DiscoveryId;
use crate::discovery::models::DiscoveryStatus;
use crate::discovery::models::DiscoveryWithAuthor;
use crate::discovery::models::Slug;
use crate::discovery::models::UpdateDiscoveryCommand;
use crate::discovery::ports::DiscoveryRepository;
use crate::discovery::ports::DiscoveryServicePort;
use crate::user::models::UserId;
use crate::user::ports::UserRepository;

const DEFAULT_LIST_LIMIT: u32 = 20;
const MAX_LIST_LIMIT: u32 = 50;

/// Roles allowed to act on discoveries they do not own.
const PRIVILEGED_ROLES: &[Role] = &[Role::Admin];

/// Domain service implementation for discovery operations.
///
/// Holds the user repository as well, to resolve author summaries on detail
/// reads.
pub struct DiscoveryService<DR, UR>
where
    DR: DiscoveryRepository,
    UR: UserRepository,
{
    repository: Arc<DR>,
    user_repository: Arc<UR>,
}

impl<DR, UR> DiscoveryService<DR, UR>
where
    DR: DiscoveryRepository,
    UR: UserRepository,
{
    pub fn new(repository: Arc<DR>, user_repository: Arc<UR>) -> Self {
        Self {
            repository,
            user_repository,
        }
    }

    /// Fetch the target row, then evaluate ownership.
    ///
    /// The order matters: a missing resource is `NotFound` even for callers
    /// who would not have been allowed to touch it, so the 403 never leaks
    /// resource existence and the 404 never depends on the caller.
    async fn fetch_owned(
        &self,
        principal: &Principal,
        id: &DiscoveryId,
    ) -> Result<Discovery, DiscoveryError> {
        let discovery = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(DiscoveryError::NotFound(id.to_string()))?;

        if !policy::require_owner_or_role(
            principal,
            &discovery.author_id.to_string(),
            PRIVILEGED_ROLES,
        ) {
            return Err(DiscoveryError::Forbidden);
        }

        Ok(discovery)
    }
}

#[async_trait]
impl<DR, UR> DiscoveryServicePort for DiscoveryService<DR, UR>
where
    DR: DiscoveryRepository,
    UR: UserRepository,
{
    async fn list_published(&self, limit: Option<u32>) -> Result<Vec<Discovery>, DiscoveryError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        self.repository.list_published(i64::from(limit)).await
    }

    async fn get_discovery(&self, id: &DiscoveryId) -> Result<DiscoveryWithAuthor, DiscoveryError> {
        let discovery = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(DiscoveryError::NotFound(id.to_string()))?;

        let author = self
            .user_repository
            .find_by_id(&discovery.author_id)
            .await
            .map_err(|e| DiscoveryError::DatabaseError(e.to_string()))?
            .map(|user| AuthorSummary {
                id: user.id,
                username: user.username,
                email: user.email,
            });

        Ok(DiscoveryWithAuthor { discovery, author })
    }

    async fn create_discovery(
        &self,
        principal: &Principal,
        command: CreateDiscoveryCommand,
    ) -> Result<Discovery, DiscoveryError> {
        // the author is always the verified caller, never client input
        let author_id = UserId::from_string(&principal.subject_id)?;

        let id = DiscoveryId::new();
        let now = Utc::now();
        let published_at =
            (command.status == DiscoveryStatus::Published).then_some(now);

        let discovery = Discovery {
            id,
            author_id,
            slug: Slug::for_title(&command.title, &id),
            title: command.title,
            excerpt: command.excerpt,
            content_md: command.content_md,
            status: command.status,
            image_url: command.image_url,
            published_at,
            like_count: 0,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(discovery).await
    }

    async fn update_discovery(
        &self,
        principal: &Principal,
        id: &DiscoveryId,
        command: UpdateDiscoveryCommand,
    ) -> Result<Discovery, DiscoveryError> {
        let mut discovery = self.fetch_owned(principal, id).await?;

        if let Some(title) = command.title {
            discovery.title = title;
        }

        if let Some(excerpt) = command.excerpt {
            discovery.excerpt = Some(excerpt);
        }

        if let Some(content_md) = command.content_md {
            discovery.content_md = content_md;
        }

        if let Some(image_url) = command.image_url {
            discovery.image_url = image_url;
        }

        if let Some(status) = command.status {
            discovery.status = status;
            // first publication stamps the timestamp; later transitions keep it
            if status == DiscoveryStatus::Published && discovery.published_at.is_none() {
                discovery.published_at = Some(Utc::now());
            }
        }

        discovery.updated_at = Utc::now();

        self.repository.update(discovery).await
    }

    async fn delete_discovery(
        &self,
        principal: &Principal,
        id: &DiscoveryId,
    ) -> Result<(), DiscoveryError> {
        self.fetch_owned(principal, id).await?;
        self.repository.delete(id).await
    }

    async fn list_all(&self) -> Result<Vec<Discovery>, DiscoveryError> {
        self.repository.list_all().await
    }
}
