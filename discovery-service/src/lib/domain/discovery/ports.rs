use async_trait::async_trait;

use auth::Principal;

use crate::discovery::errors::DiscoveryError;
use crate::discovery::models::CreateDiscoveryCommand;
use crate::discovery::models::Discovery;
use crate::discovery::models::DiscoveryId;
use crate::discovery::models::DiscoveryWithAuthor;
use crate::discovery::models::UpdateDiscoveryCommand;

/// Port for discovery domain service operations.
///
/// Mutating operations take the requesting [`Principal`] because the
/// ownership decision can only happen after the target row is fetched; it is
/// a service-level check, not route middleware, and a missing resource is
/// reported before any ownership evaluation.
#[async_trait]
pub trait DiscoveryServicePort: Send + Sync + 'static {
    /// List published discoveries, newest publication first.
    ///
    /// `limit` is clamped to 1..=50 and defaults to 20.
    async fn list_published(&self, limit: Option<u32>) -> Result<Vec<Discovery>, DiscoveryError>;

    /// Retrieve one discovery together with its author summary.
    ///
    /// # Errors
    /// * `NotFound` - Discovery does not exist
    async fn get_discovery(&self, id: &DiscoveryId) -> Result<DiscoveryWithAuthor, DiscoveryError>;

    /// Create a discovery authored by the requesting principal.
    ///
    /// `published_at` is stamped when the discovery is created already
    /// published.
    async fn create_discovery(
        &self,
        principal: &Principal,
        command: CreateDiscoveryCommand,
    ) -> Result<Discovery, DiscoveryError>;

    /// Partially update a discovery.
    ///
    /// # Errors
    /// * `NotFound` - Discovery does not exist (checked before ownership)
    /// * `Forbidden` - principal is neither the author nor an admin
    async fn update_discovery(
        &self,
        principal: &Principal,
        id: &DiscoveryId,
        command: UpdateDiscoveryCommand,
    ) -> Result<Discovery, DiscoveryError>;

    /// Delete a discovery.
    ///
    /// # Errors
    /// * `NotFound` - Discovery does not exist (checked before ownership)
    /// * `Forbidden` - principal is neither the author nor an admin
    async fn delete_discovery(
        &self,
        principal: &Principal,
        id: &DiscoveryId,
    ) -> Result<(), DiscoveryError>;

    /// Administrative listing of every discovery regardless of status.
    ///
    /// Role enforcement happens at the route layer.
    async fn list_all(&self) -> Result<Vec<Discovery>, DiscoveryError>;
}

/// Persistence operations for the discovery aggregate.
#[async_trait]
pub trait DiscoveryRepository: Send + Sync + 'static {
    /// Persist a new discovery.
    ///
    /// # Errors
    /// * `SlugAlreadyExists` - slug uniqueness violation
    async fn create(&self, discovery: Discovery) -> Result<Discovery, DiscoveryError>;

    /// Retrieve a discovery by identifier (None if not found).
    async fn find_by_id(&self, id: &DiscoveryId) -> Result<Option<Discovery>, DiscoveryError>;

    /// Retrieve up to `limit` published discoveries, newest `published_at`
    /// first.
    async fn list_published(&self, limit: i64) -> Result<Vec<Discovery>, DiscoveryError>;

    /// Retrieve every discovery regardless of status, newest created first.
    async fn list_all(&self) -> Result<Vec<Discovery>, DiscoveryError>;

    /// Update an existing discovery.
    ///
    /// # Errors
    /// * `NotFound` - Discovery does not exist
    async fn update(&self, discovery: Discovery) -> Result<Discovery, DiscoveryError>;

    /// Remove a discovery from storage.
    ///
    /// # Errors
    /// * `NotFound` - Discovery does not exist
    async fn delete(&self, id: &DiscoveryId) -> Result<(), DiscoveryError>;
}
