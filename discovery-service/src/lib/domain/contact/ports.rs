use async_trait::async_trait;

use auth::Principal;

use crate::contact::errors::ContactError;
use crate::contact::errors::NotifierError;
use crate::contact::models::ContactMessage;
use crate::contact::models::SubmitContactCommand;

/// Port for contact intake operations.
#[async_trait]
pub trait ContactServicePort: Send + Sync + 'static {
    /// Store a contact submission and notify support.
    ///
    /// Reachable anonymously; when a verified principal is present its
    /// subject id is recorded on the stored message. A notification failure
    /// is logged but never fails the submission.
    async fn submit(
        &self,
        principal: Option<&Principal>,
        command: SubmitContactCommand,
    ) -> Result<ContactMessage, ContactError>;
}

/// Persistence operations for contact messages.
#[async_trait]
pub trait ContactRepository: Send + Sync + 'static {
    async fn create(&self, message: ContactMessage) -> Result<ContactMessage, ContactError>;
}

/// Notification collaborator informed of new contact messages.
///
/// Implementations are replaceable (SMTP in production, a recorder in
/// tests, disabled when unconfigured); the domain only depends on this
/// trait.
#[async_trait]
pub trait ContactNotifier: Send + Sync + 'static {
    async fn notify(&self, message: &ContactMessage) -> Result<(), NotifierError>;
}
