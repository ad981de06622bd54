pub mod smtp;

pub use smtp::SmtpContactNotifier;

use async_trait::async_trait;

use crate::contact::errors::NotifierError;
use crate::contact::models::ContactMessage;
use crate::contact::ports::ContactNotifier;

/// Notifier used when no SMTP block is configured.
///
/// Submissions are still persisted; the notification is logged and dropped.
pub struct DisabledContactNotifier;

#[async_trait]
impl ContactNotifier for DisabledContactNotifier {
    async fn notify(&self, message: &ContactMessage) -> Result<(), NotifierError> {
        tracing::debug!(
            message_id = %message.id,
            "Contact notification skipped: SMTP is not configured"
        );
        Ok(())
    }
}
