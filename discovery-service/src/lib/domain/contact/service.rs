use std::sync::Arc;

use async_trait::async_trait;
use auth::Principal;
use chrono::Utc;

use crate::contact::errors::ContactError;
use crate::contact::models::ContactMessage;
use crate::contact::models::ContactMessageId;
use crate::contact::models::ContactStatus;
use crate::contact::models::SubmitContactCommand;
use crate::contact::ports::ContactNotifier;
use crate::contact::ports::ContactRepository;
use crate::contact::ports::ContactServicePort;
use crate::user::models::UserId;

const DEFAULT_SOURCE: &str = "contact_form";

/// Domain service implementation for contact intake.
pub struct ContactService<CR>
where
    CR: ContactRepository,
{
    repository: Arc<CR>,
    notifier: Arc<dyn ContactNotifier>,
}

impl<CR> ContactService<CR>
where
    CR: ContactRepository,
{
    pub fn new(repository: Arc<CR>, notifier: Arc<dyn ContactNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }
}

#[async_trait]
impl<CR> ContactServicePort for ContactService<CR>
where
    CR: ContactRepository,
{
    async fn submit(
        &self,
        principal: Option<&Principal>,
        command: SubmitContactCommand,
    ) -> Result<ContactMessage, ContactError> {
        let user_id = principal.and_then(|p| UserId::from_string(&p.subject_id).ok());

        let message = ContactMessage {
            id: ContactMessageId::new(),
            name: command.name,
            email: command.email,
            subject: command.subject,
            message: command.message,
            user_id,
            status: ContactStatus::New,
            source: command.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            created_at: Utc::now(),
        };

        let stored = self.repository.create(message).await?;

        // the stored row is the source of truth; a failed notification is
        // logged, not surfaced
        if let Err(e) = self.notifier.notify(&stored).await {
            tracing::warn!(
                message_id = %stored.id,
                "Failed to send contact notification: {}",
                e
            );
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use auth::Role;
    use mockall::mock;

    use super::*;
    use crate::contact::errors::NotifierError;

    mock! {
        pub TestContactRepository {}

        #[async_trait]
        impl ContactRepository for TestContactRepository {
            async fn create(&self, message: ContactMessage) -> Result<ContactMessage, ContactError>;
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notified: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ContactNotifier for RecordingNotifier {
        async fn notify(&self, message: &ContactMessage) -> Result<(), NotifierError> {
            if self.fail {
                return Err(NotifierError::SendFailed("smtp down".to_string()));
            }
            self.notified.lock().unwrap().push(message.id.to_string());
            Ok(())
        }
    }

    fn command() -> SubmitContactCommand {
        SubmitContactCommand::new(
            "Nova".to_string(),
            "nova@example.com".to_string(),
            None,
            "Is the archive open to the public?".to_string(),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_submission_has_no_user() {
        let mut repository = MockTestContactRepository::new();
        repository
            .expect_create()
            .withf(|message| {
                message.user_id.is_none()
                    && message.status == ContactStatus::New
                    && message.source == DEFAULT_SOURCE
            })
            .times(1)
            .returning(|message| Ok(message));

        let notifier = Arc::new(RecordingNotifier::default());
        let service = ContactService::new(Arc::new(repository), notifier.clone());

        let stored = service.submit(None, command()).await.unwrap();
        assert_eq!(
            notifier.notified.lock().unwrap().as_slice(),
            &[stored.id.to_string()]
        );
    }

    #[tokio::test]
    async fn test_authenticated_submission_records_user() {
        let user_id = UserId::new();
        let subject = user_id.to_string();

        let mut repository = MockTestContactRepository::new();
        repository
            .expect_create()
            .withf(move |message| message.user_id == Some(user_id))
            .times(1)
            .returning(|message| Ok(message));

        let service = ContactService::new(
            Arc::new(repository),
            Arc::new(RecordingNotifier::default()),
        );

        let principal = Principal {
            subject_id: subject,
            role: Role::User,
            issued_at: Utc::now().timestamp(),
        };
        service.submit(Some(&principal), command()).await.unwrap();
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_submission() {
        let mut repository = MockTestContactRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|message| Ok(message));

        let notifier = Arc::new(RecordingNotifier {
            notified: Mutex::new(Vec::new()),
            fail: true,
        });
        let service = ContactService::new(Arc::new(repository), notifier);

        assert!(service.submit(None, command()).await.is_ok());
    }
}
