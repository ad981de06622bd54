use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::contact::errors::ContactValidationError;
use crate::user::models::EmailAddress;
use crate::user::models::UserId;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 120;
const SUBJECT_MAX: usize = 200;
const MESSAGE_MIN: usize = 10;
const SOURCE_MAX: usize = 50;

/// A message submitted through the public contact endpoint.
///
/// `user_id` is filled in when a valid principal accompanied the
/// submission; anonymous submissions leave it empty.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: EmailAddress,
    pub subject: Option<String>,
    pub message: String,
    pub user_id: Option<UserId>,
    pub status: ContactStatus,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Contact message unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactMessageId(pub Uuid);

impl ContactMessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContactMessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContactMessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Triage state of a contact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Closed,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Closed => "closed",
        }
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ContactStatus::New),
            "read" => Ok(ContactStatus::Read),
            "replied" => Ok(ContactStatus::Replied),
            "closed" => Ok(ContactStatus::Closed),
            other => Err(format!("unknown contact status: {}", other)),
        }
    }
}

/// Validated command for a contact submission.
#[derive(Debug, Clone)]
pub struct SubmitContactCommand {
    pub name: String,
    pub email: EmailAddress,
    pub subject: Option<String>,
    pub message: String,
    pub source: Option<String>,
}

impl SubmitContactCommand {
    /// Validate raw submission fields.
    ///
    /// Empty subject and source strings are treated as absent.
    pub fn new(
        name: String,
        email: String,
        subject: Option<String>,
        message: String,
        source: Option<String>,
    ) -> Result<Self, ContactValidationError> {
        let name_len = name.chars().count();
        if name_len < NAME_MIN || name_len > NAME_MAX {
            return Err(ContactValidationError::InvalidName {
                min: NAME_MIN,
                max: NAME_MAX,
            });
        }

        let email = EmailAddress::new(email)?;

        let subject = subject.filter(|s| !s.is_empty());
        if let Some(subject) = &subject {
            if subject.chars().count() > SUBJECT_MAX {
                return Err(ContactValidationError::SubjectTooLong { max: SUBJECT_MAX });
            }
        }

        if message.chars().count() < MESSAGE_MIN {
            return Err(ContactValidationError::MessageTooShort { min: MESSAGE_MIN });
        }

        let source = source.filter(|s| !s.is_empty());
        if let Some(source) = &source {
            if source.chars().count() > SOURCE_MAX {
                return Err(ContactValidationError::SourceTooLong { max: SOURCE_MAX });
            }
        }

        Ok(Self {
            name,
            email,
            subject,
            message,
            source,
        })
    }
}
