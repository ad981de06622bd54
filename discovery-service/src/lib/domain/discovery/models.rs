use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::discovery::errors::ContentError;
use crate::discovery::errors::DiscoveryIdError;
use crate::discovery::errors::DiscoveryStatusError;
use crate::discovery::errors::ImageUrlError;
use crate::discovery::errors::SlugError;
use crate::discovery::errors::TitleError;
use crate::user::models::EmailAddress;
use crate::user::models::UserId;
use crate::user::models::Username;

/// Discovery aggregate entity.
///
/// A user-authored post; `author_id` is the ownership reference the
/// authorization policy compares against the requesting principal.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub id: DiscoveryId,
    pub author_id: UserId,
    pub title: Title,
    pub slug: Slug,
    pub excerpt: Option<String>,
    pub content_md: Content,
    pub status: DiscoveryStatus,
    pub image_url: Option<ImageUrl>,
    /// Stamped the first time the status becomes `Published`, never
    /// overwritten afterwards.
    pub published_at: Option<DateTime<Utc>>,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Discovery together with a summary of its author, for detail responses.
///
/// The author is `None` when the account no longer exists.
#[derive(Debug, Clone)]
pub struct DiscoveryWithAuthor {
    pub discovery: Discovery,
    pub author: Option<AuthorSummary>,
}

/// The subset of author data exposed on a discovery detail response.
#[derive(Debug, Clone)]
pub struct AuthorSummary {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
}

/// Discovery unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscoveryId(pub Uuid);

impl DiscoveryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a discovery ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, DiscoveryIdError> {
        Uuid::parse_str(s)
            .map(DiscoveryId)
            .map_err(|e| DiscoveryIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for DiscoveryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DiscoveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Title value type, 3-200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 200;

    /// Create a new valid title.
    ///
    /// # Errors
    /// * `TooShort` / `TooLong` - length out of range
    pub fn new(title: String) -> Result<Self, TitleError> {
        let length = title.chars().count();
        if length < Self::MIN_LENGTH {
            Err(TitleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(TitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// URL-safe identifier derived from the title, unique per discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug(String);

impl Slug {
    const MAX_LENGTH: usize = 220;

    /// Validate a stored slug (lowercase alphanumeric and hyphens).
    ///
    /// # Errors
    /// * `Invalid` - empty, too long, or containing foreign characters
    pub fn new(slug: String) -> Result<Self, SlugError> {
        if slug.is_empty() || slug.len() > Self::MAX_LENGTH {
            return Err(SlugError::Invalid(format!(
                "length must be 1-{} characters",
                Self::MAX_LENGTH
            )));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugError::Invalid(
                "only lowercase alphanumeric and hyphen allowed".to_string(),
            ));
        }
        Ok(Self(slug))
    }

    /// Derive a slug from a title, suffixed with a fragment of the
    /// discovery id so that identical titles never collide.
    pub fn for_title(title: &Title, id: &DiscoveryId) -> Self {
        let mut base = String::new();
        let mut last_was_hyphen = true;

        for c in title.as_str().chars() {
            if c.is_ascii_alphanumeric() {
                base.extend(c.to_lowercase());
                last_was_hyphen = false;
            } else if !last_was_hyphen {
                base.push('-');
                last_was_hyphen = true;
            }
        }
        let base = base.trim_end_matches('-');

        let id_hex = id.0.simple().to_string();
        let suffix = &id_hex[..8];
        let max_base = Self::MAX_LENGTH - suffix.len() - 1;
        let base = if base.is_empty() {
            "discovery"
        } else {
            &base[..base.len().min(max_base)]
        };

        Self(format!("{}-{}", base.trim_end_matches('-'), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Markdown body, at least 10 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content(String);

impl Content {
    const MIN_LENGTH: usize = 10;

    /// Create new valid content.
    ///
    /// # Errors
    /// * `TooShort` - fewer than 10 characters
    pub fn new(content: String) -> Result<Self, ContentError> {
        let length = content.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(ContentError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional illustration URL; http(s) only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Create a new validated image URL.
    ///
    /// # Errors
    /// * `InvalidFormat` - not an absolute http(s) URL
    pub fn new(url: String) -> Result<Self, ImageUrlError> {
        let valid_scheme = url.starts_with("http://") || url.starts_with("https://");
        if !valid_scheme || url.chars().any(char::is_whitespace) {
            return Err(ImageUrlError::InvalidFormat(
                "must be an absolute http(s) URL".to_string(),
            ));
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Publication lifecycle of a discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryStatus {
    Draft,
    Published,
    Archived,
}

impl DiscoveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryStatus::Draft => "draft",
            DiscoveryStatus::Published => "published",
            DiscoveryStatus::Archived => "archived",
        }
    }
}

impl FromStr for DiscoveryStatus {
    type Err = DiscoveryStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DiscoveryStatus::Draft),
            "published" => Ok(DiscoveryStatus::Published),
            "archived" => Ok(DiscoveryStatus::Archived),
            other => Err(DiscoveryStatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for DiscoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to create a new discovery with domain types.
///
/// The author is never part of the command; it is always the requesting
/// principal.
#[derive(Debug)]
pub struct CreateDiscoveryCommand {
    pub title: Title,
    pub excerpt: Option<String>,
    pub content_md: Content,
    pub status: DiscoveryStatus,
    pub image_url: Option<ImageUrl>,
}

/// Command to update an existing discovery with optional validated fields.
///
/// `image_url` distinguishes "leave untouched" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Default)]
pub struct UpdateDiscoveryCommand {
    pub title: Option<Title>,
    pub excerpt: Option<String>,
    pub content_md: Option<Content>,
    pub status: Option<DiscoveryStatus>,
    pub image_url: Option<Option<ImageUrl>>,
}
