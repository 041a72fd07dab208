use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Social channels a post can be recorded against. Serialized with the
/// display names the dashboard has always used, so stored collections and
/// exports keep round-tripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "Facebook Page")]
    FacebookPage,
    #[serde(rename = "Facebook Group")]
    FacebookGroup,
    Instagram,
    Threads,
    #[serde(rename = "X (Twitter)")]
    X,
    Pinterest,
    YouTube,
    TikTok,
    #[serde(rename = "Telegram Channel")]
    Telegram,
    #[serde(rename = "WhatsApp Channel")]
    WhatsApp,
    #[serde(rename = "IMO Channel")]
    Imo,
}

impl Platform {
    pub const ALL: [Platform; 11] = [
        Platform::FacebookPage,
        Platform::FacebookGroup,
        Platform::Instagram,
        Platform::Threads,
        Platform::X,
        Platform::Pinterest,
        Platform::YouTube,
        Platform::TikTok,
        Platform::Telegram,
        Platform::WhatsApp,
        Platform::Imo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::FacebookPage => "Facebook Page",
            Platform::FacebookGroup => "Facebook Group",
            Platform::Instagram => "Instagram",
            Platform::Threads => "Threads",
            Platform::X => "X (Twitter)",
            Platform::Pinterest => "Pinterest",
            Platform::YouTube => "YouTube",
            Platform::TikTok => "TikTok",
            Platform::Telegram => "Telegram Channel",
            Platform::WhatsApp => "WhatsApp Channel",
            Platform::Imo => "IMO Channel",
        }
    }

    /// Brand color used by link-only fallbacks and the account views.
    pub fn color(&self) -> &'static str {
        match self {
            Platform::FacebookPage | Platform::FacebookGroup => "#1877F2",
            Platform::Instagram => "#E4405F",
            Platform::Threads | Platform::X | Platform::TikTok => "#000000",
            Platform::Pinterest => "#BD081C",
            Platform::YouTube => "#FF0000",
            Platform::Telegram => "#24A1DE",
            Platform::WhatsApp => "#25D366",
            Platform::Imo => "#0056F0",
        }
    }

    /// Channels whose content cannot be embedded inline and must always be
    /// shown as an outbound link.
    pub fn is_strict_link(&self) -> bool {
        matches!(self, Platform::WhatsApp | Platform::Imo | Platform::Telegram)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Embed,
    Screenshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostType {
    Image,
    Reel,
    Video,
    Link,
    Text,
    Gif,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("content is required for embed posts")]
    MissingContent,
    #[error("screenshot and redirect link are required for screenshot posts")]
    MissingScreenshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub platform: Platform,
    pub brand_name: String,
    pub account_name: String,
    pub currency: String,
    pub creator_name: String,
    pub posted_by: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostType>,
    pub media_type: MediaType,
    /// Raw embed code or URL. Non-empty exactly when `media_type` is embed.
    #[serde(default)]
    pub content: String,
    /// Encoded image data. Populated exactly when `media_type` is screenshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_link: Option<String>,
    /// Scheduling date, user-editable, independent of `created_at`.
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Post {
    /// Exactly one content shape must be populated, selected by `media_type`.
    /// The embed resolver assumes this holds for every post it renders.
    pub fn validate_content(&self) -> Result<(), ContentError> {
        validate_media(
            self.media_type,
            &self.content,
            self.screenshot.as_deref(),
            self.redirect_link.as_deref(),
        )
    }
}

pub fn validate_media(
    media_type: MediaType,
    content: &str,
    screenshot: Option<&str>,
    redirect_link: Option<&str>,
) -> Result<(), ContentError> {
    match media_type {
        MediaType::Embed => {
            if content.trim().is_empty() {
                return Err(ContentError::MissingContent);
            }
        }
        MediaType::Screenshot => {
            let has_image = screenshot.is_some_and(|s| !s.is_empty());
            let has_link = redirect_link.is_some_and(|l| !l.trim().is_empty());
            if !has_image || !has_link {
                return Err(ContentError::MissingScreenshot);
            }
        }
    }
    Ok(())
}
