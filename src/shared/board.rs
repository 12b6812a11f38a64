//! Board Types
//!
//! Entities and request/response bodies for the post, user and reple APIs.
//! Field names follow the camelCase the web client sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{limit_text, require_text, SharedError};

/// Longest accepted post title, in characters
pub const MAX_TITLE_LENGTH: usize = 200;
/// Longest accepted post body, in characters
pub const MAX_CONTENT_LENGTH: usize = 20_000;
/// Longest accepted reple body, in characters
pub const MAX_REPLE_LENGTH: usize = 2_000;
/// Longest accepted display name, in characters
pub const MAX_DISPLAY_NAME_LENGTH: usize = 30;
/// Longest accepted image or photo URL, in characters
pub const MAX_URL_LENGTH: usize = 2048;
/// Posts returned per list page
pub const POST_PAGE_SIZE: i64 = 5;

/// A registered user profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity-provider user id
    pub uid: String,
    /// Contact email
    pub email: String,
    /// Unique public name
    pub display_name: String,
    /// Avatar URL
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// The author fields embedded in posts and reples
///
/// `display_name` is `None` when the author's profile no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    /// Identity-provider user id
    pub uid: String,
    /// Public name, if the profile exists
    pub display_name: Option<String>,
    /// Avatar URL, if any
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// A board post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server-assigned, increasing post number
    pub post_num: i64,
    /// Title
    pub title: String,
    /// Body
    pub content: String,
    /// Optional attached image URL
    pub image: Option<String>,
    /// Author
    pub author: AuthorSummary,
    /// Number of reples on this post
    pub reple_num: i64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

/// A reply to a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reple {
    /// Server-assigned id
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Post this reple belongs to
    pub post_num: i64,
    /// Body
    pub reple: String,
    /// Author
    pub author: AuthorSummary,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

/// Post list ordering
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    /// Newest first
    #[default]
    New,
    /// Most reples first, then newest
    Best,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `POST /api/user/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("uid", &self.uid, 128)?;
        require_text("email", &self.email, 320)?;
        if !self.email.contains('@') {
            return Err(SharedError::validation("email", "must contain '@'"));
        }
        require_text("displayName", &self.display_name, MAX_DISPLAY_NAME_LENGTH)?;
        if let Some(url) = &self.photo_url {
            limit_text("photoURL", url, MAX_URL_LENGTH)?;
        }
        Ok(())
    }
}

/// `POST /api/user/namecheck`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameCheckRequest {
    pub display_name: String,
}

/// `POST /api/user/profile/img`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageRequest {
    pub uid: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

impl ProfileImageRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("uid", &self.uid, 128)?;
        require_text("photoURL", &self.photo_url, MAX_URL_LENGTH)
    }
}

/// `POST /api/post/submit`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    pub uid: String,
}

impl SubmitPostRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("title", &self.title, MAX_TITLE_LENGTH)?;
        require_text("content", &self.content, MAX_CONTENT_LENGTH)?;
        if let Some(image) = &self.image {
            limit_text("image", image, MAX_URL_LENGTH)?;
        }
        require_text("uid", &self.uid, 128)
    }
}

/// `POST /api/post/list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsRequest {
    #[serde(default)]
    pub sort: PostSort,
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub skip: i64,
}

/// `POST /api/post/detail`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostNumRequest {
    pub post_num: i64,
}

/// `POST /api/post/edit`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPostRequest {
    pub post_num: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    pub uid: String,
}

impl EditPostRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("title", &self.title, MAX_TITLE_LENGTH)?;
        require_text("content", &self.content, MAX_CONTENT_LENGTH)?;
        if let Some(image) = &self.image {
            limit_text("image", image, MAX_URL_LENGTH)?;
        }
        require_text("uid", &self.uid, 128)
    }
}

/// `POST /api/post/delete`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostRequest {
    pub post_num: i64,
    pub uid: String,
}

/// `POST /api/reple/submit`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRepleRequest {
    pub post_num: i64,
    pub reple: String,
    pub uid: String,
}

impl SubmitRepleRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("reple", &self.reple, MAX_REPLE_LENGTH)?;
        require_text("uid", &self.uid, 128)
    }
}

/// `POST /api/reple/edit`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRepleRequest {
    pub reple_id: Uuid,
    pub reple: String,
    pub uid: String,
}

impl EditRepleRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("reple", &self.reple, MAX_REPLE_LENGTH)?;
        require_text("uid", &self.uid, 128)
    }
}

/// `POST /api/reple/delete`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRepleRequest {
    pub reple_id: Uuid,
    pub uid: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Bare acknowledgement for mutations that return nothing else
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPostResponse {
    pub success: bool,
    pub post_num: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub success: bool,
    pub post_list: Vec<Post>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostDetailResponse {
    pub success: bool,
    pub post: Post,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NameCheckResponse {
    pub success: bool,
    /// `true` when nobody has taken the name yet
    pub check: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepleListResponse {
    pub success: bool,
    pub reple_list: Vec<Reple>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepleResponse {
    pub success: bool,
    pub reple: Reple,
}
