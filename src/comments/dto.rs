use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::params::de_opt_id;

/// Body for creating or editing a comment.
#[derive(Debug, Default, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "userId", default, deserialize_with = "de_opt_id")]
    pub user_id: Option<i64>,
}

/// Body for deleting a comment.
#[derive(Debug, Default, Deserialize)]
pub struct CommentAuthor {
    #[serde(rename = "userId", default, deserialize_with = "de_opt_id")]
    pub user_id: Option<i64>,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentView {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedCommentResponse {
    pub message: &'static str,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
