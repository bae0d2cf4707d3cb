//! Comment domain model.

use super::thesis::ThesisId;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub type CommentId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub thesis_id: ThesisId,
    /// `None` once the author has withdrawn.
    pub username: Option<String>,
    pub content: String,
    #[serde(skip_serializing)]
    pub is_suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub thesis_id: ThesisId,
    pub username: String,
    pub content: String,
}
