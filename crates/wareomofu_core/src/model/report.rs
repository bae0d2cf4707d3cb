//! Moderation report domain model.
//!
//! # Responsibility
//! - Describe the four report kinds over one shape.
//! - Keep the reported owner denormalized so audits survive target removal.
//!
//! # Invariants
//! - `reporter_username` never equals `target_username` (enforced at write time).
//! - The entity reference may be `None` after the target row is removed; the
//!   report row itself is kept.

use super::comment::CommentId;
use super::theme::ThemeId;
use super::thesis::ThesisId;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub type ReportId = i64;
pub type ReportReasonId = i64;

/// Entry of the fixed report-reason catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportReason {
    pub id: ReportReasonId,
    pub reason: String,
}

/// Kind of content a report (or alert) is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    User,
    Theme,
    Thesis,
    Comment,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Theme => "theme",
            Self::Thesis => "thesis",
            Self::Comment => "comment",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "ユーザー",
            Self::Theme => "テーマ",
            Self::Thesis => "小論文",
            Self::Comment => "コメント",
        }
    }
}

/// Reported entity. Content kinds carry a nullable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    User,
    Theme(Option<ThemeId>),
    Thesis(Option<ThesisId>),
    Comment(Option<CommentId>),
}

impl ReportTarget {
    pub fn kind(self) -> ContentKind {
        match self {
            Self::User => ContentKind::User,
            Self::Theme(_) => ContentKind::Theme,
            Self::Thesis(_) => ContentKind::Thesis,
            Self::Comment(_) => ContentKind::Comment,
        }
    }

    pub fn entity_id(self) -> Option<i64> {
        match self {
            Self::User => None,
            Self::Theme(id) | Self::Thesis(id) | Self::Comment(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: ReportId,
    pub target: ReportTarget,
    pub reporter_username: String,
    /// Owner of the reported entity at report time.
    pub target_username: Option<String>,
    pub reason_id: ReportReasonId,
    pub detail: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub target: ReportTarget,
    pub reporter_username: String,
    pub target_username: Option<String>,
    pub reason_id: ReportReasonId,
    pub detail: String,
}

/// Minimal, non-identifying projection of a report handed to alerting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub id: ReportId,
    pub target: ReportTarget,
    pub created_at: DateTime<Utc>,
}

impl ReportSummary {
    pub fn kind(&self) -> ContentKind {
        self.target.kind()
    }

    /// JSON payload: `{id, <kind>_id, created_at}`; user reports omit the entity key.
    pub fn to_json(&self) -> serde_json::Value {
        let mut payload = serde_json::Map::new();
        payload.insert("id".to_string(), serde_json::Value::from(self.id));
        if self.kind() != ContentKind::User {
            payload.insert(
                format!("{}_id", self.kind().as_str()),
                self.target
                    .entity_id()
                    .map_or(serde_json::Value::Null, serde_json::Value::from),
            );
        }
        payload.insert(
            "created_at".to_string(),
            serde_json::Value::from(self.created_at.to_rfc3339()),
        );
        serde_json::Value::Object(payload)
    }
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            target: report.target,
            created_at: report.created_at,
        }
    }
}
