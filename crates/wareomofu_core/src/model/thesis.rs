//! Thesis and favorite domain model.
//!
//! # Invariants
//! - `theme_id` is fixed at creation.
//! - At most one thesis per `(theme_id, username)` while the author is known.
//! - A user favorites a given thesis at most once.

use super::theme::ThemeId;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub type ThesisId = i64;
pub type FavoriteId = i64;

/// User essay submitted against a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thesis {
    pub id: ThesisId,
    pub theme_id: ThemeId,
    /// `None` once the author has withdrawn.
    pub username: Option<String>,
    pub content: String,
    pub works_cited: String,
    #[serde(skip_serializing)]
    pub is_suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThesis {
    pub theme_id: ThemeId,
    pub username: String,
    pub content: String,
    pub works_cited: String,
}

/// Bookmark of one thesis by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteThesis {
    pub id: FavoriteId,
    pub thesis_id: ThesisId,
    pub username: String,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

/// Thesis read model annotated with its favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThesisWithFavorites {
    #[serde(flatten)]
    pub thesis: Thesis,
    pub favorites: Vec<FavoriteThesis>,
}

#[cfg(test)]
mod tests {
    use super::{FavoriteThesis, Thesis, ThesisWithFavorites};
    use chrono::{TimeZone, Utc};

    #[test]
    fn serialized_thesis_omits_moderation_flag() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let item = ThesisWithFavorites {
            thesis: Thesis {
                id: 7,
                theme_id: 2,
                username: None,
                content: "body".to_string(),
                works_cited: String::new(),
                is_suspended: false,
                created_at,
                updated_at: None,
            },
            favorites: vec![FavoriteThesis {
                id: 1,
                thesis_id: 7,
                username: "dave".to_string(),
                created_at,
            }],
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 7);
        assert!(json["username"].is_null());
        assert!(json.get("is_suspended").is_none());
        assert_eq!(json["favorites"][0]["username"], "dave");
        assert!(json["favorites"][0].get("created_at").is_none());
    }
}
