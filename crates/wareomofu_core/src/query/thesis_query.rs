//! Thesis, favorite and comment listing queries.
//!
//! # Invariants
//! - Theses are visible only when neither they nor their theme is suspended.
//! - Favorite counts and favorite listings only see visible theses.
//! - Comment listings keep insertion order.

use super::{free_word_clause, ListQuery, COMMENT_COLUMNS, THESIS_COLUMNS};
use crate::model::theme::ThemeId;
use crate::model::thesis::ThesisId;
use crate::model::comment::CommentId;
use rusqlite::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThesisSort {
    Newer,
    Older,
    MostFavorited,
}

impl ThesisSort {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Newer),
            1 => Some(Self::Older),
            2 => Some(Self::MostFavorited),
            _ => None,
        }
    }
}

/// Filter specification for thesis listings and counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThesisFilter {
    pub username: Option<String>,
    pub theme_id: Option<ThemeId>,
    /// Every word must match username, content or works-cited.
    pub free_words: Vec<String>,
    /// `None` keeps insertion order.
    pub sort: Option<ThesisSort>,
}

const THESIS_VISIBLE: &str = "theses.is_suspended = 0";
const COMMENT_VISIBLE: &str = "comments.is_suspended = 0";
const THESIS_FREE_WORD_COLUMNS: &[&str] =
    &["theses.username", "theses.content", "theses.works_cited"];

fn thesis_source() -> String {
    format!(
        "SELECT {THESIS_COLUMNS},
    COUNT(favorite_theses.id) AS favorite_count
FROM theses
INNER JOIN themes
    ON themes.id = theses.theme_id
   AND themes.is_suspended = 0
LEFT JOIN favorite_theses
    ON favorite_theses.thesis_id = theses.id"
    )
}

pub fn build_thesis_query(filter: &ThesisFilter) -> ListQuery {
    let mut query = ListQuery::new(thesis_source(), THESIS_VISIBLE);

    if let Some(username) = filter.username.as_deref().filter(|value| !value.is_empty()) {
        query.and_where("theses.username = ?", [Value::Text(username.to_string())]);
    }

    if let Some(theme_id) = filter.theme_id {
        query.and_where("theses.theme_id = ?", [Value::Integer(theme_id)]);
    }

    for word in &filter.free_words {
        if let Some((clause, binds)) = free_word_clause(THESIS_FREE_WORD_COLUMNS, word) {
            query.and_where(clause, binds);
        }
    }

    query.group_by("theses.id");
    match filter.sort {
        Some(ThesisSort::Newer) => {
            query.order_by("theses.created_at DESC");
            query.order_by("theses.id DESC");
        }
        Some(ThesisSort::Older) => {
            query.order_by("theses.created_at ASC");
            query.order_by("theses.id ASC");
        }
        Some(ThesisSort::MostFavorited) => {
            query.order_by("favorite_count DESC");
            query.order_by("theses.id DESC");
        }
        None => query.order_by("theses.id ASC"),
    }
    query
}

/// Single visible thesis by id.
pub fn build_thesis_lookup(thesis_id: ThesisId) -> ListQuery {
    let mut query = ListQuery::new(thesis_source(), THESIS_VISIBLE);
    query.and_where("theses.id = ?", [Value::Integer(thesis_id)]);
    query.group_by("theses.id");
    query
}

/// Visible theses of one theme, used to annotate theme read models.
pub fn build_theme_theses_query(theme_id: ThemeId) -> ListQuery {
    let mut query = ListQuery::new(
        format!("SELECT {THESIS_COLUMNS} FROM theses"),
        THESIS_VISIBLE,
    );
    query.and_where("theses.theme_id = ?", [Value::Integer(theme_id)]);
    query.order_by("theses.id ASC");
    query
}

/// Theses favorited by `username`, most recently favorited first.
pub fn build_favorite_query(username: &str) -> ListQuery {
    let mut query = ListQuery::new(
        format!(
            "SELECT {THESIS_COLUMNS}
FROM favorite_theses
INNER JOIN theses
    ON theses.id = favorite_theses.thesis_id
INNER JOIN themes
    ON themes.id = theses.theme_id
   AND themes.is_suspended = 0"
        ),
        THESIS_VISIBLE,
    );
    query.and_where(
        "favorite_theses.username = ?",
        [Value::Text(username.to_string())],
    );
    query.order_by("favorite_theses.created_at DESC");
    query.order_by("favorite_theses.id DESC");
    query
}

/// Visible comments on one thesis in insertion order.
pub fn build_comment_query(thesis_id: ThesisId) -> ListQuery {
    let mut query = ListQuery::new(
        format!("SELECT {COMMENT_COLUMNS} FROM comments"),
        COMMENT_VISIBLE,
    );
    query.and_where("comments.thesis_id = ?", [Value::Integer(thesis_id)]);
    query.order_by("comments.id ASC");
    query
}

/// Single visible comment by id.
pub fn build_comment_lookup(comment_id: CommentId) -> ListQuery {
    let mut query = ListQuery::new(
        format!("SELECT {COMMENT_COLUMNS} FROM comments"),
        COMMENT_VISIBLE,
    );
    query.and_where("comments.id = ?", [Value::Integer(comment_id)]);
    query
}
