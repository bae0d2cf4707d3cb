//! Theme listing filter, sort modes and query construction.
//!
//! # Invariants
//! - Suspended themes are excluded unconditionally.
//! - Thesis counts only include non-suspended theses.
//! - Window exclusions are evaluated against the caller-supplied `now`.

use super::{free_word_clause, id_set_clause, ListQuery, THEME_COLUMNS};
use crate::model::theme::ThemeId;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;

/// Theme ordering. Codes match the public API's `sort_type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeSort {
    #[default]
    Newer,
    Older,
    MostTheses,
    StartEarlier,
    StartLater,
    ExpireEarlier,
    ExpireLater,
}

impl ThemeSort {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Newer),
            1 => Some(Self::Older),
            2 => Some(Self::MostTheses),
            3 => Some(Self::StartEarlier),
            4 => Some(Self::StartLater),
            5 => Some(Self::ExpireEarlier),
            6 => Some(Self::ExpireLater),
            _ => None,
        }
    }
}

/// How a missing start/expire instant compares to real instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullOrder {
    /// Null sorts as earlier than every instant.
    #[default]
    Earliest,
    /// Null sorts as later than every instant.
    Latest,
}

/// Filter specification for theme listings and counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeFilter {
    /// Exact owner match. Empty strings are ignored.
    pub username: Option<String>,
    /// Explicit id set. Empty means no restriction.
    pub theme_ids: Vec<ThemeId>,
    pub exclude_not_yet: bool,
    pub exclude_accepting: bool,
    pub exclude_expired: bool,
    /// Every word must match username, title or description.
    pub free_words: Vec<String>,
    pub sort: ThemeSort,
    pub null_order: NullOrder,
}

const THEME_VISIBLE: &str = "themes.is_suspended = 0";
const THEME_FREE_WORD_COLUMNS: &[&str] = &["themes.username", "themes.title", "themes.description"];

fn theme_source() -> String {
    format!(
        "SELECT {THEME_COLUMNS},
    COUNT(theses.id) AS thesis_count
FROM themes
LEFT JOIN theses
    ON theses.theme_id = themes.id
   AND theses.is_suspended = 0"
    )
}

/// Maps a [`ThemeFilter`] to one listing query.
pub fn build_theme_query(filter: &ThemeFilter, now: DateTime<Utc>) -> ListQuery {
    let mut query = ListQuery::new(theme_source(), THEME_VISIBLE);
    let now_ms = Value::Integer(now.timestamp_millis());

    if let Some(username) = filter.username.as_deref().filter(|value| !value.is_empty()) {
        query.and_where("themes.username = ?", [Value::Text(username.to_string())]);
    }

    if let Some((clause, binds)) = id_set_clause("themes.id", &filter.theme_ids) {
        query.and_where(clause, binds);
    }

    if filter.exclude_not_yet {
        query.and_where(
            "(themes.start_at IS NULL OR themes.start_at < ?)",
            [now_ms.clone()],
        );
    }

    if filter.exclude_accepting {
        query.and_where(
            "((themes.start_at IS NOT NULL AND themes.start_at > ?) \
             OR (themes.expire_at IS NOT NULL AND themes.expire_at < ?))",
            [now_ms.clone(), now_ms.clone()],
        );
    }

    if filter.exclude_expired {
        query.and_where(
            "(themes.expire_at IS NULL OR themes.expire_at > ?)",
            [now_ms],
        );
    }

    for word in &filter.free_words {
        if let Some((clause, binds)) = free_word_clause(THEME_FREE_WORD_COLUMNS, word) {
            query.and_where(clause, binds);
        }
    }

    query.group_by("themes.id");
    apply_theme_sort(&mut query, filter.sort, filter.null_order);
    query
}

/// Single visible theme by id, sharing the listing's source and visibility.
pub fn build_theme_lookup(theme_id: ThemeId) -> ListQuery {
    let mut query = ListQuery::new(theme_source(), THEME_VISIBLE);
    query.and_where("themes.id = ?", [Value::Integer(theme_id)]);
    query.group_by("themes.id");
    query
}

fn apply_theme_sort(query: &mut ListQuery, sort: ThemeSort, null_order: NullOrder) {
    match sort {
        ThemeSort::Newer => {
            query.order_by("themes.created_at DESC");
            query.order_by("themes.id DESC");
        }
        ThemeSort::Older => {
            query.order_by("themes.created_at ASC");
            query.order_by("themes.id ASC");
        }
        ThemeSort::MostTheses => {
            query.order_by("thesis_count DESC");
            query.order_by("themes.id DESC");
        }
        ThemeSort::StartEarlier => order_nullable_instant(query, "themes.start_at", true, null_order),
        ThemeSort::StartLater => order_nullable_instant(query, "themes.start_at", false, null_order),
        ThemeSort::ExpireEarlier => {
            order_nullable_instant(query, "themes.expire_at", true, null_order)
        }
        ThemeSort::ExpireLater => {
            order_nullable_instant(query, "themes.expire_at", false, null_order)
        }
    }
}

/// Null-ness is the leading key; the instant itself is the second key.
fn order_nullable_instant(
    query: &mut ListQuery,
    column: &str,
    ascending: bool,
    null_order: NullOrder,
) {
    let nulls_first = (null_order == NullOrder::Earliest) == ascending;
    let null_direction = if nulls_first { "DESC" } else { "ASC" };
    let direction = if ascending { "ASC" } else { "DESC" };
    query.order_by(format!("({column} IS NULL) {null_direction}"));
    query.order_by(format!("{column} {direction}"));
    query.order_by("themes.id ASC");
}
