//! Domain model for themes, theses, comments, favorites and reports.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Publish the system-wide length limits shared by validation and storage.
//!
//! # Invariants
//! - Every persisted entity is identified by a store-assigned numeric id.
//! - Themes/theses/comments are hidden by suspension, never hard-deleted.
//! - Owner usernames are nullable: withdrawal clears them, content persists.

use serde::Serialize;

pub mod comment;
pub mod report;
pub mod setting;
pub mod theme;
pub mod thesis;

/// Default cap for free-text columns.
pub const STR_DEFAULT_MAX_LENGTH: usize = 50_000;
/// Theme title cap, in characters.
pub const THEME_TITLE_MAX_LENGTH: usize = 100;
/// Theme description cap, in characters.
pub const THEME_DESCRIPTION_MAX_LENGTH: usize = STR_DEFAULT_MAX_LENGTH;
/// System content-length ceiling for theses; also the default theme `max_length`.
pub const THESIS_CONTENT_MAX_LENGTH: u32 = STR_DEFAULT_MAX_LENGTH as u32;
/// Works-cited cap, in characters.
pub const THESIS_WORKS_CITED_MAX_LENGTH: usize = STR_DEFAULT_MAX_LENGTH;
/// Comment body cap, in characters.
pub const COMMENT_CONTENT_MAX_LENGTH: usize = STR_DEFAULT_MAX_LENGTH;
/// Report detail cap, in characters.
pub const REPORT_DETAIL_MAX_LENGTH: usize = 10_000;

/// Theme limits published to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeConstants {
    pub title_max_length: usize,
    pub description_max_length: usize,
}

/// Thesis limits published to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThesisConstants {
    pub content_max_length: usize,
    pub works_cited_max_length: usize,
}

pub fn theme_constants() -> ThemeConstants {
    ThemeConstants {
        title_max_length: THEME_TITLE_MAX_LENGTH,
        description_max_length: THEME_DESCRIPTION_MAX_LENGTH,
    }
}

pub fn thesis_constants() -> ThesisConstants {
    ThesisConstants {
        content_max_length: THESIS_CONTENT_MAX_LENGTH as usize,
        works_cited_max_length: THESIS_WORKS_CITED_MAX_LENGTH,
    }
}

/// Character count as users perceive it (Unicode scalar values, not bytes).
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}
