//! Theme domain model.
//!
//! # Responsibility
//! - Define the debate prompt record and its acceptance window.
//! - Provide window-state helpers shared by validation and tests.
//!
//! # Invariants
//! - `max_length` is never above [`THESIS_CONTENT_MAX_LENGTH`].
//! - `min_length <= max_length`.
//! - Suspended themes are invisible to every read path.

use super::thesis::Thesis;
use super::THESIS_CONTENT_MAX_LENGTH;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ThemeId = i64;

/// Debate prompt that theses are submitted against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: ThemeId,
    /// `None` once the owner has withdrawn.
    pub username: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(rename = "start_datetime")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(rename = "expire_datetime")]
    pub expire_at: Option<DateTime<Utc>>,
    pub min_length: u32,
    pub max_length: u32,
    #[serde(skip_serializing)]
    pub is_suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Where `now` falls relative to a theme's acceptance window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptanceState {
    NotYetOpen,
    Accepting,
    Closed,
}

impl Theme {
    /// Classifies `now` against `[start_at, expire_at]`, both bounds inclusive.
    pub fn acceptance_state(&self, now: DateTime<Utc>) -> AcceptanceState {
        if matches!(self.start_at, Some(start) if start > now) {
            return AcceptanceState::NotYetOpen;
        }
        if matches!(self.expire_at, Some(expire) if expire < now) {
            return AcceptanceState::Closed;
        }
        AcceptanceState::Accepting
    }

    /// Whether content of `len` characters fits `[min_length, max_length]`.
    pub fn accepts_length(&self, len: usize) -> bool {
        len >= self.min_length as usize && len <= self.max_length as usize
    }

    /// Rejects persisted state that violates the length-bound invariants.
    pub fn check_invariants(&self) -> Result<(), ThemeInvariantError> {
        check_length_bounds(self.min_length, self.max_length)
    }
}

/// Insert payload produced by theme-creation validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTheme {
    pub username: String,
    pub title: String,
    pub description: String,
    pub start_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
    pub min_length: u32,
    pub max_length: u32,
}

impl NewTheme {
    pub fn check_invariants(&self) -> Result<(), ThemeInvariantError> {
        check_length_bounds(self.min_length, self.max_length)
    }
}

/// Theme read model annotated with its visible theses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeWithTheses {
    #[serde(flatten)]
    pub theme: Theme,
    pub theses: Vec<Thesis>,
}

/// Storage-level invariant violations for theme length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeInvariantError {
    MinExceedsMax { min_length: u32, max_length: u32 },
    MaxExceedsCeiling { max_length: u32 },
}

impl Display for ThemeInvariantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinExceedsMax {
                min_length,
                max_length,
            } => write!(
                f,
                "theme min_length {min_length} exceeds max_length {max_length}"
            ),
            Self::MaxExceedsCeiling { max_length } => write!(
                f,
                "theme max_length {max_length} exceeds ceiling {THESIS_CONTENT_MAX_LENGTH}"
            ),
        }
    }
}

impl Error for ThemeInvariantError {}

fn check_length_bounds(min_length: u32, max_length: u32) -> Result<(), ThemeInvariantError> {
    if max_length > THESIS_CONTENT_MAX_LENGTH {
        return Err(ThemeInvariantError::MaxExceedsCeiling { max_length });
    }
    if min_length > max_length {
        return Err(ThemeInvariantError::MinExceedsMax {
            min_length,
            max_length,
        });
    }
    Ok(())
}
