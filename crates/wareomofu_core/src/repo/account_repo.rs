//! Account withdrawal sweep.
//!
//! # Invariants
//! - Themes, theses and comments owned by the user keep their content and
//!   lose their owner.
//! - Favorites owned by the user are deleted.
//! - The sweep commits all-or-nothing.

use super::{datetime_to_ms, RepoResult, SqliteStore};
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::params;

/// Rows touched by one withdrawal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WithdrawalSummary {
    pub themes_anonymized: usize,
    pub theses_anonymized: usize,
    pub comments_anonymized: usize,
    pub favorites_deleted: usize,
}

impl WithdrawalSummary {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

pub trait AccountRepository {
    /// Idempotent: a second run for the same user touches nothing.
    fn withdraw(&self, username: &str, now: DateTime<Utc>) -> RepoResult<WithdrawalSummary>;
}

impl AccountRepository for SqliteStore<'_> {
    fn withdraw(&self, username: &str, now: DateTime<Utc>) -> RepoResult<WithdrawalSummary> {
        let tx = self.conn().unchecked_transaction()?;

        let mut summary = WithdrawalSummary::default();
        for (table, slot) in [
            ("themes", &mut summary.themes_anonymized),
            ("theses", &mut summary.theses_anonymized),
            ("comments", &mut summary.comments_anonymized),
        ] {
            *slot = tx.execute(
                &format!(
                    "UPDATE {table}
                     SET
                        username = NULL,
                        updated_at = ?2
                     WHERE username = ?1;"
                ),
                params![username, datetime_to_ms(now)],
            )?;
        }
        summary.favorites_deleted =
            tx.execute("DELETE FROM favorite_theses WHERE username = ?1;", [username])?;

        tx.commit()?;
        info!(
            "event=account_withdraw module=repo status=ok themes={} theses={} comments={} favorites={}",
            summary.themes_anonymized,
            summary.theses_anonymized,
            summary.comments_anonymized,
            summary.favorites_deleted
        );
        Ok(summary)
    }
}
