//! Email notification setting upserts.
//!
//! # Invariants
//! - At most one row per username (`UNIQUE(username)`).
//! - Concurrent first reads converge on the same row: the insert yields to
//!   an existing row and the follow-up select reads whichever row won.

use super::{datetime_to_ms, flag_from_db, flag_to_db, RepoError, RepoResult, SqliteStore};
use crate::model::setting::{EmailNotificationSetting, NotificationToggles};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

pub trait SettingRepository {
    /// Returns the user's row, creating it with all toggles enabled if absent.
    fn create_or_read_setting(&self, username: &str) -> RepoResult<EmailNotificationSetting>;
    /// Overwrites all three toggles, creating the row if absent.
    fn update_setting(
        &self,
        username: &str,
        toggles: NotificationToggles,
        now: DateTime<Utc>,
    ) -> RepoResult<EmailNotificationSetting>;
}

impl SettingRepository for SqliteStore<'_> {
    fn create_or_read_setting(&self, username: &str) -> RepoResult<EmailNotificationSetting> {
        self.conn().execute(
            "INSERT INTO email_notification_settings (username)
             VALUES (?1)
             ON CONFLICT(username) DO NOTHING;",
            [username],
        )?;
        read_setting(self, username)
    }

    fn update_setting(
        &self,
        username: &str,
        toggles: NotificationToggles,
        now: DateTime<Utc>,
    ) -> RepoResult<EmailNotificationSetting> {
        self.conn().execute(
            "INSERT INTO email_notification_settings (username, thesis, favorite, comment)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(username) DO UPDATE SET
                thesis = excluded.thesis,
                favorite = excluded.favorite,
                comment = excluded.comment,
                updated_at = ?5;",
            params![
                username,
                flag_to_db(toggles.thesis),
                flag_to_db(toggles.favorite),
                flag_to_db(toggles.comment),
                datetime_to_ms(now),
            ],
        )?;
        read_setting(self, username)
    }
}

fn read_setting(store: &SqliteStore<'_>, username: &str) -> RepoResult<EmailNotificationSetting> {
    let raw = store
        .conn()
        .query_row(
            "SELECT thesis, favorite, comment
             FROM email_notification_settings
             WHERE username = ?1;",
            [username],
            |row| {
                Ok((
                    row.get::<_, i64>("thesis")?,
                    row.get::<_, i64>("favorite")?,
                    row.get::<_, i64>("comment")?,
                ))
            },
        )
        .optional()?;

    let (thesis, favorite, comment) = raw.ok_or_else(|| {
        RepoError::InvalidData("email notification setting missing after upsert".to_string())
    })?;

    Ok(EmailNotificationSetting {
        username: username.to_string(),
        toggles: NotificationToggles {
            thesis: flag_from_db(thesis, "email_notification_settings.thesis")?,
            favorite: flag_from_db(favorite, "email_notification_settings.favorite")?,
            comment: flag_from_db(comment, "email_notification_settings.comment")?,
        },
    })
}
