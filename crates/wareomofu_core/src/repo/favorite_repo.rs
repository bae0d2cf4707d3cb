//! Favorite (bookmark) writes and point reads.

use super::thesis_repo::parse_favorite_row;
use super::{classify_write_error, datetime_to_ms, RepoError, RepoResult, SqliteStore};
use crate::model::thesis::{FavoriteThesis, ThesisId};
use chrono::{DateTime, Utc};
use rusqlite::params;

const FAVORITE_SELECT_SQL: &str = "SELECT
    id,
    thesis_id,
    username,
    created_at
FROM favorite_theses";

pub trait FavoriteRepository {
    fn get_favorite(&self, thesis_id: ThesisId, username: &str)
        -> RepoResult<Option<FavoriteThesis>>;
    /// Duplicates fail with `Conflict`; they are not silently ignored.
    fn create_favorite(
        &self,
        thesis_id: ThesisId,
        username: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<FavoriteThesis>;
    /// Returns whether a row was removed. Missing rows are not an error.
    fn delete_favorite(&self, thesis_id: ThesisId, username: &str) -> RepoResult<bool>;
}

impl FavoriteRepository for SqliteStore<'_> {
    fn get_favorite(
        &self,
        thesis_id: ThesisId,
        username: &str,
    ) -> RepoResult<Option<FavoriteThesis>> {
        let mut stmt = self.conn().prepare(&format!(
            "{FAVORITE_SELECT_SQL}
             WHERE thesis_id = ?1
               AND username = ?2;"
        ))?;
        let mut rows = stmt.query(params![thesis_id, username])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_favorite_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_favorite(
        &self,
        thesis_id: ThesisId,
        username: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<FavoriteThesis> {
        self.conn()
            .execute(
                "INSERT INTO favorite_theses (thesis_id, username, created_at)
                 VALUES (?1, ?2, ?3);",
                params![thesis_id, username, datetime_to_ms(now)],
            )
            .map_err(|err| classify_write_error(err, "favorite_theses_thesis_id_username"))?;

        self.get_favorite(thesis_id, username)?
            .ok_or(RepoError::NotFound {
                entity: "favorite",
                id: self.conn().last_insert_rowid(),
            })
    }

    fn delete_favorite(&self, thesis_id: ThesisId, username: &str) -> RepoResult<bool> {
        let Some(favorite) = self.get_favorite(thesis_id, username)? else {
            return Ok(false);
        };
        let changed = self
            .conn()
            .execute("DELETE FROM favorite_theses WHERE id = ?1;", [favorite.id])?;
        Ok(changed > 0)
    }
}
