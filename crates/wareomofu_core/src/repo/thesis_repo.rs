//! Thesis persistence, thesis listings and favorite-thesis listings.

use super::{
    classify_write_error, datetime_to_ms, flag_from_db, ms_to_datetime, optional_ms_to_datetime,
    query_count, query_first, query_rows, RepoError, RepoResult, SqliteStore,
};
use crate::model::thesis::{FavoriteThesis, NewThesis, Thesis, ThesisId, ThesisWithFavorites};
use crate::query::{
    build_favorite_query, build_thesis_lookup, build_thesis_query, PageWindow, ThesisFilter,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

pub trait ThesisRepository {
    fn list_theses(
        &self,
        filter: &ThesisFilter,
        window: Option<PageWindow>,
    ) -> RepoResult<Vec<ThesisWithFavorites>>;
    fn count_theses(&self, filter: &ThesisFilter) -> RepoResult<u64>;
    /// Visible thesis by id. Suspended theses and theses of suspended themes
    /// are `None`.
    fn get_thesis(&self, thesis_id: ThesisId) -> RepoResult<Option<Thesis>>;
    fn get_thesis_with_favorites(
        &self,
        thesis_id: ThesisId,
    ) -> RepoResult<Option<ThesisWithFavorites>>;
    /// Fails with `Conflict` when the author already has a thesis on the theme.
    fn create_thesis(&self, thesis: &NewThesis, now: DateTime<Utc>) -> RepoResult<Thesis>;
    fn list_favorite_theses(
        &self,
        username: &str,
        window: Option<PageWindow>,
    ) -> RepoResult<Vec<ThesisWithFavorites>>;
    fn count_favorite_theses(&self, username: &str) -> RepoResult<u64>;
}

impl ThesisRepository for SqliteStore<'_> {
    fn list_theses(
        &self,
        filter: &ThesisFilter,
        window: Option<PageWindow>,
    ) -> RepoResult<Vec<ThesisWithFavorites>> {
        let statement = build_thesis_query(filter).page_statement(window);
        let theses = query_rows(self.conn(), &statement, parse_thesis_row)?;
        theses
            .into_iter()
            .map(|thesis| attach_favorites(self.conn(), thesis))
            .collect()
    }

    fn count_theses(&self, filter: &ThesisFilter) -> RepoResult<u64> {
        query_count(self.conn(), &build_thesis_query(filter).count_statement())
    }

    fn get_thesis(&self, thesis_id: ThesisId) -> RepoResult<Option<Thesis>> {
        let statement = build_thesis_lookup(thesis_id).page_statement(None);
        query_first(self.conn(), &statement, parse_thesis_row)
    }

    fn get_thesis_with_favorites(
        &self,
        thesis_id: ThesisId,
    ) -> RepoResult<Option<ThesisWithFavorites>> {
        self.get_thesis(thesis_id)?
            .map(|thesis| attach_favorites(self.conn(), thesis))
            .transpose()
    }

    fn create_thesis(&self, thesis: &NewThesis, now: DateTime<Utc>) -> RepoResult<Thesis> {
        self.conn()
            .execute(
                "INSERT INTO theses (
                    theme_id,
                    username,
                    content,
                    works_cited,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    thesis.theme_id,
                    thesis.username.as_str(),
                    thesis.content.as_str(),
                    thesis.works_cited.as_str(),
                    datetime_to_ms(now),
                ],
            )
            .map_err(|err| classify_write_error(err, "theses_theme_id_username"))?;

        let thesis_id = self.conn().last_insert_rowid();
        self.get_thesis(thesis_id)?.ok_or(RepoError::NotFound {
            entity: "thesis",
            id: thesis_id,
        })
    }

    fn list_favorite_theses(
        &self,
        username: &str,
        window: Option<PageWindow>,
    ) -> RepoResult<Vec<ThesisWithFavorites>> {
        let statement = build_favorite_query(username).page_statement(window);
        let theses = query_rows(self.conn(), &statement, parse_thesis_row)?;
        theses
            .into_iter()
            .map(|thesis| attach_favorites(self.conn(), thesis))
            .collect()
    }

    fn count_favorite_theses(&self, username: &str) -> RepoResult<u64> {
        query_count(self.conn(), &build_favorite_query(username).count_statement())
    }
}

fn attach_favorites(conn: &Connection, thesis: Thesis) -> RepoResult<ThesisWithFavorites> {
    let favorites = load_favorites_for_thesis(conn, thesis.id)?;
    Ok(ThesisWithFavorites { thesis, favorites })
}

fn load_favorites_for_thesis(
    conn: &Connection,
    thesis_id: ThesisId,
) -> RepoResult<Vec<FavoriteThesis>> {
    let mut stmt = conn.prepare(
        "SELECT
            id,
            thesis_id,
            username,
            created_at
         FROM favorite_theses
         WHERE thesis_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([thesis_id])?;
    let mut favorites = Vec::new();
    while let Some(row) = rows.next()? {
        favorites.push(parse_favorite_row(row)?);
    }
    Ok(favorites)
}

pub(crate) fn parse_thesis_row(row: &Row<'_>) -> RepoResult<Thesis> {
    Ok(Thesis {
        id: row.get("id")?,
        theme_id: row.get("theme_id")?,
        username: row.get("username")?,
        content: row.get("content")?,
        works_cited: row.get("works_cited")?,
        is_suspended: flag_from_db(row.get("is_suspended")?, "theses.is_suspended")?,
        created_at: ms_to_datetime(row.get("created_at")?, "theses.created_at")?,
        updated_at: optional_ms_to_datetime(row.get("updated_at")?, "theses.updated_at")?,
    })
}

pub(crate) fn parse_favorite_row(row: &Row<'_>) -> RepoResult<FavoriteThesis> {
    Ok(FavoriteThesis {
        id: row.get("id")?,
        thesis_id: row.get("thesis_id")?,
        username: row.get("username")?,
        created_at: ms_to_datetime(row.get("created_at")?, "favorite_theses.created_at")?,
    })
}
