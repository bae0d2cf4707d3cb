//! Theme persistence and listing execution.

use super::thesis_repo::parse_thesis_row;
use super::{
    classify_write_error, datetime_to_ms, flag_from_db, length_from_db, ms_to_datetime,
    optional_ms_to_datetime, query_count, query_first, query_rows, RepoError, RepoResult,
    SqliteStore,
};
use crate::model::theme::{NewTheme, Theme, ThemeId, ThemeWithTheses};
use crate::model::thesis::Thesis;
use crate::query::{
    build_theme_lookup, build_theme_query, build_theme_theses_query, PageWindow, ThemeFilter,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

pub trait ThemeRepository {
    /// One page of visible themes, each with its visible theses.
    fn list_themes(
        &self,
        filter: &ThemeFilter,
        now: DateTime<Utc>,
        window: Option<PageWindow>,
    ) -> RepoResult<Vec<ThemeWithTheses>>;
    /// Row count for the same filter, ignoring any window.
    fn count_themes(&self, filter: &ThemeFilter, now: DateTime<Utc>) -> RepoResult<u64>;
    fn get_theme(&self, theme_id: ThemeId) -> RepoResult<Option<Theme>>;
    fn get_theme_with_theses(&self, theme_id: ThemeId) -> RepoResult<Option<ThemeWithTheses>>;
    fn create_theme(&self, theme: &NewTheme, now: DateTime<Utc>) -> RepoResult<Theme>;
}

impl ThemeRepository for SqliteStore<'_> {
    fn list_themes(
        &self,
        filter: &ThemeFilter,
        now: DateTime<Utc>,
        window: Option<PageWindow>,
    ) -> RepoResult<Vec<ThemeWithTheses>> {
        let statement = build_theme_query(filter, now).page_statement(window);
        let themes = query_rows(self.conn(), &statement, parse_theme_row)?;
        themes
            .into_iter()
            .map(|theme| attach_theses(self.conn(), theme))
            .collect()
    }

    fn count_themes(&self, filter: &ThemeFilter, now: DateTime<Utc>) -> RepoResult<u64> {
        query_count(self.conn(), &build_theme_query(filter, now).count_statement())
    }

    fn get_theme(&self, theme_id: ThemeId) -> RepoResult<Option<Theme>> {
        let statement = build_theme_lookup(theme_id).page_statement(None);
        query_first(self.conn(), &statement, parse_theme_row)
    }

    fn get_theme_with_theses(&self, theme_id: ThemeId) -> RepoResult<Option<ThemeWithTheses>> {
        self.get_theme(theme_id)?
            .map(|theme| attach_theses(self.conn(), theme))
            .transpose()
    }

    fn create_theme(&self, theme: &NewTheme, now: DateTime<Utc>) -> RepoResult<Theme> {
        theme
            .check_invariants()
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;

        self.conn()
            .execute(
                "INSERT INTO themes (
                    username,
                    title,
                    description,
                    start_at,
                    expire_at,
                    min_length,
                    max_length,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    theme.username.as_str(),
                    theme.title.as_str(),
                    theme.description.as_str(),
                    theme.start_at.map(datetime_to_ms),
                    theme.expire_at.map(datetime_to_ms),
                    i64::from(theme.min_length),
                    i64::from(theme.max_length),
                    datetime_to_ms(now),
                ],
            )
            .map_err(|err| classify_write_error(err, "themes"))?;

        let theme_id = self.conn().last_insert_rowid();
        self.get_theme(theme_id)?.ok_or(RepoError::NotFound {
            entity: "theme",
            id: theme_id,
        })
    }
}

fn attach_theses(conn: &Connection, theme: Theme) -> RepoResult<ThemeWithTheses> {
    let theses = load_theses_for_theme(conn, theme.id)?;
    Ok(ThemeWithTheses { theme, theses })
}

fn load_theses_for_theme(conn: &Connection, theme_id: ThemeId) -> RepoResult<Vec<Thesis>> {
    let statement = build_theme_theses_query(theme_id).page_statement(None);
    query_rows(conn, &statement, parse_thesis_row)
}

pub(crate) fn parse_theme_row(row: &Row<'_>) -> RepoResult<Theme> {
    let theme = Theme {
        id: row.get("id")?,
        username: row.get("username")?,
        title: row.get("title")?,
        description: row.get("description")?,
        start_at: optional_ms_to_datetime(row.get("start_at")?, "themes.start_at")?,
        expire_at: optional_ms_to_datetime(row.get("expire_at")?, "themes.expire_at")?,
        min_length: length_from_db(row.get("min_length")?, "themes.min_length")?,
        max_length: length_from_db(row.get("max_length")?, "themes.max_length")?,
        is_suspended: flag_from_db(row.get("is_suspended")?, "themes.is_suspended")?,
        created_at: ms_to_datetime(row.get("created_at")?, "themes.created_at")?,
        updated_at: optional_ms_to_datetime(row.get("updated_at")?, "themes.updated_at")?,
    };
    theme
        .check_invariants()
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    Ok(theme)
}
