//! Repository contracts and the SQLite store implementing them.
//!
//! # Responsibility
//! - Execute listing/count statements produced by [`crate::query`].
//! - Persist validated payloads and read them back as domain entities.
//! - Classify storage failures into semantic errors (`Conflict`, `NotFound`).
//!
//! # Invariants
//! - A store only wraps a connection whose schema matches this binary.
//! - Uniqueness violations surface as `Conflict` without echoing values.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::query::Statement;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{ffi, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod comment_repo;
pub mod favorite_repo;
pub mod report_repo;
pub mod setting_repo;
pub mod theme_repo;
pub mod thesis_repo;

pub use account_repo::{AccountRepository, WithdrawalSummary};
pub use comment_repo::CommentRepository;
pub use favorite_repo::FavoriteRepository;
pub use report_repo::ReportRepository;
pub use setting_repo::SettingRepository;
pub use theme_repo::ThemeRepository;
pub use thesis_repo::ThesisRepository;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: i64,
    },
    /// A uniqueness constraint rejected the write.
    Conflict {
        constraint: &'static str,
    },
    UninitializedConnection {
        current_version: u32,
        expected_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict { constraint } => write!(f, "unique constraint violated: {constraint}"),
            Self::UninitializedConnection {
                current_version,
                expected_version,
            } => write!(
                f,
                "connection schema version {current_version} does not match {expected_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// SQLite-backed implementation of every repository trait.
///
/// Holds a borrowed connection, so one request can build a primary store
/// and a replica store side by side.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_read_only`].
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let current_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if current_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                current_version,
                expected_version,
            });
        }
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }
}

/// Maps a write failure to `Conflict` when a UNIQUE/PRIMARY KEY constraint fired.
pub(crate) fn classify_write_error(err: rusqlite::Error, constraint: &'static str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::ConstraintViolation
            && matches!(
                failure.extended_code,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            )
        {
            return RepoError::Conflict { constraint };
        }
    }
    RepoError::from(err)
}

pub(crate) fn query_rows<T>(
    conn: &Connection,
    statement: &Statement,
    parse: impl Fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(&statement.sql)?;
    let mut rows = stmt.query(params_from_iter(statement.binds.iter()))?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

pub(crate) fn query_first<T>(
    conn: &Connection,
    statement: &Statement,
    parse: impl Fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(&statement.sql)?;
    let mut rows = stmt.query(params_from_iter(statement.binds.iter()))?;
    match rows.next()? {
        Some(row) => Ok(Some(parse(row)?)),
        None => Ok(None),
    }
}

pub(crate) fn query_count(conn: &Connection, statement: &Statement) -> RepoResult<u64> {
    let count: i64 = conn.query_row(
        &statement.sql,
        params_from_iter(statement.binds.iter()),
        |row| row.get(0),
    )?;
    u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
}

pub(crate) fn ms_to_datetime(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value).single().ok_or_else(|| {
        RepoError::InvalidData(format!("invalid epoch-ms value `{value}` in {column}"))
    })
}

pub(crate) fn optional_ms_to_datetime(
    value: Option<i64>,
    column: &str,
) -> RepoResult<Option<DateTime<Utc>>> {
    value.map(|ms| ms_to_datetime(ms, column)).transpose()
}

pub(crate) fn datetime_to_ms(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn flag_from_db(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn flag_to_db(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn length_from_db(value: i64, column: &str) -> RepoResult<u32> {
    u32::try_from(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid length value `{value}` in {column}"))
    })
}
