//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file, in-memory, or read-only replica connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a writable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Writable connections have migrations fully applied.
//! - Replica connections are returned only when their schema matches.

use super::migrations::{apply_migrations, current_user_version, latest_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the primary database file and applies all pending migrations.
///
/// All writes, and any read that depends on a write made in the same
/// request, must go through a connection returned here.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let conn = Connection::open(path).map_err(|err| {
        log_open_failure("file", started_at, "db_open_failed", &err);
        DbError::from(err)
    })?;
    finish_writable_open(conn, "file", started_at)
}

/// Opens an in-memory database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = Connection::open_in_memory().map_err(|err| {
        log_open_failure("memory", started_at, "db_open_failed", &err);
        DbError::from(err)
    })?;
    finish_writable_open(conn, "memory", started_at)
}

/// Opens a read-only replica connection for listing/get paths.
///
/// No migration is attempted. The replica must already be at
/// [`latest_version`], otherwise [`DbError::ReplicaSchemaMismatch`] is
/// returned.
pub fn open_db_read_only(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=replica");

    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;
    let conn = Connection::open_with_flags(path, flags).map_err(|err| {
        log_open_failure("replica", started_at, "db_open_failed", &err);
        DbError::from(err)
    })?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;

    let replica_version = current_user_version(&conn)?;
    let expected_version = latest_version();
    if replica_version != expected_version {
        error!(
            "event=db_open module=db status=error mode=replica duration_ms={} error_code=replica_schema_mismatch replica_version={} expected_version={}",
            started_at.elapsed().as_millis(),
            replica_version,
            expected_version
        );
        return Err(DbError::ReplicaSchemaMismatch {
            replica_version,
            expected_version,
        });
    }

    info!(
        "event=db_open module=db status=ok mode=replica duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn finish_writable_open(
    mut conn: Connection,
    mode: &'static str,
    started_at: Instant,
) -> DbResult<Connection> {
    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            log_open_failure(mode, started_at, "db_bootstrap_failed", &err);
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}

fn log_open_failure(
    mode: &str,
    started_at: Instant,
    error_code: &str,
    err: &dyn std::fmt::Display,
) {
    error!(
        "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
        mode,
        started_at.elapsed().as_millis(),
        error_code,
        err
    );
}
