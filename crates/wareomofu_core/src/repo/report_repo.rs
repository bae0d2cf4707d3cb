//! Report reason catalog and report inserts.
//!
//! # Invariants
//! - Each report kind lands in its own table.
//! - The reported owner is copied into the row at insert time.

use super::{datetime_to_ms, flag_from_db, ms_to_datetime, RepoError, RepoResult, SqliteStore};
use crate::model::report::{
    ContentKind, NewReport, Report, ReportReason, ReportReasonId, ReportTarget,
};
use chrono::{DateTime, Utc};
use rusqlite::params;

pub trait ReportRepository {
    fn list_report_reasons(&self) -> RepoResult<Vec<ReportReason>>;
    fn report_reason_exists(&self, reason_id: ReportReasonId) -> RepoResult<bool>;
    fn create_report(&self, report: &NewReport, now: DateTime<Utc>) -> RepoResult<Report>;
}

impl ReportRepository for SqliteStore<'_> {
    fn list_report_reasons(&self) -> RepoResult<Vec<ReportReason>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, reason FROM report_reasons ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut reasons = Vec::new();
        while let Some(row) = rows.next()? {
            reasons.push(ReportReason {
                id: row.get("id")?,
                reason: row.get("reason")?,
            });
        }
        Ok(reasons)
    }

    fn report_reason_exists(&self, reason_id: ReportReasonId) -> RepoResult<bool> {
        let exists: i64 = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM report_reasons WHERE id = ?1);",
            [reason_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn create_report(&self, report: &NewReport, now: DateTime<Utc>) -> RepoResult<Report> {
        let table = report_table(report.target.kind());
        match report.target {
            ReportTarget::User => {
                let target_username = report.target_username.as_deref().ok_or_else(|| {
                    RepoError::InvalidData("user report requires target_username".to_string())
                })?;
                self.conn().execute(
                    "INSERT INTO user_reports (
                        target_username,
                        reporter_username,
                        report_reason_id,
                        detail,
                        created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        target_username,
                        report.reporter_username.as_str(),
                        report.reason_id,
                        report.detail.as_str(),
                        datetime_to_ms(now),
                    ],
                )?;
            }
            ReportTarget::Theme(entity_id)
            | ReportTarget::Thesis(entity_id)
            | ReportTarget::Comment(entity_id) => {
                let entity_column = format!("{}_id", report.target.kind().as_str());
                self.conn().execute(
                    &format!(
                        "INSERT INTO {table} (
                            {entity_column},
                            target_username,
                            reporter_username,
                            report_reason_id,
                            detail,
                            created_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);"
                    ),
                    params![
                        entity_id,
                        report.target_username.as_deref(),
                        report.reporter_username.as_str(),
                        report.reason_id,
                        report.detail.as_str(),
                        datetime_to_ms(now),
                    ],
                )?;
            }
        }

        let report_id = self.conn().last_insert_rowid();
        let (created_at, is_read): (i64, i64) = self.conn().query_row(
            &format!("SELECT created_at, is_read FROM {table} WHERE id = ?1;"),
            [report_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(Report {
            id: report_id,
            target: report.target,
            reporter_username: report.reporter_username.clone(),
            target_username: report.target_username.clone(),
            reason_id: report.reason_id,
            detail: report.detail.clone(),
            is_read: flag_from_db(is_read, "reports.is_read")?,
            created_at: ms_to_datetime(created_at, "reports.created_at")?,
        })
    }
}

fn report_table(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::User => "user_reports",
        ContentKind::Theme => "theme_reports",
        ContentKind::Thesis => "thesis_reports",
        ContentKind::Comment => "comment_reports",
    }
}
