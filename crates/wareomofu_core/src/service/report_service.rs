//! Report submission and the reason catalog.
//!
//! # Invariants
//! - Nothing is inserted and no alert is published when a rule rejects
//!   the report.
//! - Alerts carry the report summary only, never usernames or detail text.

use super::{log_rejection, resolve_user, ServiceError, ServiceResult, Stores};
use crate::gateway::Gateways;
use crate::model::comment::CommentId;
use crate::model::report::{NewReport, Report, ReportReason, ReportReasonId, ReportSummary, ReportTarget};
use crate::model::theme::ThemeId;
use crate::model::thesis::ThesisId;
use crate::notification::publish_report_alert;
use crate::repo::{CommentRepository, ReportRepository, ThemeRepository, ThesisRepository};
use crate::validation::{validate_report, Subject, ValidationError};
use log::info;

/// Caller-supplied part of every report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub reason_id: ReportReasonId,
    pub detail: String,
}

pub struct ReportService<R> {
    stores: Stores<R>,
    gateways: Gateways,
}

impl<R> ReportService<R>
where
    R: ReportRepository + ThemeRepository + ThesisRepository + CommentRepository,
{
    pub fn new(stores: Stores<R>, gateways: Gateways) -> Self {
        Self { stores, gateways }
    }

    pub fn list_report_reasons(&self) -> ServiceResult<Vec<ReportReason>> {
        Ok(self.stores.replica.list_report_reasons()?)
    }

    pub fn report_user(
        &self,
        access_token: &str,
        target_username: &str,
        draft: &ReportDraft,
    ) -> ServiceResult<Report> {
        let reporter = resolve_user(&self.gateways, access_token, "report_user")?;
        self.submit(
            "report_user",
            reporter,
            ReportTarget::User,
            Some(target_username.to_string()),
            draft,
        )
    }

    pub fn report_theme(
        &self,
        access_token: &str,
        theme_id: ThemeId,
        draft: &ReportDraft,
    ) -> ServiceResult<Report> {
        let reporter = resolve_user(&self.gateways, access_token, "report_theme")?;
        let owner = match self.stores.primary.get_theme(theme_id)? {
            Some(theme) => theme.username,
            None => return Err(not_found("report_theme", Subject::Theme)),
        };
        self.submit(
            "report_theme",
            reporter,
            ReportTarget::Theme(Some(theme_id)),
            owner,
            draft,
        )
    }

    pub fn report_thesis(
        &self,
        access_token: &str,
        thesis_id: ThesisId,
        draft: &ReportDraft,
    ) -> ServiceResult<Report> {
        let reporter = resolve_user(&self.gateways, access_token, "report_thesis")?;
        let owner = match self.stores.primary.get_thesis(thesis_id)? {
            Some(thesis) => thesis.username,
            None => return Err(not_found("report_thesis", Subject::Thesis)),
        };
        self.submit(
            "report_thesis",
            reporter,
            ReportTarget::Thesis(Some(thesis_id)),
            owner,
            draft,
        )
    }

    pub fn report_comment(
        &self,
        access_token: &str,
        comment_id: CommentId,
        draft: &ReportDraft,
    ) -> ServiceResult<Report> {
        let reporter = resolve_user(&self.gateways, access_token, "report_comment")?;
        let owner = match self.stores.primary.get_comment(comment_id)? {
            Some(comment) => comment.username,
            None => return Err(not_found("report_comment", Subject::Comment)),
        };
        self.submit(
            "report_comment",
            reporter,
            ReportTarget::Comment(Some(comment_id)),
            owner,
            draft,
        )
    }

    fn submit(
        &self,
        operation: &str,
        reporter: String,
        target: ReportTarget,
        target_username: Option<String>,
        draft: &ReportDraft,
    ) -> ServiceResult<Report> {
        let primary = &self.stores.primary;
        let result = validate_report(&reporter, target_username.as_deref(), &draft.detail)
            .map_err(ServiceError::from)
            .and_then(|()| {
                if !primary.report_reason_exists(draft.reason_id)? {
                    return Err(ValidationError::UnknownReportReason.into());
                }
                let report = NewReport {
                    target,
                    reporter_username: reporter,
                    target_username,
                    reason_id: draft.reason_id,
                    detail: draft.detail.clone(),
                };
                Ok(primary.create_report(&report, self.gateways.now())?)
            });

        let report = match result {
            Ok(report) => report,
            Err(err) => {
                log_rejection(operation, &err);
                return Err(err);
            }
        };

        info!(
            "event={} module=service status=ok report_id={}",
            operation, report.id
        );
        publish_report_alert(self.gateways.alerts.as_ref(), &ReportSummary::from(&report));
        Ok(report)
    }
}

fn not_found(operation: &str, subject: Subject) -> ServiceError {
    let err = ServiceError::NotFound(subject);
    log_rejection(operation, &err);
    err
}
