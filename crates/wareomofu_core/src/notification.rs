//! Owner notification policy, email templates and report alert rendering.
//!
//! # Responsibility
//! - Decide whether a content owner hears about another user's action.
//! - Render subject and body for the email collaborator.
//! - Hand persisted reports to the alert collaborator.
//!
//! # Invariants
//! - Owners are never notified about their own actions.
//! - Withdrawn owners (`None`) are never notified.
//! - Delivery is best-effort: failures are logged and swallowed.

use crate::gateway::{AlertPublisher, Notifier};
use crate::model::report::ReportSummary;
use crate::model::setting::NotificationKind;
use crate::model::theme::ThemeId;
use crate::model::thesis::ThesisId;
use crate::repo::SettingRepository;
use log::{debug, warn};

/// Summaries longer than this are cut and suffixed with [`SUMMARY_ELLIPSIS`].
pub const SUMMARY_MAX_CHARS: usize = 97;
pub const SUMMARY_ELLIPSIS: &str = "...";

const EMAIL_FOOTER: &str = "※本メールは送信専用アドレスから配信しています。ご返信いただいてもお答えできませんのでご了承ください。\n※通知の受け取り設定はマイページのメール通知設定から変更できます。";

/// Owner-facing event produced by a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    ThesisPosted {
        actor: String,
        theme_owner: Option<String>,
        theme_id: ThemeId,
        thesis_id: ThesisId,
        content: String,
    },
    ThesisFavorited {
        actor: String,
        thesis_owner: Option<String>,
        thesis_id: ThesisId,
    },
    CommentPosted {
        actor: String,
        thesis_owner: Option<String>,
        thesis_id: ThesisId,
        content: String,
    },
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::ThesisPosted { .. } => NotificationKind::Thesis,
            Self::ThesisFavorited { .. } => NotificationKind::Favorite,
            Self::CommentPosted { .. } => NotificationKind::Comment,
        }
    }

    pub fn actor(&self) -> &str {
        match self {
            Self::ThesisPosted { actor, .. }
            | Self::ThesisFavorited { actor, .. }
            | Self::CommentPosted { actor, .. } => actor,
        }
    }

    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::ThesisPosted { theme_owner, .. } => theme_owner.as_deref(),
            Self::ThesisFavorited { thesis_owner, .. }
            | Self::CommentPosted { thesis_owner, .. } => thesis_owner.as_deref(),
        }
    }

    /// Owner to notify, if any: present and distinct from the actor.
    pub fn recipient(&self) -> Option<&str> {
        self.owner().filter(|owner| *owner != self.actor())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Why dispatch did or did not reach the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    SkippedNoRecipient,
    SkippedDisabled,
    Failed,
}

pub fn subject_for(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Thesis => "テーマに小論文が投稿されました",
        NotificationKind::Favorite => "小論文がお気に入り登録されました",
        NotificationKind::Comment => "小論文にコメントが投稿されました",
    }
}

/// Cuts `content` to [`SUMMARY_MAX_CHARS`] characters, marking the cut.
pub fn summarize(content: &str) -> String {
    match content.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((cut, _)) => format!("{}{SUMMARY_ELLIPSIS}", &content[..cut]),
        None => content.to_string(),
    }
}

/// Renders the email for `event`, or `None` when nobody should hear about it.
pub fn render_email(event: &NotificationEvent) -> Option<EmailMessage> {
    let recipient = event.recipient()?;
    let main = match event {
        NotificationEvent::ThesisPosted {
            actor,
            theme_id,
            thesis_id,
            content,
            ..
        } => format!(
            "{actor}さんがあなたのテーマに小論文を投稿しました。\n\nテーマID: {theme_id}\n小論文ID: {thesis_id}\n\n{}",
            summarize(content)
        ),
        NotificationEvent::ThesisFavorited {
            actor, thesis_id, ..
        } => format!(
            "{actor}さんがあなたの小論文をお気に入り登録しました。\n\n小論文ID: {thesis_id}"
        ),
        NotificationEvent::CommentPosted {
            actor,
            thesis_id,
            content,
            ..
        } => format!(
            "{actor}さんがあなたの小論文にコメントを投稿しました。\n\n小論文ID: {thesis_id}\n\n{}",
            summarize(content)
        ),
    };

    Some(EmailMessage {
        recipient: recipient.to_string(),
        subject: subject_for(event.kind()).to_string(),
        body: frame_body(recipient, &main),
    })
}

fn frame_body(recipient: &str, main: &str) -> String {
    format!("{recipient} 様\n\n{main}\n\n{EMAIL_FOOTER}")
}

/// Applies the recipient's settings and delivers the email.
///
/// Never fails: storage and delivery errors are logged and reported as
/// [`DispatchOutcome::Failed`].
pub fn dispatch<R: SettingRepository>(
    settings: &R,
    notifier: &dyn Notifier,
    event: &NotificationEvent,
) -> DispatchOutcome {
    let kind = event.kind();
    let Some(message) = render_email(event) else {
        debug!(
            "event=notify module=notification status=skipped kind={:?} reason=no_recipient",
            kind
        );
        return DispatchOutcome::SkippedNoRecipient;
    };

    let setting = match settings.create_or_read_setting(&message.recipient) {
        Ok(setting) => setting,
        Err(err) => {
            warn!(
                "event=notify module=notification status=error kind={:?} stage=setting error={}",
                kind, err
            );
            return DispatchOutcome::Failed;
        }
    };

    if !setting.toggles.allows(kind) {
        debug!(
            "event=notify module=notification status=skipped kind={:?} reason=disabled recipient={}",
            kind, message.recipient
        );
        return DispatchOutcome::SkippedDisabled;
    }

    match notifier.notify(&message.recipient, &message.subject, &message.body) {
        Ok(()) => {
            debug!(
                "event=notify module=notification status=ok kind={:?} recipient={}",
                kind, message.recipient
            );
            DispatchOutcome::Sent
        }
        Err(err) => {
            warn!(
                "event=notify module=notification status=error kind={:?} stage=deliver error={}",
                kind, err
            );
            DispatchOutcome::Failed
        }
    }
}

/// Alert subject, `<kind label>に対する通報連絡`.
pub fn alert_subject(summary: &ReportSummary) -> String {
    format!("{}に対する通報連絡", summary.kind().label())
}

/// Alert message, the subject followed by the JSON summary on its own line.
pub fn alert_message(summary: &ReportSummary) -> String {
    format!("{}\n{}", alert_subject(summary), summary.to_json())
}

/// Best-effort alert fan-out for a persisted report.
pub fn publish_report_alert(alerts: &dyn AlertPublisher, summary: &ReportSummary) -> bool {
    match alerts.publish_alert(summary, summary.kind()) {
        Ok(()) => {
            debug!(
                "event=report_alert module=notification status=ok kind={} report_id={}",
                summary.kind().as_str(),
                summary.id
            );
            true
        }
        Err(err) => {
            warn!(
                "event=report_alert module=notification status=error kind={} report_id={} error={}",
                summary.kind().as_str(),
                summary.id,
                err
            );
            false
        }
    }
}
