//! Write-time business rules.
//!
//! # Responsibility
//! - Decide whether a write may proceed, as pure functions of
//!   `(entity snapshot, input, now)`.
//! - Classify each rejection with one user-facing reason.
//!
//! # Invariants
//! - Rules never touch storage or collaborators.
//! - Checks run in a fixed order: existence, then window, then lengths.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod comment_rules;
mod report_rules;
mod theme_rules;
mod thesis_rules;

pub use comment_rules::{validate_comment, CommentDraft};
pub use report_rules::validate_report;
pub use theme_rules::{validate_theme_draft, ThemeDraft};
pub use thesis_rules::{validate_thesis_submission, ThesisDraft};

/// Entity named by a not-found failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Theme,
    Thesis,
    Comment,
}

impl Subject {
    pub fn label(self) -> &'static str {
        match self {
            Self::Theme => "テーマ",
            Self::Thesis => "小論文",
            Self::Comment => "コメント",
        }
    }

    /// `<label>が存在しないか、公開停止しています`
    pub fn not_found_message(self) -> String {
        format!("{}が存在しないか、公開停止しています", self.label())
    }
}

/// One variant per rejected business rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    TitleRequired,
    DescriptionRequired,
    MinLengthRequired,
    TitleTooLong,
    DescriptionTooLong,
    StartNotBeforeExpire,
    StartInPast,
    ExpireInPast,
    MinExceedsMax,
    MaxAboveCeiling { ceiling: u32 },
    TargetNotFound(Subject),
    NotYetAccepting,
    AcceptanceClosed,
    ContentTooShort,
    ContentTooLong,
    WorksCitedTooLong,
    CommentRequired,
    CommentTooLong,
    SelfReport,
    ReportDetailTooLong { limit: usize },
    UnknownReportReason,
}

impl ValidationError {
    /// Localized, user-facing reason.
    pub fn message(&self) -> String {
        match self {
            Self::TitleRequired => required_message("タイトル"),
            Self::DescriptionRequired => required_message("説明文"),
            Self::MinLengthRequired => required_message("最小文字数"),
            Self::TitleTooLong => "タイトルの文字数が長過ぎます".to_string(),
            Self::DescriptionTooLong => "説明文の文字数が長過ぎます".to_string(),
            Self::StartNotBeforeExpire => {
                "受付開始日時が受付終了日時より後か同日同時刻に指定されています".to_string()
            }
            Self::StartInPast => "受付開始日時が過ぎています".to_string(),
            Self::ExpireInPast => "受付終了日時が過ぎています".to_string(),
            Self::MinExceedsMax => {
                "小論文の最小文字数が、最大文字数より大きく指定されています".to_string()
            }
            Self::MaxAboveCeiling { ceiling } => format!(
                "小論文の最大文字数は{}字までに指定できます",
                group_thousands(u64::from(*ceiling))
            ),
            Self::TargetNotFound(subject) => subject.not_found_message(),
            Self::NotYetAccepting => "投稿受付開始日時前です".to_string(),
            Self::AcceptanceClosed => "投稿受付日時を過ぎました".to_string(),
            Self::ContentTooShort => "本文の文字数が最小文字数を満たしていません".to_string(),
            Self::ContentTooLong => "本文の文字数が最大文字数を超過しています".to_string(),
            Self::WorksCitedTooLong => "参考文献の文字数が長過ぎます".to_string(),
            Self::CommentRequired => required_message("コメント"),
            Self::CommentTooLong => "コメントの文字数が長過ぎます".to_string(),
            Self::SelfReport => "通報者と通報対象者が同一です".to_string(),
            Self::ReportDetailTooLong { limit } => {
                format!("詳細の文字数が\n{limit}字を超過しています")
            }
            Self::UnknownReportReason => "通報理由が正しくありません".to_string(),
        }
    }

    /// Stable machine code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TitleRequired => "title_required",
            Self::DescriptionRequired => "description_required",
            Self::MinLengthRequired => "min_length_required",
            Self::TitleTooLong => "title_too_long",
            Self::DescriptionTooLong => "description_too_long",
            Self::StartNotBeforeExpire => "start_not_before_expire",
            Self::StartInPast => "start_in_past",
            Self::ExpireInPast => "expire_in_past",
            Self::MinExceedsMax => "min_exceeds_max",
            Self::MaxAboveCeiling { .. } => "max_above_ceiling",
            Self::TargetNotFound(_) => "target_not_found",
            Self::NotYetAccepting => "not_yet_accepting",
            Self::AcceptanceClosed => "acceptance_closed",
            Self::ContentTooShort => "content_too_short",
            Self::ContentTooLong => "content_too_long",
            Self::WorksCitedTooLong => "works_cited_too_long",
            Self::CommentRequired => "comment_required",
            Self::CommentTooLong => "comment_too_long",
            Self::SelfReport => "self_report",
            Self::ReportDetailTooLong { .. } => "report_detail_too_long",
            Self::UnknownReportReason => "unknown_report_reason",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TargetNotFound(_))
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Error for ValidationError {}

fn required_message(field: &str) -> String {
    format!("{field}を入力してください")
}

/// `50000` -> `50,000`
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::{group_thousands, Subject, ValidationError};

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(50_000), "50,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn messages_are_localized() {
        assert_eq!(ValidationError::TitleRequired.message(), "タイトルを入力してください");
        assert_eq!(
            ValidationError::MaxAboveCeiling { ceiling: 50_000 }.message(),
            "小論文の最大文字数は50,000字までに指定できます"
        );
        assert_eq!(
            ValidationError::ReportDetailTooLong { limit: 10_000 }.message(),
            "詳細の文字数が\n10000字を超過しています"
        );
        assert_eq!(
            ValidationError::TargetNotFound(Subject::Thesis).message(),
            "小論文が存在しないか、公開停止しています"
        );
    }

    #[test]
    fn only_target_not_found_is_not_found() {
        assert!(ValidationError::TargetNotFound(Subject::Theme).is_not_found());
        assert!(!ValidationError::SelfReport.is_not_found());
    }
}
