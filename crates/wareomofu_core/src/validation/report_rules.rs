use super::ValidationError;
use crate::model::{char_len, REPORT_DETAIL_MAX_LENGTH};

/// `target_owner` is `None` when the reported content's owner has withdrawn.
pub fn validate_report(
    reporter: &str,
    target_owner: Option<&str>,
    detail: &str,
) -> Result<(), ValidationError> {
    if target_owner == Some(reporter) {
        return Err(ValidationError::SelfReport);
    }
    if char_len(detail) > REPORT_DETAIL_MAX_LENGTH {
        return Err(ValidationError::ReportDetailTooLong {
            limit: REPORT_DETAIL_MAX_LENGTH,
        });
    }
    Ok(())
}
