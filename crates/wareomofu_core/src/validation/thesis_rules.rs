use super::{Subject, ValidationError};
use crate::model::theme::{AcceptanceState, Theme};
use crate::model::thesis::NewThesis;
use crate::model::{char_len, THESIS_WORKS_CITED_MAX_LENGTH};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThesisDraft {
    pub content: String,
    pub works_cited: String,
}

/// Validates a submission against a snapshot of its target theme.
///
/// `theme` is `None` when the lookup found nothing visible.
pub fn validate_thesis_submission(
    username: &str,
    theme: Option<&Theme>,
    draft: &ThesisDraft,
    now: DateTime<Utc>,
) -> Result<NewThesis, ValidationError> {
    let theme = match theme {
        Some(theme) if !theme.is_suspended => theme,
        _ => return Err(ValidationError::TargetNotFound(Subject::Theme)),
    };

    match theme.acceptance_state(now) {
        AcceptanceState::NotYetOpen => return Err(ValidationError::NotYetAccepting),
        AcceptanceState::Closed => return Err(ValidationError::AcceptanceClosed),
        AcceptanceState::Accepting => {}
    }

    let content_len = char_len(&draft.content);
    if !theme.accepts_length(content_len) {
        return Err(if content_len < theme.min_length as usize {
            ValidationError::ContentTooShort
        } else {
            ValidationError::ContentTooLong
        });
    }
    if char_len(&draft.works_cited) > THESIS_WORKS_CITED_MAX_LENGTH {
        return Err(ValidationError::WorksCitedTooLong);
    }

    Ok(NewThesis {
        theme_id: theme.id,
        username: username.to_string(),
        content: draft.content.clone(),
        works_cited: draft.works_cited.clone(),
    })
}
