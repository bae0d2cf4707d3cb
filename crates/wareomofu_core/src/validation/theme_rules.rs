use super::ValidationError;
use crate::model::theme::NewTheme;
use crate::model::{
    char_len, THEME_DESCRIPTION_MAX_LENGTH, THEME_TITLE_MAX_LENGTH, THESIS_CONTENT_MAX_LENGTH,
};
use chrono::{DateTime, Utc};

/// Theme creation input as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDraft {
    pub title: String,
    pub description: String,
    pub start_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
    pub min_length: u32,
    /// Defaults to [`THESIS_CONTENT_MAX_LENGTH`] when omitted.
    pub max_length: Option<u32>,
}

/// Validates a theme draft and produces the insert payload for `username`.
pub fn validate_theme_draft(
    username: &str,
    draft: &ThemeDraft,
    now: DateTime<Utc>,
) -> Result<NewTheme, ValidationError> {
    if draft.title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if draft.description.is_empty() {
        return Err(ValidationError::DescriptionRequired);
    }
    if draft.min_length == 0 {
        return Err(ValidationError::MinLengthRequired);
    }
    if char_len(&draft.title) > THEME_TITLE_MAX_LENGTH {
        return Err(ValidationError::TitleTooLong);
    }
    if char_len(&draft.description) > THEME_DESCRIPTION_MAX_LENGTH {
        return Err(ValidationError::DescriptionTooLong);
    }
    if let (Some(start), Some(expire)) = (draft.start_at, draft.expire_at) {
        if start >= expire {
            return Err(ValidationError::StartNotBeforeExpire);
        }
    }
    if matches!(draft.start_at, Some(start) if start < now) {
        return Err(ValidationError::StartInPast);
    }
    if matches!(draft.expire_at, Some(expire) if expire < now) {
        return Err(ValidationError::ExpireInPast);
    }

    let max_length = match draft.max_length {
        Some(max_length) if draft.min_length > max_length => {
            return Err(ValidationError::MinExceedsMax);
        }
        Some(max_length) if max_length > THESIS_CONTENT_MAX_LENGTH => {
            return Err(ValidationError::MaxAboveCeiling {
                ceiling: THESIS_CONTENT_MAX_LENGTH,
            });
        }
        Some(max_length) => max_length,
        None => THESIS_CONTENT_MAX_LENGTH,
    };

    // Defaulted max still bounds min.
    if draft.min_length > max_length {
        return Err(ValidationError::MinExceedsMax);
    }

    Ok(NewTheme {
        username: username.to_string(),
        title: draft.title.clone(),
        description: draft.description.clone(),
        start_at: draft.start_at,
        expire_at: draft.expire_at,
        min_length: draft.min_length,
        max_length,
    })
}
