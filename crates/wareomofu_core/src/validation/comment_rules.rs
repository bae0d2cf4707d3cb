use super::{Subject, ValidationError};
use crate::model::comment::NewComment;
use crate::model::thesis::Thesis;
use crate::model::{char_len, COMMENT_CONTENT_MAX_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub content: String,
}

/// `thesis` is the visible-thesis lookup result for the comment target.
pub fn validate_comment(
    username: &str,
    thesis: Option<&Thesis>,
    draft: &CommentDraft,
) -> Result<NewComment, ValidationError> {
    let thesis = match thesis {
        Some(thesis) if !thesis.is_suspended => thesis,
        _ => return Err(ValidationError::TargetNotFound(Subject::Thesis)),
    };
    if draft.content.is_empty() {
        return Err(ValidationError::CommentRequired);
    }
    if char_len(&draft.content) > COMMENT_CONTENT_MAX_LENGTH {
        return Err(ValidationError::CommentTooLong);
    }

    Ok(NewComment {
        thesis_id: thesis.id,
        username: username.to_string(),
        content: draft.content.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::{validate_comment, CommentDraft};
    use crate::model::thesis::Thesis;
    use crate::validation::{Subject, ValidationError};
    use chrono::Utc;

    fn thesis() -> Thesis {
        Thesis {
            id: 8,
            theme_id: 1,
            username: Some("author".to_string()),
            content: "c".to_string(),
            works_cited: String::new(),
            is_suspended: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn draft(content: &str) -> CommentDraft {
        CommentDraft {
            content: content.to_string(),
        }
    }

    #[test]
    fn target_must_be_visible() {
        assert_eq!(
            validate_comment("bob", None, &draft("hi")),
            Err(ValidationError::TargetNotFound(Subject::Thesis))
        );
    }

    #[test]
    fn content_must_be_present_and_bounded() {
        let thesis = thesis();
        assert_eq!(
            validate_comment("bob", Some(&thesis), &draft("")),
            Err(ValidationError::CommentRequired)
        );
        assert_eq!(
            validate_comment("bob", Some(&thesis), &draft(&"x".repeat(50_001))),
            Err(ValidationError::CommentTooLong)
        );
        let comment = validate_comment("bob", Some(&thesis), &draft("同意します")).unwrap();
        assert_eq!(comment.thesis_id, 8);
    }
}
