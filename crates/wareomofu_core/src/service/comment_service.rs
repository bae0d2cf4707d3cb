//! Comment listing and posting.

use super::{log_rejection, resolve_user, ServiceError, ServiceResult, Stores};
use crate::gateway::Gateways;
use crate::model::comment::Comment;
use crate::model::thesis::ThesisId;
use crate::notification::{dispatch, NotificationEvent};
use crate::query::{PageSummary, Pagination};
use crate::repo::{CommentRepository, SettingRepository, ThesisRepository};
use crate::validation::{validate_comment, CommentDraft};
use log::info;

pub struct CommentService<R> {
    stores: Stores<R>,
    gateways: Gateways,
    pagination: Pagination,
}

impl<R> CommentService<R>
where
    R: CommentRepository + ThesisRepository + SettingRepository,
{
    pub fn new(stores: Stores<R>, gateways: Gateways) -> Self {
        Self {
            stores,
            gateways,
            pagination: Pagination::default(),
        }
    }

    /// Visible comments on `thesis_id` in posting order.
    pub fn list_comments(&self, thesis_id: ThesisId, page: u32) -> ServiceResult<Vec<Comment>> {
        Ok(self
            .stores
            .replica
            .list_comments(thesis_id, Some(self.pagination.window(page)))?)
    }

    pub fn comment_pages(&self, thesis_id: ThesisId) -> ServiceResult<PageSummary> {
        let count = self.stores.replica.count_comments(thesis_id)?;
        Ok(self.pagination.summarize(count))
    }

    /// Posts a comment on a visible thesis, then notifies its author.
    pub fn create_comment(
        &self,
        access_token: &str,
        thesis_id: ThesisId,
        draft: &CommentDraft,
    ) -> ServiceResult<Comment> {
        let username = resolve_user(&self.gateways, access_token, "comment_create")?;
        let primary = &self.stores.primary;

        let result = primary
            .get_thesis(thesis_id)
            .map_err(ServiceError::from)
            .and_then(|thesis| {
                let new_comment = validate_comment(&username, thesis.as_ref(), draft)?;
                let comment = primary.create_comment(&new_comment, self.gateways.now())?;
                Ok((thesis, comment))
            });

        let (thesis, comment) = match result {
            Ok(created) => created,
            Err(err) => {
                log_rejection("comment_create", &err);
                return Err(err);
            }
        };

        info!(
            "event=comment_create module=service status=ok thesis_id={} comment_id={}",
            thesis_id, comment.id
        );

        dispatch(
            primary,
            self.gateways.notifier.as_ref(),
            &NotificationEvent::CommentPosted {
                actor: username,
                thesis_owner: thesis.and_then(|thesis| thesis.username),
                thesis_id,
                content: comment.content.clone(),
            },
        );
        Ok(comment)
    }
}
