//! Thesis listing, lookup and submission.

use super::{log_rejection, resolve_user, ServiceError, ServiceResult, Stores};
use crate::gateway::Gateways;
use crate::model::theme::ThemeId;
use crate::model::thesis::{Thesis, ThesisId, ThesisWithFavorites};
use crate::notification::{dispatch, NotificationEvent};
use crate::query::{PageSummary, Pagination, ThesisFilter};
use crate::repo::{SettingRepository, ThemeRepository, ThesisRepository};
use crate::validation::{validate_thesis_submission, Subject, ThesisDraft};
use log::info;

pub struct ThesisService<R> {
    stores: Stores<R>,
    gateways: Gateways,
    pagination: Pagination,
}

impl<R> ThesisService<R>
where
    R: ThesisRepository + ThemeRepository + SettingRepository,
{
    pub fn new(stores: Stores<R>, gateways: Gateways) -> Self {
        Self {
            stores,
            gateways,
            pagination: Pagination::default(),
        }
    }

    pub fn list_theses(
        &self,
        filter: &ThesisFilter,
        page: u32,
    ) -> ServiceResult<Vec<ThesisWithFavorites>> {
        Ok(self
            .stores
            .replica
            .list_theses(filter, Some(self.pagination.window(page)))?)
    }

    pub fn thesis_pages(&self, filter: &ThesisFilter) -> ServiceResult<PageSummary> {
        let count = self.stores.replica.count_theses(filter)?;
        Ok(self.pagination.summarize(count))
    }

    pub fn get_thesis(&self, thesis_id: ThesisId) -> ServiceResult<ThesisWithFavorites> {
        self.stores
            .replica
            .get_thesis_with_favorites(thesis_id)?
            .ok_or(ServiceError::NotFound(Subject::Thesis))
    }

    /// Submits a thesis, then notifies the theme owner.
    pub fn create_thesis(
        &self,
        access_token: &str,
        theme_id: ThemeId,
        draft: &ThesisDraft,
    ) -> ServiceResult<Thesis> {
        let username = resolve_user(&self.gateways, access_token, "thesis_create")?;
        let primary = &self.stores.primary;
        let now = self.gateways.now();

        let result = primary
            .get_theme(theme_id)
            .map_err(ServiceError::from)
            .and_then(|theme| {
                let new_thesis =
                    validate_thesis_submission(&username, theme.as_ref(), draft, now)?;
                let thesis = primary.create_thesis(&new_thesis, now)?;
                Ok((theme, thesis))
            });

        let (theme, thesis) = match result {
            Ok(created) => created,
            Err(err) => {
                log_rejection("thesis_create", &err);
                return Err(err);
            }
        };

        info!(
            "event=thesis_create module=service status=ok theme_id={} thesis_id={}",
            theme_id, thesis.id
        );

        dispatch(
            primary,
            self.gateways.notifier.as_ref(),
            &NotificationEvent::ThesisPosted {
                actor: username,
                theme_owner: theme.and_then(|theme| theme.username),
                theme_id,
                thesis_id: thesis.id,
                content: thesis.content.clone(),
            },
        );
        Ok(thesis)
    }
}
