//! Favorite listing, checks and toggling.

use super::{log_rejection, resolve_user, ServiceError, ServiceResult, Stores};
use crate::gateway::Gateways;
use crate::model::thesis::{FavoriteThesis, ThesisId, ThesisWithFavorites};
use crate::notification::{dispatch, NotificationEvent};
use crate::query::{PageSummary, Pagination};
use crate::repo::{FavoriteRepository, SettingRepository, ThesisRepository};
use crate::validation::Subject;
use log::info;

pub struct FavoriteService<R> {
    stores: Stores<R>,
    gateways: Gateways,
    pagination: Pagination,
}

impl<R> FavoriteService<R>
where
    R: FavoriteRepository + ThesisRepository + SettingRepository,
{
    pub fn new(stores: Stores<R>, gateways: Gateways) -> Self {
        Self {
            stores,
            gateways,
            pagination: Pagination::default(),
        }
    }

    /// Theses `username` favorited, most recent favorite first.
    pub fn list_favorites(
        &self,
        username: &str,
        page: u32,
    ) -> ServiceResult<Vec<ThesisWithFavorites>> {
        Ok(self
            .stores
            .replica
            .list_favorite_theses(username, Some(self.pagination.window(page)))?)
    }

    pub fn favorite_pages(&self, username: &str) -> ServiceResult<PageSummary> {
        let count = self.stores.replica.count_favorite_theses(username)?;
        Ok(self.pagination.summarize(count))
    }

    pub fn is_favorite(&self, access_token: &str, thesis_id: ThesisId) -> ServiceResult<bool> {
        let username = resolve_user(&self.gateways, access_token, "favorite_read")?;
        Ok(self
            .stores
            .replica
            .get_favorite(thesis_id, &username)?
            .is_some())
    }

    /// Favorites a visible thesis, then notifies its author.
    pub fn add_favorite(
        &self,
        access_token: &str,
        thesis_id: ThesisId,
    ) -> ServiceResult<FavoriteThesis> {
        let username = resolve_user(&self.gateways, access_token, "favorite_create")?;
        let primary = &self.stores.primary;

        let result = primary
            .get_thesis(thesis_id)
            .map_err(ServiceError::from)
            .and_then(|thesis| {
                let thesis = thesis.ok_or(ServiceError::NotFound(Subject::Thesis))?;
                let favorite =
                    primary.create_favorite(thesis.id, &username, self.gateways.now())?;
                Ok((thesis, favorite))
            });

        let (thesis, favorite) = match result {
            Ok(created) => created,
            Err(err) => {
                log_rejection("favorite_create", &err);
                return Err(err);
            }
        };

        info!(
            "event=favorite_create module=service status=ok thesis_id={}",
            thesis_id
        );

        dispatch(
            primary,
            self.gateways.notifier.as_ref(),
            &NotificationEvent::ThesisFavorited {
                actor: username,
                thesis_owner: thesis.username,
                thesis_id,
            },
        );
        Ok(favorite)
    }

    /// Returns whether a favorite was removed; a missing one is not an error.
    pub fn remove_favorite(&self, access_token: &str, thesis_id: ThesisId) -> ServiceResult<bool> {
        let username = resolve_user(&self.gateways, access_token, "favorite_delete")?;
        let removed = self.stores.primary.delete_favorite(thesis_id, &username)?;
        info!(
            "event=favorite_delete module=service status=ok thesis_id={} removed={}",
            thesis_id, removed
        );
        Ok(removed)
    }
}
