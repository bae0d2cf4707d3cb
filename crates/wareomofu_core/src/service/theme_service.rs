//! Theme listing, lookup and creation.

use super::{log_rejection, resolve_user, ServiceError, ServiceResult, Stores};
use crate::gateway::Gateways;
use crate::model::theme::{Theme, ThemeId, ThemeWithTheses};
use crate::query::{PageSummary, Pagination, ThemeFilter};
use crate::repo::ThemeRepository;
use crate::validation::{validate_theme_draft, Subject, ThemeDraft};
use log::info;

pub struct ThemeService<R: ThemeRepository> {
    stores: Stores<R>,
    gateways: Gateways,
    pagination: Pagination,
}

impl<R: ThemeRepository> ThemeService<R> {
    pub fn new(stores: Stores<R>, gateways: Gateways) -> Self {
        Self {
            stores,
            gateways,
            pagination: Pagination::default(),
        }
    }

    /// One page (1-indexed) of visible themes matching `filter`.
    pub fn list_themes(
        &self,
        filter: &ThemeFilter,
        page: u32,
    ) -> ServiceResult<Vec<ThemeWithTheses>> {
        let window = self.pagination.window(page);
        Ok(self
            .stores
            .replica
            .list_themes(filter, self.gateways.now(), Some(window))?)
    }

    /// `{count, pages}` for the same filter as [`Self::list_themes`].
    pub fn theme_pages(&self, filter: &ThemeFilter) -> ServiceResult<PageSummary> {
        let count = self
            .stores
            .replica
            .count_themes(filter, self.gateways.now())?;
        Ok(self.pagination.summarize(count))
    }

    pub fn get_theme(&self, theme_id: ThemeId) -> ServiceResult<ThemeWithTheses> {
        self.stores
            .replica
            .get_theme_with_theses(theme_id)?
            .ok_or(ServiceError::NotFound(Subject::Theme))
    }

    pub fn create_theme(&self, access_token: &str, draft: &ThemeDraft) -> ServiceResult<Theme> {
        let username = resolve_user(&self.gateways, access_token, "theme_create")?;
        let now = self.gateways.now();
        let result = validate_theme_draft(&username, draft, now)
            .map_err(ServiceError::from)
            .and_then(|theme| {
                self.stores
                    .primary
                    .create_theme(&theme, now)
                    .map_err(ServiceError::from)
            });

        match result {
            Ok(theme) => {
                info!(
                    "event=theme_create module=service status=ok theme_id={}",
                    theme.id
                );
                Ok(theme)
            }
            Err(err) => {
                log_rejection("theme_create", &err);
                Err(err)
            }
        }
    }
}
