//! Withdrawal and per-user notification settings.

use super::{resolve_user, ServiceResult, Stores};
use crate::gateway::Gateways;
use crate::model::setting::{EmailNotificationSetting, NotificationToggles};
use crate::repo::{AccountRepository, SettingRepository, WithdrawalSummary};

pub struct AccountService<R> {
    stores: Stores<R>,
    gateways: Gateways,
}

impl<R> AccountService<R>
where
    R: AccountRepository + SettingRepository,
{
    pub fn new(stores: Stores<R>, gateways: Gateways) -> Self {
        Self { stores, gateways }
    }

    /// Anonymizes the caller's content and drops their favorites.
    pub fn withdraw(&self, access_token: &str) -> ServiceResult<WithdrawalSummary> {
        let username = resolve_user(&self.gateways, access_token, "account_withdraw")?;
        Ok(self
            .stores
            .primary
            .withdraw(&username, self.gateways.now())?)
    }

    /// Reads the caller's settings, creating defaults on first access.
    pub fn notification_setting(
        &self,
        access_token: &str,
    ) -> ServiceResult<EmailNotificationSetting> {
        let username = resolve_user(&self.gateways, access_token, "setting_read")?;
        Ok(self.stores.primary.create_or_read_setting(&username)?)
    }

    pub fn update_notification_setting(
        &self,
        access_token: &str,
        toggles: NotificationToggles,
    ) -> ServiceResult<EmailNotificationSetting> {
        let username = resolve_user(&self.gateways, access_token, "setting_update")?;
        Ok(self
            .stores
            .primary
            .update_setting(&username, toggles, self.gateways.now())?)
    }
}
