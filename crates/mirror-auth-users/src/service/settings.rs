//! User settings and listing.

use crate::{config::RootAccountSource, errors::*, theme::Theme, traits::*, types::*};
use tracing::info;

use super::AuthorizationService;

impl<S, R> AuthorizationService<S, R>
where
    S: IdentityStore + 'static,
    R: RootAccountSource + 'static,
{
    pub(crate) async fn user_settings_internal(&self, uid: UserId) -> Result<UserSettings> {
        let txn = self.store.begin().await?;
        let settings = txn
            .get_user_settings(uid)?
            .ok_or_else(|| AuthError::NotFound(format!("settings for user {}", uid)))?;
        txn.commit().await?;
        Ok(settings)
    }

    pub(crate) async fn set_user_settings_theme_internal(
        &self,
        uid: UserId,
        theme: &str,
    ) -> Result<UserSettings> {
        let theme: Theme = theme.parse()?;

        let mut txn = self.store.begin().await?;
        let settings = txn
            .update_user_settings_theme(uid, theme)?
            .ok_or_else(|| AuthError::NotFound(format!("settings for user {}", uid)))?;
        txn.commit().await?;

        info!(uid, theme = %theme, "Theme updated");
        Ok(settings)
    }

    pub(crate) async fn list_users_internal(&self) -> Result<Vec<User>> {
        let txn = self.store.begin().await?;
        let users = txn.list_users()?;
        txn.commit().await?;
        Ok(users)
    }
}
