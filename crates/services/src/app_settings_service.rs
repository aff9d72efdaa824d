use std::sync::Arc;

use civics_core::model::{AppSettings, AppSettingsDraft, Theme};
use storage::repository::AppSettingsRepository;

use crate::error::AppSettingsServiceError;

/// Reads and writes the persisted display preference.
#[derive(Clone)]
pub struct AppSettingsService {
    repo: Arc<dyn AppSettingsRepository>,
}

impl AppSettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn AppSettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = self.repo.get_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if validation fails or persistence fails.
    pub async fn save(
        &self,
        draft: AppSettingsDraft,
    ) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = draft.validate()?;
        self.repo.save_settings(&settings).await?;
        tracing::debug!(theme = %settings.theme(), "settings saved");
        Ok(settings)
    }

    /// Persist an explicit theme choice.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` on storage failures.
    pub async fn set_theme(&self, theme: Theme) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = self.load().await?.with_theme(theme);
        self.repo.save_settings(&settings).await?;
        tracing::debug!(%theme, "theme saved");
        Ok(settings)
    }

    /// Switch between light and dark and persist the result.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` on storage failures.
    pub async fn toggle_theme(&self) -> Result<Theme, AppSettingsServiceError> {
        let current = self.load().await?.theme();
        let settings = self.set_theme(current.toggled()).await?;
        Ok(settings.theme())
    }
}
