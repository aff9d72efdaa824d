use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{AppSettingsRepository, StorageError};
use civics_core::model::{AppSettings, AppSettingsDraft};

use super::SqliteRepository;

const THEME_KEY: &str = "theme";

#[async_trait]
impl AppSettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let row = sqlx::query("SELECT value FROM app_settings WHERE key = ?1")
            .bind(THEME_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let theme: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        AppSettings::from_persisted(AppSettingsDraft { theme: Some(theme) })
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_settings (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(THEME_KEY)
        .bind(settings.theme().as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
