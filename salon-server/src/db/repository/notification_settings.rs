//! Notification Settings Repository (Singleton)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{NotificationSettings, NotificationSettingsUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "notification_settings";
const SINGLETON_ID: &str = "main";

#[derive(Clone)]
pub struct NotificationSettingsRepository {
    base: BaseRepository,
}

impl NotificationSettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get or create the singleton settings
    pub async fn get_or_create(&self) -> RepoResult<NotificationSettings> {
        if let Some(settings) = self.get().await? {
            return Ok(settings);
        }

        let settings = NotificationSettings::default();

        let created: Option<NotificationSettings> = self
            .base
            .db()
            .create((TABLE, SINGLETON_ID))
            .content(settings)
            .await?;
        created.ok_or_else(|| {
            RepoError::Database("Failed to create notification settings".to_string())
        })
    }

    /// Get the singleton settings
    pub async fn get(&self) -> RepoResult<Option<NotificationSettings>> {
        let settings: Option<NotificationSettings> =
            self.base.db().select((TABLE, SINGLETON_ID)).await?;
        Ok(settings)
    }

    /// Merge an update into the settings
    pub async fn update(
        &self,
        data: NotificationSettingsUpdate,
    ) -> RepoResult<NotificationSettings> {
        // Ensure singleton exists
        self.get_or_create().await?;

        // Update timestamp first
        let singleton_id = RecordId::from_table_key(TABLE, SINGLETON_ID);
        let _ = self
            .base
            .db()
            .query("UPDATE $id SET updated_at = $now")
            .bind(("id", singleton_id))
            .bind(("now", shared::util::now_millis()))
            .await?;

        // Merge update data
        let updated: Option<NotificationSettings> = self
            .base
            .db()
            .update((TABLE, SINGLETON_ID))
            .merge(data)
            .await?;
        updated.ok_or_else(|| {
            RepoError::Database("Failed to update notification settings".to_string())
        })
    }
}
