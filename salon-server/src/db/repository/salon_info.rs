//! Salon Info Repository (Singleton)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{SalonInfo, SalonInfoUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "salon_info";
const SINGLETON_ID: &str = "main";

#[derive(Clone)]
pub struct SalonInfoRepository {
    base: BaseRepository,
}

impl SalonInfoRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get or create the singleton salon info
    pub async fn get_or_create(&self) -> RepoResult<SalonInfo> {
        if let Some(info) = self.get().await? {
            return Ok(info);
        }

        let info = SalonInfo::default();

        let created: Option<SalonInfo> = self
            .base
            .db()
            .create((TABLE, SINGLETON_ID))
            .content(info)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create salon info".to_string()))
    }

    /// Get the singleton salon info
    pub async fn get(&self) -> RepoResult<Option<SalonInfo>> {
        let info: Option<SalonInfo> = self.base.db().select((TABLE, SINGLETON_ID)).await?;
        Ok(info)
    }

    /// Merge an update into the salon info
    pub async fn update(&self, data: SalonInfoUpdate) -> RepoResult<SalonInfo> {
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
        let updated: Option<SalonInfo> = self
            .base
            .db()
            .update((TABLE, SINGLETON_ID))
            .merge(data)
            .await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update salon info".to_string()))
    }
}
