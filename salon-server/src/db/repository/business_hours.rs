//! Business Hours Repository (Singleton)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{BusinessHours, BusinessHoursUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "business_hours";
const SINGLETON_ID: &str = "main";

#[derive(Clone)]
pub struct BusinessHoursRepository {
    base: BaseRepository,
}

impl BusinessHoursRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get or create the singleton weekly schedule
    pub async fn get_or_create(&self) -> RepoResult<BusinessHours> {
        if let Some(hours) = self.get().await? {
            return Ok(hours);
        }

        let hours = BusinessHours {
            id: None,
            days: BusinessHours::default_week(),
            updated_at: shared::util::now_millis(),
        };

        let created: Option<BusinessHours> = self
            .base
            .db()
            .create((TABLE, SINGLETON_ID))
            .content(hours)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create business hours".to_string()))
    }

    /// Get the singleton weekly schedule
    pub async fn get(&self) -> RepoResult<Option<BusinessHours>> {
        let hours: Option<BusinessHours> =
            self.base.db().select((TABLE, SINGLETON_ID)).await?;
        Ok(hours)
    }

    /// Replace the weekly schedule
    pub async fn update(&self, data: BusinessHoursUpdate) -> RepoResult<BusinessHours> {
        // Ensure singleton exists
        self.get_or_create().await?;

        let hours = BusinessHours {
            id: None,
            days: data.days,
            updated_at: shared::util::now_millis(),
        };

        let updated: Option<BusinessHours> = self
            .base
            .db()
            .update((TABLE, SINGLETON_ID))
            .content(hours)
            .await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update business hours".to_string()))
    }
}
