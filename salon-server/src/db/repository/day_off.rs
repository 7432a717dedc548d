//! Day-Off Repository (Singleton calendar)
//!
//! The calendar is a single document mapping dates to closure entries, the
//! shape the settings screen reads in one subscription. Mutations are
//! read-modify-write of the whole document.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DayOffCalendar, DayOffEntry};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "day_off";
const SINGLETON_ID: &str = "main";

#[derive(Clone)]
pub struct DayOffRepository {
    base: BaseRepository,
}

impl DayOffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get or create the singleton calendar
    pub async fn get_or_create(&self) -> RepoResult<DayOffCalendar> {
        if let Some(calendar) = self.get().await? {
            return Ok(calendar);
        }

        let calendar = DayOffCalendar {
            id: None,
            entries: Default::default(),
            updated_at: shared::util::now_millis(),
        };

        let created: Option<DayOffCalendar> = self
            .base
            .db()
            .create((TABLE, SINGLETON_ID))
            .content(calendar)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create day-off calendar".to_string()))
    }

    /// Get the singleton calendar
    pub async fn get(&self) -> RepoResult<Option<DayOffCalendar>> {
        let calendar: Option<DayOffCalendar> =
            self.base.db().select((TABLE, SINGLETON_ID)).await?;
        Ok(calendar)
    }

    /// Add a closure entry; fails if the date already has one
    pub async fn add_entry(&self, date: &str, reason: &str) -> RepoResult<DayOffCalendar> {
        let mut calendar = self.get_or_create().await?;
        if calendar.entries.contains_key(date) {
            return Err(RepoError::Validation(format!(
                "Day off already exists for {date}"
            )));
        }

        calendar.entries.insert(
            date.to_string(),
            DayOffEntry {
                date: date.to_string(),
                active: true,
                reason: reason.to_string(),
            },
        );
        self.write(calendar).await
    }

    /// Flip an entry's `active` flag
    pub async fn toggle_entry(&self, date: &str) -> RepoResult<DayOffCalendar> {
        let mut calendar = self.get_or_create().await?;
        let entry = calendar
            .entries
            .get_mut(date)
            .ok_or_else(|| RepoError::NotFound(format!("Day off {date}")))?;
        entry.active = !entry.active;
        self.write(calendar).await
    }

    /// Remove an entry
    pub async fn remove_entry(&self, date: &str) -> RepoResult<DayOffCalendar> {
        let mut calendar = self.get_or_create().await?;
        if calendar.entries.remove(date).is_none() {
            return Err(RepoError::NotFound(format!("Day off {date}")));
        }
        self.write(calendar).await
    }

    /// Persist the whole calendar document
    async fn write(&self, mut calendar: DayOffCalendar) -> RepoResult<DayOffCalendar> {
        calendar.id = None;
        calendar.updated_at = shared::util::now_millis();

        let updated: Option<DayOffCalendar> = self
            .base
            .db()
            .update((TABLE, SINGLETON_ID))
            .content(calendar)
            .await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update day-off calendar".to_string()))
    }
}
