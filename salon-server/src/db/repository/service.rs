//! Service Repository

use super::{BaseRepository, RepoError, RepoResult, Repository, strip_table_prefix};
use crate::db::models::{Service, ServiceCreate, ServiceUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "service";

#[derive(Clone)]
pub struct ServiceRepository {
    base: BaseRepository,
}

impl ServiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Services available for new bookings
    pub async fn find_active(&self) -> RepoResult<Vec<Service>> {
        let services: Vec<Service> = self
            .base
            .db()
            .query("SELECT * FROM service WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(services)
    }
}

impl Repository<Service, ServiceCreate, ServiceUpdate> for ServiceRepository {
    async fn find_all(&self) -> RepoResult<Vec<Service>> {
        let services: Vec<Service> = self
            .base
            .db()
            .query("SELECT * FROM service ORDER BY name")
            .await?
            .take(0)?;
        Ok(services)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Service>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let service: Option<Service> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(service)
    }

    async fn create(&self, data: ServiceCreate) -> RepoResult<Service> {
        if data.duration_minutes <= 0 {
            return Err(RepoError::Validation(
                "duration_minutes must be greater than zero".into(),
            ));
        }
        if data.price < 0.0 {
            return Err(RepoError::Validation("price must not be negative".into()));
        }

        let service = Service {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            duration_minutes: data.duration_minutes,
            price: data.price,
            is_active: true,
            created_at: shared::util::now_millis(),
        };

        let created: Option<Service> = self.base.db().create(TABLE).content(service).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create service".to_string()))
    }

    async fn update(&self, id: &str, data: ServiceUpdate) -> RepoResult<Service> {
        if let Some(d) = data.duration_minutes
            && d <= 0
        {
            return Err(RepoError::Validation(
                "duration_minutes must be greater than zero".into(),
            ));
        }
        if let Some(p) = data.price
            && p < 0.0
        {
            return Err(RepoError::Validation("price must not be negative".into()));
        }

        let pure_id = strip_table_prefix(TABLE, id).to_string();
        let updated: Option<Service> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .merge(data)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Service {}", id)))
    }

    /// Soft delete: deactivation hides the service from new bookings but
    /// leaves existing appointments untouched
    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id).to_string();
        let updated: Option<Service> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .merge(ServiceUpdate {
                name: None,
                description: None,
                duration_minutes: None,
                price: None,
                is_active: Some(false),
            })
            .await?;
        Ok(updated.is_some())
    }
}
