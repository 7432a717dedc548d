//! Client Repository

use super::{BaseRepository, RepoError, RepoResult, Repository, strip_table_prefix};
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "client";

#[derive(Clone)]
pub struct ClientRepository {
    base: BaseRepository,
}

impl ClientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Case-insensitive name/phone search
    pub async fn search(&self, term: &str) -> RepoResult<Vec<Client>> {
        let clients: Vec<Client> = self
            .base
            .db()
            .query(
                "SELECT * FROM client \
                 WHERE string::lowercase(name) CONTAINS string::lowercase($term) \
                    OR phone CONTAINS $term \
                 ORDER BY name",
            )
            .bind(("term", term.to_string()))
            .await?
            .take(0)?;
        Ok(clients)
    }
}

impl Repository<Client, ClientCreate, ClientUpdate> for ClientRepository {
    async fn find_all(&self) -> RepoResult<Vec<Client>> {
        let clients: Vec<Client> = self
            .base
            .db()
            .query("SELECT * FROM client ORDER BY name")
            .await?
            .take(0)?;
        Ok(clients)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Client>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let client: Option<Client> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(client)
    }

    async fn create(&self, data: ClientCreate) -> RepoResult<Client> {
        let client = Client {
            id: None,
            name: data.name,
            phone: data.phone,
            photo_url: data.photo_url,
            created_at: shared::util::now_millis(),
        };

        let created: Option<Client> = self.base.db().create(TABLE).content(client).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create client".to_string()))
    }

    async fn update(&self, id: &str, data: ClientUpdate) -> RepoResult<Client> {
        let pure_id = strip_table_prefix(TABLE, id).to_string();
        let updated: Option<Client> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .merge(data)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Client {}", id)))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id).to_string();
        let deleted: Option<Client> = self.base.db().delete((TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }
}
