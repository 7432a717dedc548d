use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::{Notify, broadcast};

use crate::core::Config;
use crate::db::DbService;

/// Capacity of the sync broadcast channel; slow subscribers past this many
/// pending events start losing the oldest ones
const SYNC_CHANNEL_CAPACITY: usize = 256;

/// Resource version manager
///
/// Lock-free per-resource version counters on a DashMap. Every resource
/// type keeps an independent, atomically incremented version so clients
/// can order the sync events they receive.
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// Create an empty version manager
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Increment the version for a resource and return the new value
    ///
    /// Unknown resources start at 0 (first increment returns 1)
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version for a resource, 0 if never incremented
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// Change notification broadcast to live subscribers on every mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Resource type ("client", "service", "appointment", ...)
    pub resource: String,
    /// Monotonically increasing per-resource version
    pub version: u64,
    /// Change type ("created", "updated", "deleted", "due")
    pub action: String,
    /// Resource id
    pub id: String,
    /// Resource data (None for deletions)
    pub data: Option<serde_json::Value>,
}

/// Live subscription to the sync stream
///
/// Obtained from [`ServerState::subscribe_sync`]; dropping the subscription
/// (or calling [`SyncSubscription::cancel`]) unsubscribes.
pub struct SyncSubscription {
    rx: broadcast::Receiver<SyncPayload>,
}

impl SyncSubscription {
    /// Next payload, or `None` once the server shuts the stream down
    ///
    /// A lagging subscriber skips the dropped events and keeps receiving.
    pub async fn next(&mut self) -> Option<SyncPayload> {
        loop {
            match self.rx.recv().await {
                Ok(payload) => return Some(payload),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Sync subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Explicitly end the subscription
    pub fn cancel(self) {}
}

/// Server state - shared handles for all services
///
/// Cloning is shallow; every field is either `Copy`, an `Arc`, or a handle
/// that is itself cheaply cloneable.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Per-resource version counters for sync events
    pub resource_versions: Arc<ResourceVersions>,
    /// Sync event fan-out to live subscribers
    sync_tx: broadcast::Sender<SyncPayload>,
    /// Nudges the reminder scheduler when settings or appointments change
    reminder_notify: Arc<Notify>,
}

impl ServerState {
    /// Create server state over an already-open database
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let (sync_tx, _) = broadcast::channel(SYNC_CHANNEL_CAPACITY);
        Self {
            config,
            db,
            resource_versions: Arc::new(ResourceVersions::new()),
            sync_tx,
            reminder_notify: Arc::new(Notify::new()),
        }
    }

    /// Initialize server state
    ///
    /// Creates the working directory structure and opens the database under
    /// `work_dir/database/`.
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be initialized
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("petala.db");
        let db_path_str = db_path.to_string_lossy();

        let db_service = DbService::new(&db_path_str)
            .await
            .expect("Failed to initialize database");

        Self::new(config.clone(), db_service.db)
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Working directory
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// Broadcast a sync notification to all live subscribers
    ///
    /// The version is assigned from [`ResourceVersions`]; a send with no
    /// subscribers is not an error.
    pub fn broadcast_sync<T: Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        let _ = self.sync_tx.send(payload);
    }

    /// Subscribe to the live sync stream
    pub fn subscribe_sync(&self) -> SyncSubscription {
        SyncSubscription {
            rx: self.sync_tx.subscribe(),
        }
    }

    /// Handle the reminder scheduler waits on
    pub fn reminder_notify(&self) -> Arc<Notify> {
        self.reminder_notify.clone()
    }

    /// Wake the reminder scheduler to re-read settings and appointments
    pub fn notify_reminder_scheduler(&self) {
        self.reminder_notify.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_versions_increment() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("client"), 0);
        assert_eq!(versions.increment("client"), 1);
        assert_eq!(versions.increment("client"), 2);
        assert_eq!(versions.increment("service"), 1);
        assert_eq!(versions.get("client"), 2);
    }
}
