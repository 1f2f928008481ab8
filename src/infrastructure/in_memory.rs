use crate::config::Limits;
use crate::domain::ports::SnapshotStore;
use crate::domain::snapshot::Snapshot;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory [`SnapshotStore`] with the same validation contract as the
/// file-backed store. Used in tests where durability is irrelevant.
#[derive(Clone)]
pub struct InMemorySnapshotStore {
    snapshot: Arc<RwLock<Snapshot>>,
    limits: Limits,
}

impl InMemorySnapshotStore {
    pub fn new(limits: Limits) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Snapshot::empty())),
            limits,
        }
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<Snapshot> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot.clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        snapshot.validate(&self.limits)?;
        let mut current = self.snapshot.write().await;
        *current = snapshot.clone();
        Ok(())
    }
}
