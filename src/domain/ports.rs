use crate::domain::snapshot::Snapshot;
use crate::error::Result;
use async_trait::async_trait;

/// Durable, validated, atomic persistence of the whole [`Snapshot`].
///
/// `save` must be all-or-nothing: at every instant the durable location holds
/// either the previous snapshot or the new one, never a partial write. `load`
/// must only ever return a fully-validated snapshot, bootstrapping an empty
/// one on first use.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> Result<Snapshot>;
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
