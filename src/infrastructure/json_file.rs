use crate::config::Limits;
use crate::domain::ports::SnapshotStore;
use crate::domain::snapshot::Snapshot;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Snapshot persistence in a single JSON document.
///
/// Writes go to a side file next to the canonical path and are swapped in
/// with a single atomic rename, so a reader racing a writer always sees
/// either the old document or the new one in full. The store itself does no
/// locking; serialization of writers is the engine's job.
pub struct JsonFileStore {
    path: PathBuf,
    limits: Limits,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, limits: Limits) -> Self {
        Self {
            path: path.into(),
            limits,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn side_path(&self) -> PathBuf {
        let mut side = OsString::from(self.path.as_os_str());
        side.push(".tmp");
        PathBuf::from(side)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Snapshot> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // First run: persist an empty, valid snapshot and return it.
                let snapshot = Snapshot::empty();
                self.save(&snapshot).await?;
                debug!(path = %self.path.display(), "bootstrapped empty data file");
                return Ok(snapshot);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot =
            serde_json::from_str(&raw).map_err(|e| LedgerError::Corrupted(e.to_string()))?;
        snapshot
            .validate(&self.limits)
            .map_err(|e| LedgerError::Corrupted(e.to_string()))?;
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        // An invalid snapshot must never touch durable storage.
        snapshot.validate(&self.limits)?;
        let body = serde_json::to_string_pretty(snapshot)?;

        let side = self.side_path();
        tokio::fs::write(&side, body).await?;
        if let Err(e) = tokio::fs::rename(&side, &self.path).await {
            // Canonical file is untouched in this path; drop the side file.
            let _ = tokio::fs::remove_file(&side).await;
            return Err(e.into());
        }
        debug!(
            path = %self.path.display(),
            accounts = snapshot.accounts.len(),
            "snapshot persisted"
        );
        Ok(())
    }
}
