//! Snapshot persistence for the registry.
//!
//! The whole registry graph is written as one versioned JSON snapshot.
//! Saves go through a temp-file-then-rename so a failed write never
//! truncates the previous snapshot, and decodes are validated before the
//! caller swaps the result in. A background task autosaves on a fixed
//! interval and stops cooperatively at shutdown.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::Registry;

/// Current snapshot schema version. Bumped on incompatible layout changes;
/// older snapshots decode through `#[serde(default)]` fields.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Seconds between automatic background saves.
pub const DEFAULT_AUTOSAVE_SECS: u64 = 60;

/// The registry as shared between the REPL and the autosave task. Mutations
/// hold the write lock for the whole command, so a save (the read side)
/// never observes a half-applied change.
pub type SharedRegistry = Arc<RwLock<Registry>>;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// On-disk snapshot envelope. An explicit schema, not the in-memory layout:
/// unknown fields are ignored and missing ones default, so older builds'
/// snapshots keep decoding.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    registry: Registry,
}

/// Reads and writes registry snapshots at a fixed path.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user data directory, e.g.
    /// `~/.local/share/oncall-rota/rota.state.json` on Linux.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "oncall-rota")
            .context("could not determine data directory")?;
        Ok(Self::new(dirs.data_dir().join("rota.state.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the registry to the store path.
    ///
    /// The caller is responsible for passing a consistent view (clone the
    /// registry under its lock); this function does no locking itself.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Some(Utc::now()),
            registry: registry.clone(),
        };
        let encoded = serde_json::to_vec_pretty(&snapshot).context("failed to encode snapshot")?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        // Write-then-rename keeps the previous snapshot intact on failure.
        // The suffix is appended, not substituted, so sibling snapshots that
        // differ only in extension never share a temp name.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, &encoded)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e)
                .with_context(|| format!("failed to replace {}", self.path.display()));
        }
        Ok(())
    }

    /// Decode and validate a snapshot, yielding a complete replacement
    /// registry. The caller swaps it in wholesale; nothing is merged.
    pub fn load(&self) -> Result<Registry> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).context("failed to decode snapshot")?;
        if snapshot.version > SNAPSHOT_VERSION {
            anyhow::bail!(
                "snapshot version {} is newer than supported version {}",
                snapshot.version,
                SNAPSHOT_VERSION
            );
        }
        snapshot
            .registry
            .validate()
            .context("snapshot failed validation")?;
        tracing::debug!(
            version = snapshot.version,
            saved_at = ?snapshot.saved_at,
            "decoded snapshot"
        );
        Ok(snapshot.registry)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Spawn the periodic autosave task.
///
/// Every `interval` the registry is cloned under its read lock and saved
/// silently. Failures are reported as warnings and the loop keeps running;
/// the operator is told to run a manual `save`. When `stop` changes the task
/// performs one last save before exiting, and the returned handle lets
/// shutdown await it, so work done since the previous tick is persisted (or
/// fails cleanly) before the process exits.
pub fn spawn_autosave(
    registry: SharedRegistry,
    store: Store,
    interval: Duration,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let save_cycle = || {
            let view = registry.read().expect("registry lock poisoned").clone();
            match store.save(&view) {
                Ok(()) => {
                    tracing::debug!(path = %store.path().display(), "autosaved registry");
                }
                Err(e) => {
                    tracing::warn!("automatic save failed: {e:#}");
                    eprintln!("[Warning] Automatic save failed: {e:#}");
                    eprintln!("[Warning] Run 'save' manually to persist your state!");
                }
            }
        };

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // the first tick fires immediately; skip it so saves start one
        // interval after launch
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => save_cycle(),
                _ = stop.changed() => {
                    // persist work done since the last tick before exiting
                    save_cycle();
                    break;
                }
            }
        }
    })
}
