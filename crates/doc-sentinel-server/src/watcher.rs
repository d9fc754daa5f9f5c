// crates/doc-sentinel-server/src/watcher.rs
// ============================================================================
// Module: Policy Watcher
// Description: Change detection and read-and-diff for the watched resource.
// Purpose: Turn raw change signals into content change events.
// Dependencies: tokio, thiserror
// ============================================================================

//! ## Overview
//! Change detection is split in two. A polling notifier task produces a
//! lazy, infinite stream of raw [`ChangeSignal`]s whenever the watched
//! file's metadata fingerprint moves. [`PolicyWatcher`] consumes signals,
//! reads the resource, and emits one [`ChangeEvent`] per signal with the
//! previously cached content as `old_content` — identical content is NOT
//! deduplicated, so a touched-but-unchanged file still produces an event.
//! Any successful read, including a transiently empty one, is valid new
//! content; only an I/O failure skips the event, and the cache then stays
//! untouched so the next signal diffs against the same baseline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::Receiver;
use tokio::time::MissedTickBehavior;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Capacity of the raw change-signal channel.
pub const SIGNAL_CHANNEL_CAPACITY: usize = 16;

// ============================================================================
// SECTION: Change Types
// ============================================================================

/// Raw notification that the watched resource may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSignal;

/// Observed content change of the watched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Content before the change, from the watcher cache.
    pub old_content: String,
    /// Freshly read content after the change.
    pub new_content: String,
}

/// The watched resource could not be read at notification time.
#[derive(Debug, Clone, Error)]
#[error("watched resource read failed: {reason}")]
pub struct ResourceReadError {
    /// Underlying I/O failure description.
    pub reason: String,
}

// ============================================================================
// SECTION: Change Notifier
// ============================================================================

/// Metadata fingerprint used to detect modifications.
type Fingerprint = Option<(SystemTime, u64)>;

/// Spawns a polling notifier for the given path.
///
/// The returned channel yields one [`ChangeSignal`] per observed fingerprint
/// move (modification time or length). The stream is infinite and
/// non-restartable; the task ends when the receiver is dropped.
#[must_use]
pub fn spawn_change_signals(path: PathBuf, poll_interval: Duration) -> Receiver<ChangeSignal> {
    let (sender, receiver) = mpsc::channel(SIGNAL_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut fingerprint = read_fingerprint(&path).await;
        loop {
            ticker.tick().await;
            let current = read_fingerprint(&path).await;
            if current != fingerprint {
                fingerprint = current;
                if sender.send(ChangeSignal).await.is_err() {
                    break;
                }
            }
        }
    });
    receiver
}

/// Reads the current metadata fingerprint; `None` when the file is absent.
async fn read_fingerprint(path: &Path) -> Fingerprint {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    let modified = metadata.modified().ok()?;
    Some((modified, metadata.len()))
}

// ============================================================================
// SECTION: Policy Watcher
// ============================================================================

/// Read-and-diff consumer for the watched policy resource.
///
/// # Invariants
/// - `content` always holds the last successfully read resource content.
/// - One signal produces at most one event; no dedup of identical content.
pub struct PolicyWatcher {
    /// Path of the watched resource.
    path: PathBuf,
    /// Last-known resource content.
    content: String,
}

impl PolicyWatcher {
    /// Initializes the watcher by reading the resource.
    ///
    /// An unreadable or absent resource starts the cache empty, matching the
    /// process-start behavior of the service.
    pub async fn bootstrap(path: PathBuf) -> Self {
        let content = tokio::fs::read_to_string(&path).await.unwrap_or_default();
        Self {
            path,
            content,
        }
    }

    /// Returns the watched resource path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached resource content.
    #[must_use]
    pub fn cached_content(&self) -> &str {
        &self.content
    }

    /// Reads the resource and emits the change event for one signal.
    ///
    /// On success the cache advances to the new content. On failure the
    /// cache is untouched and the signal is dropped by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceReadError`] when the resource cannot be read.
    pub async fn read_change(&mut self) -> Result<ChangeEvent, ResourceReadError> {
        let new_content =
            tokio::fs::read_to_string(&self.path).await.map_err(|err| ResourceReadError {
                reason: err.to_string(),
            })?;
        let event = ChangeEvent {
            old_content: self.content.clone(),
            new_content: new_content.clone(),
        };
        self.content = new_content;
        Ok(event)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
