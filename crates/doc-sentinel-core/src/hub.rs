// crates/doc-sentinel-core/src/hub.rs
// ============================================================================
// Module: Broadcast Hub
// Description: Client registry and fan-out delivery for live update events.
// Purpose: Deliver event messages to every currently connected client.
// Dependencies: serde, tokio
// ============================================================================

//! ## Overview
//! [`BroadcastHub`] tracks the set of connected live clients and fans event
//! messages out to all of them. Each client owns the receiving half of a
//! bounded channel; delivery uses a non-blocking send and a closed or full
//! channel is silently skipped, so one dead client never blocks delivery to
//! the rest. There is no replay for late joiners and no per-client
//! acknowledgment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::sync::PoisonError;

use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::Sender;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Capacity of each connected client's delivery channel.
pub const CLIENT_CHANNEL_CAPACITY: usize = 32;

// ============================================================================
// SECTION: Messages
// ============================================================================

/// Event messages delivered to connected clients.
///
/// Serialized with a `type` discriminator matching the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HubMessage {
    /// Raw diff of the watched resource.
    FileChange {
        /// Content before the change.
        #[serde(rename = "oldContent")]
        old_content: String,
        /// Content after the change.
        #[serde(rename = "newContent")]
        new_content: String,
    },
    /// Refreshed contradiction report.
    Report {
        /// Plain-text report body.
        report: String,
    },
    /// Progress notification, reserved for future pipelines; never emitted
    /// by the current one.
    Status {
        /// Progress message body.
        message: String,
    },
}

// ============================================================================
// SECTION: Client Identity
// ============================================================================

/// Identity of a connected client within the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClientId(u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

// ============================================================================
// SECTION: Broadcast Hub
// ============================================================================

/// Registry state guarded by the hub lock.
#[derive(Debug, Default)]
struct HubInner {
    /// Next client id to assign.
    next_id: u64,
    /// Delivery channels keyed by client id.
    clients: HashMap<u64, Sender<HubMessage>>,
}

/// Fan-out hub for currently connected live clients.
///
/// # Invariants
/// - Membership changes are effective immediately.
/// - `broadcast` delivers to the membership as it stood when the broadcast
///   started; clients registered afterwards receive nothing from it.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    /// Registry state, guarded by a single lock with no I/O inside.
    inner: Mutex<HubInner>,
}

impl BroadcastHub {
    /// Creates a hub with no connected clients.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new client and returns its identity and message channel.
    #[must_use]
    pub fn register(&self) -> (ClientId, Receiver<HubMessage>) {
        let (sender, receiver) = mpsc::channel(CLIENT_CHANNEL_CAPACITY);
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = guard.next_id;
        guard.next_id = guard.next_id.wrapping_add(1);
        guard.clients.insert(id, sender);
        (ClientId(id), receiver)
    }

    /// Removes a client from the registry.
    pub fn unregister(&self, id: ClientId) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clients.remove(&id.0);
    }

    /// Returns the number of currently registered clients.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clients.len()
    }

    /// Delivers a message to every client registered when the call started.
    ///
    /// A client whose channel is closed or full is skipped without error.
    /// Returns the number of clients the message was handed to.
    pub fn broadcast(&self, message: &HubMessage) -> usize {
        let senders: Vec<Sender<HubMessage>> = {
            let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            guard.clients.values().cloned().collect()
        };
        let mut delivered = 0;
        for sender in senders {
            if sender.try_send(message.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
