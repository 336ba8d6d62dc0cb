//! Batch identity and shared lifecycle states.
//!
//! Both the delay fan-out and the stream fan-out move a batch through the
//! same lifecycle, enforced at compile time with the typestate pattern:
//! `Idle -> Spawned -> Complete`. `Idle` is entry-only, `Complete` is
//! terminal, and the suspended "draining" phase is the await between the
//! two. Each fan-out flavor supplies its own `Spawned`/`Complete` payload
//! types; the entry state carries nothing and is shared here.

use serde::Serialize;
use uuid::Uuid;

/// Unique identifier for a batch, used to correlate log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BatchId(pub Uuid);

impl BatchId {
    /// Mint a fresh batch id.
    pub fn new() -> Self {
        BatchId(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BatchId {
    fn from(uuid: Uuid) -> Self {
        BatchId(uuid)
    }
}

impl std::ops::Deref for BatchId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display only first 8 characters for readability in logs
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Marker trait for valid batch lifecycle states.
///
/// This trait enables the typestate pattern, ensuring that operations are
/// only performed on batches in valid states.
pub trait BatchState: Send + Sync {}

/// Batch created; nothing has been scheduled yet.
///
/// This is the entry state for every batch. A batch never re-enters it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Idle;

impl BatchState for Idle {}
