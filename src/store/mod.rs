//! Collaborator seams for the engine.
//!
//! The surrounding system owns persistence; the engine only needs a
//! parameter lookup, an append-only observation log, and a versioned overlay
//! map with compare-and-swap writes. `memory` provides the reference
//! implementations used by tests and embedded deployments.

pub mod memory;

use crate::error::ModelError;
use crate::types::{ConceptParams, NewObservation, Observation, OverlayEntry, OverlayKey};

pub use memory::{MemoryObservationLog, MemoryOverlayStore, MemoryParameterStore};

/// An overlay entry together with the version it was read at. Version 0
/// means the entry does not exist yet.
#[derive(Debug, Clone)]
pub struct VersionedEntry {
    pub entry: OverlayEntry,
    pub version: u64,
}

/// Read-only lookup from concept id to its BKT parameters.
#[allow(async_fn_in_trait)]
pub trait ConceptParameterStore: Send + Sync {
    async fn get_parameters(&self, concept_id: &str) -> Result<Option<ConceptParams>, ModelError>;
}

/// Ordered log of observations per (learner, concept) pair.
#[allow(async_fn_in_trait)]
pub trait ObservationLog: Send + Sync {
    /// Persist one observation. The log assigns the record id and a
    /// monotonic sequence number used to break timestamp ties.
    async fn append(&self, observation: NewObservation) -> Result<Observation, ModelError>;

    /// All observations for the pair, ordered by timestamp then sequence.
    async fn list(&self, learner_id: &str, concept_id: &str)
        -> Result<Vec<Observation>, ModelError>;
}

/// Keyed mastery overlay with optimistic concurrency. The composite key
/// makes (learner, concept) uniqueness structural.
#[allow(async_fn_in_trait)]
pub trait OverlayStore: Send + Sync {
    async fn load(&self, key: &OverlayKey) -> Result<Option<VersionedEntry>, ModelError>;

    /// Compare-and-swap write: commits only if the stored version still
    /// equals `expected_version` (0 = must not exist). Returns false on a
    /// version conflict.
    async fn save(
        &self,
        key: &OverlayKey,
        entry: OverlayEntry,
        expected_version: u64,
    ) -> Result<bool, ModelError>;

    /// All entries for a learner, ordered by concept id.
    async fn list_for_learner(
        &self,
        learner_id: &str,
    ) -> Result<Vec<(String, OverlayEntry)>, ModelError>;
}
