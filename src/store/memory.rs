//! In-memory reference stores backing tests and embedded use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::ModelError;
use crate::store::{ConceptParameterStore, ObservationLog, OverlayStore, VersionedEntry};
use crate::types::{ConceptParams, NewObservation, Observation, OverlayEntry, OverlayKey};

#[derive(Default)]
pub struct MemoryParameterStore {
    params: RwLock<HashMap<String, ConceptParams>>,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register parameters for a concept. Validation happened at
    /// `ConceptParams` construction, so this cannot admit bad values.
    pub fn insert(&self, concept_id: impl Into<String>, params: ConceptParams) {
        self.params.write().insert(concept_id.into(), params);
    }
}

impl ConceptParameterStore for MemoryParameterStore {
    async fn get_parameters(&self, concept_id: &str) -> Result<Option<ConceptParams>, ModelError> {
        Ok(self.params.read().get(concept_id).copied())
    }
}

#[derive(Default)]
pub struct MemoryObservationLog {
    records: RwLock<HashMap<(String, String), Vec<Observation>>>,
    next_sequence: AtomicU64,
}

impl MemoryObservationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObservationLog for MemoryObservationLog {
    async fn append(&self, observation: NewObservation) -> Result<Observation, ModelError> {
        let record = Observation {
            id: uuid::Uuid::new_v4().to_string(),
            learner_id: observation.learner_id.clone(),
            concept_id: observation.concept_id.clone(),
            outcome: observation.outcome,
            timestamp_ms: observation.timestamp_ms,
            sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
        };
        self.records
            .write()
            .entry((observation.learner_id, observation.concept_id))
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn list(
        &self,
        learner_id: &str,
        concept_id: &str,
    ) -> Result<Vec<Observation>, ModelError> {
        let mut records = self
            .records
            .read()
            .get(&(learner_id.to_string(), concept_id.to_string()))
            .cloned()
            .unwrap_or_default();
        records.sort_by_key(|r| (r.timestamp_ms, r.sequence));
        Ok(records)
    }
}

#[derive(Default)]
pub struct MemoryOverlayStore {
    entries: RwLock<HashMap<OverlayKey, (OverlayEntry, u64)>>,
}

impl MemoryOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayStore for MemoryOverlayStore {
    async fn load(&self, key: &OverlayKey) -> Result<Option<VersionedEntry>, ModelError> {
        Ok(self
            .entries
            .read()
            .get(key)
            .map(|(entry, version)| VersionedEntry {
                entry: entry.clone(),
                version: *version,
            }))
    }

    async fn save(
        &self,
        key: &OverlayKey,
        entry: OverlayEntry,
        expected_version: u64,
    ) -> Result<bool, ModelError> {
        let mut entries = self.entries.write();
        let current = entries.get(key).map(|(_, version)| *version).unwrap_or(0);
        if current != expected_version {
            return Ok(false);
        }
        entries.insert(key.clone(), (entry, current + 1));
        Ok(true)
    }

    async fn list_for_learner(
        &self,
        learner_id: &str,
    ) -> Result<Vec<(String, OverlayEntry)>, ModelError> {
        let mut rows: Vec<(String, OverlayEntry)> = self
            .entries
            .read()
            .iter()
            .filter(|(key, _)| key.learner_id == learner_id)
            .map(|(key, (entry, _))| (key.concept_id.clone(), entry.clone()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(rows)
    }
}
