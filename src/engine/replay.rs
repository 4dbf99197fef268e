//! History replay: rebuild an overlay entry from the ordered observation
//! log, as if every attempt had just been processed live.

use crate::engine::AdaptationEngine;
use crate::error::ModelError;
use crate::knowledge::bkt::{bkt_update, score_to_correct};
use crate::store::{ConceptParameterStore, ObservationLog, OverlayStore};
use crate::types::{ConceptParams, Observation, Outcome, OverlayEntry, OverlayKey};

impl<P, O, S> AdaptationEngine<P, O, S>
where
    P: ConceptParameterStore,
    O: ObservationLog,
    S: OverlayStore,
{
    /// Recompute the mastery level for (learner, concept) from scratch.
    ///
    /// The fold starts at `p_init` and applies the update primitive once per
    /// observation in timestamp order (sequence breaks ties), so replaying
    /// an unchanged log is idempotent. Runs under the per-key update lock
    /// and replaces the stored entry in a single versioned write; a version
    /// conflict can then only come from an out-of-process writer, and the
    /// replay re-reads and retries. With no observations the result is
    /// exactly `p_init`.
    pub async fn replay(&self, learner_id: &str, concept_id: &str) -> Result<f64, ModelError> {
        let params = self.concept_params(concept_id).await?;
        let key = OverlayKey::new(learner_id, concept_id);

        // Same critical section as the live path, so the log cannot gain an
        // observation between the list below and the write.
        let lock = self.key_lock(&key);
        let _guard = lock.lock().await;

        for attempt in 1..=self.config.max_update_retries {
            let version = self
                .overlay
                .load(&key)
                .await?
                .map(|versioned| versioned.version)
                .unwrap_or(0);

            let observations = self.observations.list(learner_id, concept_id).await?;
            let steps = observations.len();
            let entry = self.rebuild_entry(&params, &observations)?;
            let mastery_level = entry.mastery_level;

            if self.overlay.save(&key, entry, version).await? {
                tracing::info!(
                    learner = learner_id,
                    concept = concept_id,
                    steps,
                    mastery = mastery_level,
                    "replayed observation history"
                );
                return Ok(mastery_level);
            }
            tracing::warn!(
                learner = learner_id,
                concept = concept_id,
                attempt,
                "external overlay write raced the replay, retrying"
            );
        }

        Err(ModelError::ConcurrentUpdateConflict {
            learner_id: learner_id.to_string(),
            concept_id: concept_id.to_string(),
            attempts: self.config.max_update_retries,
        })
    }

    fn rebuild_entry(
        &self,
        params: &ConceptParams,
        observations: &[Observation],
    ) -> Result<OverlayEntry, ModelError> {
        let mut entry = OverlayEntry::seeded(params.p_init);
        for observation in observations {
            let correct = match observation.outcome {
                Outcome::Success(correct) => correct,
                Outcome::Score(score) => score_to_correct(score, self.config.score_threshold),
            };
            let next = bkt_update(entry.mastery_level, correct, params)?;
            entry.apply(correct, next, observation.timestamp_ms);
        }
        Ok(entry)
    }
}
