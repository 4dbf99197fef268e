//! Adaptation orchestrator: the single live-event entry point.
//!
//! One performance event flows through exactly one BKT update of the
//! knowledge overlay, then fans out to the affective and behavioral
//! sub-models and into a recommendation computed from the post-update
//! mastery. Collaborator stores are injected at construction; the engine
//! holds no global state.

mod replay;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;

use crate::affective::{AffectiveLabel, AffectiveState};
use crate::behavior::{BehaviorProfile, EngagementLabel};
use crate::config::EngineConfig;
use crate::error::ModelError;
use crate::knowledge::bkt::{bkt_update, score_to_correct};
use crate::knowledge::labels::MasteryLabel;
use crate::store::{ConceptParameterStore, ObservationLog, OverlayStore};
use crate::types::{ConceptParams, NewObservation, Outcome, OverlayEntry, OverlayKey, PerformanceEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    ReviseFundamentals,
    PracticeCurrentLevel,
    BuildConfidence,
    ProgressNextLevel,
    Challenge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: NextAction,
    pub support_level: SupportLevel,
    pub message: String,
}

/// Everything the surrounding system needs after one event: the fresh
/// mastery estimate plus the sub-model snapshots and the recommendation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationOutcome {
    pub learner_id: String,
    pub concept_id: String,
    pub correct: bool,
    pub mastery_level: f64,
    pub label: MasteryLabel,
    pub confidence: f64,
    pub affective: AffectiveState,
    pub affective_label: AffectiveLabel,
    pub engagement_score: f64,
    pub engagement_label: EngagementLabel,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptMastery {
    pub concept_id: String,
    pub mastery_level: f64,
    pub label: MasteryLabel,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSummary {
    pub learner_id: String,
    pub total_concepts: usize,
    pub average_mastery: f64,
    pub mastered_count: usize,
    pub label_counts: BTreeMap<&'static str, usize>,
    pub concepts: Vec<ConceptMastery>,
}

pub struct AdaptationEngine<P, O, S> {
    config: EngineConfig,
    params: Arc<P>,
    observations: Arc<O>,
    overlay: Arc<S>,
    affective: RwLock<HashMap<String, AffectiveState>>,
    behavior: RwLock<HashMap<String, BehaviorProfile>>,
    // Per-(learner, concept) critical section: log append + overlay write on
    // the live path, log read + overlay write in replay. Without it a replay
    // landing between the two live steps folds the freshly logged
    // observation in, and the live retry would count it a second time.
    update_locks: Mutex<HashMap<OverlayKey, Arc<AsyncMutex<()>>>>,
}

impl<P, O, S> AdaptationEngine<P, O, S>
where
    P: ConceptParameterStore,
    O: ObservationLog,
    S: OverlayStore,
{
    pub fn new(config: EngineConfig, params: Arc<P>, observations: Arc<O>, overlay: Arc<S>) -> Self {
        Self {
            config,
            params,
            observations,
            overlay,
            affective: RwLock::new(HashMap::new()),
            behavior: RwLock::new(HashMap::new()),
            update_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one live performance event.
    pub async fn apply_observation(
        &self,
        event: PerformanceEvent,
    ) -> Result<AdaptationOutcome, ModelError> {
        let outcome = event.outcome()?;
        let params = self.concept_params(&event.concept_id).await?;
        let correct = self.resolve_outcome(outcome);
        let key = OverlayKey::new(&event.learner_id, &event.concept_id);

        let lock = self.key_lock(&key);
        let entry = {
            let _guard = lock.lock().await;
            self.observations
                .append(NewObservation {
                    learner_id: event.learner_id.clone(),
                    concept_id: event.concept_id.clone(),
                    outcome,
                    timestamp_ms: event.timestamp_ms,
                })
                .await?;
            self.commit_update(&key, &params, correct, event.timestamp_ms)
                .await?
        };

        // Affective and behavioral sub-models live on disjoint per-learner
        // state and never gate the mastery write.
        let effective_score = event.score.unwrap_or(if correct { 80.0 } else { 20.0 });
        let affective = {
            let mut states = self.affective.write();
            let state = states.entry(event.learner_id.clone()).or_default();
            *state = state.after_score(effective_score);
            *state
        };
        let (engagement_score, engagement_label) = {
            let mut profiles = self.behavior.write();
            let profile = profiles.entry(event.learner_id.clone()).or_default();
            profile.record_event(
                event.timestamp_ms,
                event.time_spent_secs.unwrap_or(0),
                self.config.session_gap_ms,
            );
            (profile.engagement_score, profile.engagement_label())
        };

        let label = MasteryLabel::from_level(entry.mastery_level);
        let recommendation = recommend(&self.config, entry.mastery_level, &affective);

        tracing::debug!(
            learner = %event.learner_id,
            concept = %event.concept_id,
            correct,
            mastery = entry.mastery_level,
            "applied observation"
        );

        Ok(AdaptationOutcome {
            learner_id: event.learner_id,
            concept_id: event.concept_id,
            correct,
            mastery_level: entry.mastery_level,
            label,
            confidence: entry.confidence,
            affective,
            affective_label: affective.label(),
            engagement_score,
            engagement_label,
            recommendation,
        })
    }

    /// Read-only fan-out over the learner's overlay entries.
    pub async fn summary(&self, learner_id: &str) -> Result<KnowledgeSummary, ModelError> {
        let rows = self.overlay.list_for_learner(learner_id).await?;

        let mut label_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut mastery_sum = 0.0;
        let mut mastered_count = 0;
        let concepts: Vec<ConceptMastery> = rows
            .into_iter()
            .map(|(concept_id, entry)| {
                let label = MasteryLabel::from_level(entry.mastery_level);
                *label_counts.entry(label.as_str()).or_insert(0) += 1;
                mastery_sum += entry.mastery_level;
                if entry.mastery_level >= self.config.advance_threshold {
                    mastered_count += 1;
                }
                ConceptMastery {
                    concept_id,
                    mastery_level: entry.mastery_level,
                    label,
                    confidence: entry.confidence,
                }
            })
            .collect();

        let total_concepts = concepts.len();
        let average_mastery = if total_concepts == 0 {
            0.0
        } else {
            mastery_sum / total_concepts as f64
        };

        Ok(KnowledgeSummary {
            learner_id: learner_id.to_string(),
            total_concepts,
            average_mastery,
            mastered_count,
            label_counts,
            concepts,
        })
    }

    /// Latest affective state for a learner, if any event has been seen.
    pub fn affective_state(&self, learner_id: &str) -> Option<AffectiveState> {
        self.affective.read().get(learner_id).copied()
    }

    /// Latest behavioral profile for a learner, if any event has been seen.
    pub fn behavior_profile(&self, learner_id: &str) -> Option<BehaviorProfile> {
        self.behavior.read().get(learner_id).cloned()
    }

    fn key_lock(&self, key: &OverlayKey) -> Arc<AsyncMutex<()>> {
        Arc::clone(self.update_locks.lock().entry(key.clone()).or_default())
    }

    async fn concept_params(&self, concept_id: &str) -> Result<ConceptParams, ModelError> {
        let params = self.params.get_parameters(concept_id).await?.ok_or_else(|| {
            ModelError::MissingConceptParameters {
                concept_id: concept_id.to_string(),
            }
        })?;
        params.validate()?;
        Ok(params)
    }

    fn resolve_outcome(&self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Success(correct) => correct,
            Outcome::Score(score) => score_to_correct(score, self.config.score_threshold),
        }
    }

    /// Read-modify-write of one overlay entry under optimistic versioning.
    /// A version conflict means another update for the same pair committed
    /// in between; re-read and retry within the bounded budget.
    async fn commit_update(
        &self,
        key: &OverlayKey,
        params: &ConceptParams,
        correct: bool,
        timestamp_ms: i64,
    ) -> Result<OverlayEntry, ModelError> {
        for attempt in 1..=self.config.max_update_retries {
            let (mut entry, version) = match self.overlay.load(key).await? {
                Some(versioned) => (versioned.entry, versioned.version),
                None => (OverlayEntry::seeded(params.p_init), 0),
            };

            let next = bkt_update(entry.mastery_level, correct, params)?;
            entry.apply(correct, next, timestamp_ms);

            if self.overlay.save(key, entry.clone(), version).await? {
                return Ok(entry);
            }
            tracing::warn!(
                learner = %key.learner_id,
                concept = %key.concept_id,
                attempt,
                "overlay version conflict, retrying"
            );
        }

        Err(ModelError::ConcurrentUpdateConflict {
            learner_id: key.learner_id.clone(),
            concept_id: key.concept_id.clone(),
            attempts: self.config.max_update_retries,
        })
    }
}

/// Threshold lookup over the post-update mastery, shaded by the learner's
/// affective state.
fn recommend(config: &EngineConfig, mastery_level: f64, affective: &AffectiveState) -> Recommendation {
    let (action, message) = if mastery_level < config.practice_threshold {
        if affective.is_frustrated() {
            (
                NextAction::ReviseFundamentals,
                "Revisit the fundamentals with guided material before practicing again.",
            )
        } else {
            (
                NextAction::PracticeCurrentLevel,
                "Keep practicing this concept at the current level.",
            )
        }
    } else if mastery_level < config.advance_threshold {
        if affective.confidence < 0.5 {
            (
                NextAction::BuildConfidence,
                "Consolidate with a few more exercises at this level to build confidence.",
            )
        } else {
            (
                NextAction::ProgressNextLevel,
                "Ready to move on to slightly harder material.",
            )
        }
    } else {
        (
            NextAction::Challenge,
            "Concept mastered; take on more challenging cases.",
        )
    };

    let support_level = if affective.frustration > 0.5 {
        SupportLevel::High
    } else if affective.confidence < 0.5 {
        SupportLevel::Medium
    } else {
        SupportLevel::Low
    };

    Recommendation {
        action,
        support_level,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_bands_follow_mastery() {
        let config = EngineConfig::default();
        let calm = AffectiveState::default();

        let low = recommend(&config, 0.1, &calm);
        assert_eq!(low.action, NextAction::PracticeCurrentLevel);

        let mid = recommend(&config, 0.6, &calm);
        assert_eq!(mid.action, NextAction::ProgressNextLevel);

        let high = recommend(&config, 0.9, &calm);
        assert_eq!(high.action, NextAction::Challenge);
        assert_eq!(high.support_level, SupportLevel::Low);
    }

    #[test]
    fn frustration_steers_low_mastery_to_revision() {
        let config = EngineConfig::default();
        let frustrated = AffectiveState {
            frustration: 0.8,
            ..AffectiveState::default()
        };
        let rec = recommend(&config, 0.1, &frustrated);
        assert_eq!(rec.action, NextAction::ReviseFundamentals);
        assert_eq!(rec.support_level, SupportLevel::High);
    }

    #[test]
    fn shaky_confidence_holds_back_progression() {
        let config = EngineConfig::default();
        let shaky = AffectiveState {
            confidence: 0.2,
            ..AffectiveState::default()
        };
        let rec = recommend(&config, 0.6, &shaky);
        assert_eq!(rec.action, NextAction::BuildConfidence);
        assert_eq!(rec.support_level, SupportLevel::Medium);
    }
}
