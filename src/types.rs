use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::knowledge::bkt::estimate_confidence;

/// BKT parameters for one concept. Each value is a probability; construction
/// rejects anything outside [0,1] instead of clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptParams {
    pub p_init: f64,
    pub p_transit: f64,
    pub p_guess: f64,
    pub p_slip: f64,
}

impl ConceptParams {
    pub fn new(p_init: f64, p_transit: f64, p_guess: f64, p_slip: f64) -> Result<Self, ModelError> {
        let params = Self {
            p_init,
            p_transit,
            p_guess,
            p_slip,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [
            ("pInit", self.p_init),
            ("pTransit", self.p_transit),
            ("pGuess", self.p_guess),
            ("pSlip", self.p_slip),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(ModelError::InvalidParameters {
                    reason: format!("{name} = {value} is outside [0, 1]"),
                });
            }
        }
        Ok(())
    }
}

impl Default for ConceptParams {
    fn default() -> Self {
        Self {
            p_init: 0.2,
            p_transit: 0.15,
            p_guess: 0.2,
            p_slip: 0.1,
        }
    }
}

/// What was observed for one attempt: either a direct success flag or a raw
/// 0-100 score still to be thresholded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Success(bool),
    Score(f64),
}

/// One attempt as stored in the observation log. `sequence` is assigned by
/// the log and breaks timestamp ties so replay order is reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    pub learner_id: String,
    pub concept_id: String,
    pub outcome: Outcome,
    pub timestamp_ms: i64,
    pub sequence: u64,
}

/// Observation payload before the log assigns identity and sequence.
#[derive(Debug, Clone)]
pub struct NewObservation {
    pub learner_id: String,
    pub concept_id: String,
    pub outcome: Outcome,
    pub timestamp_ms: i64,
}

/// Composite overlay key; one entry per (learner, concept) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayKey {
    pub learner_id: String,
    pub concept_id: String,
}

impl OverlayKey {
    pub fn new(learner_id: impl Into<String>, concept_id: impl Into<String>) -> Self {
        Self {
            learner_id: learner_id.into(),
            concept_id: concept_id.into(),
        }
    }
}

/// Current mastery estimate for one (learner, concept) pair, together with
/// the attempt statistics that back the confidence estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayEntry {
    pub mastery_level: f64,
    pub successes: u32,
    pub failures: u32,
    pub streak_correct: u32,
    pub confidence: f64,
    pub last_practice_ms: Option<i64>,
}

impl OverlayEntry {
    /// Fresh entry for a pair with no observations yet.
    pub fn seeded(p_init: f64) -> Self {
        Self {
            mastery_level: p_init,
            successes: 0,
            failures: 0,
            streak_correct: 0,
            confidence: 0.0,
            last_practice_ms: None,
        }
    }

    /// Fold one observed attempt into the entry. `new_mastery` is the output
    /// of the BKT primitive for this attempt.
    pub fn apply(&mut self, correct: bool, new_mastery: f64, timestamp_ms: i64) {
        if correct {
            self.successes += 1;
            self.streak_correct += 1;
        } else {
            self.failures += 1;
            self.streak_correct = 0;
        }
        self.mastery_level = new_mastery;
        self.confidence = estimate_confidence(self.successes, self.failures, self.streak_correct);
        self.last_practice_ms = Some(timestamp_ms);
    }
}

/// Live-path input: one performance event for a learner on a concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEvent {
    pub learner_id: String,
    pub concept_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub timestamp_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent_secs: Option<u64>,
}

impl PerformanceEvent {
    pub fn from_success(
        learner_id: impl Into<String>,
        concept_id: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            learner_id: learner_id.into(),
            concept_id: concept_id.into(),
            success: Some(success),
            score: None,
            timestamp_ms: Utc::now().timestamp_millis(),
            time_spent_secs: None,
        }
    }

    pub fn from_score(
        learner_id: impl Into<String>,
        concept_id: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            learner_id: learner_id.into(),
            concept_id: concept_id.into(),
            success: None,
            score: Some(score),
            timestamp_ms: Utc::now().timestamp_millis(),
            time_spent_secs: None,
        }
    }

    /// Direct success flag wins over a raw score; an event carrying neither
    /// cannot be interpreted.
    pub fn outcome(&self) -> Result<Outcome, ModelError> {
        match (self.success, self.score) {
            (Some(success), _) => Ok(Outcome::Success(success)),
            (None, Some(score)) => Ok(Outcome::Score(score)),
            (None, None) => Err(ModelError::InvalidEvent {
                reason: "event carries neither a success flag nor a score".to_string(),
            }),
        }
    }
}
