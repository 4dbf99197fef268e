//! Affective learner sub-model.
//!
//! Four bounded dimensions nudged by score bands after every performance
//! event. Disjoint from the knowledge overlay; the orchestrator updates it
//! in parallel with the mastery write.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectiveState {
    pub motivation: f64,
    pub frustration: f64,
    pub confidence: f64,
    pub stress: f64,
    #[serde(skip)]
    pub(crate) last_score: Option<f64>,
}

impl Default for AffectiveState {
    fn default() -> Self {
        Self {
            motivation: 0.5,
            frustration: 0.0,
            confidence: 0.5,
            stress: 0.0,
            last_score: None,
        }
    }
}

impl AffectiveState {
    /// State after observing a 0-100 score. Deltas are banded: poor scores
    /// raise frustration and stress, strong scores raise motivation and
    /// confidence. A move of more than 10 points against the previous score
    /// adds a progression adjustment on top. Every dimension stays in [0,1].
    pub fn after_score(&self, score: f64) -> Self {
        let (mut d_motivation, mut d_frustration, mut d_confidence, d_stress) = if score < 50.0 {
            (-0.10, 0.15, -0.15, 0.10)
        } else if score < 70.0 {
            (0.05, -0.05, -0.05, -0.05)
        } else if score < 85.0 {
            (0.15, -0.10, 0.10, -0.10)
        } else {
            (0.20, -0.15, 0.20, -0.15)
        };

        if let Some(last_score) = self.last_score {
            let progress = score - last_score;
            if progress > 10.0 {
                d_motivation += 0.10;
                d_confidence += 0.10;
            } else if progress < -10.0 {
                d_frustration += 0.10;
                d_confidence -= 0.10;
            }
        }

        Self {
            motivation: (self.motivation + d_motivation).clamp(0.0, 1.0),
            frustration: (self.frustration + d_frustration).clamp(0.0, 1.0),
            confidence: (self.confidence + d_confidence).clamp(0.0, 1.0),
            stress: (self.stress + d_stress).clamp(0.0, 1.0),
            last_score: Some(score),
        }
    }

    /// Overall label from the balance of positive (motivation, confidence)
    /// against negative (frustration, stress) dimensions.
    pub fn label(&self) -> AffectiveLabel {
        let positive = (self.motivation + self.confidence) / 2.0;
        let negative = (self.frustration + self.stress) / 2.0;
        let balance = positive - negative;

        if balance > 0.3 {
            AffectiveLabel::VeryPositive
        } else if balance > 0.1 {
            AffectiveLabel::Positive
        } else if balance > -0.1 {
            AffectiveLabel::Neutral
        } else if balance > -0.3 {
            AffectiveLabel::Negative
        } else {
            AffectiveLabel::VeryNegative
        }
    }

    pub fn is_frustrated(&self) -> bool {
        self.frustration >= 0.7
    }

    pub fn is_demotivated(&self) -> bool {
        self.motivation <= 0.3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectiveLabel {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl AffectiveLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryPositive => "very positive",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
            Self::VeryNegative => "very negative",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_scores_frustrate_and_high_scores_motivate() {
        let base = AffectiveState::default();

        let low = base.after_score(30.0);
        assert!(low.frustration > base.frustration);
        assert!(low.confidence < base.confidence);
        assert!(low.stress > base.stress);

        let high = base.after_score(90.0);
        assert!(high.motivation > base.motivation);
        assert!(high.confidence > base.confidence);
        assert_eq!(high.frustration, 0.0);
    }

    #[test]
    fn dimensions_stay_bounded() {
        let mut state = AffectiveState::default();
        for _ in 0..20 {
            state = state.after_score(10.0);
        }
        assert_eq!(state.motivation, 0.0);
        assert_eq!(state.frustration, 1.0);
        assert!(state.is_frustrated());
        assert!(state.is_demotivated());
        assert_eq!(state.label(), AffectiveLabel::VeryNegative);
    }

    #[test]
    fn label_follows_affective_balance() {
        // Default: positive = 0.5, negative = 0.0, balance = 0.5.
        assert_eq!(
            AffectiveState::default().label(),
            AffectiveLabel::VeryPositive
        );

        let flat = AffectiveState {
            frustration: 0.5,
            stress: 0.5,
            ..AffectiveState::default()
        };
        assert_eq!(flat.label(), AffectiveLabel::Neutral);
    }

    #[test]
    fn score_swings_add_a_progression_adjustment() {
        let base = AffectiveState::default();

        // 55 -> 75: banded deltas (+0.15, +0.10) plus (+0.10, +0.10) for
        // the >10-point improvement.
        let improved = base.after_score(55.0).after_score(75.0);
        let banded_only = AffectiveState::default().after_score(75.0);
        assert!((improved.motivation - 0.80).abs() < 1e-12);
        assert!((improved.confidence - 0.65).abs() < 1e-12);
        assert!(improved.motivation > banded_only.motivation);

        // 90 -> 40: the regression raises frustration and cuts confidence
        // beyond the poor-score band alone.
        let regressed = base.after_score(90.0).after_score(40.0);
        assert!((regressed.frustration - 0.25).abs() < 1e-12);
        assert!((regressed.confidence - 0.45).abs() < 1e-12);

        // A repeat of the same score is not a swing.
        let steady = base.after_score(60.0).after_score(60.0);
        assert!((steady.motivation - 0.60).abs() < 1e-12);
    }
}
