//! Bayesian Knowledge Tracing update primitive.
//!
//! Two-state latent-skill model: an evidence (Bayes) step conditions the
//! mastery belief on the observed outcome, then a transition step accounts
//! for learning during the opportunity. Pure functions only; all state lives
//! in the overlay store.

use crate::error::ModelError;
use crate::types::ConceptParams;

/// One BKT opportunity: prior P(Know) plus an observed outcome gives the
/// posterior P(Know).
///
/// The evidence denominator is the marginal probability of the outcome under
/// the current belief; if it vanishes (degenerate guess/slip values) the
/// update fails instead of dividing by zero. The final clamp only absorbs
/// sub-epsilon floating-point overshoot.
pub fn bkt_update(
    p_mastery: f64,
    correct: bool,
    params: &ConceptParams,
) -> Result<f64, ModelError> {
    let prior = p_mastery.clamp(0.0, 1.0);

    let (numerator, denominator) = if correct {
        let numerator = prior * (1.0 - params.p_slip);
        (numerator, numerator + (1.0 - prior) * params.p_guess)
    } else {
        let numerator = prior * params.p_slip;
        (numerator, numerator + (1.0 - prior) * (1.0 - params.p_guess))
    };

    if !(denominator > 0.0) {
        return Err(ModelError::InvalidParameters {
            reason: format!(
                "evidence denominator is zero (correct={correct}, pGuess={}, pSlip={})",
                params.p_guess, params.p_slip
            ),
        });
    }

    let posterior = numerator / denominator;
    let next = posterior + (1.0 - posterior) * params.p_transit;
    Ok(next.clamp(0.0, 1.0))
}

/// Threshold a 0-100 score into a success flag.
pub fn score_to_correct(score: f64, threshold: f64) -> bool {
    score >= threshold
}

/// How much the system trusts the current mastery estimate: grows with the
/// number of observed attempts (capped at 0.8) plus a streak bonus (capped
/// at 0.2).
pub fn estimate_confidence(successes: u32, failures: u32, streak_correct: u32) -> f64 {
    let total = successes + failures;
    if total == 0 {
        return 0.0;
    }
    let volume = (f64::from(total) / 20.0).min(0.8);
    let streak_bonus = (f64::from(streak_correct) / 10.0).min(0.2);
    (volume + streak_bonus).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_params() -> ConceptParams {
        ConceptParams::new(0.3, 0.1, 0.2, 0.1).unwrap()
    }

    #[test]
    fn correct_observation_reference_scenario() {
        // Evidence: 0.3*0.9 / (0.3*0.9 + 0.7*0.2) = 0.27/0.41
        // Transition: 0.6585 + 0.3415*0.1
        let next = bkt_update(0.3, true, &reference_params()).unwrap();
        assert!((next - 0.6927).abs() < 1e-4, "got {next}");
    }

    #[test]
    fn incorrect_observation_reference_scenario() {
        // Evidence: 0.3*0.1 / (0.3*0.1 + 0.7*0.8) = 0.03/0.59
        // Transition: 0.0508 + 0.9492*0.1
        let next = bkt_update(0.3, false, &reference_params()).unwrap();
        assert!((next - 0.1457).abs() < 1e-4, "got {next}");
    }

    #[test]
    fn correct_raises_and_incorrect_lowers_belief() {
        let params = reference_params();
        let up = bkt_update(0.5, true, &params).unwrap();
        let down = bkt_update(0.5, false, &params).unwrap();
        assert!(up > 0.5);
        assert!(down < 0.5);
    }

    #[test]
    fn degenerate_denominator_is_an_error() {
        // Unmastered learner who can never guess: a correct answer has zero
        // marginal probability.
        let params = ConceptParams::new(0.0, 0.1, 0.0, 0.1).unwrap();
        let err = bkt_update(0.0, true, &params).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameters { .. }));
    }

    #[test]
    fn result_stays_in_unit_interval_at_extremes() {
        let params = ConceptParams::new(0.2, 1.0, 0.5, 0.5).unwrap();
        let next = bkt_update(1.0, true, &params).unwrap();
        assert!((0.0..=1.0).contains(&next));
        let next = bkt_update(0.0, false, &params).unwrap();
        assert!((0.0..=1.0).contains(&next));
    }

    #[test]
    fn score_thresholding() {
        assert!(score_to_correct(75.0, 60.0));
        assert!(!score_to_correct(50.0, 60.0));
        assert!(score_to_correct(60.0, 60.0));
    }

    #[test]
    fn confidence_grows_with_volume_and_streak() {
        assert_eq!(estimate_confidence(0, 0, 0), 0.0);
        let few = estimate_confidence(2, 2, 0);
        let many = estimate_confidence(15, 15, 0);
        assert!(few < many);
        assert_eq!(many, 0.8);

        let streaky = estimate_confidence(15, 15, 10);
        assert_eq!(streaky, 1.0);
    }
}
