//! Property tests for the pure knowledge-model functions.

use proptest::prelude::*;

use tutor_model_core::knowledge::bkt::{bkt_update, estimate_confidence, score_to_correct};
use tutor_model_core::knowledge::labels::MasteryLabel;
use tutor_model_core::types::ConceptParams;

/// Guess/slip away from the extremes, so the evidence denominator is
/// positive for every prior and either outcome.
fn nondegenerate_params() -> impl Strategy<Value = ConceptParams> {
    (0.0..=1.0f64, 0.0..=1.0f64, 0.01..0.99f64, 0.01..0.99f64)
        .prop_map(|(p_init, p_transit, p_guess, p_slip)| ConceptParams {
            p_init,
            p_transit,
            p_guess,
            p_slip,
        })
}

/// Parameter sets where guessing is rarer than knowing (guess + slip < 1),
/// the usual identifiability condition for the model.
fn plausible_params() -> impl Strategy<Value = ConceptParams> {
    (0.0..=1.0f64, 0.0..=1.0f64, 0.01..0.5f64, 0.01..0.5f64).prop_map(
        |(p_init, p_transit, p_guess, p_slip)| ConceptParams {
            p_init,
            p_transit,
            p_guess,
            p_slip,
        },
    )
}

proptest! {
    #[test]
    fn update_stays_in_unit_interval(
        prior in 0.0..=1.0f64,
        correct in any::<bool>(),
        params in nondegenerate_params(),
    ) {
        let next = bkt_update(prior, correct, &params).unwrap();
        prop_assert!((0.0..=1.0).contains(&next));
        prop_assert!(next.is_finite());
    }

    #[test]
    fn correct_evidence_never_lowers_belief(
        prior in 0.0..=1.0f64,
        params in plausible_params(),
    ) {
        // With guess + slip < 1 the evidence step favors mastery on a
        // correct answer, and the transition step only adds on top.
        let next = bkt_update(prior, true, &params).unwrap();
        prop_assert!(next >= prior - 1e-12);
    }

    #[test]
    fn incorrect_evidence_never_raises_belief(
        prior in 0.0..=1.0f64,
        params in plausible_params(),
    ) {
        // Isolate the evidence step; a nonzero transition rate can lift a
        // low prior past the pre-observation belief.
        let frozen = ConceptParams { p_transit: 0.0, ..params };
        let next = bkt_update(prior, false, &frozen).unwrap();
        prop_assert!(next <= prior + 1e-12);
    }

    #[test]
    fn folding_a_history_is_deterministic(
        outcomes in proptest::collection::vec(any::<bool>(), 0..40),
        params in nondegenerate_params(),
    ) {
        let fold = |outcomes: &[bool]| -> f64 {
            let mut mastery = params.p_init;
            for &correct in outcomes {
                mastery = bkt_update(mastery, correct, &params).unwrap();
            }
            mastery
        };
        prop_assert_eq!(fold(&outcomes), fold(&outcomes));
    }

    #[test]
    fn confidence_is_bounded_and_grows_with_volume(
        successes in 0u32..200,
        failures in 0u32..200,
        streak in 0u32..200,
    ) {
        let confidence = estimate_confidence(successes, failures, streak);
        prop_assert!((0.0..=1.0).contains(&confidence));

        let more = estimate_confidence(successes + 1, failures, streak);
        prop_assert!(more >= confidence);
    }

    #[test]
    fn score_thresholding_matches_comparison(
        score in 0.0..=100.0f64,
        threshold in 0.0..=100.0f64,
    ) {
        prop_assert_eq!(score_to_correct(score, threshold), score >= threshold);
    }

    #[test]
    fn label_band_matches_boundary_count(level in 0.0..=1.0f64) {
        let label = MasteryLabel::from_level(level);
        let band = MasteryLabel::BOUNDARIES
            .iter()
            .filter(|&&boundary| level >= boundary)
            .count();
        let expected = [
            MasteryLabel::NotMastered,
            MasteryLabel::WeaklyMastered,
            MasteryLabel::PartiallyMastered,
            MasteryLabel::WellMastered,
            MasteryLabel::FullyMastered,
        ][band];
        prop_assert_eq!(label, expected);
    }
}
