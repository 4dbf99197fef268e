//! The knowledge model: BKT recurrence and mastery labeling.

pub mod bkt;
pub mod labels;

pub use bkt::{bkt_update, estimate_confidence, score_to_correct};
pub use labels::MasteryLabel;
