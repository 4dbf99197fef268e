use thiserror::Error;

/// Failures local to a single (learner, concept) operation.
///
/// Storage failures from collaborators propagate unchanged; nothing here is
/// ever silently repaired.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid concept parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("no BKT parameters found for concept {concept_id}")]
    MissingConceptParameters { concept_id: String },

    #[error("update conflict on {learner_id}/{concept_id} after {attempts} attempts")]
    ConcurrentUpdateConflict {
        learner_id: String,
        concept_id: String,
        attempts: u32,
    },

    #[error("invalid performance event: {reason}")]
    InvalidEvent { reason: String },

    #[error("storage error: {0}")]
    Storage(String),
}
