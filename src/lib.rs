//! Learner knowledge-tracing core.
//!
//! Tracks, per learner and per pedagogical concept, the probability that the
//! learner has mastered the concept, and updates it with the Bayesian
//! Knowledge Tracing recurrence as performance events arrive:
//! - `knowledge` - the pure BKT update primitive and mastery labeling
//! - `store` - collaborator seams (parameters, observation log, overlay)
//!   plus in-memory reference implementations
//! - `engine` - the adaptation orchestrator and the history replay path
//! - `affective` / `behavior` - companion learner sub-models updated in
//!   parallel with the knowledge overlay

pub mod affective;
pub mod behavior;
pub mod config;
pub mod engine;
pub mod error;
pub mod knowledge;
pub mod logging;
pub mod store;
pub mod types;

pub use config::EngineConfig;
pub use engine::AdaptationEngine;
pub use error::ModelError;
