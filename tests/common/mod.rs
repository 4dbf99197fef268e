use std::sync::{Arc, Once};

use tutor_model_core::config::EngineConfig;
use tutor_model_core::engine::AdaptationEngine;
use tutor_model_core::store::{MemoryObservationLog, MemoryOverlayStore, MemoryParameterStore};
use tutor_model_core::types::ConceptParams;

pub type MemoryEngine =
    AdaptationEngine<MemoryParameterStore, MemoryObservationLog, MemoryOverlayStore>;

pub struct Harness {
    pub engine: Arc<MemoryEngine>,
    pub params: Arc<MemoryParameterStore>,
    pub observations: Arc<MemoryObservationLog>,
    pub overlay: Arc<MemoryOverlayStore>,
}

static TRACING: Once = Once::new();

pub fn harness(config: EngineConfig) -> Harness {
    TRACING.call_once(|| {
        let _ = tutor_model_core::logging::init_tracing("warn");
    });

    let params = Arc::new(MemoryParameterStore::new());
    let observations = Arc::new(MemoryObservationLog::new());
    let overlay = Arc::new(MemoryOverlayStore::new());
    let engine = Arc::new(AdaptationEngine::new(
        config,
        Arc::clone(&params),
        Arc::clone(&observations),
        Arc::clone(&overlay),
    ));

    Harness {
        engine,
        params,
        observations,
        overlay,
    }
}

/// The reference parameter set used across the integration tests.
pub fn reference_params() -> ConceptParams {
    ConceptParams::new(0.3, 0.1, 0.2, 0.1).unwrap()
}
