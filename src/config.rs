/// Engine tuning knobs, loaded from the environment with sensible defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Score (0-100) at or above which an attempt counts as correct.
    pub score_threshold: f64,
    /// Mastery below this level keeps the learner on practice/revision.
    pub practice_threshold: f64,
    /// Mastery at or above this level unlocks harder material; also the
    /// "mastered" bar used by the learner summary.
    pub advance_threshold: f64,
    /// Bounded optimistic-write retries before surfacing a conflict.
    pub max_update_retries: u32,
    /// Gap between events that starts a new behavioral session.
    pub session_gap_ms: i64,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            score_threshold: env_f64("SCORE_THRESHOLD", defaults.score_threshold),
            practice_threshold: env_f64("PRACTICE_THRESHOLD", defaults.practice_threshold),
            advance_threshold: env_f64("ADVANCE_THRESHOLD", defaults.advance_threshold),
            max_update_retries: std::env::var("MAX_UPDATE_RETRIES")
                .ok()
                .and_then(|value| value.parse::<u32>().ok())
                .unwrap_or(defaults.max_update_retries),
            session_gap_ms: std::env::var("SESSION_GAP_MS")
                .ok()
                .and_then(|value| value.parse::<i64>().ok())
                .unwrap_or(defaults.session_gap_ms),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            score_threshold: 50.0,
            practice_threshold: 0.4,
            advance_threshold: 0.8,
            max_update_retries: 5,
            session_gap_ms: 30 * 60 * 1000,
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(default)
}
