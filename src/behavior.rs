//! Behavioral learner sub-model: engagement from session/activity volume.

use serde::{Deserialize, Serialize};

/// Caps used when normalizing the engagement inputs.
const SESSIONS_CAP: f64 = 20.0;
const ACTIVITIES_CAP: f64 = 50.0;
const TIME_CAP_SECS: f64 = 36_000.0; // ten hours

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorProfile {
    pub sessions: u32,
    pub activities: u32,
    pub total_time_secs: u64,
    pub engagement_score: f64,
    #[serde(skip)]
    last_event_ms: Option<i64>,
}

impl BehaviorProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one performance event into the profile. Events separated by more
    /// than `session_gap_ms` count as a new session.
    pub fn record_event(&mut self, timestamp_ms: i64, time_spent_secs: u64, session_gap_ms: i64) {
        let new_session = match self.last_event_ms {
            Some(last) => timestamp_ms.saturating_sub(last) > session_gap_ms,
            None => true,
        };
        if new_session {
            self.sessions += 1;
        }
        self.activities += 1;
        self.total_time_secs += time_spent_secs;
        self.last_event_ms = Some(timestamp_ms);
        self.engagement_score =
            compute_engagement(self.sessions, self.activities, self.total_time_secs);
    }

    pub fn engagement_label(&self) -> EngagementLabel {
        EngagementLabel::from_score(self.engagement_score)
    }
}

/// Weighted engagement score: 30% session count, 40% activity count, 30%
/// time on task, each normalized against a fixed cap.
pub fn compute_engagement(sessions: u32, activities: u32, total_time_secs: u64) -> f64 {
    let sessions_score = (f64::from(sessions) / SESSIONS_CAP).min(1.0);
    let activities_score = (f64::from(activities) / ACTIVITIES_CAP).min(1.0);
    let time_score = (total_time_secs as f64 / TIME_CAP_SECS).min(1.0);

    (sessions_score * 0.3 + activities_score * 0.4 + time_score * 0.3).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementLabel {
    Disengaged,
    BarelyEngaged,
    ModeratelyEngaged,
    Engaged,
    HighlyEngaged,
}

impl EngagementLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::HighlyEngaged
        } else if score >= 0.6 {
            Self::Engaged
        } else if score >= 0.4 {
            Self::ModeratelyEngaged
        } else if score >= 0.2 {
            Self::BarelyEngaged
        } else {
            Self::Disengaged
        }
    }
}
