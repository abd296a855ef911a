//! Round reports handed back when a round stops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sequence::RoundMode;
use crate::stats::RoundStats;

/// The outcome of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Unique round identifier.
    pub id: Uuid,
    /// How the tones were ordered.
    pub mode: RoundMode,
    /// Tone count the caller asked for.
    pub requested_count: usize,
    /// Tone count actually planned after clamping.
    pub planned: usize,
    /// When the round started.
    pub started_at: DateTime<Utc>,
    /// When the round was stopped.
    pub finished_at: DateTime<Utc>,
    /// Whether every planned tone was played before stopping.
    pub completed: bool,
    /// Final counters.
    pub stats: RoundStats,
}

impl RoundReport {
    /// Pretty JSON for display.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Tones planned but never played because the round was stopped early.
    pub fn unplayed(&self) -> usize {
        self.planned
            .saturating_sub(self.stats.total_played() as usize)
    }
}
