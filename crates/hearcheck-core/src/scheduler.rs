//! The round scheduler state machine.
//!
//! The scheduler never sleeps. Each transition returns a [`Step`] telling
//! the driver which timer to arm next; the driver hands the timer's token
//! back through [`RoundScheduler::fire`] when it elapses. Only the most
//! recently armed token is honoured, so timers from a stopped or superseded
//! round can never touch the current one.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Catalog, Tone};
use crate::error::PlayerError;
use crate::grader::{ResponseGrader, Signal, Verdict};
use crate::report::RoundReport;
use crate::sequence::{build_plan, RoundMode, RoundPlan};
use crate::stats::RoundStats;
use crate::traits::TonePlayer;

/// Delays and durations used by a round.
///
/// Fade and release grace belong to the player's envelope
/// (`hearcheck_players::Envelope`); both are read from the same `[timing]`
/// config table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Shortest pause before a tone.
    pub min_delay: Duration,
    /// Longest pause before a tone (inclusive).
    pub max_delay: Duration,
    /// How long each tone plays.
    pub tone_duration: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            tone_duration: Duration::from_millis(3000),
        }
    }
}

/// Where the scheduler is within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inactive,
    Waiting,
    Playing,
    Done,
}

/// What the listener can currently hear.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(Tone),
    Stopped,
}

impl PlaybackState {
    pub fn tone(&self) -> Option<&Tone> {
        match self {
            PlaybackState::Playing(tone) => Some(tone),
            _ => None,
        }
    }
}

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    round: u64,
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    PlayNext,
    ToneFinished,
}

/// A timer the driver must arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub after: Duration,
}

/// Result of a scheduler transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Waiting for the next tone; arm `0`.
    Wait(TimerRequest),
    /// A tone started; arm `timer` for its end.
    Played {
        tone: Tone,
        remaining: usize,
        timer: TimerRequest,
    },
    /// The plan ran out. Emitted once per round.
    Completed(RoundStats),
    /// A timer fired that no longer belongs to the current round.
    Stale,
}

impl Step {
    pub fn timer(&self) -> Option<TimerRequest> {
        match self {
            Step::Wait(timer) | Step::Played { timer, .. } => Some(*timer),
            Step::Completed(_) | Step::Stale => None,
        }
    }
}

#[derive(Debug, Clone)]
struct RoundInfo {
    id: Uuid,
    mode: RoundMode,
    requested_count: usize,
    planned: usize,
    started_at: DateTime<Utc>,
}

/// Drives one round at a time against a tone player.
pub struct RoundScheduler<P, R> {
    catalog: Catalog,
    timing: Timing,
    player: P,
    rng: R,
    phase: Phase,
    playback: PlaybackState,
    plan: RoundPlan,
    grader: ResponseGrader,
    stats: RoundStats,
    round: Option<RoundInfo>,
    generation: u64,
    seq: u64,
    pending: Option<(TimerToken, TimerKind)>,
}

impl<P: TonePlayer, R: Rng> RoundScheduler<P, R> {
    pub fn new(catalog: Catalog, timing: Timing, player: P, rng: R) -> Self {
        Self {
            catalog,
            timing,
            player,
            rng,
            phase: Phase::Inactive,
            playback: PlaybackState::Idle,
            plan: RoundPlan::default(),
            grader: ResponseGrader::new(),
            stats: RoundStats::new(),
            round: None,
            generation: 0,
            seq: 0,
            pending: None,
        }
    }

    /// Begin a round, stopping any round already in progress.
    ///
    /// `count` defaults to the catalog size.
    pub fn start(&mut self, mode: RoundMode, count: Option<usize>) -> Result<Step, PlayerError> {
        if self.is_active() {
            if let Some(report) = self.stop() {
                tracing::debug!(round = %report.id, "superseded by a new round");
            }
        }

        self.player.prepare()?;

        let requested_count = count.unwrap_or(self.catalog.len());
        self.generation += 1;
        self.seq = 0;
        self.pending = None;
        self.plan = build_plan(&self.catalog, mode, requested_count, &mut self.rng);
        self.stats = RoundStats::new();
        self.grader.reset();
        self.player.stop();
        self.playback = PlaybackState::Idle;
        self.phase = Phase::Waiting;

        let info = RoundInfo {
            id: Uuid::new_v4(),
            mode,
            requested_count,
            planned: self.plan.remaining(),
            started_at: Utc::now(),
        };
        tracing::info!(
            round = %info.id,
            %mode,
            planned = info.planned,
            player = self.player.name(),
            "starting round"
        );
        self.round = Some(info);

        Ok(self.advance())
    }

    /// Handle an elapsed timer.
    pub fn fire(&mut self, token: TimerToken) -> Step {
        match self.pending {
            Some((pending, kind)) if pending == token => {
                self.pending = None;
                match kind {
                    TimerKind::PlayNext => self.play_next(),
                    TimerKind::ToneFinished => self.finish_tone(),
                }
            }
            _ => {
                tracing::debug!(?token, "ignoring stale timer");
                Step::Stale
            }
        }
    }

    /// End the current round and return its report. No-op when inactive.
    pub fn stop(&mut self) -> Option<RoundReport> {
        if self.phase == Phase::Inactive {
            return None;
        }

        let completed = self.phase == Phase::Done;
        self.pending = None;
        self.generation += 1;
        self.player.stop();
        self.grader.tone_stopped();
        self.playback = PlaybackState::Idle;
        self.phase = Phase::Inactive;

        let info = self.round.take()?;
        let report = RoundReport {
            id: info.id,
            mode: info.mode,
            requested_count: info.requested_count,
            planned: info.planned,
            started_at: info.started_at,
            finished_at: Utc::now(),
            completed,
            stats: self.stats.clone(),
        };
        tracing::info!(
            round = %report.id,
            completed,
            right = report.stats.right_guesses,
            retriggered = report.stats.retriggered,
            bad = report.stats.bad_guesses,
            played = report.stats.total_played(),
            "round stopped"
        );
        Some(report)
    }

    /// Grade a listener signal. Ignored when no round is active or the
    /// round has already run out of tones.
    pub fn signal(&mut self, signal: Signal) -> Verdict {
        if matches!(self.phase, Phase::Inactive | Phase::Done) {
            return Verdict::Ignored;
        }
        self.grader.grade(signal, &self.playback, &mut self.stats)
    }

    fn advance(&mut self) -> Step {
        if self.plan.is_empty() {
            self.phase = Phase::Done;
            tracing::info!("round complete");
            return Step::Completed(self.stats.clone());
        }

        let delay = self.random_delay();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "waiting before next tone");
        Step::Wait(self.arm(TimerKind::PlayNext, delay))
    }

    fn play_next(&mut self) -> Step {
        let Some(tone) = self.plan.next_tone() else {
            return self.advance();
        };

        if self.playback.tone().is_some() {
            self.player.stop();
            self.grader.tone_stopped();
        }

        tracing::debug!(frequency_hz = tone.frequency_hz, age = %tone.age_label, "now playing");
        self.player.play(&tone, self.timing.tone_duration);
        self.stats.record_play(&tone);
        self.grader.tone_started();
        self.playback = PlaybackState::Playing(tone.clone());
        self.phase = Phase::Playing;

        let timer = self.arm(TimerKind::ToneFinished, self.timing.tone_duration);
        Step::Played {
            tone,
            remaining: self.plan.remaining(),
            timer,
        }
    }

    fn finish_tone(&mut self) -> Step {
        self.player.stop();
        self.grader.tone_stopped();
        self.playback = PlaybackState::Stopped;
        self.phase = Phase::Waiting;
        self.advance()
    }

    fn arm(&mut self, kind: TimerKind, after: Duration) -> TimerRequest {
        self.seq += 1;
        let token = TimerToken {
            round: self.generation,
            seq: self.seq,
        };
        self.pending = Some((token, kind));
        TimerRequest { token, after }
    }

    fn random_delay(&mut self) -> Duration {
        let min = self.timing.min_delay.as_millis() as u64;
        let max = self.timing.max_delay.as_millis() as u64;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(self.rng.random_range(min..=max))
    }
}

impl<P, R> RoundScheduler<P, R> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Inactive
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Counters of the current (or most recently stopped) round.
    pub fn stats(&self) -> &RoundStats {
        &self.stats
    }

    pub fn remaining(&self) -> usize {
        self.plan.remaining()
    }

    pub fn round_id(&self) -> Option<Uuid> {
        self.round.as_ref().map(|r| r.id)
    }

    pub fn already_guessed(&self) -> bool {
        self.grader.already_guessed()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}
