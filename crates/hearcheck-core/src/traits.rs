//! Capabilities the scheduler needs from its environment.
//!
//! Tone players live in `hearcheck-players`; observers are supplied by the
//! host (the CLI, or a test).

use std::time::Duration;

use uuid::Uuid;

use crate::catalog::Tone;
use crate::error::PlayerError;
use crate::grader::Verdict;
use crate::sequence::RoundMode;
use crate::stats::RoundStats;

// ---------------------------------------------------------------------------
// Tone player
// ---------------------------------------------------------------------------

/// Something that can render a tone audibly.
///
/// Implementations ramp volume in over a short fade, stop on their own after
/// `duration`, and fade out on `stop()` before releasing the voice.
pub trait TonePlayer: Send {
    /// Human-readable player name (e.g. "console").
    fn name(&self) -> &str;

    /// Acquire the output resource. Called at the start of every round;
    /// must be cheap when already prepared.
    fn prepare(&mut self) -> Result<(), PlayerError>;

    /// Start rendering `tone` for `duration`.
    fn play(&mut self, tone: &Tone, duration: Duration);

    /// Fade out the current tone, if any. No-op when idle.
    fn stop(&mut self);

    /// The tone currently audible, if any.
    fn current_tone(&self) -> Option<Tone>;
}

impl TonePlayer for Box<dyn TonePlayer> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn prepare(&mut self) -> Result<(), PlayerError> {
        (**self).prepare()
    }

    fn play(&mut self, tone: &Tone, duration: Duration) {
        (**self).play(tone, duration)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn current_tone(&self) -> Option<Tone> {
        (**self).current_tone()
    }
}

// ---------------------------------------------------------------------------
// Round observer
// ---------------------------------------------------------------------------

/// Receives round lifecycle events from a running session.
pub trait RoundObserver: Send + Sync {
    fn on_round_started(&self, round_id: Uuid, mode: RoundMode, planned: usize);
    fn on_tone_started(&self, tone: &Tone, remaining: usize);
    fn on_verdict(&self, verdict: &Verdict);
    /// Called exactly once when a round runs out of tones.
    fn on_round_complete(&self, stats: &RoundStats);
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl RoundObserver for NoopObserver {
    fn on_round_started(&self, _: Uuid, _: RoundMode, _: usize) {}
    fn on_tone_started(&self, _: &Tone, _: usize) {}
    fn on_verdict(&self, _: &Verdict) {}
    fn on_round_complete(&self, _: &RoundStats) {}
}
