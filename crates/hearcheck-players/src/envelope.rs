//! Fade envelope and per-tone timeline.
//!
//! Gain follows an exponential approach to its target (time constant
//! `fade`), the same curve as a Web Audio `setTargetAtTime` ramp. After a
//! tone stops, its voice stays alive for `release_grace` so the fade-out
//! can finish before the oscillator is dropped.

use std::time::Duration;

use hearcheck_core::Tone;

/// Gain shaping shared by every voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Fade time constant.
    pub fade: Duration,
    /// How long a stopped voice keeps rendering its fade-out.
    pub release_grace: Duration,
    /// Peak gain, 0.0..=1.0.
    pub volume: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            fade: Duration::from_millis(15),
            release_grace: Duration::from_millis(50),
            volume: 1.0,
        }
    }
}

impl Envelope {
    /// Gain `elapsed` after starting a ramp from `from` toward `target`.
    pub fn approach(&self, from: f32, target: f32, elapsed: Duration) -> f32 {
        let tau = self.fade.as_secs_f32();
        if tau <= 0.0 {
            return target;
        }
        target + (from - target) * (-elapsed.as_secs_f32() / tau).exp()
    }
}

/// Lifecycle of one tone, measured from the moment it started.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceTimeline {
    tone: Tone,
    duration: Duration,
    released_after: Option<Duration>,
}

impl VoiceTimeline {
    pub fn new(tone: Tone, duration: Duration) -> Self {
        Self {
            tone,
            duration,
            released_after: None,
        }
    }

    pub fn tone(&self) -> &Tone {
        &self.tone
    }

    /// Stop early at `elapsed`. Has no effect once the tone has ended.
    pub fn release(&mut self, elapsed: Duration) {
        if self.released_after.is_none() && elapsed < self.duration {
            self.released_after = Some(elapsed);
        }
    }

    /// When the fade-out begins.
    pub fn stop_offset(&self) -> Duration {
        self.released_after.unwrap_or(self.duration)
    }

    pub fn is_audible(&self, elapsed: Duration) -> bool {
        elapsed < self.stop_offset()
    }

    /// Whether the voice can be dropped.
    pub fn is_finished(&self, elapsed: Duration, envelope: &Envelope) -> bool {
        elapsed >= self.stop_offset() + envelope.release_grace
    }

    pub fn gain(&self, elapsed: Duration, envelope: &Envelope) -> f32 {
        let stop = self.stop_offset();
        if elapsed < stop {
            return envelope.approach(0.0, envelope.volume, elapsed);
        }
        if self.is_finished(elapsed, envelope) {
            return 0.0;
        }
        let at_stop = envelope.approach(0.0, envelope.volume, stop);
        envelope.approach(at_stop, 0.0, elapsed - stop)
    }
}
