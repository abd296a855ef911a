//! Response grading: turns "I heard it" signals into verdicts.

use serde::{Deserialize, Serialize};

use crate::catalog::Tone;
use crate::scheduler::PlaybackState;
use crate::stats::RoundStats;

/// One discrete "I heard it" input.
///
/// `press_id` identifies the physical press; repeats of the same id are
/// graded once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signal {
    pub press_id: u64,
}

/// Outcome of grading a single signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// First signal while this tone is playing.
    Right { tone: Tone },
    /// Another signal for a tone already credited.
    Retrigger,
    /// Signal while nothing is playing.
    Bad,
    /// Repeat of a press that was already graded.
    Duplicate,
    /// No round is active.
    Ignored,
}

/// Grades signals against the current playback state.
#[derive(Debug, Default)]
pub struct ResponseGrader {
    already_guessed: bool,
    last_press: Option<u64>,
}

impl ResponseGrader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current tone has already been credited.
    pub fn already_guessed(&self) -> bool {
        self.already_guessed
    }

    /// A new tone began playing.
    pub fn tone_started(&mut self) {
        self.already_guessed = false;
    }

    /// The current tone stopped.
    pub fn tone_stopped(&mut self) {
        self.already_guessed = false;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Grade one signal and update `stats` accordingly.
    pub fn grade(
        &mut self,
        signal: Signal,
        playback: &PlaybackState,
        stats: &mut RoundStats,
    ) -> Verdict {
        if self.last_press == Some(signal.press_id) {
            tracing::debug!(press = signal.press_id, "duplicate signal ignored");
            return Verdict::Duplicate;
        }
        self.last_press = Some(signal.press_id);

        let PlaybackState::Playing(tone) = playback else {
            stats.record_bad_guess();
            tracing::warn!("bad guess: nothing is playing");
            return Verdict::Bad;
        };

        if self.already_guessed {
            stats.record_retrigger();
            tracing::warn!(frequency_hz = tone.frequency_hz, "retrigger");
            return Verdict::Retrigger;
        }

        self.already_guessed = true;
        stats.record_right_guess(tone);
        tracing::info!(frequency_hz = tone.frequency_hz, "heard");
        Verdict::Right { tone: tone.clone() }
    }
}

/// Collapses raw key-down/key-up events into one signal per press.
///
/// Auto-repeated key-down events while the key is held produce nothing.
#[derive(Debug, Default)]
pub struct KeyDebouncer {
    held: bool,
    next_press: u64,
}

impl KeyDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self) -> Option<Signal> {
        if self.held {
            return None;
        }
        self.held = true;
        let signal = Signal {
            press_id: self.next_press,
        };
        self.next_press += 1;
        Some(signal)
    }

    pub fn key_up(&mut self) {
        self.held = false;
    }

    /// Whether the key is currently down.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// A complete press-and-release, for hosts that only see whole presses
    /// (e.g. line input).
    pub fn tap(&mut self) -> Signal {
        self.held = false;
        let signal = Signal {
            press_id: self.next_press,
        };
        self.next_press += 1;
        signal
    }
}
