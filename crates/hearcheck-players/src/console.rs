//! Players that keep time without an audio device.

use std::time::Duration;

use tokio::time::Instant;

use hearcheck_core::{PlayerError, Tone, TonePlayer};

use crate::envelope::{Envelope, VoiceTimeline};

/// Bookkeeping for a voice that is never rendered, kept on the tokio clock
/// so it agrees with the session's timers.
#[derive(Debug, Default)]
struct Clocked {
    voice: Option<(VoiceTimeline, Instant)>,
}

impl Clocked {
    fn start(&mut self, tone: &Tone, duration: Duration) {
        self.voice = Some((VoiceTimeline::new(tone.clone(), duration), Instant::now()));
    }

    /// Release the voice; returns the tone if it was still audible.
    fn release(&mut self) -> Option<Tone> {
        let (timeline, started) = self.voice.as_mut()?;
        let elapsed = started.elapsed();
        let was_audible = timeline.is_audible(elapsed);
        timeline.release(elapsed);
        was_audible.then(|| timeline.tone().clone())
    }

    fn current(&self) -> Option<Tone> {
        let (timeline, started) = self.voice.as_ref()?;
        timeline
            .is_audible(started.elapsed())
            .then(|| timeline.tone().clone())
    }
}

/// Logs each tone instead of rendering it. Useful for dry runs.
#[derive(Debug, Default)]
pub struct ConsolePlayer {
    envelope: Envelope,
    clock: Clocked,
}

impl ConsolePlayer {
    pub fn new(envelope: Envelope) -> Self {
        Self {
            envelope,
            clock: Clocked::default(),
        }
    }
}

impl TonePlayer for ConsolePlayer {
    fn name(&self) -> &str {
        "console"
    }

    fn prepare(&mut self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn play(&mut self, tone: &Tone, duration: Duration) {
        tracing::info!(
            frequency_hz = tone.frequency_hz,
            age = %tone.age_label,
            duration_ms = duration.as_millis() as u64,
            fade_ms = self.envelope.fade.as_millis() as u64,
            "♪ now playing"
        );
        self.clock.start(tone, duration);
    }

    fn stop(&mut self) {
        if let Some(tone) = self.clock.release() {
            tracing::info!(frequency_hz = tone.frequency_hz, "♪ stopped");
        }
    }

    fn current_tone(&self) -> Option<Tone> {
        self.clock.current()
    }
}

/// Tracks playback state and nothing else.
#[derive(Debug, Default)]
pub struct SilentPlayer {
    clock: Clocked,
}

impl SilentPlayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TonePlayer for SilentPlayer {
    fn name(&self) -> &str {
        "silent"
    }

    fn prepare(&mut self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn play(&mut self, tone: &Tone, duration: Duration) {
        self.clock.start(tone, duration);
    }

    fn stop(&mut self) {
        self.clock.release();
    }

    fn current_tone(&self) -> Option<Tone> {
        self.clock.current()
    }
}
