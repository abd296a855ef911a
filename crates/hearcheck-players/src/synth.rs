//! Sine voice rendering.

use std::f32::consts::TAU;
use std::time::Duration;

use crate::envelope::{Envelope, VoiceTimeline};

/// A sine oscillator bound to one tone's timeline.
#[derive(Debug, Clone)]
pub struct SineVoice {
    timeline: VoiceTimeline,
    sample_rate: f32,
    phase: f32,
    rendered: u64,
}

impl SineVoice {
    pub fn new(timeline: VoiceTimeline, sample_rate: f32) -> Self {
        Self {
            timeline,
            sample_rate,
            phase: 0.0,
            rendered: 0,
        }
    }

    pub fn timeline(&self) -> &VoiceTimeline {
        &self.timeline
    }

    /// Time since the first rendered sample.
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.rendered as f64 / self.sample_rate as f64)
    }

    /// Begin the fade-out now.
    pub fn release(&mut self) {
        let elapsed = self.elapsed();
        self.timeline.release(elapsed);
    }

    pub fn is_finished(&self, envelope: &Envelope) -> bool {
        self.timeline.is_finished(self.elapsed(), envelope)
    }

    pub fn next_sample(&mut self, envelope: &Envelope) -> f32 {
        let gain = self.timeline.gain(self.elapsed(), envelope);
        let sample = self.phase.sin() * gain;

        let step = TAU * self.timeline.tone().frequency_hz as f32 / self.sample_rate;
        self.phase = (self.phase + step) % TAU;
        self.rendered += 1;
        sample
    }

    /// Fill an interleaved buffer, writing the same sample to every channel.
    pub fn render(&mut self, buffer: &mut [f32], channels: usize, envelope: &Envelope) {
        for frame in buffer.chunks_mut(channels.max(1)) {
            let sample = self.next_sample(envelope);
            frame.fill(sample);
        }
    }
}
