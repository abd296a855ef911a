//! Real audio output through the default cpal device.
//!
//! cpal streams cannot move between threads, so the stream lives on a
//! dedicated audio thread for as long as the player exists. The player and
//! the stream callback share only the current voice.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use hearcheck_core::{PlayerError, Tone, TonePlayer};

use crate::envelope::{Envelope, VoiceTimeline};
use crate::synth::SineVoice;

type SharedVoice = Arc<Mutex<Option<SineVoice>>>;

struct OutputWorker {
    shutdown_tx: mpsc::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

/// Plays sine tones on the default output device.
pub struct CpalPlayer {
    envelope: Envelope,
    voice: SharedVoice,
    sample_rate: Option<f32>,
    worker: Option<OutputWorker>,
}

impl CpalPlayer {
    pub fn new(envelope: Envelope) -> Self {
        Self {
            envelope,
            voice: Arc::new(Mutex::new(None)),
            sample_rate: None,
            worker: None,
        }
    }
}

impl TonePlayer for CpalPlayer {
    fn name(&self) -> &str {
        "audio"
    }

    fn prepare(&mut self) -> Result<(), PlayerError> {
        if self.worker.is_some() {
            return Ok(());
        }

        let (ready_tx, ready_rx) = mpsc::channel::<Result<f32, PlayerError>>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let voice = Arc::clone(&self.voice);
        let envelope = self.envelope;

        let thread = std::thread::Builder::new()
            .name("hearcheck-audio".into())
            .spawn(move || match open_stream(voice, envelope) {
                Ok((stream, sample_rate)) => {
                    let _ = ready_tx.send(Ok(sample_rate));
                    let _ = shutdown_rx.recv();
                    drop(stream);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })
            .map_err(|e| PlayerError::StreamFailed(e.to_string()))?;

        let sample_rate = ready_rx
            .recv()
            .map_err(|_| PlayerError::StreamFailed("audio thread exited".into()))??;

        self.sample_rate = Some(sample_rate);
        self.worker = Some(OutputWorker {
            shutdown_tx,
            thread: Some(thread),
        });
        Ok(())
    }

    fn play(&mut self, tone: &Tone, duration: Duration) {
        let Some(sample_rate) = self.sample_rate else {
            tracing::warn!("play called before the audio output was prepared");
            return;
        };
        let timeline = VoiceTimeline::new(tone.clone(), duration);
        if let Ok(mut slot) = self.voice.lock() {
            *slot = Some(SineVoice::new(timeline, sample_rate));
        }
    }

    fn stop(&mut self) {
        if let Ok(mut slot) = self.voice.lock() {
            if let Some(voice) = slot.as_mut() {
                voice.release();
            }
        }
    }

    fn current_tone(&self) -> Option<Tone> {
        let slot = self.voice.lock().ok()?;
        let voice = slot.as_ref()?;
        voice
            .timeline()
            .is_audible(voice.elapsed())
            .then(|| voice.timeline().tone().clone())
    }
}

impl Drop for CpalPlayer {
    fn drop(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            let _ = worker.shutdown_tx.send(());
            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

fn open_stream(voice: SharedVoice, envelope: Envelope) -> Result<(cpal::Stream, f32), PlayerError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| PlayerError::DeviceUnavailable("no default output device".into()))?;
    let supported = device
        .default_output_config()
        .map_err(|e| PlayerError::DeviceUnavailable(e.to_string()))?;
    if supported.sample_format() != cpal::SampleFormat::F32 {
        return Err(PlayerError::StreamFailed(format!(
            "unsupported sample format {:?}",
            supported.sample_format()
        )));
    }

    let config: cpal::StreamConfig = supported.into();
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0 as f32;

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let Ok(mut slot) = voice.try_lock() else {
                    data.fill(0.0);
                    return;
                };
                let finished = match slot.as_mut() {
                    Some(v) => {
                        v.render(data, channels, &envelope);
                        v.is_finished(&envelope)
                    }
                    None => {
                        data.fill(0.0);
                        false
                    }
                };
                if finished {
                    *slot = None;
                }
            },
            |err| tracing::error!("audio stream error: {err}"),
            None,
        )
        .map_err(|e| PlayerError::StreamFailed(e.to_string()))?;
    stream
        .play()
        .map_err(|e| PlayerError::StreamFailed(e.to_string()))?;

    tracing::info!(
        device = %device.name().unwrap_or_default(),
        sample_rate,
        channels,
        "audio output ready"
    );
    Ok((stream, sample_rate))
}
