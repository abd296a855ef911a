//! Recording player for testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hearcheck_core::{PlayerError, Tone, TonePlayer};

/// Something a [`RecordingPlayer`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Prepare,
    Play { frequency_hz: u32, duration: Duration },
    Stop,
}

/// A tone player that records every call without producing sound.
///
/// Clones share the same log, so a test can keep one clone while the
/// scheduler owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    events: Arc<Mutex<Vec<PlayerEvent>>>,
    current: Arc<Mutex<Option<Tone>>>,
    fail_prepare: bool,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player whose `prepare` always fails.
    pub fn unavailable() -> Self {
        Self {
            fail_prepare: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<PlayerEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Frequencies played so far, in order.
    pub fn played(&self) -> Vec<u32> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                PlayerEvent::Play { frequency_hz, .. } => Some(*frequency_hz),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: PlayerEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl TonePlayer for RecordingPlayer {
    fn name(&self) -> &str {
        "recording"
    }

    fn prepare(&mut self) -> Result<(), PlayerError> {
        self.record(PlayerEvent::Prepare);
        if self.fail_prepare {
            return Err(PlayerError::DeviceUnavailable(
                "recording player configured to fail".into(),
            ));
        }
        Ok(())
    }

    fn play(&mut self, tone: &Tone, duration: Duration) {
        self.record(PlayerEvent::Play {
            frequency_hz: tone.frequency_hz,
            duration,
        });
        *self.current.lock().unwrap() = Some(tone.clone());
    }

    fn stop(&mut self) {
        self.record(PlayerEvent::Stop);
        *self.current.lock().unwrap() = None;
    }

    fn current_tone(&self) -> Option<Tone> {
        self.current.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let observer = RecordingPlayer::new();
        let mut player = observer.clone();

        player.prepare().unwrap();
        player.play(&Tone::new(440, "0+"), Duration::from_secs(3));
        assert_eq!(observer.current_tone(), Some(Tone::new(440, "0+")));
        player.stop();

        assert_eq!(
            observer.events(),
            vec![
                PlayerEvent::Prepare,
                PlayerEvent::Play {
                    frequency_hz: 440,
                    duration: Duration::from_secs(3)
                },
                PlayerEvent::Stop,
            ]
        );
        assert_eq!(observer.played(), vec![440]);
        assert!(observer.current_tone().is_none());
    }

    #[test]
    fn unavailable_player_fails_prepare() {
        let mut player = RecordingPlayer::unavailable();
        let err = player.prepare().unwrap_err();
        assert!(err.to_string().contains("audio device unavailable"));
    }
}
