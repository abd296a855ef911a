//! hearcheck-players: tone player implementations.
//!
//! Implements the `TonePlayer` trait for logging, silent, recording, and
//! (with the `audio` feature) real device output, and loads the
//! `hearcheck.toml` configuration that selects between them.

pub mod config;
pub mod console;
#[cfg(feature = "audio")]
pub mod device;
pub mod envelope;
pub mod mock;
pub mod synth;

pub use config::{create_player, load_config, HearcheckConfig, PlayerConfig, TimingConfig};
pub use console::{ConsolePlayer, SilentPlayer};
pub use envelope::Envelope;
pub use hearcheck_core::PlayerError;
pub use mock::{PlayerEvent, RecordingPlayer};
