//! Configuration file loading and the player factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use hearcheck_core::catalog::load_catalog;
use hearcheck_core::{Catalog, RoundMode, Timing, TonePlayer};

use crate::console::{ConsolePlayer, SilentPlayer};
use crate::envelope::Envelope;

/// Which tone player to use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayerConfig {
    /// Log tones instead of rendering them.
    #[default]
    Console,
    /// Track state only.
    Silent,
    /// Render on the default audio output device.
    Audio {
        #[serde(default = "default_volume")]
        volume: f32,
    },
}

fn default_volume() -> f32 {
    1.0
}

/// Round and envelope timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_tone_ms")]
    pub tone_ms: u64,
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
    #[serde(default = "default_release_grace_ms")]
    pub release_grace_ms: u64,
}

fn default_min_delay() -> u64 {
    1000
}
fn default_max_delay() -> u64 {
    10_000
}
fn default_tone_ms() -> u64 {
    3000
}
fn default_fade_ms() -> u64 {
    15
}
fn default_release_grace_ms() -> u64 {
    50
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
            tone_ms: default_tone_ms(),
            fade_ms: default_fade_ms(),
            release_grace_ms: default_release_grace_ms(),
        }
    }
}

/// Top-level hearcheck configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HearcheckConfig {
    /// Mode used when `--mode` is not given.
    #[serde(default)]
    pub default_mode: RoundMode,
    /// Tones per round; the catalog size when unset.
    #[serde(default)]
    pub default_count: Option<usize>,
    /// Fixed RNG seed for reproducible rounds.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Custom catalog file; the built-in catalog when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

impl HearcheckConfig {
    /// Reject settings the scheduler cannot honour.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.timing.min_delay_ms <= self.timing.max_delay_ms,
            "timing.min_delay_ms ({}) must not exceed timing.max_delay_ms ({})",
            self.timing.min_delay_ms,
            self.timing.max_delay_ms
        );
        if let PlayerConfig::Audio { volume } = &self.player {
            anyhow::ensure!(
                (0.0..=1.0).contains(volume),
                "player.volume must be between 0.0 and 1.0"
            );
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing {
            min_delay: Duration::from_millis(self.timing.min_delay_ms),
            max_delay: Duration::from_millis(self.timing.max_delay_ms),
            tone_duration: Duration::from_millis(self.timing.tone_ms),
        }
    }

    pub fn envelope(&self) -> Envelope {
        let volume = match &self.player {
            PlayerConfig::Audio { volume } => *volume,
            PlayerConfig::Console | PlayerConfig::Silent => 1.0,
        };
        Envelope {
            fade: Duration::from_millis(self.timing.fade_ms),
            release_grace: Duration::from_millis(self.timing.release_grace_ms),
            volume,
        }
    }

    /// The configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => load_catalog(path),
            None => Ok(Catalog::standard()),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `hearcheck.toml` in the current directory
/// 2. `~/.config/hearcheck/config.toml`
///
/// `HEARCHECK_SEED` overrides the configured seed.
pub fn load_config() -> Result<HearcheckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<HearcheckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("hearcheck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<HearcheckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => HearcheckConfig::default(),
    };

    if let Ok(seed) = std::env::var("HEARCHECK_SEED") {
        config.seed = Some(
            seed.trim()
                .parse()
                .with_context(|| format!("invalid HEARCHECK_SEED: '{seed}'"))?,
        );
    }

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("hearcheck"))
}

/// Create a player instance from its configuration.
pub fn create_player(config: &PlayerConfig, envelope: Envelope) -> Result<Box<dyn TonePlayer>> {
    match config {
        PlayerConfig::Console => Ok(Box::new(ConsolePlayer::new(envelope))),
        PlayerConfig::Silent => Ok(Box::new(SilentPlayer::new())),
        #[cfg(feature = "audio")]
        PlayerConfig::Audio { .. } => Ok(Box::new(crate::device::CpalPlayer::new(envelope))),
        #[cfg(not(feature = "audio"))]
        PlayerConfig::Audio { .. } => {
            anyhow::bail!("audio output requires building hearcheck with the `audio` feature")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = HearcheckConfig::default();
        assert_eq!(config.default_mode, RoundMode::Ascending);
        assert_eq!(config.player, PlayerConfig::Console);
        assert_eq!(config.timing(), Timing::default());
        assert_eq!(config.envelope(), Envelope::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
default_mode = "random"
default_count = 12
seed = 7
catalog = "catalog.toml"

[timing]
min_delay_ms = 500
max_delay_ms = 900
tone_ms = 1500

[player]
type = "audio"
volume = 0.5
"#;
        let config: HearcheckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_mode, RoundMode::Random);
        assert_eq!(config.default_count, Some(12));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.timing.fade_ms, 15);
        assert_eq!(config.timing().tone_duration, Duration::from_millis(1500));
        assert_eq!(config.envelope().volume, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_delays() {
        let config = HearcheckConfig {
            timing: TimingConfig {
                min_delay_ms: 5000,
                max_delay_ms: 1000,
                ..TimingConfig::default()
            },
            ..HearcheckConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_delay_ms"));
    }

    #[test]
    fn rejects_loud_volume() {
        let config = HearcheckConfig {
            player: PlayerConfig::Audio { volume: 1.5 },
            ..HearcheckConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/hearcheck.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn loads_explicit_config_and_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("tones.toml");
        std::fs::write(
            &catalog_path,
            "[[tones]]\nfrequency_hz = 1000\nage_label = \"0+\"\n",
        )
        .unwrap();
        let config_path = dir.path().join("hearcheck.toml");
        std::fs::write(
            &config_path,
            format!(
                "catalog = \"{}\"\n[player]\ntype = \"silent\"\n",
                catalog_path.display()
            ),
        )
        .unwrap();

        let config = load_config_from(Some(&config_path)).unwrap();
        assert_eq!(config.player, PlayerConfig::Silent);
        assert_eq!(config.load_catalog().unwrap().len(), 1);
    }

    #[test]
    fn factory_builds_virtual_players() {
        let console = create_player(&PlayerConfig::Console, Envelope::default()).unwrap();
        assert_eq!(console.name(), "console");
        let silent = create_player(&PlayerConfig::Silent, Envelope::default()).unwrap();
        assert_eq!(silent.name(), "silent");
    }
}
