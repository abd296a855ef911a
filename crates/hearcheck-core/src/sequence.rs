//! Round modes and the sequence builder.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Tone};

/// How the tones of a round are drawn from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundMode {
    /// Lowest frequencies first, rising.
    #[default]
    Ascending,
    /// Highest frequencies first, falling.
    Descending,
    /// Uniform draws from the whole catalog, with replacement.
    Random,
}

impl FromStr for RoundMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascending" | "to_top" => Ok(RoundMode::Ascending),
            "descending" | "to_bottom" => Ok(RoundMode::Descending),
            "random" => Ok(RoundMode::Random),
            other => Err(format!(
                "unknown round mode '{other}' (expected ascending, descending, or random)"
            )),
        }
    }
}

impl fmt::Display for RoundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoundMode::Ascending => "ascending",
            RoundMode::Descending => "descending",
            RoundMode::Random => "random",
        };
        f.write_str(s)
    }
}

/// The tones left to play in a round.
///
/// Stored in reverse playback order so `next_tone` is a cheap pop from the
/// end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundPlan {
    stack: Vec<Tone>,
}

impl RoundPlan {
    /// Build a plan from tones listed in playback order.
    pub fn from_playback_order(mut tones: Vec<Tone>) -> Self {
        tones.reverse();
        Self { stack: tones }
    }

    /// Take the next tone to play.
    pub fn next_tone(&mut self) -> Option<Tone> {
        self.stack.pop()
    }

    pub fn remaining(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Remaining tones in the order they will be played.
    pub fn playback_order(&self) -> impl Iterator<Item = &Tone> {
        self.stack.iter().rev()
    }
}

/// Build the plan for one round.
///
/// `count` is clamped to the catalog size for the ordered modes; random
/// rounds sample with replacement and may be longer than the catalog.
pub fn build_plan<R: Rng + ?Sized>(
    catalog: &Catalog,
    mode: RoundMode,
    count: usize,
    rng: &mut R,
) -> RoundPlan {
    let tones = catalog.tones();
    let ordered_count = count.min(tones.len());

    let playback: Vec<Tone> = match mode {
        RoundMode::Ascending => tones[..ordered_count].to_vec(),
        RoundMode::Descending => tones[tones.len() - ordered_count..]
            .iter()
            .rev()
            .cloned()
            .collect(),
        RoundMode::Random => (0..count)
            .map(|_| tones[rng.random_range(0..tones.len())].clone())
            .collect(),
    };

    RoundPlan::from_playback_order(playback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn drain(mut plan: RoundPlan) -> Vec<u32> {
        let mut played = Vec::new();
        while let Some(tone) = plan.next_tone() {
            played.push(tone.frequency_hz);
        }
        played
    }

    #[test]
    fn ascending_plays_first_k_rising() {
        let catalog = Catalog::standard();
        let mut rng = StdRng::seed_from_u64(1);
        let plan = build_plan(&catalog, RoundMode::Ascending, 3, &mut rng);
        assert_eq!(drain(plan), vec![440, 8000, 12000]);
    }

    #[test]
    fn descending_plays_last_k_falling() {
        let catalog = Catalog::standard();
        let mut rng = StdRng::seed_from_u64(1);
        let plan = build_plan(&catalog, RoundMode::Descending, 3, &mut rng);
        assert_eq!(drain(plan), vec![17400, 17000, 16000]);
    }

    #[test]
    fn ordered_modes_clamp_to_catalog_size() {
        let catalog = Catalog::standard();
        let mut rng = StdRng::seed_from_u64(1);
        let up = build_plan(&catalog, RoundMode::Ascending, 100, &mut rng);
        let down = build_plan(&catalog, RoundMode::Descending, 100, &mut rng);
        assert_eq!(up.remaining(), catalog.len());
        assert_eq!(down.remaining(), catalog.len());
    }

    #[test]
    fn random_samples_with_replacement_from_catalog() {
        let catalog = Catalog::standard();
        let mut rng = StdRng::seed_from_u64(7);
        let plan = build_plan(&catalog, RoundMode::Random, 20, &mut rng);
        assert_eq!(plan.remaining(), 20);
        assert!(plan.playback_order().all(|t| catalog.contains(t)));
    }

    #[test]
    fn random_is_reproducible_with_seed() {
        let catalog = Catalog::standard();
        let a = build_plan(
            &catalog,
            RoundMode::Random,
            10,
            &mut StdRng::seed_from_u64(42),
        );
        let b = build_plan(
            &catalog,
            RoundMode::Random,
            10,
            &mut StdRng::seed_from_u64(42),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn zero_count_builds_empty_plan() {
        let catalog = Catalog::standard();
        let mut rng = StdRng::seed_from_u64(0);
        for mode in [RoundMode::Ascending, RoundMode::Descending, RoundMode::Random] {
            assert!(build_plan(&catalog, mode, 0, &mut rng).is_empty());
        }
    }

    #[test]
    fn parses_modes_and_legacy_names() {
        assert_eq!("ascending".parse::<RoundMode>(), Ok(RoundMode::Ascending));
        assert_eq!("TO_TOP".parse::<RoundMode>(), Ok(RoundMode::Ascending));
        assert_eq!("to_bottom".parse::<RoundMode>(), Ok(RoundMode::Descending));
        assert_eq!("Random".parse::<RoundMode>(), Ok(RoundMode::Random));
        assert!("sideways".parse::<RoundMode>().is_err());
        assert_eq!(RoundMode::Descending.to_string(), "descending");
    }
}
