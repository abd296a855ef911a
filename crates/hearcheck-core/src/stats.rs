//! Per-round statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Tone;

/// Counters accumulated over one round.
///
/// Created fresh when a round starts and handed to the caller when it ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    /// Highest tone the listener reported hearing.
    pub highest_guessed_tone: Option<Tone>,
    /// Signals given while a tone was playing (first per tone).
    pub right_guesses: u32,
    /// Extra signals for a tone that was already credited.
    pub retriggered: u32,
    /// Signals given while nothing was playing.
    pub bad_guesses: u32,
    /// Right guesses keyed by frequency in Hz.
    pub right_guesses_by_frequency: BTreeMap<u32, u32>,
    /// Tones played keyed by frequency in Hz.
    pub played_frequencies: BTreeMap<u32, u32>,
}

impl RoundStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_play(&mut self, tone: &Tone) {
        *self.played_frequencies.entry(tone.frequency_hz).or_default() += 1;
    }

    pub fn record_right_guess(&mut self, tone: &Tone) {
        self.right_guesses += 1;
        *self
            .right_guesses_by_frequency
            .entry(tone.frequency_hz)
            .or_default() += 1;

        let is_new_highest = match &self.highest_guessed_tone {
            Some(highest) => tone.frequency_hz > highest.frequency_hz,
            None => true,
        };
        if is_new_highest {
            self.highest_guessed_tone = Some(tone.clone());
        }
    }

    pub fn record_retrigger(&mut self) {
        self.retriggered += 1;
    }

    pub fn record_bad_guess(&mut self) {
        self.bad_guesses += 1;
    }

    /// Number of tones played so far.
    pub fn total_played(&self) -> u32 {
        self.played_frequencies.values().sum()
    }

    /// Age label of the highest tone heard, if any.
    pub fn estimated_age_label(&self) -> Option<&str> {
        self.highest_guessed_tone
            .as_ref()
            .map(|t| t.age_label.as_str())
    }

    /// Fraction of played tones that were heard.
    pub fn hit_rate(&self) -> f64 {
        let played = self.total_played();
        if played == 0 {
            0.0
        } else {
            self.right_guesses as f64 / played as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stats_are_zero() {
        let stats = RoundStats::new();
        assert_eq!(stats.total_played(), 0);
        assert_eq!(stats.hit_rate(), 0.0);
        assert!(stats.estimated_age_label().is_none());
    }

    #[test]
    fn highest_only_moves_up() {
        let mut stats = RoundStats::new();
        stats.record_play(&Tone::new(16000, "< 30"));
        stats.record_right_guess(&Tone::new(16000, "< 30"));
        stats.record_play(&Tone::new(8000, "0+"));
        stats.record_right_guess(&Tone::new(8000, "0+"));

        assert_eq!(stats.right_guesses, 2);
        assert_eq!(stats.estimated_age_label(), Some("< 30"));
        assert_eq!(stats.right_guesses_by_frequency.get(&8000), Some(&1));
        assert_eq!(stats.hit_rate(), 1.0);
    }

    #[test]
    fn play_counts_accumulate_per_frequency() {
        let mut stats = RoundStats::new();
        let tone = Tone::new(440, "0+");
        stats.record_play(&tone);
        stats.record_play(&tone);
        stats.record_play(&Tone::new(8000, "0+"));
        assert_eq!(stats.played_frequencies.get(&440), Some(&2));
        assert_eq!(stats.total_played(), 3);
    }

    #[test]
    fn serializes_with_ordered_keys() {
        let mut stats = RoundStats::new();
        stats.record_play(&Tone::new(8000, "0+"));
        stats.record_play(&Tone::new(440, "0+"));
        let json = serde_json::to_string(&stats).unwrap();
        let low = json.find("\"440\"").unwrap();
        let high = json.find("\"8000\"").unwrap();
        assert!(low < high, "got: {json}");
    }
}
