//! Adaptive pacing: question tier, answer timer, and the rolling accuracy window.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    ACCURACY_MIN_SAMPLES, ACCURACY_WINDOW, MAX_TIER, MIN_TIER, TIER_DOWN_THRESHOLD,
    TIER_UP_THRESHOLD, TIMER_EASY_SECS, TIMER_HUNTER_SECS, TIMER_NORMAL_SECS,
};
use crate::error::EngineError;
use crate::numbers::usize_to_f64;

/// Question difficulty tier, always within `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct DifficultyTier(u8);

impl DifficultyTier {
    pub const LOWEST: Self = Self(MIN_TIER);
    pub const HIGHEST: Self = Self(MAX_TIER);

    #[must_use]
    pub const fn new(tier: u8) -> Self {
        if tier < MIN_TIER {
            Self(MIN_TIER)
        } else if tier > MAX_TIER {
            Self(MAX_TIER)
        } else {
            Self(tier)
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn raised(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    #[must_use]
    pub const fn lowered(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for DifficultyTier {
    fn default() -> Self {
        Self::LOWEST
    }
}

impl From<u8> for DifficultyTier {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<DifficultyTier> for u8 {
    fn from(value: DifficultyTier) -> Self {
        value.0
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Answer timer preference chosen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hunter,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Normal, Self::Hunter];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hunter => "hunter",
        }
    }

    /// Seconds allowed to answer an encounter question.
    #[must_use]
    pub const fn timer_seconds(self) -> u32 {
        match self {
            Self::Easy => TIMER_EASY_SECS,
            Self::Normal => TIMER_NORMAL_SECS,
            Self::Hunter => TIMER_HUNTER_SECS,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hunter" => Ok(Self::Hunter),
            other => Err(EngineError::InvalidDifficulty(other.to_string())),
        }
    }
}

/// Timer lookup by preference label; unrecognized labels get the normal timer.
#[must_use]
pub fn timer_seconds(difficulty: &str) -> u32 {
    difficulty
        .parse::<Difficulty>()
        .map_or(TIMER_NORMAL_SECS, Difficulty::timer_seconds)
}

/// Fixed-capacity recency buffer of encounter scores in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "Vec<f32>", into = "Vec<f32>")]
pub struct RollingAccuracy {
    samples: VecDeque<f32>,
}

impl RollingAccuracy {
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(ACCURACY_WINDOW + 1),
        }
    }

    /// Record a score, evicting the oldest once the window is full.
    pub fn push(&mut self, sample: f32) {
        let sample = if sample.is_finite() {
            sample.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.samples.push_back(sample);
        while self.samples.len() > ACCURACY_WINDOW {
            self.samples.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let total: f64 = self.samples.iter().map(|s| f64::from(*s)).sum();
        Some(total / usize_to_f64(self.samples.len()))
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    /// Tier after re-evaluating the window: only moves once enough samples exist.
    #[must_use]
    pub fn adjust_tier(&self, tier: DifficultyTier) -> DifficultyTier {
        if self.samples.len() < ACCURACY_MIN_SAMPLES {
            return tier;
        }
        match self.mean() {
            Some(mean) if mean > TIER_UP_THRESHOLD => tier.raised(),
            Some(mean) if mean < TIER_DOWN_THRESHOLD => tier.lowered(),
            _ => tier,
        }
    }
}

impl From<Vec<f32>> for RollingAccuracy {
    fn from(values: Vec<f32>) -> Self {
        let mut window = Self::new();
        for value in values {
            window.push(value);
        }
        window
    }
}

impl From<RollingAccuracy> for Vec<f32> {
    fn from(window: RollingAccuracy) -> Self {
        window.samples.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_is_clamped_from_any_byte() {
        assert_eq!(DifficultyTier::new(0).get(), 1);
        assert_eq!(DifficultyTier::new(9).get(), 3);
        assert_eq!(DifficultyTier::HIGHEST.raised(), DifficultyTier::HIGHEST);
        assert_eq!(DifficultyTier::LOWEST.lowered(), DifficultyTier::LOWEST);
        let parsed: DifficultyTier = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.get(), 3);
    }

    #[test]
    fn timer_lookup_matches_preferences() {
        assert_eq!(timer_seconds("easy"), 30);
        assert_eq!(timer_seconds("normal"), 20);
        assert_eq!(timer_seconds("hunter"), 12);
        assert_eq!(timer_seconds("nightmare"), 20);
    }

    #[test]
    fn window_evicts_oldest_first() {
        let mut window = RollingAccuracy::new();
        window.push(0.0);
        for _ in 0..ACCURACY_WINDOW {
            window.push(1.0);
        }
        assert_eq!(window.len(), ACCURACY_WINDOW);
        assert!(window.iter().all(|s| (s - 1.0).abs() < f32::EPSILON));
    }

    #[test]
    fn tier_waits_for_minimum_samples() {
        let mut window = RollingAccuracy::new();
        for _ in 0..ACCURACY_MIN_SAMPLES - 1 {
            window.push(1.0);
        }
        assert_eq!(window.adjust_tier(DifficultyTier::LOWEST).get(), 1);
        window.push(1.0);
        assert_eq!(window.adjust_tier(DifficultyTier::LOWEST).get(), 2);
    }

    #[test]
    fn middling_accuracy_holds_tier() {
        let window = RollingAccuracy::from(vec![1.0, 0.5, 0.5, 0.5, 0.0]);
        assert_eq!(window.adjust_tier(DifficultyTier::new(2)).get(), 2);
        let poor = RollingAccuracy::from(vec![0.0, 0.5, 0.0, 0.5, 0.5]);
        assert_eq!(poor.adjust_tier(DifficultyTier::new(2)).get(), 1);
    }

    #[test]
    fn oversized_saved_window_is_trimmed_on_load() {
        let json = serde_json::to_string(&vec![0.5_f32; 30]).unwrap();
        let window: RollingAccuracy = serde_json::from_str(&json).unwrap();
        assert_eq!(window.len(), ACCURACY_WINDOW);
    }
}
