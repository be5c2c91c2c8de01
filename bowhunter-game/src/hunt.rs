//! Hunt resolution: shot classification and the effects of a recorded hunt.

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    ARROW_ITEM, PERFECT_DROP_BONUS, PERFECT_FORAGE_BONUS, PERFECT_HONOR_MULTIPLIER,
    PERFECT_TIME_FRACTION, SAMPLE_HIT, SAMPLE_MISS, SAMPLE_SPOOKED,
};
use crate::data::Catalog;
use crate::error::EngineError;
use crate::pacing::DifficultyTier;
use crate::state::PlayerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HuntOutcome {
    Perfect,
    Hit,
    Spooked,
    Miss,
}

impl HuntOutcome {
    pub const ALL: [Self; 4] = [Self::Perfect, Self::Hit, Self::Spooked, Self::Miss];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Hit => "hit",
            Self::Spooked => "spooked",
            Self::Miss => "miss",
        }
    }

    /// Whether the animal was brought down.
    #[must_use]
    pub const fn is_harvest(self) -> bool {
        matches!(self, Self::Perfect | Self::Hit)
    }

    /// Whether the question was answered correctly.
    #[must_use]
    pub const fn is_correct(self) -> bool {
        !matches!(self, Self::Miss)
    }

    /// Score pushed into the rolling accuracy window.
    #[must_use]
    pub const fn accuracy_sample(self) -> f32 {
        match self {
            Self::Perfect | Self::Hit => SAMPLE_HIT,
            Self::Spooked => SAMPLE_SPOOKED,
            Self::Miss => SAMPLE_MISS,
        }
    }
}

impl fmt::Display for HuntOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HuntOutcome {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == s)
            .ok_or_else(|| EngineError::InvalidOutcome(s.to_string()))
    }
}

/// Classify an encounter from the answer check and the timer.
///
/// `remaining_fraction` is the share of the answer timer still left when the
/// shot was taken. A timeout with a correct typed answer spooks the animal.
#[must_use]
pub fn classify_shot(correct: bool, remaining_fraction: f64, timed_out: bool) -> HuntOutcome {
    match (timed_out, correct) {
        (true, true) => HuntOutcome::Spooked,
        (_, false) => HuntOutcome::Miss,
        (false, true) if remaining_fraction > PERFECT_TIME_FRACTION => HuntOutcome::Perfect,
        (false, true) => HuntOutcome::Hit,
    }
}

/// Item deltas granted by a single hunt.
pub type ItemGains = SmallVec<[(String, u32); 4]>;

/// What a recorded hunt changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HuntReport {
    pub animal: String,
    pub outcome: HuntOutcome,
    pub honor_gained: u32,
    pub items_gained: ItemGains,
    pub bonus_material: Option<(String, u32)>,
    pub arrow_lost: bool,
    pub tier_before: DifficultyTier,
    pub tier_after: DifficultyTier,
    pub rank_before: usize,
    pub rank_after: usize,
}

impl HuntReport {
    #[must_use]
    pub fn ranked_up(&self) -> bool {
        self.rank_after > self.rank_before
    }

    #[must_use]
    pub fn tier_changed(&self) -> bool {
        self.tier_after != self.tier_before
    }
}

/// Apply a hunt outcome to `state`. Unknown animals are rejected before any
/// mutation.
///
/// # Errors
///
/// Returns [`EngineError::UnknownAnimal`] if `animal_id` is not in the catalog.
pub fn apply_hunt<R>(
    state: &mut PlayerState,
    catalog: &Catalog,
    animal_id: &str,
    outcome: HuntOutcome,
    rng: &mut R,
) -> Result<HuntReport, EngineError>
where
    R: Rng + ?Sized,
{
    let animal = catalog
        .animal(animal_id)
        .ok_or_else(|| EngineError::UnknownAnimal(animal_id.to_string()))?;

    let tier_before = state.difficulty_tier;
    let rank_before = state.rank_index;
    let mut report = HuntReport {
        animal: animal.id.clone(),
        outcome,
        honor_gained: 0,
        items_gained: SmallVec::new(),
        bonus_material: None,
        arrow_lost: false,
        tier_before,
        tier_after: tier_before,
        rank_before,
        rank_after: rank_before,
    };

    state.stats.total_attempted += 1;
    match outcome {
        HuntOutcome::Perfect | HuntOutcome::Hit => {
            let perfect = outcome == HuntOutcome::Perfect;
            let honor = if perfect {
                animal.honor.saturating_mul(PERFECT_HONOR_MULTIPLIER)
            } else {
                animal.honor
            };
            state.add_honor(honor);
            report.honor_gained = honor;

            state.stats.total_correct += 1;
            state.stats.total_hunts += 1;
            if perfect {
                state.stats.perfect_shots += 1;
            }
            *state
                .stats
                .animals_harvested
                .entry(animal.id.clone())
                .or_insert(0) += 1;
            state.perfect_streak += 1;

            let bonus = if perfect { PERFECT_DROP_BONUS } else { 0 };
            for (item, qty) in &animal.drops {
                let gained = qty.saturating_add(bonus);
                state.inventory.add(item, gained);
                report.items_gained.push((item.clone(), gained));
            }

            if perfect {
                let forageable = catalog
                    .area(&animal.area)
                    .map(|area| area.materials_found.as_slice())
                    .unwrap_or_default();
                if !forageable.is_empty() {
                    let material = &forageable[rng.random_range(0..forageable.len())];
                    state.inventory.add(material, PERFECT_FORAGE_BONUS);
                    report.bonus_material = Some((material.clone(), PERFECT_FORAGE_BONUS));
                }
            }
        }
        HuntOutcome::Spooked => {
            state.stats.total_correct += 1;
            state.perfect_streak = 0;
        }
        HuntOutcome::Miss => {
            state.perfect_streak = 0;
            report.arrow_lost = state.inventory.take_one(ARROW_ITEM);
        }
    }

    state.recent_accuracy.push(outcome.accuracy_sample());
    state.sync_rank(catalog);
    state.difficulty_tier = state.recent_accuracy.adjust_tier(state.difficulty_tier);

    report.tier_after = state.difficulty_tier;
    report.rank_after = state.rank_index;
    log::debug!(
        "hunt {} on {}: +{} honor, streak {}, tier {} -> {}",
        outcome,
        animal.id,
        report.honor_gained,
        state.perfect_streak,
        tier_before,
        report.tier_after
    );
    Ok(report)
}
