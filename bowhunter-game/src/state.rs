//! Persistent player state.
//!
//! [`PlayerState`] is exactly the record written to the save store, so its
//! serialized shape (camelCase keys) is a compatibility surface: every field
//! defaults when missing and saves from older builds keep loading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::Catalog;
use crate::inventory::Inventory;
use crate::numbers::percent;
use crate::pacing::{Difficulty, DifficultyTier, RollingAccuracy};
use crate::questions::MathTopic;

/// Lifetime counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_hunts: u32,
    pub perfect_shots: u32,
    pub total_correct: u32,
    pub total_attempted: u32,
    pub animals_harvested: BTreeMap<String, u32>,
    pub total_crafted: BTreeMap<String, u32>,
}

impl Stats {
    #[must_use]
    pub fn harvested(&self, animal: &str) -> u32 {
        self.animals_harvested.get(animal).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn crafted(&self, recipe: &str) -> u32 {
        self.total_crafted.get(recipe).copied().unwrap_or(0)
    }

    /// Share of attempts answered correctly, as a whole percentage.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        percent(self.total_correct, self.total_attempted)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    pub player_name: String,
    pub honor: u32,
    pub rank_index: usize,
    pub difficulty_tier: DifficultyTier,
    pub difficulty: Difficulty,
    pub math_topic: MathTopic,
    pub inventory: Inventory,
    pub crafted_items: BTreeMap<String, u32>,
    pub unlocked_areas: Vec<String>,
    pub completed_quests: Vec<String>,
    pub perfect_streak: u32,
    pub stats: Stats,
    pub recent_accuracy: RollingAccuracy,
}

impl PlayerState {
    /// Fresh state for a new journey.
    #[must_use]
    pub fn new_journey(name: impl Into<String>, catalog: &Catalog) -> Self {
        let unlocked_areas = catalog
            .areas
            .iter()
            .filter(|area| area.unlocked)
            .map(|area| area.id.clone())
            .collect();
        Self {
            player_name: name.into(),
            inventory: Inventory::from(catalog.starter_inventory.clone()),
            unlocked_areas,
            ..Self::default()
        }
    }

    /// Whether this record counts as a resumable save.
    #[must_use]
    pub fn is_resumable(&self) -> bool {
        !self.player_name.trim().is_empty()
    }

    #[must_use]
    pub fn is_quest_completed(&self, quest_id: &str) -> bool {
        self.completed_quests.iter().any(|id| id == quest_id)
    }

    #[must_use]
    pub fn is_area_unlocked(&self, area_id: &str) -> bool {
        self.unlocked_areas.iter().any(|id| id == area_id)
    }

    /// Recompute derived fields after loading a record written elsewhere.
    pub fn rehydrate(&mut self, catalog: &Catalog) {
        self.sync_rank(catalog);
        for area in catalog.areas.iter().filter(|area| area.unlocked) {
            if !self.is_area_unlocked(&area.id) {
                self.unlocked_areas.push(area.id.clone());
            }
        }
        let mut seen = Vec::with_capacity(self.completed_quests.len());
        self.completed_quests.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(id.clone());
                true
            }
        });
    }

    /// Keep the rank index in step with honor.
    pub fn sync_rank(&mut self, catalog: &Catalog) {
        self.rank_index = catalog.rank_index_for(self.honor);
    }

    pub(crate) fn add_honor(&mut self, amount: u32) {
        self.honor = self.honor.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog;

    #[test]
    fn new_journey_uses_starter_kit() {
        let state = PlayerState::new_journey("Ada", catalog());
        assert_eq!(state.player_name, "Ada");
        assert_eq!(state.inventory.count("arrow"), 5);
        assert_eq!(state.inventory.count("feather"), 20);
        assert_eq!(state.unlocked_areas, vec!["meadow".to_string()]);
        assert_eq!(state.difficulty_tier, DifficultyTier::LOWEST);
        assert_eq!(state.difficulty, Difficulty::Normal);
        assert_eq!(state.math_topic, MathTopic::All);
        assert!(state.is_resumable());
    }

    #[test]
    fn save_record_uses_camel_case_keys() {
        let state = PlayerState::new_journey("Ada", catalog());
        let value = serde_json::to_value(&state).unwrap();
        for key in [
            "playerName",
            "honor",
            "rankIndex",
            "difficultyTier",
            "difficulty",
            "mathTopic",
            "inventory",
            "craftedItems",
            "unlockedAreas",
            "completedQuests",
            "perfectStreak",
            "stats",
            "recentAccuracy",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["difficulty"], "normal");
        assert_eq!(value["mathTopic"], "all");
        assert!(value["stats"].get("totalAttempted").is_some());
        assert!(value["stats"].get("animalsHarvested").is_some());
    }

    #[test]
    fn sparse_record_loads_and_rehydrates() {
        let json = r#"{
            "playerName": "Kai",
            "honor": 41,
            "rankIndex": 0,
            "difficultyTier": 5,
            "completedQuests": ["first_hunt", "first_hunt"]
        }"#;
        let mut state: PlayerState = serde_json::from_str(json).unwrap();
        state.rehydrate(catalog());
        assert_eq!(state.rank_index, 2);
        assert_eq!(state.difficulty_tier.get(), 3);
        assert_eq!(state.completed_quests, vec!["first_hunt".to_string()]);
        assert!(state.is_area_unlocked("meadow"));
        assert_eq!(state.stats, Stats::default());
    }

    #[test]
    fn blank_names_are_not_resumable() {
        let mut state = PlayerState::default();
        assert!(!state.is_resumable());
        state.player_name = "   ".to_string();
        assert!(!state.is_resumable());
    }

    #[test]
    fn accuracy_percent_rounds() {
        let stats = Stats {
            total_correct: 1,
            total_attempted: 3,
            ..Stats::default()
        };
        assert_eq!(stats.accuracy_percent(), 33);
        assert_eq!(Stats::default().accuracy_percent(), 0);
    }
}
