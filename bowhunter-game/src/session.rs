//! The progression engine: one player's state bound to content, a save store
//! and a seedable RNG.
//!
//! Every mutating operation commits the state to the store before returning.
//! Store failures are logged and swallowed; a broken save never takes the
//! running game down with it.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::constants::{FORAGE_YIELD, SAVE_KEY};
use crate::crafting::{self, CraftReport};
use crate::data::{Catalog, Quest, Rank, Recipe, catalog};
use crate::error::EngineError;
use crate::hunt::{self, HuntOutcome, HuntReport};
use crate::pacing::{Difficulty, DifficultyTier};
use crate::questions::{MathTopic, Question, generate_question};
use crate::quests::{self, CompletedQuests};
use crate::state::PlayerState;
use crate::storage::SaveStore;

pub struct GameSession<S, R = ChaCha20Rng>
where
    S: SaveStore,
    R: Rng,
{
    state: PlayerState,
    catalog: &'static Catalog,
    store: S,
    rng: R,
}

impl<S> GameSession<S, ChaCha20Rng>
where
    S: SaveStore,
{
    /// Session over the shipped content with a `ChaCha20Rng` seeded from `seed`.
    #[must_use]
    pub fn from_seed(store: S, seed: u64) -> Self {
        Self::new(store, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<S, R> GameSession<S, R>
where
    S: SaveStore,
    R: Rng,
{
    /// Session over the shipped content, starting from an unnamed default state.
    #[must_use]
    pub fn new(store: S, rng: R) -> Self {
        Self::with_catalog(catalog(), store, rng)
    }

    #[must_use]
    pub fn with_catalog(catalog: &'static Catalog, store: S, rng: R) -> Self {
        Self {
            state: PlayerState::new_journey("", catalog),
            catalog,
            store,
            rng,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PlayerState {
        &self.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    // Persistence -------------------------------------------------------------

    /// Continue an existing journey, or start a new one named `name`.
    /// Returns `true` when a save was restored.
    pub fn init_game(&mut self, name: &str) -> bool {
        if self.load_existing_save() {
            return true;
        }
        self.state = PlayerState::new_journey(name.trim(), self.catalog);
        log::debug!("new journey for {}", self.state.player_name);
        self.save_game();
        false
    }

    /// Replace the current state with the stored save, if a usable one exists.
    pub fn load_existing_save(&mut self) -> bool {
        match self.read_save() {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn has_save(&self) -> bool {
        self.read_save().is_some()
    }

    /// Write the current state to the store.
    pub fn save_game(&self) {
        let json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not serialize save: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(SAVE_KEY, &json) {
            log::warn!("could not write save: {err}");
        }
    }

    /// Delete the save and go back to the default state.
    pub fn reset_game(&mut self) {
        if let Err(err) = self.store.remove(SAVE_KEY) {
            log::warn!("could not remove save: {err}");
        }
        self.state = PlayerState::new_journey("", self.catalog);
    }

    fn read_save(&self) -> Option<PlayerState> {
        let raw = match self.store.get(SAVE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("could not read save: {err}");
                return None;
            }
        };
        let mut state: PlayerState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("discarding unreadable save: {err}");
                return None;
            }
        };
        if !state.is_resumable() {
            return None;
        }
        state.rehydrate(self.catalog);
        Some(state)
    }

    // Hunting -----------------------------------------------------------------

    /// Record the outcome of an encounter with `animal_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAnimal`] without changing state.
    pub fn record_hunt(
        &mut self,
        animal_id: &str,
        outcome: HuntOutcome,
    ) -> Result<HuntReport, EngineError> {
        let report = hunt::apply_hunt(
            &mut self.state,
            self.catalog,
            animal_id,
            outcome,
            &mut self.rng,
        )?;
        self.save_game();
        Ok(report)
    }

    /// Gather one random material from an unlocked area. Returns the material
    /// found, or `None` when the area has nothing to forage.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownArea`] or [`EngineError::AreaLocked`].
    pub fn forage(&mut self, area_id: &str) -> Result<Option<String>, EngineError> {
        let area = self
            .catalog
            .area(area_id)
            .ok_or_else(|| EngineError::UnknownArea(area_id.to_string()))?;
        if !self.state.is_area_unlocked(&area.id) {
            return Err(EngineError::AreaLocked(area.id.clone()));
        }
        if area.materials_found.is_empty() {
            return Ok(None);
        }
        let index = self.rng.random_range(0..area.materials_found.len());
        let material = area.materials_found[index].clone();
        self.state.inventory.add(&material, FORAGE_YIELD);
        log::debug!("foraged {material} in {}", area.id);
        self.save_game();
        Ok(Some(material))
    }

    /// A question at the player's current tier and topic.
    pub fn next_question(&mut self) -> Question {
        generate_question(self.state.difficulty_tier, self.state.math_topic, &mut self.rng)
    }

    /// A question at `tier` or the player's tier, whichever is higher.
    pub fn next_question_at_least(&mut self, tier: DifficultyTier) -> Question {
        let tier = tier.max(self.state.difficulty_tier);
        generate_question(tier, self.state.math_topic, &mut self.rng)
    }

    #[must_use]
    pub const fn timer_seconds(&self) -> u32 {
        self.state.difficulty.timer_seconds()
    }

    // Crafting ----------------------------------------------------------------

    #[must_use]
    pub fn can_craft(&self, recipe_id: &str) -> bool {
        crafting::can_craft(&self.state, self.catalog, recipe_id)
    }

    #[must_use]
    pub fn max_craftable(&self, recipe_id: &str) -> u32 {
        crafting::max_craftable(&self.state, self.catalog, recipe_id)
    }

    pub fn craftable_recipes(&self) -> impl Iterator<Item = &'static Recipe> {
        crafting::craftable_recipes(self.catalog)
    }

    /// Craft `recipe_id` once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownRecipe`] or
    /// [`EngineError::InsufficientMaterials`] without changing state.
    pub fn craft(&mut self, recipe_id: &str) -> Result<CraftReport, EngineError> {
        let report = crafting::craft(&mut self.state, self.catalog, recipe_id)?;
        self.save_game();
        Ok(report)
    }

    // Quests ------------------------------------------------------------------

    /// Complete and reward every quest whose goal is met. Saves only when
    /// something completed.
    pub fn check_and_complete_quests(&mut self) -> CompletedQuests {
        let completed = quests::check_and_complete(&mut self.state, self.catalog);
        if !completed.is_empty() {
            self.save_game();
        }
        completed
    }

    pub fn active_quests(&self) -> impl Iterator<Item = &Quest> {
        quests::active_quests(&self.state, self.catalog)
    }

    pub fn completed_quests(&self) -> impl Iterator<Item = &Quest> {
        quests::completed_quests(&self.state, self.catalog)
    }

    // Preferences -------------------------------------------------------------

    pub fn set_topic(&mut self, topic: MathTopic) {
        self.state.math_topic = topic;
        self.save_game();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state.difficulty = difficulty;
        self.save_game();
    }

    // Progress ----------------------------------------------------------------

    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        self.state.stats.accuracy_percent()
    }

    #[must_use]
    pub fn current_rank(&self) -> Option<&'static Rank> {
        self.catalog.ranks.get(self.state.rank_index)
    }

    /// The rank after the current one, `None` at the top.
    #[must_use]
    pub fn next_rank(&self) -> Option<&'static Rank> {
        self.catalog.ranks.get(self.state.rank_index + 1)
    }

    /// Honor still needed for the next rank.
    #[must_use]
    pub fn honor_to_next_rank(&self) -> Option<u32> {
        self.next_rank()
            .map(|rank| rank.honor_required.saturating_sub(self.state.honor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::convert::Infallible;
    use std::fmt;

    fn session() -> GameSession<MemoryStore> {
        GameSession::from_seed(MemoryStore::new(), 42)
    }

    #[derive(Debug)]
    struct Unavailable;

    impl fmt::Display for Unavailable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("storage unavailable")
        }
    }

    impl std::error::Error for Unavailable {}

    struct BrokenStore;

    impl SaveStore for BrokenStore {
        type Error = Unavailable;

        fn get(&self, _key: &str) -> Result<Option<String>, Self::Error> {
            Err(Unavailable)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), Self::Error> {
            Err(Unavailable)
        }

        fn remove(&self, _key: &str) -> Result<(), Self::Error> {
            Err(Unavailable)
        }
    }

    #[test]
    fn init_creates_then_restores() {
        let store = MemoryStore::new();
        let mut first = GameSession::from_seed(store.clone(), 1);
        assert!(!first.has_save());
        assert!(!first.init_game("Ada"));
        first.record_hunt("rabbit", HuntOutcome::Hit).unwrap();

        let mut second = GameSession::from_seed(store, 2);
        assert!(second.has_save());
        assert!(second.init_game("Someone Else"));
        assert_eq!(second.state().player_name, "Ada");
        assert_eq!(second.state().honor, 1);
    }

    #[test]
    fn corrupt_or_nameless_saves_are_ignored() {
        let store = MemoryStore::new();
        let session = GameSession::from_seed(store.clone(), 1);
        store.set(SAVE_KEY, "{not json").unwrap();
        assert!(!session.has_save());
        store.set(SAVE_KEY, r#"{"playerName":"","honor":9}"#).unwrap();
        assert!(!session.has_save());
    }

    #[test]
    fn reset_clears_store_and_state() {
        let store = MemoryStore::new();
        let mut session = GameSession::from_seed(store.clone(), 1);
        session.init_game("Ada");
        session.record_hunt("rabbit", HuntOutcome::Perfect).unwrap();
        session.reset_game();
        assert!(store.is_empty());
        assert_eq!(session.state().honor, 0);
        assert_eq!(session.state().player_name, "");
        assert_eq!(session.state().inventory.count("arrow"), 5);
    }

    #[test]
    fn store_failures_are_swallowed() {
        let mut session = GameSession::from_seed(BrokenStore, 3);
        assert!(!session.init_game("Ada"));
        assert!(!session.has_save());
        session.record_hunt("rabbit", HuntOutcome::Hit).unwrap();
        assert_eq!(session.state().honor, 1);
        session.reset_game();
        assert_eq!(session.state().honor, 0);
    }

    #[test]
    fn forage_respects_area_locks() {
        let mut session = session();
        session.init_game("Ada");
        assert_eq!(
            session.forage("swamp"),
            Err(EngineError::UnknownArea("swamp".to_string()))
        );
        assert_eq!(
            session.forage("river"),
            Err(EngineError::AreaLocked("river".to_string()))
        );
        let before = session.state().inventory.clone();
        let material = session.forage("meadow").unwrap().unwrap();
        assert_eq!(
            session.state().inventory.count(&material),
            before.count(&material) + 1
        );
    }

    #[test]
    fn preferences_persist() {
        let store = MemoryStore::new();
        let mut session = GameSession::from_seed(store.clone(), 5);
        session.init_game("Ada");
        session.set_topic(MathTopic::Fractions);
        session.set_difficulty(Difficulty::Hunter);
        assert_eq!(session.timer_seconds(), 12);

        let mut restored = GameSession::from_seed(store, 6);
        assert!(restored.load_existing_save());
        assert_eq!(restored.state().math_topic, MathTopic::Fractions);
        assert_eq!(restored.state().difficulty, Difficulty::Hunter);
    }

    #[test]
    fn rank_helpers_follow_honor() {
        let mut session = session();
        session.init_game("Ada");
        assert_eq!(session.current_rank().map(|r| r.name.as_str()), Some("Apprentice"));
        assert_eq!(session.honor_to_next_rank(), Some(15));
        for _ in 0..5 {
            session.record_hunt("rabbit", HuntOutcome::Perfect).unwrap();
        }
        assert_eq!(session.state().honor, 15);
        assert_eq!(session.current_rank().map(|r| r.name.as_str()), Some("Scout"));
        assert_eq!(session.next_rank().map(|r| r.name.as_str()), Some("Hunter"));
    }

    #[test]
    fn quest_check_only_saves_on_completion() {
        let store = MemoryStore::new();
        let mut session = GameSession::from_seed(store.clone(), 9);
        assert!(session.check_and_complete_quests().is_empty());
        assert!(store.is_empty());
        session.record_hunt("rabbit", HuntOutcome::Hit).unwrap();
        let done = session.check_and_complete_quests();
        assert_eq!(done.as_slice(), ["first_hunt".to_string()]);
        assert_eq!(session.completed_quests().count(), 1);
    }

    #[test]
    fn infallible_store_type_checks() {
        fn assert_store<S: SaveStore<Error = Infallible>>(_: &S) {}
        assert_store(session().store());
    }
}
