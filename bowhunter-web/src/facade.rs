//! String-typed front door to the engine, shaped for the JavaScript boundary.
//!
//! Everything here works with plain strings and serializable views so the
//! wasm bindings stay a thin conversion layer and this logic can be tested
//! natively.

use serde::Serialize;

use crate::game::{
    CraftReport, Difficulty, EngineError, GameSession, HuntOutcome, HuntReport, MathTopic,
    PlayerState, Question, Rank, SaveStore, Stats,
};

/// Snapshot of the player handed to the page after each action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView<'a> {
    pub state: &'a PlayerState,
    pub accuracy_percent: u32,
    pub rank: Option<&'a Rank>,
    pub next_rank: Option<&'a Rank>,
    pub honor_to_next_rank: Option<u32>,
    pub timer_seconds: u32,
    /// Items with a positive count, ordered by id.
    pub held_items: Vec<HeldItemView<'a>>,
}

/// One inventory line with its display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeldItemView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub count: u32,
}

/// A recipe as listed on the crafting screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub can_craft: bool,
    pub max_craftable: u32,
}

pub struct GameFacade<S: SaveStore> {
    session: GameSession<S>,
}

impl<S: SaveStore> GameFacade<S> {
    #[must_use]
    pub fn new(store: S, seed: u64) -> Self {
        Self {
            session: GameSession::from_seed(store, seed),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &GameSession<S> {
        &self.session
    }

    pub fn init_game(&mut self, name: &str) -> bool {
        let restored = self.session.init_game(name);
        log::info!(
            "{} journey for {}",
            if restored { "resumed" } else { "new" },
            self.session.state().player_name
        );
        restored
    }

    #[must_use]
    pub fn has_save(&self) -> bool {
        self.session.has_save()
    }

    pub fn load_existing_save(&mut self) -> bool {
        self.session.load_existing_save()
    }

    pub fn reset_game(&mut self) {
        self.session.reset_game();
    }

    /// # Errors
    ///
    /// Rejects unknown outcome labels and unknown animals.
    pub fn record_hunt(&mut self, animal: &str, outcome: &str) -> Result<HuntReport, EngineError> {
        let outcome: HuntOutcome = outcome.parse()?;
        self.session.record_hunt(animal, outcome)
    }

    #[must_use]
    pub fn can_craft(&self, recipe: &str) -> bool {
        self.session.can_craft(recipe)
    }

    /// # Errors
    ///
    /// Rejects unknown recipes and recipes the player cannot afford.
    pub fn craft(&mut self, recipe: &str) -> Result<CraftReport, EngineError> {
        self.session.craft(recipe)
    }

    #[must_use]
    pub fn recipes(&self) -> Vec<RecipeView<'static>> {
        self.session
            .craftable_recipes()
            .map(|recipe| RecipeView {
                id: &recipe.id,
                name: &recipe.name,
                can_craft: self.session.can_craft(&recipe.id),
                max_craftable: self.session.max_craftable(&recipe.id),
            })
            .collect()
    }

    pub fn check_and_complete_quests(&mut self) -> Vec<String> {
        self.session.check_and_complete_quests().into_vec()
    }

    /// # Errors
    ///
    /// Rejects unknown and locked areas.
    pub fn forage(&mut self, area: &str) -> Result<Option<String>, EngineError> {
        self.session.forage(area)
    }

    /// # Errors
    ///
    /// Rejects unknown topic labels.
    pub fn set_topic(&mut self, topic: &str) -> Result<(), EngineError> {
        let topic: MathTopic = topic.parse()?;
        self.session.set_topic(topic);
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects unknown difficulty labels.
    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), EngineError> {
        let difficulty: Difficulty = difficulty.parse()?;
        self.session.set_difficulty(difficulty);
        Ok(())
    }

    pub fn next_question(&mut self) -> Question {
        self.session.next_question()
    }

    #[must_use]
    pub const fn timer_seconds(&self) -> u32 {
        self.session.timer_seconds()
    }

    #[must_use]
    pub const fn stats(&self) -> &Stats {
        &self.session.state().stats
    }

    #[must_use]
    pub fn progress(&self) -> ProgressView<'_> {
        let catalog = self.session.catalog();
        let held_items = self
            .session
            .state()
            .inventory
            .held()
            .map(|(id, count)| HeldItemView {
                id,
                name: catalog.item_name(id),
                count,
            })
            .collect();
        ProgressView {
            state: self.session.state(),
            accuracy_percent: self.session.accuracy_percent(),
            rank: self.session.current_rank(),
            next_rank: self.session.next_rank(),
            honor_to_next_rank: self.session.honor_to_next_rank(),
            timer_seconds: self.session.timer_seconds(),
            held_items,
        }
    }
}
