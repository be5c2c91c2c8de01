//! Bowhunter Game Engine
//!
//! Platform-agnostic progression engine for the Bowhunter math hunting game.
//! This crate owns player state, content tables, question generation and the
//! expedition flow, without UI or platform-specific dependencies. Platform
//! layers plug in persistence through [`SaveStore`].

pub mod constants;
pub mod crafting;
pub mod data;
pub mod error;
pub mod expedition;
pub mod hunt;
pub mod inventory;
pub mod numbers;
pub mod pacing;
pub mod questions;
pub mod quests;
pub mod session;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use constants::{
    ACCURACY_MIN_SAMPLES, ACCURACY_WINDOW, ENCOUNTERS_PER_EXPEDITION, MAX_TIER, MIN_TIER, SAVE_KEY,
};
pub use crafting::CraftReport;
pub use data::{
    Animal, Area, Catalog, CatalogError, ItemCounts, Material, Quest, QuestGoal, QuestReward,
    Rank, Recipe, catalog, content_fingerprint,
};
pub use error::EngineError;
pub use expedition::{Encounter, Expedition, ExpeditionPhase, ShotResult};
pub use hunt::{HuntOutcome, HuntReport, classify_shot};
pub use inventory::Inventory;
pub use pacing::{Difficulty, DifficultyTier, RollingAccuracy, timer_seconds};
pub use questions::{MathTopic, Question, answers_match, generate_question, parse_answer};
pub use quests::CompletedQuests;
pub use session::GameSession;
pub use state::{PlayerState, Stats};
pub use storage::{MemoryStore, SaveStore};
