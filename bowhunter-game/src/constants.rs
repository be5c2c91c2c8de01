//! Centralized balance and tuning constants for Bowhunter progression.
//!
//! Content tables (recipes, animals, quests, ranks) live in the JSON catalog;
//! the numbers here define how outcomes are scored and how pacing adapts.

// Persistence ----------------------------------------------------------------
pub const SAVE_KEY: &str = "bow_hunter_save";

// Hunt scoring ---------------------------------------------------------------
pub(crate) const PERFECT_HONOR_MULTIPLIER: u32 = 3;
pub(crate) const PERFECT_DROP_BONUS: u32 = 1;
pub(crate) const PERFECT_FORAGE_BONUS: u32 = 2;
pub(crate) const FORAGE_YIELD: u32 = 1;
pub(crate) const ARROW_ITEM: &str = "arrow";

pub(crate) const SAMPLE_HIT: f32 = 1.0;
pub(crate) const SAMPLE_SPOOKED: f32 = 0.5;
pub(crate) const SAMPLE_MISS: f32 = 0.0;

// Adaptive difficulty ---------------------------------------------------------
pub const ACCURACY_WINDOW: usize = 20;
pub const ACCURACY_MIN_SAMPLES: usize = 5;
pub(crate) const TIER_UP_THRESHOLD: f64 = 0.8;
pub(crate) const TIER_DOWN_THRESHOLD: f64 = 0.4;
pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 3;

// Encounter timing ------------------------------------------------------------
pub(crate) const TIMER_EASY_SECS: u32 = 30;
pub(crate) const TIMER_NORMAL_SECS: u32 = 20;
pub(crate) const TIMER_HUNTER_SECS: u32 = 12;
/// Remaining-time fraction above which a correct answer counts as a perfect shot.
pub(crate) const PERFECT_TIME_FRACTION: f64 = 0.6;
pub const ANSWER_EPSILON: f64 = 0.01;
pub const ENCOUNTERS_PER_EXPEDITION: u32 = 5;
