//! Expedition controller: the per-encounter flow of a trip to one area.
//!
//! The controller owns only ephemeral encounter state (current animal,
//! question, timer). Everything that persists goes through the
//! [`GameSession`] passed into each call.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{ARROW_ITEM, ENCOUNTERS_PER_EXPEDITION};
use crate::data::Area;
use crate::error::EngineError;
use crate::hunt::{HuntOutcome, HuntReport, classify_shot};
use crate::numbers::u32_to_f64;
use crate::pacing::DifficultyTier;
use crate::questions::{Question, answers_match};
use crate::quests::CompletedQuests;
use crate::session::GameSession;
use crate::storage::SaveStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpeditionPhase {
    Scouting,
    Encounter,
    Answering,
    Result,
    NoArrows,
    Finished,
}

/// The animal in sight and the question guarding the shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub animal: String,
    pub question: Question,
    pub timer_total: u32,
    pub time_remaining: f64,
}

impl Encounter {
    /// Share of the answer timer still left, in `[0, 1]`.
    #[must_use]
    pub fn remaining_fraction(&self) -> f64 {
        if self.timer_total == 0 {
            return 0.0;
        }
        (self.time_remaining / u32_to_f64(self.timer_total)).clamp(0.0, 1.0)
    }
}

/// How an encounter was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotResult {
    pub answer_given: Option<String>,
    pub correct_answer: f64,
    pub timed_out: bool,
    pub report: HuntReport,
    pub completed_quests: CompletedQuests,
}

impl ShotResult {
    #[must_use]
    pub const fn outcome(&self) -> HuntOutcome {
        self.report.outcome
    }
}

#[derive(Debug, Clone)]
pub struct Expedition {
    area: String,
    phase: ExpeditionPhase,
    encounters_total: u32,
    encounters_done: u32,
    encounter: Option<Encounter>,
    draft: Option<String>,
    last_result: Option<ShotResult>,
}

impl Expedition {
    /// Begin a trip to `area_id` with the default number of encounters.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownArea`] or [`EngineError::AreaLocked`].
    pub fn start<S, R>(session: &GameSession<S, R>, area_id: &str) -> Result<Self, EngineError>
    where
        S: SaveStore,
        R: Rng,
    {
        Self::with_encounters(session, area_id, ENCOUNTERS_PER_EXPEDITION)
    }

    /// Begin a trip with a custom encounter count (at least one).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownArea`] or [`EngineError::AreaLocked`].
    pub fn with_encounters<S, R>(
        session: &GameSession<S, R>,
        area_id: &str,
        encounters: u32,
    ) -> Result<Self, EngineError>
    where
        S: SaveStore,
        R: Rng,
    {
        let area = session
            .catalog()
            .area(area_id)
            .ok_or_else(|| EngineError::UnknownArea(area_id.to_string()))?;
        if !session.state().is_area_unlocked(&area.id) {
            return Err(EngineError::AreaLocked(area.id.clone()));
        }
        Ok(Self {
            area: area.id.clone(),
            phase: ExpeditionPhase::Scouting,
            encounters_total: encounters.max(1),
            encounters_done: 0,
            encounter: None,
            draft: None,
            last_result: None,
        })
    }

    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }

    #[must_use]
    pub const fn phase(&self) -> ExpeditionPhase {
        self.phase
    }

    #[must_use]
    pub const fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    #[must_use]
    pub const fn last_result(&self) -> Option<&ShotResult> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub const fn encounters_done(&self) -> u32 {
        self.encounters_done
    }

    #[must_use]
    pub const fn encounters_total(&self) -> u32 {
        self.encounters_total
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.phase, ExpeditionPhase::Finished)
    }

    /// Spot an animal and prepare its question. Only valid while scouting;
    /// an empty quiver ends in [`ExpeditionPhase::NoArrows`].
    pub fn start_encounter<S, R>(&mut self, session: &mut GameSession<S, R>) -> ExpeditionPhase
    where
        S: SaveStore,
        R: Rng,
    {
        if self.phase != ExpeditionPhase::Scouting {
            return self.phase;
        }
        if session.state().inventory.count(ARROW_ITEM) == 0 {
            self.phase = ExpeditionPhase::NoArrows;
            return self.phase;
        }
        let catalog = session.catalog();
        let Some(area) = catalog.area(&self.area) else {
            self.phase = ExpeditionPhase::Finished;
            return self.phase;
        };
        let animals: Vec<&str> = catalog
            .animals_in(area)
            .map(|animal| animal.id.as_str())
            .collect();
        if animals.is_empty() {
            log::warn!("area {} has no animals to hunt", area.id);
            self.phase = ExpeditionPhase::Finished;
            return self.phase;
        }
        let animal = animals[session.rng_mut().random_range(0..animals.len())].to_string();
        let question = session.next_question_at_least(question_floor(area));
        let timer_total = session.timer_seconds();

        self.encounter = Some(Encounter {
            animal,
            question,
            timer_total,
            time_remaining: u32_to_f64(timer_total),
        });
        self.draft = None;
        self.last_result = None;
        self.phase = ExpeditionPhase::Encounter;
        self.phase
    }

    /// Draw the bow: the timer starts running.
    pub fn take_aim(&mut self) -> ExpeditionPhase {
        if self.phase == ExpeditionPhase::Encounter {
            self.phase = ExpeditionPhase::Answering;
        }
        self.phase
    }

    /// Keep the text typed so far; it is judged if the timer runs out.
    pub fn update_draft(&mut self, input: &str) {
        if self.phase == ExpeditionPhase::Answering {
            self.draft = Some(input.to_string());
        }
    }

    /// Advance the answer timer by `dt` seconds. Ignored outside
    /// [`ExpeditionPhase::Answering`]. Returns the outcome if the timer ran out.
    ///
    /// # Errors
    ///
    /// Propagates a rejected hunt record.
    pub fn tick<S, R>(
        &mut self,
        session: &mut GameSession<S, R>,
        dt: f64,
    ) -> Result<Option<HuntOutcome>, EngineError>
    where
        S: SaveStore,
        R: Rng,
    {
        if self.phase != ExpeditionPhase::Answering || !dt.is_finite() || dt <= 0.0 {
            return Ok(None);
        }
        let Some(encounter) = self.encounter.as_mut() else {
            return Ok(None);
        };
        encounter.time_remaining = (encounter.time_remaining - dt).max(0.0);
        if encounter.time_remaining > 0.0 {
            return Ok(None);
        }
        let draft = self.draft.take();
        self.resolve(session, draft, true)
    }

    /// Loose the arrow with `input` as the answer. Ignored outside
    /// [`ExpeditionPhase::Answering`] and for blank input.
    ///
    /// # Errors
    ///
    /// Propagates a rejected hunt record.
    pub fn submit<S, R>(
        &mut self,
        session: &mut GameSession<S, R>,
        input: &str,
    ) -> Result<Option<HuntOutcome>, EngineError>
    where
        S: SaveStore,
        R: Rng,
    {
        if self.phase != ExpeditionPhase::Answering || input.trim().is_empty() {
            return Ok(None);
        }
        self.draft = None;
        self.resolve(session, Some(input.to_string()), false)
    }

    /// Leave the result screen: scout again, or finish the trip.
    pub fn next(&mut self) -> ExpeditionPhase {
        match self.phase {
            ExpeditionPhase::Result => {
                self.encounters_done += 1;
                self.encounter = None;
                self.phase = if self.encounters_done >= self.encounters_total {
                    ExpeditionPhase::Finished
                } else {
                    ExpeditionPhase::Scouting
                };
            }
            ExpeditionPhase::NoArrows => self.phase = ExpeditionPhase::Finished,
            _ => {}
        }
        self.phase
    }

    /// Head home early.
    pub fn retreat(&mut self) {
        self.encounter = None;
        self.draft = None;
        self.phase = ExpeditionPhase::Finished;
    }

    fn resolve<S, R>(
        &mut self,
        session: &mut GameSession<S, R>,
        answer: Option<String>,
        timed_out: bool,
    ) -> Result<Option<HuntOutcome>, EngineError>
    where
        S: SaveStore,
        R: Rng,
    {
        let Some(encounter) = self.encounter.as_ref() else {
            return Ok(None);
        };
        let correct = answer
            .as_deref()
            .is_some_and(|text| answers_match(text, encounter.question.answer));
        let outcome = classify_shot(correct, encounter.remaining_fraction(), timed_out);
        let report = session.record_hunt(&encounter.animal, outcome)?;
        let completed_quests = session.check_and_complete_quests();

        self.last_result = Some(ShotResult {
            answer_given: answer,
            correct_answer: encounter.question.answer,
            timed_out,
            report,
            completed_quests,
        });
        self.phase = ExpeditionPhase::Result;
        Ok(Some(outcome))
    }
}

fn question_floor(area: &Area) -> DifficultyTier {
    DifficultyTier::new(area.min_tier)
}
