use std::sync::Arc;

use anyhow::Result;
use bowhunter_game::{
    ACCURACY_MIN_SAMPLES, ACCURACY_WINDOW, Difficulty, DifficultyTier, EngineError, Expedition,
    ExpeditionPhase, GameSession, HuntOutcome, MAX_TIER, MIN_TIER, MathTopic, MemoryStore,
    PlayerState,
};
use colored::Colorize;

use crate::logic::player::{PlayerProfile, ShotPlan, SimulatedPlayer};

const PLAYER_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;
const ARROW_RESERVE: u32 = 5;
const FORAGE_ATTEMPTS: u32 = 6;
const HOME_AREA: &str = "meadow";
const RIVER_AREA: &str = "river";

/// Scripted sequence of expeditions for one simulated player.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub profile: PlayerProfile,
    pub expeditions: u32,
    pub encounters_per_trip: u32,
    pub craft_between_trips: bool,
    pub difficulty: Difficulty,
    pub topic: Option<MathTopic>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(profile: PlayerProfile) -> Self {
        Self {
            profile,
            expeditions: 3,
            encounters_per_trip: bowhunter_game::ENCOUNTERS_PER_EXPEDITION,
            craft_between_trips: true,
            difficulty: Difficulty::Normal,
            topic: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_expeditions(mut self, expeditions: u32) -> Self {
        self.expeditions = expeditions;
        self
    }

    #[must_use]
    pub const fn with_encounters(mut self, encounters: u32) -> Self {
        self.encounters_per_trip = encounters;
        self
    }

    #[must_use]
    pub const fn without_crafting(mut self) -> Self {
        self.craft_between_trips = false;
        self
    }

    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub const fn with_topic(mut self, topic: MathTopic) -> Self {
        self.topic = Some(topic);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Count of encounter outcomes over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub perfect: u32,
    pub hit: u32,
    pub spooked: u32,
    pub miss: u32,
}

impl OutcomeTally {
    pub const fn record(&mut self, outcome: HuntOutcome) {
        match outcome {
            HuntOutcome::Perfect => self.perfect += 1,
            HuntOutcome::Hit => self.hit += 1,
            HuntOutcome::Spooked => self.spooked += 1,
            HuntOutcome::Miss => self.miss += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.perfect + self.hit + self.spooked + self.miss
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub profile: PlayerProfile,
    pub expeditions_run: u32,
    pub outcomes: OutcomeTally,
    pub crafts: u32,
    pub forages: u32,
    pub arrow_outages: u32,
    pub river_visits: u32,
    pub peak_tier: DifficultyTier,
    pub final_state: PlayerState,
    pub violations: Vec<String>,
}

impl SimulationSummary {
    #[must_use]
    pub fn quests_completed(&self) -> usize {
        self.final_state.completed_quests.len()
    }

    #[must_use]
    pub fn has_quest(&self, quest_id: &str) -> bool {
        self.final_state.is_quest_completed(quest_id)
    }
}

/// Checks progression invariants after every engine mutation.
struct InvariantGuard {
    last_honor: u32,
    last_tier: DifficultyTier,
    last_quests: usize,
    attempts: u32,
    violations: Vec<String>,
}

impl InvariantGuard {
    fn new(state: &PlayerState) -> Self {
        Self {
            last_honor: state.honor,
            last_tier: state.difficulty_tier,
            last_quests: state.completed_quests.len(),
            attempts: state.stats.total_attempted,
            violations: Vec::new(),
        }
    }

    fn hunt_recorded(&mut self) {
        self.attempts += 1;
    }

    fn check(&mut self, session: &GameSession<MemoryStore>, context: &str) {
        let state = session.state();
        let mut fail = |message: String| {
            self.violations.push(format!("{context}: {message}"));
        };
        if state.honor < self.last_honor {
            fail(format!("honor fell from {} to {}", self.last_honor, state.honor));
        }
        let expected_rank = session.catalog().rank_index_for(state.honor);
        if state.rank_index != expected_rank {
            fail(format!(
                "rank index {} but honor {} implies {expected_rank}",
                state.rank_index, state.honor
            ));
        }
        let tier = state.difficulty_tier.get();
        if !(MIN_TIER..=MAX_TIER).contains(&tier) {
            fail(format!("tier {tier} out of range"));
        }
        if state.recent_accuracy.len() < ACCURACY_MIN_SAMPLES
            && state.difficulty_tier != self.last_tier
        {
            fail("tier moved before enough samples".to_string());
        }
        if state.recent_accuracy.len() > ACCURACY_WINDOW {
            fail(format!(
                "accuracy window holds {} samples",
                state.recent_accuracy.len()
            ));
        }
        if state.stats.total_attempted != self.attempts {
            fail(format!(
                "totalAttempted {} after {} recorded hunts",
                state.stats.total_attempted, self.attempts
            ));
        }
        if state.completed_quests.len() < self.last_quests {
            fail("completed quest list shrank".to_string());
        }
        let mut ids = state.completed_quests.clone();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != state.completed_quests.len() {
            fail("duplicate completed quest".to_string());
        }

        self.last_honor = state.honor;
        self.last_tier = state.difficulty_tier;
        self.last_quests = state.completed_quests.len();
    }
}

/// Headless deterministic runner for the progression engine.
#[derive(Debug, Clone, Copy)]
pub struct GameTester {
    verbose: bool,
}

impl GameTester {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    #[must_use]
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let mut session = GameSession::from_seed(MemoryStore::new(), seed);
        session.init_game(&format!("{} #{seed}", plan.profile));
        session.set_difficulty(plan.difficulty);
        if let Some(topic) = plan.topic {
            session.set_topic(topic);
        }

        let mut player = SimulatedPlayer::new(plan.profile, seed ^ PLAYER_SEED_SALT);
        let mut guard = InvariantGuard::new(session.state());
        let mut summary = SimulationSummary {
            seed,
            profile: plan.profile,
            expeditions_run: 0,
            outcomes: OutcomeTally::default(),
            crafts: 0,
            forages: 0,
            arrow_outages: 0,
            river_visits: 0,
            peak_tier: session.state().difficulty_tier,
            final_state: session.state().clone(),
            violations: Vec::new(),
        };

        for trip in 0..plan.expeditions {
            if plan.craft_between_trips {
                self.restock(&mut session, &mut summary);
                guard.check(&session, &format!("restock before trip {}", trip + 1));
            }
            let area = if session.state().is_area_unlocked(RIVER_AREA) && trip % 2 == 1 {
                RIVER_AREA
            } else {
                HOME_AREA
            };
            match Expedition::with_encounters(&session, area, plan.encounters_per_trip) {
                Ok(expedition) => {
                    if area == RIVER_AREA {
                        summary.river_visits += 1;
                    }
                    self.run_expedition(
                        expedition,
                        &mut session,
                        &mut player,
                        &mut guard,
                        &mut summary,
                    );
                    summary.expeditions_run += 1;
                }
                Err(err) => guard
                    .violations
                    .push(format!("trip {} refused: {err}", trip + 1)),
            }
        }

        summary.final_state = session.state().clone();
        summary.violations.append(&mut guard.violations);
        log::debug!(
            "{} seed {seed}: {} encounters, honor {}, {} quests",
            plan.profile,
            summary.outcomes.total(),
            summary.final_state.honor,
            summary.quests_completed()
        );
        summary
    }

    fn run_expedition(
        &self,
        mut expedition: Expedition,
        session: &mut GameSession<MemoryStore>,
        player: &mut SimulatedPlayer,
        guard: &mut InvariantGuard,
        summary: &mut SimulationSummary,
    ) {
        loop {
            match expedition.phase() {
                ExpeditionPhase::Scouting => {
                    expedition.start_encounter(session);
                }
                ExpeditionPhase::Encounter => {
                    expedition.take_aim();
                }
                ExpeditionPhase::Answering => {
                    if let Err(err) = Self::take_shot(&mut expedition, session, player) {
                        guard.violations.push(format!("shot rejected: {err}"));
                        expedition.retreat();
                    }
                }
                ExpeditionPhase::Result => {
                    if let Some(result) = expedition.last_result() {
                        guard.hunt_recorded();
                        summary.outcomes.record(result.outcome());
                        if self.verbose && !result.completed_quests.is_empty() {
                            println!(
                                "     🏆 {}",
                                result.completed_quests.join(", ").bright_green()
                            );
                        }
                    }
                    summary.peak_tier = summary.peak_tier.max(session.state().difficulty_tier);
                    guard.check(session, &format!("encounter on {}", expedition.area()));
                    expedition.next();
                }
                ExpeditionPhase::NoArrows => {
                    summary.arrow_outages += 1;
                    expedition.next();
                }
                ExpeditionPhase::Finished => break,
            }
        }
    }

    fn take_shot(
        expedition: &mut Expedition,
        session: &mut GameSession<MemoryStore>,
        player: &mut SimulatedPlayer,
    ) -> Result<(), EngineError> {
        let Some(encounter) = expedition.encounter() else {
            expedition.retreat();
            return Ok(());
        };
        let total = f64::from(encounter.timer_total);
        match player.plan_shot(&encounter.question) {
            ShotPlan::Submit {
                wait_fraction,
                input,
            } => {
                expedition.tick(session, total * wait_fraction)?;
                expedition.submit(session, &input)?;
            }
            ShotPlan::Timeout { draft } => {
                expedition.update_draft(&draft);
                expedition.tick(session, total + 1.0)?;
            }
        }
        Ok(())
    }

    /// Craft between trips: arrows first, then gear that opens new ground.
    fn restock(&self, session: &mut GameSession<MemoryStore>, summary: &mut SimulationSummary) {
        if session.state().inventory.count("bow") == 0 && session.can_craft("recurve_bow") {
            self.craft(session, summary, "recurve_bow");
        }
        if !session.state().is_area_unlocked(RIVER_AREA) && session.can_craft("fish_trap") {
            self.craft(session, summary, "fish_trap");
        }
        while session.state().inventory.count("arrow") < ARROW_RESERVE
            && session.can_craft("basic_arrow")
        {
            self.craft(session, summary, "basic_arrow");
        }
        let mut attempts = 0;
        while session.state().inventory.count("arrow") == 0 && attempts < FORAGE_ATTEMPTS {
            attempts += 1;
            if session.forage(HOME_AREA).is_ok() {
                summary.forages += 1;
            }
            if session.can_craft("basic_arrow") {
                self.craft(session, summary, "basic_arrow");
            }
        }
        session.check_and_complete_quests();
    }

    fn craft(
        &self,
        session: &mut GameSession<MemoryStore>,
        summary: &mut SimulationSummary,
        recipe: &str,
    ) {
        match session.craft(recipe) {
            Ok(report) => {
                summary.crafts += 1;
                if self.verbose {
                    println!("     🔨 crafted {}", report.recipe.bright_white());
                }
                for area in &report.unlocked_areas {
                    log::info!("{area} unlocked by {recipe}");
                }
            }
            Err(err) => summary.violations.push(format!("craft {recipe} failed: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_player_runs_clean() {
        let plan = SimulationPlan::new(PlayerProfile::Steady).with_expeditions(4);
        let summary = GameTester::new(false).run_plan(&plan, 1337);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
        assert_eq!(summary.expeditions_run, 4);
        assert_eq!(
            summary.outcomes.total(),
            summary.final_state.stats.total_attempted
        );
        assert!(summary.has_quest("first_hunt"));
    }

    #[test]
    fn runs_are_deterministic_per_seed() {
        let plan = SimulationPlan::new(PlayerProfile::Hesitant).with_expeditions(3);
        let tester = GameTester::new(false);
        let a = tester.run_plan(&plan, 42);
        let b = tester.run_plan(&plan, 42);
        assert_eq!(a.final_state, b.final_state);
        assert_eq!(a.outcomes, b.outcomes);
    }

    #[test]
    fn sharpshooter_only_lands_perfect_shots() {
        let plan = SimulationPlan::new(PlayerProfile::Sharpshooter).with_expeditions(2);
        let summary = GameTester::new(false).run_plan(&plan, 7);
        assert_eq!(summary.outcomes.perfect, summary.outcomes.total());
        assert!(summary.has_quest("perfect_three"));
        assert_eq!(summary.peak_tier.get(), 3);
    }

    #[test]
    fn guard_accepts_tier_move_once_window_is_full() {
        let mut session = GameSession::from_seed(MemoryStore::new(), 11);
        session.init_game("Guard");
        let mut guard = InvariantGuard::new(session.state());
        for _ in 0..ACCURACY_MIN_SAMPLES {
            session.record_hunt("rabbit", HuntOutcome::Perfect).unwrap();
            guard.hunt_recorded();
            guard.check(&session, "perfect run");
        }
        assert!(guard.violations.is_empty(), "{:?}", guard.violations);
        assert_eq!(session.state().difficulty_tier.get(), MIN_TIER + 1);
    }

    #[test]
    fn tally_counts_each_outcome() {
        let mut tally = OutcomeTally::default();
        for outcome in HuntOutcome::ALL {
            tally.record(outcome);
        }
        tally.record(HuntOutcome::Miss);
        assert_eq!(tally.miss, 2);
        assert_eq!(tally.total(), 5);
    }
}
