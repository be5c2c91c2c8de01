use anyhow::{Result, ensure};
use bowhunter_game::{Difficulty, MathTopic};

use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};
use crate::logic::player::PlayerProfile;

const STARTER_ARROWS: u32 = 5;

/// Named simulation plan runnable from the CLI.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let plan = match name.to_lowercase().as_str() {
        "smoke" => smoke(),
        "marathon" => marathon(),
        "struggling" => struggling(),
        "sharpshooter" => sharpshooter(),
        "hesitant" => hesitant(),
        "empty-quiver" => empty_quiver(),
        "hunter-timer" => hunter_timer(),
        "deterministic" => deterministic(),
        _ => return None,
    };
    Some(TestScenario::simulation(name.to_lowercase(), plan))
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Two expeditions with a steady player"),
        ("marathon", "Twelve expeditions through to the river"),
        ("struggling", "Mostly wrong answers, tier stays low"),
        ("sharpshooter", "Only perfect shots, tier climbs to the top"),
        ("hesitant", "Correct answers that often arrive too late"),
        ("empty-quiver", "No crafting, so misses drain the starter arrows"),
        ("hunter-timer", "Shortest timer with multiplication drills"),
        ("deterministic", "Same seed replays to an identical save"),
    ]
}

/// Every scenario key, in listing order.
pub fn all_scenario_names() -> Vec<String> {
    list_scenarios()
        .into_iter()
        .map(|(key, _)| key.to_string())
        .collect()
}

fn smoke() -> SimulationPlan {
    SimulationPlan::new(PlayerProfile::Steady)
        .with_expeditions(2)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(summary.expeditions_run == 2, "expected two expeditions");
            ensure!(
                summary.outcomes.total() > 0,
                "no encounters were resolved"
            );
            ensure!(
                summary.has_quest("first_hunt"),
                "first_hunt not completed after {} encounters",
                summary.outcomes.total()
            );
            Ok(())
        })
}

fn marathon() -> SimulationPlan {
    SimulationPlan::new(PlayerProfile::Steady)
        .with_expeditions(12)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(summary.has_quest("ten_hunts"), "ten_hunts not completed");
            ensure!(
                summary.final_state.is_area_unlocked("river"),
                "river still locked after {} crafts",
                summary.crafts
            );
            ensure!(
                summary.final_state.rank_index >= 1,
                "still an Apprentice with {} honor",
                summary.final_state.honor
            );
            Ok(())
        })
}

fn struggling() -> SimulationPlan {
    SimulationPlan::new(PlayerProfile::Struggling)
        .with_expeditions(4)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(summary.outcomes.miss > 0, "a struggling player never missed");
            ensure!(
                summary.peak_tier.get() < bowhunter_game::MAX_TIER,
                "tier reached the top with {}% accuracy",
                summary.final_state.stats.accuracy_percent()
            );
            Ok(())
        })
}

fn sharpshooter() -> SimulationPlan {
    SimulationPlan::new(PlayerProfile::Sharpshooter)
        .with_expeditions(3)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(
                summary.outcomes.perfect == summary.outcomes.total(),
                "expected only perfect shots, got {:?}",
                summary.outcomes
            );
            ensure!(summary.has_quest("perfect_three"), "perfect_three missing");
            ensure!(
                summary.final_state.difficulty_tier.get() == bowhunter_game::MAX_TIER,
                "tier stuck at {}",
                summary.final_state.difficulty_tier
            );
            Ok(())
        })
}

fn hesitant() -> SimulationPlan {
    SimulationPlan::new(PlayerProfile::Hesitant)
        .with_expeditions(3)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(summary.outcomes.spooked > 0, "no animal was ever spooked");
            ensure!(
                summary.final_state.stats.total_hunts
                    == summary.outcomes.perfect + summary.outcomes.hit,
                "harvest count {} disagrees with tally {:?}",
                summary.final_state.stats.total_hunts,
                summary.outcomes
            );
            Ok(())
        })
}

fn empty_quiver() -> SimulationPlan {
    SimulationPlan::new(PlayerProfile::Struggling)
        .with_expeditions(4)
        .without_crafting()
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            let arrows = summary.final_state.inventory.count("arrow");
            ensure!(
                summary.outcomes.miss <= STARTER_ARROWS,
                "{} misses from a quiver of {STARTER_ARROWS}",
                summary.outcomes.miss
            );
            ensure!(summary.crafts == 0, "crafted {} times", summary.crafts);
            if summary.arrow_outages > 0 {
                ensure!(arrows == 0, "ran dry but still holds {arrows} arrows");
            }
            Ok(())
        })
}

fn hunter_timer() -> SimulationPlan {
    SimulationPlan::new(PlayerProfile::Steady)
        .with_expeditions(2)
        .with_difficulty(Difficulty::Hunter)
        .with_topic(MathTopic::Multiplication)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(
                summary.final_state.difficulty == Difficulty::Hunter,
                "difficulty not kept"
            );
            ensure!(
                summary.final_state.math_topic == MathTopic::Multiplication,
                "topic not kept"
            );
            Ok(())
        })
}

fn deterministic() -> SimulationPlan {
    let base = SimulationPlan::new(PlayerProfile::Hesitant).with_expeditions(4);
    let replay = base.clone();
    base.with_expectation(move |summary: &SimulationSummary| -> Result<()> {
        let again = GameTester::new(false).run_plan(&replay, summary.seed);
        ensure!(
            again.final_state == summary.final_state,
            "seed {} produced a different save on replay",
            summary.seed
        );
        ensure!(again.outcomes == summary.outcomes, "outcome tallies diverged");
        Ok(())
    })
}
