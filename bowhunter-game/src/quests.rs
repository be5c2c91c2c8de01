//! Quest evaluation and reward granting.

use smallvec::SmallVec;

use crate::data::{Catalog, Quest, QuestGoal};
use crate::state::PlayerState;

/// Quest ids completed by one evaluation pass, in definition order.
pub type CompletedQuests = SmallVec<[String; 2]>;

/// Whether `goal` is met by the given state.
#[must_use]
pub fn goal_met(goal: &QuestGoal, state: &PlayerState) -> bool {
    match goal {
        QuestGoal::HuntTotal { count } => state.stats.total_hunts >= *count,
        QuestGoal::HuntAnimal { animal, count } => state.stats.harvested(animal) >= *count,
        QuestGoal::Craft { item, count } => state.stats.crafted(item) >= *count,
        QuestGoal::PerfectStreak { count } => state.perfect_streak >= *count,
    }
}

/// Complete every quest whose goal is met and grant its reward.
///
/// Goals are judged against the state as it was before this call, so a reward
/// never satisfies another quest within the same pass.
pub fn check_and_complete(state: &mut PlayerState, catalog: &Catalog) -> CompletedQuests {
    let snapshot = state.clone();
    let ready: Vec<&Quest> = catalog
        .quests
        .iter()
        .filter(|quest| !snapshot.is_quest_completed(&quest.id))
        .filter(|quest| goal_met(&quest.goal, &snapshot))
        .collect();

    let mut completed = CompletedQuests::new();
    for quest in ready {
        state.completed_quests.push(quest.id.clone());
        state.add_honor(quest.reward.honor);
        state.inventory.add_all(&quest.reward.materials);
        log::debug!("quest {} complete (+{} honor)", quest.id, quest.reward.honor);
        completed.push(quest.id.clone());
    }
    if !completed.is_empty() {
        state.sync_rank(catalog);
    }
    completed
}

/// Quests not yet completed, in definition order.
pub fn active_quests<'a>(
    state: &'a PlayerState,
    catalog: &'a Catalog,
) -> impl Iterator<Item = &'a Quest> + 'a {
    catalog
        .quests
        .iter()
        .filter(move |quest| !state.is_quest_completed(&quest.id))
}

/// Completed quests in completion order. Ids missing from the catalog are skipped.
pub fn completed_quests<'a>(
    state: &'a PlayerState,
    catalog: &'a Catalog,
) -> impl Iterator<Item = &'a Quest> + 'a {
    state
        .completed_quests
        .iter()
        .filter_map(move |id| catalog.quest(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog;

    fn fresh() -> PlayerState {
        PlayerState::new_journey("Ada", catalog())
    }

    #[test]
    fn first_hunt_rewards_once() {
        let mut state = fresh();
        state.stats.total_hunts = 1;
        let flint = state.inventory.count("flint");

        let done = check_and_complete(&mut state, catalog());
        assert_eq!(done.as_slice(), ["first_hunt".to_string()]);
        assert_eq!(state.honor, 5);
        assert_eq!(state.inventory.count("flint"), flint + 5);

        assert!(check_and_complete(&mut state, catalog()).is_empty());
        assert_eq!(state.honor, 5);
        assert_eq!(state.inventory.count("flint"), flint + 5);
    }

    #[test]
    fn several_quests_complete_in_definition_order() {
        let mut state = fresh();
        state.stats.total_hunts = 10;
        state.perfect_streak = 3;
        let done = check_and_complete(&mut state, catalog());
        assert_eq!(
            done.to_vec(),
            vec!["first_hunt", "five_hunts", "perfect_three", "ten_hunts"]
        );
        assert_eq!(state.honor, 5 + 10 + 15 + 15);
        assert_eq!(state.rank_index, 2);
    }

    #[test]
    fn goals_cover_every_variant() {
        let mut state = fresh();
        let animal = QuestGoal::HuntAnimal {
            animal: "wild_turkey".to_string(),
            count: 3,
        };
        let craft = QuestGoal::Craft {
            item: "basic_arrow".to_string(),
            count: 1,
        };
        assert!(!goal_met(&animal, &state));
        assert!(!goal_met(&craft, &state));
        state
            .stats
            .animals_harvested
            .insert("wild_turkey".to_string(), 3);
        state.stats.total_crafted.insert("basic_arrow".to_string(), 1);
        assert!(goal_met(&animal, &state));
        assert!(goal_met(&craft, &state));
        assert!(goal_met(&QuestGoal::PerfectStreak { count: 0 }, &state));
    }

    #[test]
    fn listings_split_active_and_completed() {
        let mut state = fresh();
        state.completed_quests = vec!["five_hunts".to_string(), "retired_quest".to_string()];
        let active: Vec<&str> = active_quests(&state, catalog())
            .map(|q| q.id.as_str())
            .collect();
        assert!(!active.contains(&"five_hunts"));
        assert_eq!(active.len(), catalog().quests.len() - 1);
        let completed: Vec<&str> = completed_quests(&state, catalog())
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(completed, vec!["five_hunts"]);
    }
}
