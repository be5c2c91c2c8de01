use bowhunter_game::{
    EngineError, GameSession, HuntOutcome, Inventory, MemoryStore, PlayerState, SAVE_KEY,
    SaveStore,
};

fn session_with(entries: &[(&str, u32)]) -> (GameSession<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let mut state = PlayerState::new_journey("Tester", bowhunter_game::catalog());
    state.inventory = Inventory::new(
        entries
            .iter()
            .map(|(item, qty)| ((*item).to_string(), *qty))
            .collect(),
    );
    store
        .set(SAVE_KEY, &serde_json::to_string(&state).unwrap())
        .unwrap();
    let mut session = GameSession::from_seed(store.clone(), 0x5EED);
    assert!(session.load_existing_save());
    (session, store)
}

fn fresh() -> GameSession<MemoryStore> {
    let mut session = GameSession::from_seed(MemoryStore::new(), 0x5EED);
    session.init_game("Tester");
    session
}

#[test]
fn crafting_basic_arrows_spends_exact_materials() {
    let (mut session, _) = session_with(&[("flint", 5), ("feather", 10), ("stick", 3)]);
    session.craft("basic_arrow").unwrap();
    let state = session.state();
    assert_eq!(state.inventory.count("flint"), 0);
    assert_eq!(state.inventory.count("feather"), 0);
    assert_eq!(state.inventory.count("stick"), 0);
    assert_eq!(state.inventory.count("arrow"), 5);
    assert_eq!(state.crafted_items.get("basic_arrow"), Some(&1));
}

#[test]
fn failed_craft_leaves_state_and_save_alone() {
    let (mut session, store) = session_with(&[("flint", 4), ("feather", 10), ("stick", 3)]);
    let saved = store.get(SAVE_KEY).unwrap();
    let before = session.state().clone();
    assert!(!session.can_craft("basic_arrow"));
    assert!(matches!(
        session.craft("basic_arrow"),
        Err(EngineError::InsufficientMaterials { .. })
    ));
    assert_eq!(session.state(), &before);
    assert_eq!(store.get(SAVE_KEY).unwrap(), saved);
}

#[test]
fn miss_on_rabbit_costs_one_arrow() {
    let mut session = fresh();
    session.record_hunt("rabbit", HuntOutcome::Hit).unwrap();
    session.record_hunt("rabbit", HuntOutcome::Miss).unwrap();
    let state = session.state();
    assert_eq!(state.inventory.count("arrow"), 4);
    assert_eq!(state.honor, 1);
    assert_eq!(state.perfect_streak, 0);
}

#[test]
fn perfect_rabbit_grants_bonus_loot() {
    let mut session = fresh();
    let before = session.state().inventory.clone();
    let report = session.record_hunt("rabbit", HuntOutcome::Perfect).unwrap();
    let state = session.state();
    assert_eq!(state.honor, 3);
    assert_eq!(state.stats.perfect_shots, 1);
    assert_eq!(state.inventory.count("meat"), 3);
    assert_eq!(state.inventory.count("pelt"), 2);

    let (material, qty) = report.bonus_material.expect("meadow has forageables");
    assert_eq!(qty, 2);
    assert_eq!(
        state.inventory.count(&material),
        before.count(&material) + 2
    );
}

#[test]
fn five_misses_hold_the_lowest_tier() {
    let mut session = fresh();
    for _ in 0..5 {
        session.record_hunt("rabbit", HuntOutcome::Miss).unwrap();
    }
    assert_eq!(session.state().difficulty_tier.get(), 1);
    assert_eq!(session.state().inventory.count("arrow"), 0);
}

#[test]
fn first_hunt_quest_pays_out_once() {
    let mut session = fresh();
    session.record_hunt("quail", HuntOutcome::Spooked).unwrap();
    assert!(session.check_and_complete_quests().is_empty());

    session.record_hunt("quail", HuntOutcome::Hit).unwrap();
    let honor = session.state().honor;
    let flint = session.state().inventory.count("flint");
    let done = session.check_and_complete_quests();
    assert_eq!(done.as_slice(), ["first_hunt".to_string()]);
    assert_eq!(session.state().honor, honor + 5);
    assert_eq!(session.state().inventory.count("flint"), flint + 5);

    assert!(session.check_and_complete_quests().is_empty());
    assert_eq!(session.state().honor, honor + 5);
    assert_eq!(session.state().inventory.count("flint"), flint + 5);
}

#[test]
fn spooked_breaks_the_perfect_streak() {
    let mut session = fresh();
    session.record_hunt("rabbit", HuntOutcome::Perfect).unwrap();
    session.record_hunt("rabbit", HuntOutcome::Hit).unwrap();
    assert_eq!(session.state().perfect_streak, 2);
    session.record_hunt("rabbit", HuntOutcome::Spooked).unwrap();
    assert_eq!(session.state().perfect_streak, 0);
}

#[test]
fn unknown_animal_is_rejected_without_saving() {
    let mut session = fresh();
    let raw = session.store().get(SAVE_KEY).unwrap();
    assert_eq!(
        session.record_hunt("yeti", HuntOutcome::Perfect).unwrap_err(),
        EngineError::UnknownAnimal("yeti".to_string())
    );
    assert_eq!(session.state().stats.total_attempted, 0);
    assert_eq!(session.store().get(SAVE_KEY).unwrap(), raw);
}
