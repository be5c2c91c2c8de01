#![cfg(target_arch = "wasm32")]

use bowhunter_web::facade::GameFacade;
use bowhunter_web::game::{LocalStorageStore, SAVE_KEY, SaveStore};
use wasm_bindgen_test::*;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn clean_store() -> LocalStorageStore {
    let store = LocalStorageStore::from_window().expect("localStorage");
    store.remove(SAVE_KEY).expect("clear save");
    store
}

#[wasm_bindgen_test]
fn local_storage_round_trips_values() {
    let store = clean_store();
    store.set("bowhunter.test", "42").unwrap();
    assert_eq!(store.get("bowhunter.test").unwrap().as_deref(), Some("42"));
    store.remove("bowhunter.test").unwrap();
    assert_eq!(store.get("bowhunter.test").unwrap(), None);
}

#[wasm_bindgen_test]
fn facade_persists_into_local_storage() {
    let store = clean_store();
    let mut facade = GameFacade::new(store.clone(), 5);
    assert!(!facade.init_game("Browser"));
    facade.record_hunt("rabbit", "perfect").unwrap();

    let mut resumed = GameFacade::new(store.clone(), 6);
    assert!(resumed.init_game("Other"));
    assert_eq!(resumed.session().state().player_name, "Browser");
    assert_eq!(resumed.session().state().honor, 3);

    resumed.reset_game();
    assert_eq!(store.get(SAVE_KEY).unwrap(), None);
}
