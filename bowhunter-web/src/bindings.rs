//! `wasm-bindgen` surface over [`GameFacade`].

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use crate::facade::GameFacade;
use crate::game::{LocalStorageStore, timer_seconds};

/// Maps go out as plain objects so the page can index them directly.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    Ok(value.serialize(&Serializer::json_compatible())?)
}

fn entropy_seed() -> u64 {
    js_sys::Math::random().to_bits() ^ js_sys::Date::now().to_bits().rotate_left(17)
}

#[wasm_bindgen]
pub struct WebGame {
    inner: GameFacade<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsError> {
        let store = LocalStorageStore::from_window()?;
        Ok(Self {
            inner: GameFacade::new(store, entropy_seed()),
        })
    }

    #[wasm_bindgen(js_name = initGame)]
    pub fn init_game(&mut self, name: &str) -> bool {
        self.inner.init_game(name)
    }

    #[wasm_bindgen(js_name = hasSave)]
    pub fn has_save(&self) -> bool {
        self.inner.has_save()
    }

    #[wasm_bindgen(js_name = loadExistingSave)]
    pub fn load_existing_save(&mut self) -> bool {
        self.inner.load_existing_save()
    }

    #[wasm_bindgen(js_name = resetGame)]
    pub fn reset_game(&mut self) {
        self.inner.reset_game();
    }

    #[wasm_bindgen(js_name = recordHunt)]
    pub fn record_hunt(&mut self, animal: &str, outcome: &str) -> Result<JsValue, JsError> {
        let report = self.inner.record_hunt(animal, outcome)?;
        to_js(&report)
    }

    #[wasm_bindgen(js_name = canCraft)]
    pub fn can_craft(&self, recipe: &str) -> bool {
        self.inner.can_craft(recipe)
    }

    pub fn craft(&mut self, recipe: &str) -> Result<JsValue, JsError> {
        let report = self.inner.craft(recipe)?;
        to_js(&report)
    }

    pub fn recipes(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.recipes())
    }

    #[wasm_bindgen(js_name = checkAndCompleteQuests)]
    pub fn check_and_complete_quests(&mut self) -> Vec<String> {
        self.inner.check_and_complete_quests()
    }

    pub fn forage(&mut self, area: &str) -> Result<Option<String>, JsError> {
        Ok(self.inner.forage(area)?)
    }

    #[wasm_bindgen(js_name = setTopic)]
    pub fn set_topic(&mut self, topic: &str) -> Result<(), JsError> {
        Ok(self.inner.set_topic(topic)?)
    }

    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), JsError> {
        Ok(self.inner.set_difficulty(difficulty)?)
    }

    #[wasm_bindgen(js_name = nextQuestion)]
    pub fn next_question(&mut self) -> Result<JsValue, JsError> {
        let question = self.inner.next_question();
        to_js(&question)
    }

    #[wasm_bindgen(js_name = timerSeconds)]
    pub fn timer_seconds(&self) -> u32 {
        self.inner.timer_seconds()
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.progress())
    }
}

/// Timer length for a difficulty label, for pages that have no game yet.
#[wasm_bindgen(js_name = timerSecondsFor)]
pub fn timer_seconds_for(difficulty: &str) -> u32 {
    timer_seconds(difficulty)
}
