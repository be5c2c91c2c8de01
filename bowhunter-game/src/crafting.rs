//! Crafting: recipe checks, atomic material exchange, and area unlocks driven
//! by crafted gear.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::data::{Catalog, ItemCounts, Recipe};
use crate::error::EngineError;
use crate::state::PlayerState;

/// What a successful craft changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftReport {
    pub recipe: String,
    pub consumed: ItemCounts,
    pub produced: ItemCounts,
    pub unlocked_areas: SmallVec<[String; 2]>,
}

#[must_use]
pub fn can_craft(state: &PlayerState, catalog: &Catalog, recipe_id: &str) -> bool {
    catalog
        .recipe(recipe_id)
        .is_some_and(|recipe| state.inventory.has_all(&recipe.materials))
}

/// Number of times `recipe_id` could be crafted in a row from current holdings.
#[must_use]
pub fn max_craftable(state: &PlayerState, catalog: &Catalog, recipe_id: &str) -> u32 {
    catalog
        .recipe(recipe_id)
        .map_or(0, |recipe| state.inventory.times_affordable(&recipe.materials))
}

/// Recipes offered to the player, in catalog order.
pub fn craftable_recipes(catalog: &Catalog) -> impl Iterator<Item = &Recipe> {
    catalog.recipes.iter().filter(|recipe| recipe.unlocked)
}

/// Exchange a recipe's materials for its products.
///
/// # Errors
///
/// Returns [`EngineError::UnknownRecipe`] or
/// [`EngineError::InsufficientMaterials`] without touching the inventory.
pub fn craft(
    state: &mut PlayerState,
    catalog: &Catalog,
    recipe_id: &str,
) -> Result<CraftReport, EngineError> {
    let recipe = catalog
        .recipe(recipe_id)
        .ok_or_else(|| EngineError::UnknownRecipe(recipe_id.to_string()))?;
    if !state.inventory.consume_all(&recipe.materials) {
        return Err(EngineError::InsufficientMaterials {
            recipe: recipe.id.clone(),
        });
    }
    state.inventory.add_all(&recipe.produces);
    bump(&mut state.crafted_items, &recipe.id);
    bump(&mut state.stats.total_crafted, &recipe.id);

    let unlocked_areas = refresh_unlocked_areas(state, catalog);
    log::debug!("crafted {} (total {})", recipe.id, state.stats.crafted(&recipe.id));
    Ok(CraftReport {
        recipe: recipe.id.clone(),
        consumed: recipe.materials.clone(),
        produced: recipe.produces.clone(),
        unlocked_areas,
    })
}

/// Unlock every area whose required item is now held. Returns the ids that
/// were newly unlocked.
pub fn refresh_unlocked_areas(
    state: &mut PlayerState,
    catalog: &Catalog,
) -> SmallVec<[String; 2]> {
    let mut newly = SmallVec::new();
    for area in &catalog.areas {
        if state.is_area_unlocked(&area.id) {
            continue;
        }
        let opened = area.unlocked
            || area
                .unlock_requirement
                .as_deref()
                .is_some_and(|item| state.inventory.count(item) > 0);
        if opened {
            state.unlocked_areas.push(area.id.clone());
            log::debug!("area {} unlocked", area.id);
            newly.push(area.id.clone());
        }
    }
    newly
}

fn bump(counts: &mut ItemCounts, key: &str) {
    let slot = counts.entry(key.to_string()).or_insert(0);
    *slot = slot.saturating_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog;
    use crate::inventory::Inventory;

    fn with_inventory(entries: &[(&str, u32)]) -> PlayerState {
        let mut state = PlayerState::new_journey("Ada", catalog());
        state.inventory = Inventory::new(
            entries
                .iter()
                .map(|(item, qty)| ((*item).to_string(), *qty))
                .collect(),
        );
        state
    }

    #[test]
    fn basic_arrow_exchanges_exact_amounts() {
        let mut state = with_inventory(&[("flint", 5), ("feather", 10), ("stick", 3)]);
        assert!(can_craft(&state, catalog(), "basic_arrow"));
        let report = craft(&mut state, catalog(), "basic_arrow").unwrap();
        assert_eq!(report.recipe, "basic_arrow");
        assert_eq!(state.inventory.count("flint"), 0);
        assert_eq!(state.inventory.count("feather"), 0);
        assert_eq!(state.inventory.count("stick"), 0);
        assert_eq!(state.inventory.count("arrow"), 5);
        assert_eq!(state.crafted_items.get("basic_arrow"), Some(&1));
        assert_eq!(state.stats.crafted("basic_arrow"), 1);
    }

    #[test]
    fn short_materials_reject_without_change() {
        let mut state = with_inventory(&[("flint", 4), ("feather", 10), ("stick", 3)]);
        let before = state.clone();
        assert!(!can_craft(&state, catalog(), "basic_arrow"));
        let err = craft(&mut state, catalog(), "basic_arrow").unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientMaterials {
                recipe: "basic_arrow".to_string()
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn unknown_recipe_is_rejected() {
        let mut state = with_inventory(&[]);
        assert!(!can_craft(&state, catalog(), "longbow"));
        assert_eq!(max_craftable(&state, catalog(), "longbow"), 0);
        assert_eq!(
            craft(&mut state, catalog(), "longbow").unwrap_err(),
            EngineError::UnknownRecipe("longbow".to_string())
        );
    }

    #[test]
    fn fish_trap_opens_the_river() {
        let mut state = with_inventory(&[("willow", 12), ("cord", 8)]);
        assert!(!state.is_area_unlocked("river"));
        let report = craft(&mut state, catalog(), "fish_trap").unwrap();
        assert_eq!(report.unlocked_areas.as_slice(), ["river".to_string()]);
        assert!(state.is_area_unlocked("river"));
        assert!(refresh_unlocked_areas(&mut state, catalog()).is_empty());
    }

    #[test]
    fn max_craftable_tracks_scarcest_input() {
        let state = with_inventory(&[("flint", 11), ("feather", 30), ("stick", 9)]);
        assert_eq!(max_craftable(&state, catalog(), "basic_arrow"), 2);
    }

    #[test]
    fn listing_hides_locked_recipes() {
        let listed: Vec<&str> = craftable_recipes(catalog())
            .map(|recipe| recipe.id.as_str())
            .collect();
        assert!(listed.contains(&"basic_arrow"));
        assert!(!listed.contains(&"fish_trap"));
    }
}
