//! Static content tables: materials, recipes, animals, areas, ranks and quests.
//!
//! The shipped tables are compiled in from the web crate's static assets and
//! validated once on first access. Callers that want to experiment with
//! alternative content can build their own [`Catalog`] with
//! [`Catalog::from_json`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::Hasher;
use std::sync::OnceLock;
use thiserror::Error;
use twox_hash::XxHash64;

const DEFAULT_CONTENT_DATA: &str =
    include_str!("../../bowhunter-web/static/assets/data/content.json");

/// Item id to quantity, ordered by id so iteration is deterministic.
pub type ItemCounts = BTreeMap<String, u32>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub materials: ItemCounts,
    pub produces: ItemCounts,
    #[serde(default)]
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub area: String,
    /// Difficulty tier of the quarry (1-3).
    pub difficulty: u8,
    pub honor: u32,
    #[serde(default)]
    pub drops: ItemCounts,
    #[serde(default)]
    pub flee_chance: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub animals: Vec<String>,
    #[serde(default)]
    pub unlocked: bool,
    /// Item whose possession opens a locked area.
    #[serde(default)]
    pub unlock_requirement: Option<String>,
    #[serde(default = "default_min_tier")]
    pub min_tier: u8,
    #[serde(default)]
    pub materials_found: Vec<String>,
}

const fn default_min_tier() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub name: String,
    pub honor_required: u32,
    #[serde(default)]
    pub icon: String,
}

/// Completion predicate of a quest, evaluated against player stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestGoal {
    HuntTotal { count: u32 },
    HuntAnimal { animal: String, count: u32 },
    Craft { item: String, count: u32 },
    PerfectStreak { count: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestReward {
    #[serde(default)]
    pub honor: u32,
    #[serde(default)]
    pub materials: ItemCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub goal: QuestGoal,
    #[serde(default)]
    pub reward: QuestReward,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{owner_kind} `{owner}` references unknown {target_kind} `{target}`")]
    DanglingReference {
        owner_kind: &'static str,
        owner: String,
        target_kind: &'static str,
        target: String,
    },
    #[error("rank thresholds must start at 0 and strictly ascend")]
    RankOrder,
}

/// Container for all static game content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub animals: Vec<Animal>,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub ranks: Vec<Rank>,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub starter_inventory: ItemCounts,
}

/// Shared handle to the shipped content.
#[must_use]
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(Catalog::load_from_static)
}

/// Stable hash of the shipped content. Test reports carry it so a run can be
/// matched to the content revision it played against.
#[must_use]
pub fn content_fingerprint() -> u64 {
    fingerprint(DEFAULT_CONTENT_DATA.as_bytes())
}

fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

impl Catalog {
    /// Parse and validate catalog JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a reference between tables
    /// does not resolve, or the rank table is out of order.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the content shipped with the game, falling back to an empty
    /// catalog if the embedded asset is broken.
    #[must_use]
    pub fn load_from_static() -> Self {
        match Self::from_json(DEFAULT_CONTENT_DATA) {
            Ok(catalog) => catalog,
            Err(err) => {
                log::error!("embedded content catalog rejected: {err}");
                Self::default()
            }
        }
    }

    /// Check cross-table references and rank ordering.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for animal in &self.animals {
            if self.area(&animal.area).is_none() {
                return Err(dangling("animal", &animal.id, "area", &animal.area));
            }
        }
        for area in &self.areas {
            for animal_id in &area.animals {
                if self.animal(animal_id).is_none() {
                    return Err(dangling("area", &area.id, "animal", animal_id));
                }
            }
        }
        for quest in &self.quests {
            match &quest.goal {
                QuestGoal::HuntAnimal { animal, .. } if self.animal(animal).is_none() => {
                    return Err(dangling("quest", &quest.id, "animal", animal));
                }
                QuestGoal::Craft { item, .. } if self.recipe(item).is_none() => {
                    return Err(dangling("quest", &quest.id, "recipe", item));
                }
                _ => {}
            }
        }

        let starts_at_zero = self.ranks.first().is_some_and(|r| r.honor_required == 0);
        let ascending = self
            .ranks
            .windows(2)
            .all(|pair| pair[0].honor_required < pair[1].honor_required);
        if !starts_at_zero || !ascending {
            return Err(CatalogError::RankOrder);
        }
        Ok(())
    }

    #[must_use]
    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Display name for an item, falling back to the raw id.
    #[must_use]
    pub fn item_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.material(id).map_or(id, |m| m.name.as_str())
    }

    #[must_use]
    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn animal(&self, id: &str) -> Option<&Animal> {
        self.animals.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn area(&self, id: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    /// Highest rank whose threshold is at or below `honor`.
    #[must_use]
    pub fn rank_index_for(&self, honor: u32) -> usize {
        self.ranks
            .iter()
            .rposition(|rank| honor >= rank.honor_required)
            .unwrap_or(0)
    }

    /// Animals of an area that exist in the catalog, in area order.
    pub fn animals_in<'a>(&'a self, area: &'a Area) -> impl Iterator<Item = &'a Animal> + 'a {
        area.animals.iter().filter_map(|id| self.animal(id))
    }
}

fn dangling(
    owner_kind: &'static str,
    owner: &str,
    target_kind: &'static str,
    target: &str,
) -> CatalogError {
    CatalogError::DanglingReference {
        owner_kind,
        owner: owner.to_string(),
        target_kind,
        target: target.to_string(),
    }
}
