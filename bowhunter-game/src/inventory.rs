//! Material and item accounting.
use serde::{Deserialize, Serialize};

use crate::data::ItemCounts;

/// Item id to held quantity. Missing ids read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Inventory(ItemCounts);

impl Inventory {
    #[must_use]
    pub const fn new(items: ItemCounts) -> Self {
        Self(items)
    }

    #[must_use]
    pub fn count(&self, item: &str) -> u32 {
        self.0.get(item).copied().unwrap_or(0)
    }

    pub fn add(&mut self, item: &str, qty: u32) {
        let slot = self.0.entry(item.to_string()).or_insert(0);
        *slot = slot.saturating_add(qty);
    }

    /// Add every entry of `items`.
    pub fn add_all(&mut self, items: &ItemCounts) {
        for (item, qty) in items {
            self.add(item, *qty);
        }
    }

    /// Remove a single unit if any is held. Returns whether one was removed.
    pub fn take_one(&mut self, item: &str) -> bool {
        match self.0.get_mut(item) {
            Some(qty) if *qty > 0 => {
                *qty -= 1;
                true
            }
            _ => false,
        }
    }

    /// Whether every requirement is covered by held quantities.
    #[must_use]
    pub fn has_all(&self, requirements: &ItemCounts) -> bool {
        requirements
            .iter()
            .all(|(item, qty)| self.count(item) >= *qty)
    }

    /// Remove every requirement, or nothing at all if any is short.
    pub fn consume_all(&mut self, requirements: &ItemCounts) -> bool {
        if !self.has_all(requirements) {
            return false;
        }
        for (item, qty) in requirements {
            if let Some(held) = self.0.get_mut(item) {
                *held -= qty;
            }
        }
        true
    }

    /// How many times `requirements` could be paid from current holdings.
    #[must_use]
    pub fn times_affordable(&self, requirements: &ItemCounts) -> u32 {
        requirements
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(item, qty)| self.count(item) / qty)
            .min()
            .unwrap_or(0)
    }

    /// Entries with a positive quantity, ordered by id.
    pub fn held(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(item, qty)| (item.as_str(), *qty))
    }

    #[must_use]
    pub const fn as_map(&self) -> &ItemCounts {
        &self.0
    }
}

impl From<ItemCounts> for Inventory {
    fn from(items: ItemCounts) -> Self {
        Self(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u32)]) -> ItemCounts {
        entries
            .iter()
            .map(|(item, qty)| ((*item).to_string(), *qty))
            .collect()
    }

    #[test]
    fn consume_is_all_or_nothing() {
        let mut inv = Inventory::new(counts(&[("stick", 3), ("flint", 4)]));
        let cost = counts(&[("stick", 3), ("flint", 5)]);
        assert!(!inv.consume_all(&cost));
        assert_eq!(inv.count("stick"), 3);
        assert_eq!(inv.count("flint"), 4);

        inv.add("flint", 1);
        assert!(inv.consume_all(&cost));
        assert_eq!(inv.count("stick"), 0);
        assert_eq!(inv.count("flint"), 0);
    }

    #[test]
    fn take_one_floors_at_zero() {
        let mut inv = Inventory::new(counts(&[("arrow", 1)]));
        assert!(inv.take_one("arrow"));
        assert!(!inv.take_one("arrow"));
        assert!(!inv.take_one("unknown"));
        assert_eq!(inv.count("arrow"), 0);
    }

    #[test]
    fn times_affordable_uses_scarcest_material() {
        let inv = Inventory::new(counts(&[("willow", 25), ("cord", 8)]));
        assert_eq!(
            inv.times_affordable(&counts(&[("willow", 12), ("cord", 8)])),
            1
        );
        assert_eq!(inv.times_affordable(&ItemCounts::new()), 0);
    }

    #[test]
    fn held_skips_empty_slots() {
        let inv = Inventory::new(counts(&[("bow", 0), ("meat", 2)]));
        let held: Vec<_> = inv.held().collect();
        assert_eq!(held, vec![("meat", 2)]);
    }
}
