//! Item view
//!
//! The engine-side snapshot of a host thing: base definition identity,
//! material, quality, stack count, and the base stat values the affix
//! pipeline transforms. The host entity itself stays external.

use serde::{Deserialize, Serialize};

use crate::host::{PawnView, Quality, TechLevel};

/// Unique item instance id, assigned by the host.
pub type ItemId = u64;

/// Engine-side view of one affixable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Base definition name, the key into the base-props cache.
    pub def_name: String,
    /// Base type label, e.g. "longsword".
    pub base_label: String,
    /// Material label, e.g. "steel". Part of the stuff label.
    pub material: Option<String>,
    pub quality: Quality,
    pub tech_level: TechLevel,
    pub stack_count: u32,
    pub is_ranged: bool,
    pub is_melee: bool,
    pub uses_hit_points: bool,
    pub hit_points: f32,
    pub base_max_hit_points: f32,
    pub base_market_value: f32,
    pub base_mass: f32,
    pub base_flammability: f32,
    /// Pawn currently holding or wearing the item, if any.
    pub holder: Option<PawnView>,
}

impl Item {
    pub fn new(def_name: impl Into<String>, base_label: impl Into<String>) -> Self {
        Self {
            id: 0,
            def_name: def_name.into(),
            base_label: base_label.into(),
            material: None,
            quality: Quality::Normal,
            tech_level: TechLevel::Medieval,
            stack_count: 1,
            is_ranged: false,
            is_melee: false,
            uses_hit_points: true,
            hit_points: 100.0,
            base_max_hit_points: 100.0,
            base_market_value: 100.0,
            base_mass: 1.0,
            base_flammability: 1.0,
            holder: None,
        }
    }

    pub fn ranged(
        def_name: impl Into<String>,
        base_label: impl Into<String>,
        tech_level: TechLevel,
    ) -> Self {
        let mut item = Self::new(def_name, base_label);
        item.is_ranged = true;
        item.tech_level = tech_level;
        item
    }

    pub fn melee(def_name: impl Into<String>, base_label: impl Into<String>) -> Self {
        let mut item = Self::new(def_name, base_label);
        item.is_melee = true;
        item
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn is_equippable(&self) -> bool {
        self.is_ranged || self.is_melee
    }

    /// The undecorated "material base-type" label, e.g. "steel longsword".
    /// The generated full label always contains this as a substring.
    pub fn stuff_label(&self) -> String {
        match &self.material {
            Some(material) => format!("{} {}", material, self.base_label),
            None => self.base_label.clone(),
        }
    }

    /// Holder if they are alive; periodic effects require one.
    pub fn living_holder(&self) -> Option<PawnView> {
        self.holder.filter(|p| p.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stuff_label() {
        let item = Item::melee("longsword", "longsword").with_material("steel");
        assert_eq!(item.stuff_label(), "steel longsword");

        let bare = Item::melee("club", "club");
        assert_eq!(bare.stuff_label(), "club");
    }

    #[test]
    fn test_living_holder() {
        let mut item = Item::melee("club", "club");
        assert!(item.living_holder().is_none());

        item.holder = Some(PawnView { id: 1, alive: false, player_faction: true });
        assert!(item.living_holder().is_none());

        item.holder = Some(PawnView { id: 1, alive: true, player_faction: true });
        assert!(item.living_holder().is_some());
    }
}
