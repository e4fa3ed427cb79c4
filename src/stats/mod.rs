//! Stat pipeline
//!
//! Folds affix stat modifiers into final stat values: item stats (market
//! value, max hit points, mass, flammability) transform the item's base
//! value, and equipped-pawn stats transform whatever baseline the host
//! hands in. Modifiers apply in affix selection order.

use crate::catalog::{Catalog, ModifierKind, StatId};
use crate::item::{AffixedItem, Item};

/// The item's own base value for a stat, before any affix touches it.
pub fn base_item_stat(item: &Item, stat: StatId) -> f32 {
    match stat {
        StatId::MaxHitPoints => item.base_max_hit_points,
        StatId::MarketValue => item.base_market_value,
        StatId::Mass => item.base_mass,
        StatId::Flammability => item.base_flammability,
        _ => 0.0,
    }
}

/// Final value of an item stat with every matching affix modifier folded
/// in, in selection order.
pub fn item_stat(affixed: &AffixedItem, catalog: &Catalog, stat: StatId) -> f32 {
    let mut value = base_item_stat(&affixed.item, stat);
    for name in &affixed.state().affixes {
        let Some(def) = catalog.get(name) else { continue };
        for modifier in &def.modifiers {
            if let ModifierKind::StatChange { stat: s, value: vm } = &modifier.kind {
                if *s == stat {
                    value = vm.apply(value);
                }
            }
        }
    }
    value
}

/// Final value of a pawn stat while this item is equipped, folding
/// equipped-stat modifiers over the host-supplied baseline.
pub fn equipped_stat(affixed: &AffixedItem, catalog: &Catalog, stat: StatId, baseline: f32) -> f32 {
    let mut value = baseline;
    for name in &affixed.state().affixes {
        let Some(def) = catalog.get(name) else { continue };
        for modifier in &def.modifiers {
            if let ModifierKind::EquippedStatChange { stat: s, value: vm } = &modifier.kind {
                if *s == stat {
                    value = vm.apply(value);
                }
            }
        }
    }
    value
}

/// Whether any affix on the item changes the given item stat.
pub fn changes_stat(affixed: &AffixedItem, catalog: &Catalog, stat: StatId) -> bool {
    affixed.state().affixes.iter().any(|name| {
        catalog.get(name).is_some_and(|def| {
            def.modifiers
                .iter()
                .any(|m| m.affected_stat() == Some(stat))
        })
    })
}

/// Refresh current hit points after a max-hit-points change, preserving
/// the damage fraction. Call after affix generation and after any affix
/// change that touches MaxHitPoints.
pub fn refresh_hit_points(affixed: &mut AffixedItem, catalog: &Catalog) {
    if !affixed.item.uses_hit_points {
        return;
    }
    let new_max = item_stat(affixed, catalog, StatId::MaxHitPoints);
    let old_max = affixed.item.base_max_hit_points;
    if old_max <= 0.0 || new_max <= 0.0 {
        return;
    }
    let fraction = (affixed.item.hit_points / old_max).clamp(0.0, 1.0);
    affixed.item.hit_points = (fraction * new_max).round();
}

/// Explanation lines for a stat tooltip: one line per contributing affix
/// modifier, attributed to the affix's display label.
pub fn explanation(
    affixed: &AffixedItem,
    catalog: &Catalog,
    labels: &[String],
    stat: StatId,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, label) in affixed.state().affixes.iter().zip(labels) {
        let Some(def) = catalog.get(name) else { continue };
        for modifier in &def.modifiers {
            if modifier.affected_stat() == Some(stat) {
                if let ModifierKind::StatChange { value, .. }
                | ModifierKind::EquippedStatChange { value, .. } = &modifier.kind
                {
                    lines.push(format!("{}: {}", label, value.change_string()));
                }
            }
        }
    }
    lines
}
