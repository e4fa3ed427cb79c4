//! Inspection reports
//!
//! Human-readable summaries of an item's affixes for the host's inspect
//! panel: the one-line header, the full per-affix report, and the
//! (affix label, stat) pairs that feed stat-explanation tooltips.

use crate::catalog::{Catalog, StatId};
use crate::icons::IconCache;
use crate::item::props::BasePropsCache;
use crate::item::AffixedItem;

impl AffixedItem {
    /// One-line inspect header, e.g. "Affixes (2, 5.5 points): Grim, Doom".
    /// `None` for an unaffixed item.
    pub fn inspect_line(
        &mut self,
        catalog: &Catalog,
        base: &BasePropsCache,
        icons: &mut IconCache,
    ) -> Option<String> {
        if !self.has_affixes() {
            return None;
        }
        let derived = self.derived(catalog, base, icons);
        Some(format!(
            "Affixes ({}, {:.1} points): {}",
            derived.labels.len(),
            derived.total_points,
            derived.labels.join(", ")
        ))
    }

    /// Full multi-line report: each affix's display label followed by its
    /// indented change lines.
    pub fn full_report(
        &mut self,
        catalog: &Catalog,
        base: &BasePropsCache,
        icons: &mut IconCache,
    ) -> String {
        self.ensure_report_parts(catalog, base, icons)
            .into_iter()
            .map(|(_, report)| report)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn ensure_report_parts(
        &mut self,
        catalog: &Catalog,
        base: &BasePropsCache,
        icons: &mut IconCache,
    ) -> Vec<(String, String)> {
        self.labeled_affixes(catalog, base, icons)
            .into_iter()
            .filter_map(|(name, label)| {
                catalog
                    .get(&name)
                    .map(|def| (label.clone(), def.stats_report(&label)))
            })
            .collect()
    }

    /// (def name, display label) pairs in selection order.
    fn labeled_affixes(
        &mut self,
        catalog: &Catalog,
        base: &BasePropsCache,
        icons: &mut IconCache,
    ) -> Vec<(String, String)> {
        let labels = self.derived(catalog, base, icons).labels.clone();
        self.state()
            .affixes
            .iter()
            .cloned()
            .zip(labels)
            .collect()
    }

    /// (affix label, stat) pairs for every stat an affix changes, used to
    /// attribute stat deltas in explanation tooltips.
    pub fn stat_sources(
        &mut self,
        catalog: &Catalog,
        base: &BasePropsCache,
        icons: &mut IconCache,
    ) -> Vec<(String, StatId)> {
        let mut out = Vec::new();
        for (name, label) in self.labeled_affixes(catalog, base, icons) {
            let Some(def) = catalog.get(&name) else { continue };
            for modifier in &def.modifiers {
                if let Some(stat) = modifier.affected_stat() {
                    out.push((label.clone(), stat));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AffixDef, AffixWords, Modifier, ModifierKind, ValueModifier,
    };
    use crate::item::Item;
    use crate::naming::{AffixRule, PickedRule};
    use std::collections::HashMap;

    fn dual_stat_def() -> AffixDef {
        AffixDef {
            name: "blessed".into(),
            label: "blessed".into(),
            group_name: "blessed".into(),
            cost: 3.0,
            modifiers: vec![
                Modifier {
                    chance: 1.0,
                    kind: ModifierKind::StatChange {
                        stat: StatId::MarketValue,
                        value: ValueModifier::factor(2.0),
                    },
                },
                Modifier {
                    chance: 1.0,
                    kind: ModifierKind::EquippedStatChange {
                        stat: StatId::MoveSpeed,
                        value: ValueModifier::offset(0.4),
                    },
                },
            ],
            words: AffixWords::default(),
        }
    }

    fn affixed() -> (Catalog, AffixedItem) {
        let catalog = Catalog::new(vec![dual_stat_def()]);
        let mut item = AffixedItem::new(Item::melee("club", "club"));
        let def = catalog.get("blessed").unwrap();
        item.set_affixes(
            &[def],
            &[PickedRule {
                rule: AffixRule { class: "adjective".into(), word: "Holy".into() },
                props: HashMap::new(),
            }],
        );
        (catalog, item)
    }

    #[test]
    fn test_inspect_line() {
        let (catalog, mut item) = affixed();
        let base = BasePropsCache::new();
        let mut icons = IconCache::new();

        let line = item.inspect_line(&catalog, &base, &mut icons).unwrap();
        assert_eq!(line, "Affixes (1, 3.0 points): Holy");

        let mut plain = AffixedItem::new(Item::melee("club", "club"));
        assert!(plain.inspect_line(&catalog, &base, &mut icons).is_none());
    }

    #[test]
    fn test_full_report_lists_changes_under_label() {
        let (catalog, mut item) = affixed();
        let base = BasePropsCache::new();
        let mut icons = IconCache::new();

        let report = item.full_report(&catalog, &base, &mut icons);
        assert!(report.starts_with("Holy:\n"));
        assert!(report.contains("Market value: x2"));
        assert!(report.contains("Move speed (equipped): +0.40"));
    }

    #[test]
    fn test_stat_sources_attribute_to_affix_label() {
        let (catalog, mut item) = affixed();
        let base = BasePropsCache::new();
        let mut icons = IconCache::new();

        let sources = item.stat_sources(&catalog, &base, &mut icons);
        assert_eq!(
            sources,
            vec![
                ("Holy".to_string(), StatId::MarketValue),
                ("Holy".to_string(), StatId::MoveSpeed),
            ]
        );
    }
}
