//! Affix definitions
//!
//! One catalog entry: cost, exclusivity group, ordered modifier list, and
//! the word-grammar fragment the namer draws from.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::modifier::Modifier;
use crate::item::props::BasePropsCache;
use crate::item::Item;

/// Cost magnitude at or beyond which an affix counts as "deadly" for icon
/// and warning purposes.
pub const DEADLY_COST_THRESHOLD: f32 = 4.0;

/// Candidate words for one word class, with optional auxiliary properties
/// that travel with whichever word instance gets picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordFragment {
    pub words: Vec<String>,
    /// Auxiliary sub-rules tied to this class instance, e.g. a matching
    /// plural form or article. Keyed by property name.
    #[serde(default)]
    pub props: BTreeMap<String, String>,
}

/// Word fragments per word class. BTreeMap keeps class iteration stable so
/// a seeded rng reproduces the same picks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffixWords(pub BTreeMap<String, WordFragment>);

impl AffixWords {
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|s| s.as_str())
    }

    pub fn fragment(&self, class: &str) -> Option<&WordFragment> {
        self.0.get(class)
    }

    /// Pick a concrete word for a class, uniformly at random.
    pub fn pick_word(&self, class: &str, rng: &mut impl Rng) -> Option<String> {
        self.0
            .get(class)
            .and_then(|frag| frag.words.choose(rng))
            .cloned()
    }
}

/// A static affix definition. Loaded once at catalog-load time, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixDef {
    pub name: String,
    pub label: String,
    /// Exclusivity key; at most one affix per group on an item.
    pub group_name: String,
    /// Base affix cost in points, within [-6, 6].
    pub cost: f32,
    pub modifiers: Vec<Modifier>,
    pub words: AffixWords,
}

impl AffixDef {
    /// An affix applies if any of its modifiers can.
    pub fn can_apply(&self, item: &Item, base: &BasePropsCache) -> bool {
        self.modifiers.iter().any(|m| m.can_apply(item, base))
    }

    /// Live cost of this affix on a specific item. Some modifiers override
    /// their contribution (e.g. projectile swaps compare damage before and
    /// after), so this is recomputed rather than cached globally.
    pub fn real_cost(&self, item: &Item, base: &BasePropsCache) -> f32 {
        let mult: f32 = self
            .modifiers
            .iter()
            .map(|m| m.cost_multiplier(item, base))
            .product();
        self.cost * mult
    }

    pub fn is_deadly(&self, item: &Item, base: &BasePropsCache) -> bool {
        self.real_cost(item, base).abs() >= DEADLY_COST_THRESHOLD
    }

    /// Deadly and harmful: the kind of affix the wielder gets warned about.
    pub fn is_negative_deadly(&self, item: &Item, base: &BasePropsCache) -> bool {
        self.real_cost(item, base) <= -DEADLY_COST_THRESHOLD
    }

    /// Display color for the affix's label and icon overlay, by cost tier.
    pub fn label_color(&self, item: &Item, base: &BasePropsCache) -> &'static str {
        let cost = self.real_cost(item, base);
        if cost <= -DEADLY_COST_THRESHOLD {
            "#8b0000" // cursed
        } else if cost < 0.0 {
            "#cc6666"
        } else if cost < 2.0 {
            "#9999dd"
        } else if cost < DEADLY_COST_THRESHOLD {
            "#66bbff"
        } else {
            "#ffcc33" // deadly-good
        }
    }

    /// Fallback label used when word generation fails: the def label,
    /// capitalized.
    pub fn label_cap(&self) -> String {
        let mut chars = self.label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Multi-line stats report for one affix, used by inspection panels.
    pub fn stats_report(&self, label: &str) -> String {
        let mut out = format!("{label}:\n");
        for modifier in &self.modifiers {
            out.push_str("    ");
            out.push_str(&modifier.change_label());
            out.push('\n');
        }
        out
    }
}
