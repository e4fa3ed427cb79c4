//! Affixed item state
//!
//! Couples an item view with its persisted affix state and a derived-state
//! cache. The persisted part is minimal (affix names, naming rules, the
//! composed label); everything else is recomputed lazily on first query
//! after an invalidation and repaired in place when a save comes back
//! inconsistent.

use std::collections::HashMap;

use log::{error, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::modifier::PERMANENT_CHANCE;
use crate::catalog::{AffixDef, Catalog, ModifierKind};
use crate::icons::{overlay_for, IconCache, IconHandle, IconKey};
use crate::item::props::{BasePropsCache, ToolProps, VerbProps};
use crate::item::{Item, ItemId};
use crate::naming::{compose_full_label, AffixRule, PickedRule};

/// The persisted affix state of one item. Everything else about affixes is
/// derived from this plus the static catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffixState {
    /// Composed display label. Stored verbatim so saved names never drift
    /// even if word lists change between versions.
    pub full_label: Option<String>,
    /// Catalog def names, in selection order.
    pub affixes: Vec<String>,
    /// One naming rule per affix, parallel to `affixes`.
    pub rules: Vec<AffixRule>,
}

impl AffixState {
    pub fn is_empty(&self) -> bool {
        self.affixes.is_empty()
    }
}

/// Everything recomputable from the persisted state: display labels, the
/// point total, modified combat-property clones, and the icon overlay.
/// Dropped wholesale on invalidation, rebuilt on next query.
#[derive(Debug, Clone, Default)]
pub struct DerivedState {
    /// Display label per affix, in selection order.
    pub labels: Vec<String>,
    pub label_by_def: HashMap<String, String>,
    pub def_by_label: HashMap<String, String>,
    /// Sum of live affix costs on this item.
    pub total_points: f32,
    /// Modified ranged verbs. `None` when no affix touches verbs; the host
    /// keeps using the pristine base set directly in that case.
    pub verbs: Option<Vec<VerbProps>>,
    /// Modified melee tools, same convention.
    pub tools: Option<Vec<ToolProps>>,
    pub overlay: Option<IconKey>,
    pub overlay_handle: Option<IconHandle>,
}

impl DerivedState {
    pub fn label_of(&self, def_name: &str) -> Option<&str> {
        self.label_by_def.get(def_name).map(|s| s.as_str())
    }

    pub fn def_of_label(&self, label: &str) -> Option<&str> {
        self.def_by_label.get(label).map(|s| s.as_str())
    }
}

/// An item plus its affix state and derived cache.
#[derive(Debug, Clone)]
pub struct AffixedItem {
    pub item: Item,
    state: AffixState,
    cache: Option<DerivedState>,
    verb_refresh: bool,
}

impl AffixedItem {
    pub fn new(item: Item) -> Self {
        Self { item, state: AffixState::default(), cache: None, verb_refresh: false }
    }

    /// Reattach loaded state, e.g. after a save round-trip.
    pub fn with_state(item: Item, state: AffixState) -> Self {
        Self { item, state, cache: None, verb_refresh: false }
    }

    pub fn state(&self) -> &AffixState {
        &self.state
    }

    pub fn affix_count(&self) -> usize {
        self.state.affixes.len()
    }

    pub fn has_affixes(&self) -> bool {
        !self.state.affixes.is_empty()
    }

    /// Drop the derived cache. Call after anything that feeds into it
    /// changes: affix set, quality, material, base label.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn set_quality(&mut self, quality: crate::host::Quality) {
        self.item.quality = quality;
        self.invalidate();
    }

    /// Change the material, recomposing the label on next query since the
    /// stuff label it wraps just changed.
    pub fn set_material(&mut self, material: Option<String>) {
        self.item.material = material;
        self.state.full_label = None;
        self.invalidate();
    }

    /// Install a freshly generated affix set and composed label.
    pub fn set_affixes(&mut self, defs: &[&AffixDef], picked: &[PickedRule]) {
        self.state.affixes = defs.iter().map(|d| d.name.clone()).collect();
        self.state.rules = picked.iter().map(|p| p.rule.clone()).collect();
        self.state.full_label = if picked.is_empty() {
            None
        } else {
            Some(compose_full_label(&self.item.stuff_label(), picked))
        };
        self.invalidate();
    }

    /// Derived state, rebuilding it first if an invalidation dropped it.
    pub fn derived(
        &mut self,
        catalog: &Catalog,
        base: &BasePropsCache,
        icons: &mut IconCache,
    ) -> &DerivedState {
        self.ensure(catalog, base, icons);
        self.cache.get_or_insert_with(DerivedState::default)
    }

    fn ensure(&mut self, catalog: &Catalog, base: &BasePropsCache, icons: &mut IconCache) {
        if self.cache.is_some() {
            return;
        }
        let built = build_derived(&self.item, &mut self.state, catalog, base, icons);
        self.verb_refresh |= built.verbs.is_some() || built.tools.is_some();
        self.cache = Some(built);
    }

    /// One-shot staleness flag for the host's verb tracker: true when a
    /// rebuild produced modified combat properties since the last take.
    pub fn take_verb_refresh(&mut self) -> bool {
        std::mem::take(&mut self.verb_refresh)
    }

    /// The composed display label, generating and persisting it on first
    /// use when a save predates label storage.
    pub fn full_label(
        &mut self,
        catalog: &Catalog,
        base: &BasePropsCache,
        icons: &mut IconCache,
    ) -> String {
        if self.state.affixes.is_empty() {
            return self.item.stuff_label();
        }
        self.ensure(catalog, base, icons);
        if let Some(label) = &self.state.full_label {
            return label.clone();
        }
        let picked = self.picked_rules(catalog);
        let label = compose_full_label(&self.item.stuff_label(), &picked);
        self.state.full_label = Some(label.clone());
        label
    }

    /// Re-materialize picked rules from persisted state, pulling each
    /// class's auxiliary props back out of the catalog so re-composition
    /// matches the original pick.
    fn picked_rules(&self, catalog: &Catalog) -> Vec<PickedRule> {
        self.state
            .affixes
            .iter()
            .zip(&self.state.rules)
            .map(|(name, rule)| {
                let props = catalog
                    .get(name)
                    .and_then(|d| d.words.fragment(&rule.class))
                    .map(|f| f.props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .unwrap_or_default();
                PickedRule { rule: rule.clone(), props }
            })
            .collect()
    }

    /// Roll non-permanent verb effects for the shot about to fire: each one
    /// either lands on the modified clone or resets it to baseline.
    pub fn about_to_fire(
        &mut self,
        catalog: &Catalog,
        base: &BasePropsCache,
        icons: &mut IconCache,
        rng: &mut impl Rng,
    ) {
        self.ensure(catalog, base, icons);
        let pristine = base.verbs(&self.item.def_name);
        let burst = pristine
            .iter()
            .find(|v| v.is_primary)
            .map(|v| v.burst_shot_count)
            .unwrap_or(1);

        let Some(verbs) = self.cache.as_mut().and_then(|c| c.verbs.as_mut()) else {
            return;
        };
        for name in &self.state.affixes {
            let Some(def) = catalog.get(name) else { continue };
            for modifier in &def.modifiers {
                if !modifier.touches_verbs() || modifier.is_permanent_on(burst) {
                    continue;
                }
                if modifier.should_activate_per_shot(burst, rng) {
                    for verb in verbs.iter_mut() {
                        modifier.modify_verb(verb);
                    }
                } else {
                    for (verb, pris) in verbs.iter_mut().zip(pristine.iter()) {
                        modifier.reset_verb(verb, pris);
                    }
                }
            }
        }
    }

    /// Reset every transient verb effect after the shot resolved.
    pub fn after_fired(
        &mut self,
        catalog: &Catalog,
        base: &BasePropsCache,
        icons: &mut IconCache,
    ) {
        self.ensure(catalog, base, icons);
        let pristine = base.verbs(&self.item.def_name);
        let burst = pristine
            .iter()
            .find(|v| v.is_primary)
            .map(|v| v.burst_shot_count)
            .unwrap_or(1);

        let Some(verbs) = self.cache.as_mut().and_then(|c| c.verbs.as_mut()) else {
            return;
        };
        for name in &self.state.affixes {
            let Some(def) = catalog.get(name) else { continue };
            for modifier in &def.modifiers {
                if !modifier.touches_verbs() || modifier.is_permanent_on(burst) {
                    continue;
                }
                for (verb, pris) in verbs.iter_mut().zip(pristine.iter()) {
                    modifier.reset_verb(verb, pris);
                }
            }
        }
    }

    /// Stacking: only affix-free items stack with affix-free items, and
    /// affixed items only with an identical affix set under identical
    /// naming (order-independent).
    pub fn can_stack_with(&self, other: &AffixedItem) -> bool {
        if self.item.def_name != other.item.def_name {
            return false;
        }
        if self.state.affixes.is_empty() && other.state.affixes.is_empty() {
            return true;
        }
        let mut mine: Vec<&str> = self.state.affixes.iter().map(|s| s.as_str()).collect();
        let mut theirs: Vec<&str> = other.state.affixes.iter().map(|s| s.as_str()).collect();
        mine.sort_unstable();
        theirs.sort_unstable();
        if mine != theirs {
            return false;
        }
        let mut my_rules: Vec<String> = self.state.rules.iter().map(AffixRule::token).collect();
        let mut their_rules: Vec<String> = other.state.rules.iter().map(AffixRule::token).collect();
        my_rules.sort_unstable();
        their_rules.sort_unstable();
        my_rules == their_rules
    }

    /// Split `count` units off the stack into a new item carrying a deep
    /// copy of the affix state. Returns `None` unless 0 < count < stack.
    pub fn split_off(&mut self, count: u32, new_id: ItemId) -> Option<AffixedItem> {
        if count == 0 || count >= self.item.stack_count {
            return None;
        }
        self.item.stack_count -= count;
        let mut item = self.item.clone();
        item.id = new_id;
        item.stack_count = count;
        Some(AffixedItem::with_state(item, self.state.clone()))
    }

    /// Whether any affix carries a periodic activation, i.e. the item must
    /// be registered for tick checks while equipped.
    pub fn has_periodic(&self, catalog: &Catalog) -> bool {
        self.state.affixes.iter().any(|name| {
            catalog.get(name).is_some_and(|def| {
                def.modifiers
                    .iter()
                    .any(|m| matches!(m.kind, ModifierKind::PeriodicActivation { .. }))
            })
        })
    }

    /// Adopt loaded state in place (save-file restore on a live item).
    pub fn restore_state(&mut self, state: AffixState) {
        self.state = state;
        self.invalidate();
    }
}

/// Rebuild the derived cache, repairing persisted state along the way:
/// unknown defs are dropped, rule-count desyncs regenerate fallback
/// labels, and empty words get substituted with the def label.
fn build_derived(
    item: &Item,
    state: &mut AffixState,
    catalog: &Catalog,
    base: &BasePropsCache,
    icons: &mut IconCache,
) -> DerivedState {
    let before = state.affixes.len();
    state.affixes.retain(|name| {
        let known = catalog.get(name).is_some();
        if !known {
            error!("unknown affix def '{}' on '{}'; dropping it", name, item.def_name);
        }
        known
    });
    if state.affixes.len() != before {
        state.full_label = None;
    }

    let defs: Vec<&AffixDef> = state
        .affixes
        .iter()
        .filter_map(|name| catalog.get(name))
        .collect();

    if state.rules.len() != defs.len() {
        error!(
            "affix rule desync on '{}': affixes [{}] vs rules [{}]; regenerating fallback labels",
            item.def_name,
            state.affixes.join(", "),
            state
                .rules
                .iter()
                .map(AffixRule::token)
                .collect::<Vec<_>>()
                .join(", ")
        );
        state.rules = defs.iter().map(|d| AffixRule::fallback(d.label_cap())).collect();
        state.full_label = None;
    }

    for (rule, def) in state.rules.iter_mut().zip(&defs) {
        if rule.word.trim().is_empty() {
            warn!("empty word for affix '{}'; substituting its def label", def.name);
            *rule = AffixRule::fallback(def.label_cap());
            state.full_label = None;
        }
    }

    let labels: Vec<String> = state.rules.iter().map(|r| r.word.clone()).collect();
    let label_by_def: HashMap<String, String> = defs
        .iter()
        .zip(&labels)
        .map(|(d, l)| (d.name.clone(), l.clone()))
        .collect();
    let def_by_label: HashMap<String, String> = defs
        .iter()
        .zip(&labels)
        .map(|(d, l)| (l.clone(), d.name.clone()))
        .collect();

    let total_points: f32 = defs.iter().map(|d| d.real_cost(item, base)).sum();

    let touches = |pred: fn(&crate::catalog::Modifier) -> bool| {
        defs.iter()
            .any(|d| d.modifiers.iter().any(|m| pred(m) && m.can_apply(item, base)))
    };

    let verbs = if item.is_ranged && touches(|m| m.touches_verbs()) {
        let pristine = base.verbs(&item.def_name);
        let burst = pristine
            .iter()
            .find(|v| v.is_primary)
            .map(|v| v.burst_shot_count)
            .unwrap_or(1);
        let mut clone: Vec<VerbProps> = pristine.as_ref().clone();
        for def in &defs {
            for modifier in &def.modifiers {
                if modifier.touches_verbs()
                    && modifier.can_apply(item, base)
                    && modifier.is_permanent_on(burst)
                {
                    for verb in &mut clone {
                        modifier.modify_verb(verb);
                    }
                }
            }
        }
        Some(clone)
    } else {
        None
    };

    let tools = if item.is_melee && touches(|m| m.touches_tools()) {
        let mut clone: Vec<ToolProps> = base.tools(&item.def_name).as_ref().clone();
        for def in &defs {
            for modifier in &def.modifiers {
                if !modifier.touches_tools() || !modifier.can_apply(item, base) {
                    continue;
                }
                // Extra-damage riders carry their own chance; numeric
                // changes below the permanence threshold stay at baseline.
                let applies = matches!(modifier.kind, ModifierKind::ToolExtraDamage { .. })
                    || modifier.chance >= PERMANENT_CHANCE;
                if applies {
                    for tool in &mut clone {
                        modifier.modify_tool(tool);
                    }
                }
            }
        }
        Some(clone)
    } else {
        None
    };

    let (overlay, overlay_handle) = match overlay_for(&defs, item, base) {
        Some((key, _)) => {
            let handle = icons.fetch_or_make(&key);
            (Some(key), Some(handle))
        }
        None => (None, None),
    };

    DerivedState {
        labels,
        label_by_def,
        def_by_label,
        total_points,
        verbs,
        tools,
        overlay,
        overlay_handle,
    }
}
