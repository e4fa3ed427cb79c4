//! Affix engine
//!
//! Orchestrates the whole pipeline: owns the loaded catalog, naming
//! config, and shared caches, reacts to host lifecycle signals, and
//! routes periodic effects back through the host's effect sink.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};
use rand::Rng;

use crate::catalog::{ActivationEffect, Catalog, CatalogData, ModifierKind};
use crate::gen::{affix_budget, select_affixes};
use crate::host::{EffectSink, HostContext, Notice, PawnView, Quality};
use crate::icons::IconCache;
use crate::item::props::BasePropsCache;
use crate::item::{AffixedItem, DerivedState, ItemId};
use crate::naming::{resolve_affix_rules, AffixRule, NamerConfig, PickedRule};
use crate::stats::refresh_hit_points;

/// Host lifecycle events the engine reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Quality was assigned at spawn; triggers affix generation.
    QualitySet(Quality),
    /// A ranged shot is about to fire.
    AboutToFire,
    /// The shot resolved.
    Fired,
    /// A pawn equipped the item as a weapon.
    Equipped(PawnView),
    /// A pawn put the item on as apparel.
    ApparelAdded(PawnView),
    /// The item left the pawn's possession.
    Unequipped,
    /// Periodic check, every `interval_ticks` simulation ticks.
    Tick { interval_ticks: u32 },
    /// The item is being destroyed.
    Destroyed,
}

/// Debug spawn overrides, normally both `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugOverrides {
    pub forced_points: Option<i32>,
    pub forced_count: Option<usize>,
}

/// Items registered for periodic tick checks.
#[derive(Debug, Default)]
pub struct TickScheduler {
    registered: HashSet<ItemId>,
}

impl TickScheduler {
    pub fn register(&mut self, id: ItemId) {
        self.registered.insert(id);
    }

    pub fn deregister(&mut self, id: ItemId) {
        self.registered.remove(&id);
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.registered.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

/// The engine: loaded data plus shared caches and the tick scheduler.
#[derive(Debug, Default)]
pub struct AffixEngine {
    catalog: Catalog,
    namer: NamerConfig,
    base_props: BasePropsCache,
    icons: IconCache,
    scheduler: TickScheduler,
    debug: DebugOverrides,
}

impl AffixEngine {
    pub fn new(data: CatalogData) -> Self {
        Self {
            catalog: data.catalog,
            namer: data.namer,
            ..Default::default()
        }
    }

    /// Load affix data from a directory, falling back to built-in
    /// defaults.
    pub fn from_data_dir(path: &Path) -> Self {
        Self::new(CatalogData::load_or_default(path))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn namer(&self) -> &NamerConfig {
        &self.namer
    }

    /// Register base combat properties for item defs, usually during host
    /// definition load.
    pub fn base_props_mut(&mut self) -> &mut BasePropsCache {
        &mut self.base_props
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn set_debug_overrides(&mut self, debug: DebugOverrides) {
        self.debug = debug;
    }

    /// Swap in freshly loaded affix data and drop every cache that was
    /// keyed off the old definitions. The host re-registers base props
    /// afterwards; items rebuild derived state on next query.
    pub fn reload(&mut self, data: CatalogData) {
        self.catalog = data.catalog;
        self.namer = data.namer;
        self.base_props.clear();
        self.icons.clear();
    }

    /// Roll and install a fresh affix set on an item: budget from host
    /// signals, weighted selection, naming, then derived-state refresh.
    pub fn initialize_affixes(
        &mut self,
        affixed: &mut AffixedItem,
        host: &dyn HostContext,
        rng: &mut impl Rng,
    ) {
        let budget = self
            .debug
            .forced_points
            .unwrap_or_else(|| affix_budget(host, affixed.item.quality));

        let picks = select_affixes(
            &self.catalog,
            &affixed.item,
            &self.base_props,
            budget,
            self.debug.forced_count,
            rng,
        );
        let mut picked = resolve_affix_rules(&picks, &self.namer, rng);
        // Naming fallback may come back short; pad so every affix has a rule
        while picked.len() < picks.len() {
            let def = picks[picked.len()];
            picked.push(PickedRule {
                rule: AffixRule::fallback(def.label_cap()),
                props: Default::default(),
            });
        }

        debug!(
            "rolled {} affixes for '{}' (quality {:?}, budget {}): [{}]",
            picks.len(),
            affixed.item.def_name,
            affixed.item.quality,
            budget,
            picks.iter().map(|d| d.name.as_str()).collect::<Vec<_>>().join(", ")
        );

        affixed.set_affixes(&picks, &picked);
        refresh_hit_points(affixed, &self.catalog);
    }

    /// React to one host lifecycle signal.
    pub fn handle_signal(
        &mut self,
        affixed: &mut AffixedItem,
        signal: Signal,
        host: &dyn HostContext,
        sink: &mut dyn EffectSink,
        rng: &mut impl Rng,
    ) {
        match signal {
            Signal::QualitySet(quality) => {
                affixed.set_quality(quality);
                // Quality arrives once at spawn; a re-set on an already
                // affixed item only invalidates, it never rerolls
                if !affixed.has_affixes() {
                    self.initialize_affixes(affixed, host, rng);
                }
            }
            Signal::AboutToFire => {
                affixed.about_to_fire(&self.catalog, &self.base_props, &mut self.icons, rng);
            }
            Signal::Fired => {
                affixed.after_fired(&self.catalog, &self.base_props, &mut self.icons);
            }
            Signal::Equipped(pawn) | Signal::ApparelAdded(pawn) => {
                affixed.item.holder = Some(pawn);
                if affixed.has_periodic(&self.catalog) {
                    self.scheduler.register(affixed.item.id);
                }
                self.warn_if_cursed(affixed, pawn, host, sink);
            }
            Signal::Unequipped => {
                affixed.item.holder = None;
                self.scheduler.deregister(affixed.item.id);
            }
            Signal::Tick { interval_ticks } => {
                self.run_periodic(affixed, interval_ticks, sink, rng);
            }
            Signal::Destroyed => {
                self.scheduler.deregister(affixed.item.id);
            }
        }
    }

    /// Raise a cursed-item warning when a live player pawn picks up an
    /// item with a negative deadly affix.
    fn warn_if_cursed(
        &mut self,
        affixed: &mut AffixedItem,
        pawn: PawnView,
        host: &dyn HostContext,
        sink: &mut dyn EffectSink,
    ) {
        if !host.is_live() || !pawn.player_faction || !pawn.alive {
            return;
        }
        let cursed: Vec<(String, String)> = {
            let item = &affixed.item;
            let base = &self.base_props;
            let labels = affixed.state().affixes.clone();
            labels
                .iter()
                .filter_map(|name| self.catalog.get(name))
                .filter(|def| def.is_negative_deadly(item, base))
                .map(|def| (def.name.clone(), def.label_cap()))
                .collect()
        };
        if cursed.is_empty() {
            return;
        }
        let item_label = affixed.full_label(&self.catalog, &self.base_props, &mut self.icons);
        for (name, fallback_label) in cursed {
            let affix_label = affixed
                .derived(&self.catalog, &self.base_props, &mut self.icons)
                .label_of(&name)
                .map(|s| s.to_string())
                .unwrap_or(fallback_label);
            let report = self
                .catalog
                .get(&name)
                .map(|def| def.stats_report(&affix_label))
                .unwrap_or_default();
            sink.notify(Notice::CursedItem {
                pawn: pawn.id,
                item_label: item_label.clone(),
                affix_label,
                report,
            });
        }
    }

    /// Roll every periodic activation for one tick interval and route the
    /// effects that fire to the holder.
    fn run_periodic(
        &mut self,
        affixed: &mut AffixedItem,
        interval_ticks: u32,
        sink: &mut dyn EffectSink,
        rng: &mut impl Rng,
    ) {
        if !self.scheduler.contains(affixed.item.id) {
            return;
        }
        let Some(holder) = affixed.item.living_holder() else {
            return;
        };
        for name in affixed.state().affixes.clone() {
            let Some(def) = self.catalog.get(&name) else { continue };
            for modifier in &def.modifiers {
                let ModifierKind::PeriodicActivation { effect, .. } = &modifier.kind else {
                    continue;
                };
                if !modifier.periodic_occurs(interval_ticks, rng) {
                    continue;
                }
                info!("affix '{}' activates on pawn {}", name, holder.id);
                match effect {
                    ActivationEffect::HurtPawn { amount } => sink.hurt_pawn(holder.id, *amount),
                    ActivationEffect::TeleportPawn => sink.teleport_pawn(holder.id),
                    ActivationEffect::KillPawn => sink.kill_pawn(holder.id),
                }
            }
        }
    }

    /// Derived-state passthrough using the engine's caches.
    pub fn derived<'a>(&mut self, affixed: &'a mut AffixedItem) -> &'a DerivedState {
        affixed.derived(&self.catalog, &self.base_props, &mut self.icons)
    }

    /// Full-label passthrough using the engine's caches.
    pub fn full_label(&mut self, affixed: &mut AffixedItem) -> String {
        affixed.full_label(&self.catalog, &self.base_props, &mut self.icons)
    }
}
