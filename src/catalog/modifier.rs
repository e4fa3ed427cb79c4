//! Affix modifiers
//!
//! The unit of effect. Each modifier changes one stat, one verb or tool
//! property, swaps a projectile, or triggers something over time while
//! equipped. Originally a class hierarchy with virtual overrides; here a
//! tagged enum with explicit dispatch per operation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::fields::{ToolNumField, VerbBoolField, VerbNumField};
use crate::catalog::value_mod::ValueModifier;
use crate::host::TechLevel;
use crate::item::props::{BasePropsCache, ExtraDamage, ProjectileProps, ToolProps, VerbProps};
use crate::item::Item;

/// Simulation ticks per in-game day, used by mean-time-between checks.
pub const TICKS_PER_DAY: f32 = 60_000.0;

/// Chance at or above which a per-shot effect is baked in permanently
/// instead of rolled around each shot.
pub const PERMANENT_CHANCE: f32 = 0.95;

/// What a modifier applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierTarget {
    Item,
    EquippedPawn,
    RangedVerb,
    MeleeTool,
    Projectile,
    PeriodicOnPawn,
}

/// Stats a modifier may change, either on the item itself or on the pawn
/// holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatId {
    // Item stats
    MaxHitPoints,
    MarketValue,
    Mass,
    Flammability,
    // Pawn stats while equipped
    MoveSpeed,
    MeleeDodgeChance,
    ShootingAccuracy,
    CarryingCapacity,
}

impl StatId {
    pub fn is_item_stat(&self) -> bool {
        matches!(
            self,
            StatId::MaxHitPoints | StatId::MarketValue | StatId::Mass | StatId::Flammability
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatId::MaxHitPoints => "Max hit points",
            StatId::MarketValue => "Market value",
            StatId::Mass => "Mass",
            StatId::Flammability => "Flammability",
            StatId::MoveSpeed => "Move speed",
            StatId::MeleeDodgeChance => "Melee dodge chance",
            StatId::ShootingAccuracy => "Shooting accuracy",
            StatId::CarryingCapacity => "Carrying capacity",
        }
    }
}

/// Effect a periodic activation performs on the equipped pawn, routed
/// through the host's effect sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationEffect {
    HurtPawn { amount: f32 },
    TeleportPawn,
    KillPawn,
}

impl ActivationEffect {
    pub fn label(&self) -> String {
        match self {
            ActivationEffect::HurtPawn { amount } => format!("Hurts the wielder ({amount} damage)"),
            ActivationEffect::TeleportPawn => "Teleports the wielder".to_string(),
            ActivationEffect::KillPawn => "Kills the wielder".to_string(),
        }
    }
}

/// One concrete effect within an affix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    /// Chance the effect applies. For per-shot effects this is the chance
    /// over a whole burst; see [`Modifier::per_shot_chance`].
    #[serde(default = "full_chance")]
    pub chance: f32,
    pub kind: ModifierKind,
}

fn full_chance() -> f32 {
    1.0
}

/// The shape of a modifier's effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Transform a stat of the item itself.
    StatChange { stat: StatId, value: ValueModifier },
    /// Transform a stat of the pawn holding/wearing the item.
    EquippedStatChange { stat: StatId, value: ValueModifier },
    /// Transform a numeric ranged-verb property.
    VerbNumChange { field: VerbNumField, value: ValueModifier },
    /// Set a boolean ranged-verb property.
    VerbBoolChange { field: VerbBoolField, set_to: bool },
    /// Swap the fired projectile.
    ProjectileChange { projectile: ProjectileProps },
    /// Transform a numeric melee-tool property.
    ToolNumChange { field: ToolNumField, value: ValueModifier },
    /// Add an extra damage rider to every melee tool.
    ToolExtraDamage { kind: String, amount: f32 },
    /// Something happens periodically while equipped.
    PeriodicActivation { mtb_days: f32, effect: ActivationEffect },
}

impl Modifier {
    pub fn target(&self) -> ModifierTarget {
        match &self.kind {
            ModifierKind::StatChange { .. } => ModifierTarget::Item,
            ModifierKind::EquippedStatChange { .. } => ModifierTarget::EquippedPawn,
            ModifierKind::VerbNumChange { .. } | ModifierKind::VerbBoolChange { .. } => {
                ModifierTarget::RangedVerb
            }
            ModifierKind::ProjectileChange { .. } => ModifierTarget::Projectile,
            ModifierKind::ToolNumChange { .. } | ModifierKind::ToolExtraDamage { .. } => {
                ModifierTarget::MeleeTool
            }
            ModifierKind::PeriodicActivation { .. } => ModifierTarget::PeriodicOnPawn,
        }
    }

    /// Whether this modifier touches verb properties (including projectile
    /// swaps, which live on the primary verb).
    pub fn touches_verbs(&self) -> bool {
        matches!(
            self.target(),
            ModifierTarget::RangedVerb | ModifierTarget::Projectile
        )
    }

    pub fn touches_tools(&self) -> bool {
        self.target() == ModifierTarget::MeleeTool
    }

    /// Applicability predicate against an item.
    pub fn can_apply(&self, item: &Item, base: &BasePropsCache) -> bool {
        match &self.kind {
            ModifierKind::StatChange { stat, .. } => {
                if *stat == StatId::MaxHitPoints {
                    return item.uses_hit_points;
                }
                stat.is_item_stat()
            }
            ModifierKind::EquippedStatChange { stat, .. } => {
                item.is_equippable() && !stat.is_item_stat()
            }
            ModifierKind::VerbNumChange { .. } | ModifierKind::VerbBoolChange { .. } => {
                item.is_ranged
            }
            ModifierKind::ProjectileChange { projectile } => {
                // Industrial-or-better ranged weapons, and only if the swap
                // actually changes the projectile
                item.is_ranged
                    && item.tech_level >= TechLevel::Industrial
                    && base
                        .primary_verb(&item.def_name)
                        .and_then(|v| v.projectile)
                        .map(|p| p.name != projectile.name)
                        .unwrap_or(false)
            }
            ModifierKind::ToolNumChange { .. } | ModifierKind::ToolExtraDamage { .. } => {
                item.is_melee
            }
            ModifierKind::PeriodicActivation { .. } => item.is_equippable(),
        }
    }

    /// Multiplier applied to the parent affix's base cost. Projectile swaps
    /// scale cost by the relative damage delta against the item's own
    /// projectile, recomputed live each time.
    pub fn cost_multiplier(&self, item: &Item, base: &BasePropsCache) -> f32 {
        match &self.kind {
            ModifierKind::ProjectileChange { projectile } => {
                let old_damage = base
                    .primary_verb(&item.def_name)
                    .and_then(|v| v.projectile)
                    .map(|p| p.damage)
                    .unwrap_or(0.0);
                if old_damage <= 0.0 {
                    1.0
                } else {
                    (projectile.damage / old_damage).clamp(0.25, 4.0)
                }
            }
            _ => 1.0,
        }
    }

    /// Apply the effect to a cloned verb property set.
    pub fn modify_verb(&self, verb: &mut VerbProps) {
        match &self.kind {
            ModifierKind::VerbNumChange { field, value } => {
                field.set(verb, value.apply(field.get(verb)));
            }
            ModifierKind::VerbBoolChange { field, set_to } => {
                field.set(verb, *set_to);
            }
            ModifierKind::ProjectileChange { projectile } => {
                if verb.is_primary {
                    verb.projectile = Some(projectile.clone());
                }
            }
            _ => {}
        }
    }

    /// Restore a verb field from the pristine base copy.
    pub fn reset_verb(&self, verb: &mut VerbProps, pristine: &VerbProps) {
        match &self.kind {
            ModifierKind::VerbNumChange { field, .. } => {
                field.set(verb, field.get(pristine));
            }
            ModifierKind::VerbBoolChange { field, .. } => {
                field.set(verb, field.get(pristine));
            }
            ModifierKind::ProjectileChange { .. } => {
                verb.projectile = pristine.projectile.clone();
            }
            _ => {}
        }
    }

    /// Apply the effect to a cloned tool.
    pub fn modify_tool(&self, tool: &mut ToolProps) {
        match &self.kind {
            ModifierKind::ToolNumChange { field, value } => {
                field.set(tool, value.apply(field.get(tool)));
            }
            ModifierKind::ToolExtraDamage { kind, amount } => {
                tool.extra_damages.push(ExtraDamage {
                    kind: kind.clone(),
                    amount: *amount,
                    chance: self.chance,
                });
            }
            _ => {}
        }
    }

    /// The per-burst chance converted to an equivalent independent
    /// per-shot chance: `1 - (1 - chance)^(1/shots)`.
    pub fn per_shot_chance(&self, burst_shot_count: u32) -> f32 {
        let shots = burst_shot_count.max(1) as f32;
        1.0 - (1.0 - self.chance).powf(1.0 / shots)
    }

    /// Whether the effect is certain enough to bake into the clone
    /// permanently rather than rolled transiently around each shot.
    pub fn is_permanent_on(&self, burst_shot_count: u32) -> bool {
        match self.target() {
            ModifierTarget::Projectile => self.per_shot_chance(burst_shot_count) >= PERMANENT_CHANCE,
            _ => self.chance >= PERMANENT_CHANCE,
        }
    }

    /// One roll of the effect's chance.
    pub fn should_activate(&self, rng: &mut impl Rng) -> bool {
        self.chance >= rng.gen::<f32>()
    }

    /// One roll of the converted per-shot chance.
    pub fn should_activate_per_shot(&self, burst_shot_count: u32, rng: &mut impl Rng) -> bool {
        self.per_shot_chance(burst_shot_count) >= rng.gen::<f32>()
    }

    /// Exponential-style mean-time-between check for one periodic tick.
    pub fn periodic_occurs(&self, check_interval_ticks: u32, rng: &mut impl Rng) -> bool {
        let ModifierKind::PeriodicActivation { mtb_days, .. } = &self.kind else {
            return false;
        };
        if *mtb_days <= 0.0 {
            return false;
        }
        let p = check_interval_ticks as f32 / (mtb_days * TICKS_PER_DAY);
        rng.gen::<f32>() < p
    }

    /// The stat being changed, for the host's stat-explanation UI.
    pub fn affected_stat(&self) -> Option<StatId> {
        match &self.kind {
            ModifierKind::StatChange { stat, .. }
            | ModifierKind::EquippedStatChange { stat, .. } => Some(*stat),
            _ => None,
        }
    }

    /// One human-readable change line, e.g. "Range: +5" or
    /// "Max hit points: x1.50".
    pub fn change_label(&self) -> String {
        let chance_suffix = if self.chance < 1.0 {
            format!(" ({:.0}% chance)", self.chance * 100.0)
        } else {
            String::new()
        };
        match &self.kind {
            ModifierKind::StatChange { stat, value } => {
                format!("{}: {}{}", stat.label(), value.change_string(), chance_suffix)
            }
            ModifierKind::EquippedStatChange { stat, value } => format!(
                "{} (equipped): {}{}",
                stat.label(),
                value.change_string(),
                chance_suffix
            ),
            ModifierKind::VerbNumChange { field, value } => {
                format!("{}: {}{}", field.label(), value.change_string(), chance_suffix)
            }
            ModifierKind::VerbBoolChange { field, set_to } => {
                format!("{}: {}{}", field.label(), set_to, chance_suffix)
            }
            ModifierKind::ProjectileChange { projectile } => {
                if self.chance >= 1.0 {
                    format!("Fires {}", projectile.label)
                } else {
                    format!("{:.0}% chance to fire {}", self.chance * 100.0, projectile.label)
                }
            }
            ModifierKind::ToolNumChange { field, value } => {
                format!("{}: {}{}", field.label(), value.change_string(), chance_suffix)
            }
            ModifierKind::ToolExtraDamage { kind, amount } => {
                format!("Extra {} damage: {}{}", kind, amount, chance_suffix)
            }
            ModifierKind::PeriodicActivation { mtb_days, effect } => {
                format!("{} (avg. every {} days)", effect.label(), mtb_days)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn projectile_swap(chance: f32) -> Modifier {
        Modifier {
            chance,
            kind: ModifierKind::ProjectileChange {
                projectile: ProjectileProps {
                    name: "bullet_incendiary".into(),
                    label: "incendiary bullet".into(),
                    damage: 10.0,
                },
            },
        }
    }

    #[test]
    fn test_per_shot_chance_conversion() {
        // chance=0.5 over a 4-shot burst -> 1 - 0.5^(1/4) ~= 0.1591
        let m = projectile_swap(0.5);
        let per_shot = m.per_shot_chance(4);
        assert!((per_shot - 0.1591).abs() < 0.001, "got {per_shot}");
        assert!(!m.is_permanent_on(4));
    }

    #[test]
    fn test_certain_chance_is_permanent() {
        let m = projectile_swap(1.0);
        assert_eq!(m.per_shot_chance(4), 1.0);
        assert!(m.is_permanent_on(4));
    }

    #[test]
    fn test_verb_modify_and_reset() {
        let m = Modifier {
            chance: 1.0,
            kind: ModifierKind::VerbNumChange {
                field: VerbNumField::Range,
                value: ValueModifier::offset(5.0),
            },
        };
        let pristine = VerbProps { range: 20.0, ..Default::default() };
        let mut verb = pristine.clone();

        m.modify_verb(&mut verb);
        assert_eq!(verb.range, 25.0);

        m.reset_verb(&mut verb, &pristine);
        assert_eq!(verb.range, 20.0);
    }

    #[test]
    fn test_projectile_swap_only_hits_primary() {
        let m = projectile_swap(1.0);
        let mut secondary = VerbProps { is_primary: false, ..Default::default() };
        m.modify_verb(&mut secondary);
        assert!(secondary.projectile.is_none());

        let mut primary = VerbProps::default();
        m.modify_verb(&mut primary);
        assert_eq!(primary.projectile.as_ref().unwrap().name, "bullet_incendiary");
    }

    #[test]
    fn test_extra_damage_appends() {
        let m = Modifier {
            chance: 0.3,
            kind: ModifierKind::ToolExtraDamage { kind: "flame".into(), amount: 4.0 },
        };
        let mut tool = ToolProps::default();
        m.modify_tool(&mut tool);
        assert_eq!(tool.extra_damages.len(), 1);
        assert_eq!(tool.extra_damages[0].chance, 0.3);
    }

    #[test]
    fn test_periodic_occurs_scales_with_interval() {
        let m = Modifier {
            chance: 1.0,
            kind: ModifierKind::PeriodicActivation {
                mtb_days: 1.0,
                effect: ActivationEffect::TeleportPawn,
            },
        };
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 20_000;
        let hits = (0..trials)
            .filter(|_| m.periodic_occurs(250, &mut rng))
            .count();
        // Expected p = 250 / 60000 ~= 0.004167
        let rate = hits as f32 / trials as f32;
        assert!((rate - 0.004167).abs() < 0.002, "rate {rate}");
    }

    #[test]
    fn test_cost_multiplier_tracks_damage_delta() {
        let mut base = BasePropsCache::new();
        base.register(
            "rifle",
            vec![VerbProps {
                projectile: Some(ProjectileProps {
                    name: "bullet".into(),
                    label: "bullet".into(),
                    damage: 5.0,
                }),
                ..Default::default()
            }],
            vec![],
        );
        let item = Item::ranged("rifle", "rifle", TechLevel::Industrial);

        let m = projectile_swap(1.0); // swapped projectile does 10 damage
        assert_eq!(m.cost_multiplier(&item, &base), 2.0);
    }
}
