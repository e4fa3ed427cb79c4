//! Built-in affix data
//!
//! Hardcoded fallbacks used when the external RON files are missing or
//! fail to parse.

use std::collections::BTreeMap;

use crate::catalog::entry::{AffixDef, AffixWords, WordFragment};
use crate::catalog::fields::{ToolNumField, VerbNumField};
use crate::catalog::modifier::{ActivationEffect, Modifier, ModifierKind, StatId};
use crate::catalog::value_mod::ValueModifier;
use crate::item::props::ProjectileProps;
use crate::naming::NamerConfig;

fn words(entries: &[(&str, &[&str])]) -> AffixWords {
    let mut map = BTreeMap::new();
    for (class, candidates) in entries {
        map.insert(
            class.to_string(),
            WordFragment {
                words: candidates.iter().map(|s| s.to_string()).collect(),
                props: BTreeMap::new(),
            },
        );
    }
    AffixWords(map)
}

fn certain(kind: ModifierKind) -> Modifier {
    Modifier { chance: 1.0, kind }
}

/// Default affix definitions.
pub fn default_affix_defs() -> Vec<AffixDef> {
    vec![
        AffixDef {
            name: "sturdy".into(),
            label: "sturdy".into(),
            group_name: "durability".into(),
            cost: 2.0,
            modifiers: vec![certain(ModifierKind::StatChange {
                stat: StatId::MaxHitPoints,
                value: ValueModifier::factor(1.5),
            })],
            words: words(&[
                ("adjective", &["Sturdy", "Stout", "Unyielding"]),
                ("noun", &["Endurance", "the Bulwark"]),
            ]),
        },
        AffixDef {
            name: "brittle".into(),
            label: "brittle".into(),
            group_name: "durability".into(),
            cost: -2.0,
            modifiers: vec![certain(ModifierKind::StatChange {
                stat: StatId::MaxHitPoints,
                value: ValueModifier::factor(0.6),
            })],
            words: words(&[
                ("adjective", &["Brittle", "Cracked", "Worm-eaten"]),
                ("noun", &["Splinters"]),
            ]),
        },
        AffixDef {
            name: "gilded".into(),
            label: "gilded".into(),
            group_name: "value".into(),
            cost: 1.0,
            modifiers: vec![certain(ModifierKind::StatChange {
                stat: StatId::MarketValue,
                value: ValueModifier::factor(2.0),
            })],
            words: words(&[
                ("adjective", &["Gilded", "Opulent", "Princely"]),
                ("noun", &["the Magnate"]),
            ]),
        },
        AffixDef {
            name: "featherlight".into(),
            label: "featherlight".into(),
            group_name: "mass".into(),
            cost: 1.0,
            modifiers: vec![certain(ModifierKind::StatChange {
                stat: StatId::Mass,
                value: ValueModifier { multiplier: 0.5, min: Some(0.05), ..Default::default() },
            })],
            words: words(&[
                ("adjective", &["Featherlight", "Weightless", "Airy"]),
                ("noun", &["the Zephyr"]),
            ]),
        },
        AffixDef {
            name: "fireproof".into(),
            label: "fireproof".into(),
            group_name: "flammability".into(),
            cost: 1.0,
            modifiers: vec![certain(ModifierKind::StatChange {
                stat: StatId::Flammability,
                value: ValueModifier::set_to(0.0),
            })],
            words: words(&[
                ("adjective", &["Fireproof", "Ashen", "Smothering"]),
                ("noun", &["the Ember"]),
            ]),
        },
        AffixDef {
            name: "swift".into(),
            label: "swift".into(),
            group_name: "mobility".into(),
            cost: 2.0,
            modifiers: vec![certain(ModifierKind::EquippedStatChange {
                stat: StatId::MoveSpeed,
                value: ValueModifier::offset(0.3),
            })],
            words: words(&[
                ("adjective", &["Swift", "Fleet", "Quicksilver"]),
                ("noun", &["Haste", "the Courser"]),
            ]),
        },
        AffixDef {
            name: "nimble".into(),
            label: "nimble".into(),
            group_name: "defense".into(),
            cost: 3.0,
            modifiers: vec![certain(ModifierKind::EquippedStatChange {
                stat: StatId::MeleeDodgeChance,
                value: ValueModifier { add: 0.08, max: Some(0.95), ..Default::default() },
            })],
            words: words(&[
                ("adjective", &["Nimble", "Elusive", "Dancing"]),
                ("noun", &["the Eel"]),
            ]),
        },
        AffixDef {
            name: "mule".into(),
            label: "mule's burden".into(),
            group_name: "carrying".into(),
            cost: 1.0,
            modifiers: vec![certain(ModifierKind::EquippedStatChange {
                stat: StatId::CarryingCapacity,
                value: ValueModifier::offset(20.0),
            })],
            words: words(&[
                ("adjective", &["Burdened", "Laden"]),
                ("noun", &["the Mule", "the Packbeast"]),
            ]),
        },
        AffixDef {
            name: "farsight".into(),
            label: "farsight".into(),
            group_name: "range".into(),
            cost: 2.0,
            modifiers: vec![certain(ModifierKind::VerbNumChange {
                field: VerbNumField::Range,
                value: ValueModifier::offset(7.0),
            })],
            words: words(&[
                ("adjective", &["Farsighted", "Hawkeyed"]),
                ("noun", &["the Horizon"]),
            ]),
        },
        AffixDef {
            name: "hairtrigger".into(),
            label: "hair-trigger".into(),
            group_name: "warmup".into(),
            cost: 2.0,
            modifiers: vec![certain(ModifierKind::VerbNumChange {
                field: VerbNumField::WarmupTime,
                value: ValueModifier { multiplier: 0.7, min: Some(0.1), ..Default::default() },
            })],
            words: words(&[
                ("adjective", &["Hair-trigger", "Twitchy", "Eager"]),
                ("noun", &["the Reflex"]),
            ]),
        },
        AffixDef {
            name: "steady".into(),
            label: "steady".into(),
            group_name: "accuracy".into(),
            cost: 3.0,
            modifiers: vec![
                certain(ModifierKind::VerbNumChange {
                    field: VerbNumField::AccuracyMedium,
                    value: ValueModifier { multiplier: 1.2, max: Some(1.0), ..Default::default() },
                }),
                certain(ModifierKind::VerbNumChange {
                    field: VerbNumField::AccuracyLong,
                    value: ValueModifier { multiplier: 1.2, max: Some(1.0), ..Default::default() },
                }),
            ],
            words: words(&[
                ("adjective", &["Steady", "Unerring", "True"]),
                ("noun", &["the Marksman"]),
            ]),
        },
        AffixDef {
            name: "incendiary".into(),
            label: "incendiary rounds".into(),
            group_name: "projectile".into(),
            cost: 2.0,
            modifiers: vec![Modifier {
                chance: 0.4,
                kind: ModifierKind::ProjectileChange {
                    projectile: ProjectileProps {
                        name: "bullet_incendiary".into(),
                        label: "incendiary bullet".into(),
                        damage: 10.0,
                    },
                },
            }],
            words: words(&[
                ("adjective", &["Incendiary", "Smoldering", "Blazing"]),
                ("noun", &["Cinders", "the Pyre"]),
            ]),
        },
        AffixDef {
            name: "serrated".into(),
            label: "serrated".into(),
            group_name: "melee_power".into(),
            cost: 2.0,
            modifiers: vec![certain(ModifierKind::ToolNumChange {
                field: ToolNumField::Power,
                value: ValueModifier::factor(1.3),
            })],
            words: words(&[
                ("adjective", &["Serrated", "Jagged", "Cruel"]),
                ("noun", &["Rending"]),
            ]),
        },
        AffixDef {
            name: "venomous".into(),
            label: "venomous".into(),
            group_name: "melee_rider".into(),
            cost: 2.0,
            modifiers: vec![Modifier {
                chance: 0.5,
                kind: ModifierKind::ToolExtraDamage { kind: "toxin".into(), amount: 3.0 },
            }],
            words: words(&[
                ("adjective", &["Venomous", "Envenomed", "Weeping"]),
                ("noun", &["the Serpent", "Spite"]),
            ]),
        },
        AffixDef {
            name: "cursed_blood".into(),
            label: "blood curse".into(),
            group_name: "curse".into(),
            cost: -5.0,
            modifiers: vec![
                certain(ModifierKind::PeriodicActivation {
                    mtb_days: 15.0,
                    effect: ActivationEffect::HurtPawn { amount: 5.0 },
                }),
                certain(ModifierKind::EquippedStatChange {
                    stat: StatId::MoveSpeed,
                    value: ValueModifier::offset(-0.2),
                }),
            ],
            words: words(&[
                ("adjective", &["Bloodthirsty", "Hungering"]),
                ("noun", &["Open Wounds", "the Leech"]),
            ]),
        },
        AffixDef {
            name: "wanderlust".into(),
            label: "wanderlust".into(),
            group_name: "curse".into(),
            cost: -1.0,
            modifiers: vec![certain(ModifierKind::PeriodicActivation {
                mtb_days: 45.0,
                effect: ActivationEffect::TeleportPawn,
            })],
            words: words(&[
                ("adjective", &["Restless", "Straying"]),
                ("noun", &["Wandering", "Lost Roads"]),
            ]),
        },
    ]
}

/// Default naming grammar constraints.
pub fn default_namer_config() -> NamerConfig {
    let mut config = NamerConfig {
        max_word_classes: [("adjective".to_string(), 2), ("noun".to_string(), 2)]
            .into_iter()
            .collect(),
        disallowed_combos: vec!["noun,noun,noun".into(), "adjective,noun,noun".into()],
    };
    config.normalize();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_internally_consistent() {
        let defs = default_affix_defs();
        let config = default_namer_config();

        for def in &defs {
            assert!(!def.modifiers.is_empty(), "{} has no modifiers", def.name);
            assert!(def.cost.abs() <= 6.0, "{} cost out of range", def.name);
            for class in def.words.classes() {
                assert!(
                    config.max_for(class) > 0,
                    "{} references unknown word class '{}'",
                    def.name,
                    class
                );
            }
        }
    }

    #[test]
    fn test_defaults_cover_every_modifier_target() {
        use crate::catalog::modifier::ModifierTarget;

        let defs = default_affix_defs();
        let targets: std::collections::HashSet<ModifierTarget> = defs
            .iter()
            .flat_map(|d| d.modifiers.iter().map(|m| m.target()))
            .collect();

        for target in [
            ModifierTarget::Item,
            ModifierTarget::EquippedPawn,
            ModifierTarget::RangedVerb,
            ModifierTarget::MeleeTool,
            ModifierTarget::Projectile,
            ModifierTarget::PeriodicOnPawn,
        ] {
            assert!(targets.contains(&target), "no default covers {target:?}");
        }
    }
}
