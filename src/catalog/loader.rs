//! Catalog loading
//!
//! Loads affix definitions and the naming grammar from external RON
//! files, validating everything up front so bad data fails at load time
//! rather than mid-generation. Missing or unparseable files fall back to
//! the hardcoded defaults.

use std::fs;
use std::path::Path;

use anyhow::Context;
use log::warn;
use thiserror::Error;

use crate::catalog::defaults::{default_affix_defs, default_namer_config};
use crate::catalog::entry::AffixDef;
use crate::catalog::modifier::ModifierKind;
use crate::catalog::Catalog;
use crate::naming::NamerConfig;

/// Validation failures in authored affix data.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate affix name '{0}'")]
    DuplicateName(String),
    #[error("affix '{affix}' has no modifiers")]
    NoModifiers { affix: String },
    #[error("affix '{affix}' cost {cost} outside [-6, 6]")]
    CostOutOfRange { affix: String, cost: f32 },
    #[error("affix '{affix}' modifier chance {chance} outside (0, 1]")]
    ChanceOutOfRange { affix: String, chance: f32 },
    #[error("affix '{affix}' has a value modifier that changes nothing")]
    NoopValue { affix: String },
    #[error("affix '{affix}' stat modifier targets the wrong stat domain")]
    WrongStatDomain { affix: String },
    #[error("affix '{affix}' word class '{class}' has no words")]
    EmptyWords { affix: String, class: String },
    #[error("disallowed combo '{combo}' references unknown word class '{class}'")]
    UnknownComboClass { combo: String, class: String },
}

/// Validate a set of affix definitions against a naming config.
pub fn validate(defs: &[AffixDef], namer: &NamerConfig) -> Result<(), CatalogError> {
    let mut seen = std::collections::HashSet::new();
    for def in defs {
        if !seen.insert(def.name.as_str()) {
            return Err(CatalogError::DuplicateName(def.name.clone()));
        }
        if def.modifiers.is_empty() {
            return Err(CatalogError::NoModifiers { affix: def.name.clone() });
        }
        if def.cost.abs() > 6.0 {
            return Err(CatalogError::CostOutOfRange { affix: def.name.clone(), cost: def.cost });
        }
        for modifier in &def.modifiers {
            if modifier.chance <= 0.0 || modifier.chance > 1.0 {
                return Err(CatalogError::ChanceOutOfRange {
                    affix: def.name.clone(),
                    chance: modifier.chance,
                });
            }
            match &modifier.kind {
                ModifierKind::StatChange { stat, value } => {
                    if !stat.is_item_stat() {
                        return Err(CatalogError::WrongStatDomain { affix: def.name.clone() });
                    }
                    if value.is_noop() {
                        return Err(CatalogError::NoopValue { affix: def.name.clone() });
                    }
                }
                ModifierKind::EquippedStatChange { stat, value } => {
                    if stat.is_item_stat() {
                        return Err(CatalogError::WrongStatDomain { affix: def.name.clone() });
                    }
                    if value.is_noop() {
                        return Err(CatalogError::NoopValue { affix: def.name.clone() });
                    }
                }
                ModifierKind::VerbNumChange { value, .. }
                | ModifierKind::ToolNumChange { value, .. } => {
                    if value.is_noop() {
                        return Err(CatalogError::NoopValue { affix: def.name.clone() });
                    }
                }
                _ => {}
            }
        }
        for class in def.words.classes() {
            let empty = def
                .words
                .fragment(class)
                .map(|f| f.words.is_empty())
                .unwrap_or(true);
            if empty {
                return Err(CatalogError::EmptyWords {
                    affix: def.name.clone(),
                    class: class.to_string(),
                });
            }
        }
    }

    for combo in &namer.disallowed_combos {
        for class in combo.split(',') {
            if namer.max_for(class) == 0 {
                return Err(CatalogError::UnknownComboClass {
                    combo: combo.clone(),
                    class: class.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Affix catalog and naming config loaded together.
#[derive(Debug, Clone)]
pub struct CatalogData {
    pub catalog: Catalog,
    pub namer: NamerConfig,
}

impl CatalogData {
    /// Load from a data directory, falling back to built-in defaults for
    /// anything missing or invalid. Never fails.
    pub fn load_or_default(base_path: &Path) -> Self {
        let defs = load_defs(base_path);
        let namer = load_namer(base_path);
        match validate(&defs, &namer) {
            Ok(()) => Self { catalog: Catalog::new(defs), namer },
            Err(e) => {
                warn!("affix data failed validation ({e}); using built-in defaults");
                Self::default()
            }
        }
    }
}

impl Default for CatalogData {
    fn default() -> Self {
        Self {
            catalog: Catalog::new(default_affix_defs()),
            namer: default_namer_config(),
        }
    }
}

fn load_defs(base_path: &Path) -> Vec<AffixDef> {
    let path = base_path.join("affixes.ron");
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => match ron::from_str(&content) {
                Ok(defs) => return defs,
                Err(e) => warn!("failed to parse {}: {}", path.display(), e),
            },
            Err(e) => warn!("failed to read {}: {}", path.display(), e),
        }
    }
    default_affix_defs()
}

fn load_namer(base_path: &Path) -> NamerConfig {
    let path = base_path.join("namer.ron");
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => match ron::from_str::<NamerConfig>(&content) {
                Ok(mut config) => {
                    config.normalize();
                    return config;
                }
                Err(e) => warn!("failed to parse {}: {}", path.display(), e),
            },
            Err(e) => warn!("failed to read {}: {}", path.display(), e),
        }
    }
    default_namer_config()
}

/// Strict loader for tools: parse and validate one affix file, erroring
/// out instead of falling back.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let defs: Vec<AffixDef> =
        ron::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    validate(&defs, &default_namer_config())
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(Catalog::new(defs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entry::{AffixWords, WordFragment};
    use crate::catalog::modifier::{Modifier, StatId};
    use crate::catalog::value_mod::ValueModifier;
    use std::collections::BTreeMap;

    fn minimal_def(name: &str) -> AffixDef {
        AffixDef {
            name: name.into(),
            label: name.into(),
            group_name: name.into(),
            cost: 1.0,
            modifiers: vec![Modifier {
                chance: 1.0,
                kind: ModifierKind::StatChange {
                    stat: StatId::MarketValue,
                    value: ValueModifier::factor(1.5),
                },
            }],
            words: AffixWords::default(),
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(validate(&default_affix_defs(), &default_namer_config()), Ok(()));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let defs = vec![minimal_def("a"), minimal_def("a")];
        assert_eq!(
            validate(&defs, &NamerConfig::default()),
            Err(CatalogError::DuplicateName("a".into()))
        );
    }

    #[test]
    fn test_bad_chance_rejected() {
        let mut def = minimal_def("a");
        def.modifiers[0].chance = 1.5;
        assert!(matches!(
            validate(&[def], &NamerConfig::default()),
            Err(CatalogError::ChanceOutOfRange { .. })
        ));
    }

    #[test]
    fn test_noop_value_rejected() {
        let mut def = minimal_def("a");
        def.modifiers[0].kind = ModifierKind::StatChange {
            stat: StatId::MarketValue,
            value: ValueModifier::default(),
        };
        assert!(matches!(
            validate(&[def], &NamerConfig::default()),
            Err(CatalogError::NoopValue { .. })
        ));
    }

    #[test]
    fn test_wrong_stat_domain_rejected() {
        let mut def = minimal_def("a");
        def.modifiers[0].kind = ModifierKind::StatChange {
            stat: StatId::MoveSpeed,
            value: ValueModifier::offset(1.0),
        };
        assert!(matches!(
            validate(&[def], &NamerConfig::default()),
            Err(CatalogError::WrongStatDomain { .. })
        ));
    }

    #[test]
    fn test_empty_word_list_rejected() {
        let mut def = minimal_def("a");
        def.words = AffixWords(
            [(
                "adjective".to_string(),
                WordFragment { words: vec![], props: BTreeMap::new() },
            )]
            .into_iter()
            .collect(),
        );
        let namer = NamerConfig {
            max_word_classes: [("adjective".to_string(), 2)].into_iter().collect(),
            disallowed_combos: vec![],
        };
        assert!(matches!(
            validate(&[def], &namer),
            Err(CatalogError::EmptyWords { .. })
        ));
    }

    #[test]
    fn test_unknown_combo_class_rejected() {
        let namer = NamerConfig {
            max_word_classes: [("adjective".to_string(), 2)].into_iter().collect(),
            disallowed_combos: vec!["adjective,verb".into()],
        };
        assert!(matches!(
            validate(&[], &namer),
            Err(CatalogError::UnknownComboClass { .. })
        ));
    }

    #[test]
    fn test_ron_roundtrip_of_defaults() {
        let defs = default_affix_defs();
        let ron = ron::to_string(&defs).unwrap();
        let back: Vec<AffixDef> = ron::from_str(&ron).unwrap();
        assert_eq!(back, defs);
    }

    #[test]
    fn test_missing_dir_falls_back_to_defaults() {
        let data = CatalogData::load_or_default(Path::new("/nonexistent/data"));
        assert_eq!(data.catalog.len(), default_affix_defs().len());
        assert_eq!(data.namer, default_namer_config());
    }
}
