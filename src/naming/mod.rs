//! Affix naming
//!
//! Assigns each selected affix a unique word-class slot from a shared
//! grammar, retrying on forbidden combinations, then assembles the item's
//! full display label so the plain stuff label survives as a substring.

use std::collections::HashMap;

use log::{error, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::AffixDef;

/// How many whole-assignment attempts before falling back to the last
/// partial result. Generation must never hard-fail on naming.
pub const MAX_NAMING_ATTEMPTS: usize = 5;

/// Word class used for synthesized fallback rules.
pub const FALLBACK_CLASS: &str = "unknown";

/// Shared grammar constraints: per-class slot capacity and forbidden
/// class combinations. Loaded once, read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamerConfig {
    pub max_word_classes: HashMap<String, usize>,
    /// Forbidden class multisets, stored as sorted comma-joined strings.
    /// Matched order-independently against an assignment's classes.
    #[serde(default)]
    pub disallowed_combos: Vec<String>,
}

impl NamerConfig {
    /// Canonicalize combo strings: split on any delimiter, sort, re-join.
    pub fn normalize(&mut self) {
        for combo in &mut self.disallowed_combos {
            *combo = normalize_combo(combo);
        }
    }

    pub fn max_for(&self, class: &str) -> usize {
        self.max_word_classes.get(class).copied().unwrap_or(0)
    }

    /// Whether a class assignment is allowed (set-equality against every
    /// disallowed combo).
    pub fn is_combo_allowed(&self, classes: &[&str]) -> bool {
        let mut sorted: Vec<&str> = classes.to_vec();
        sorted.sort_unstable();
        let key = sorted.join(",");
        !self.disallowed_combos.iter().any(|c| *c == key)
    }
}

fn normalize_combo(combo: &str) -> String {
    let mut parts: Vec<&str> = combo
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|s| !s.is_empty())
        .collect();
    parts.sort_unstable();
    parts.join(",")
}

/// One assigned word: which class slot the affix took and the concrete
/// word generated for it. Persisted verbatim as a `class->word` token so
/// saved names never drift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffixRule {
    pub class: String,
    pub word: String,
}

impl AffixRule {
    pub fn fallback(word: String) -> Self {
        Self { class: FALLBACK_CLASS.to_string(), word }
    }

    pub fn token(&self) -> String {
        format!("{}->{}", self.class, self.word)
    }

    pub fn parse(token: &str) -> Option<Self> {
        let (class, word) = token.split_once("->")?;
        Some(Self { class: class.to_string(), word: word.to_string() })
    }
}

/// Picked rule plus the auxiliary properties that travel with this class
/// instance (same instance, same suffix, so they match the right word).
#[derive(Debug, Clone, PartialEq)]
pub struct PickedRule {
    pub rule: AffixRule,
    pub props: HashMap<String, String>,
}

/// Assign one word-class slot per affix, with retry on forbidden
/// combinations.
///
/// Each attempt resets the per-class usage counter, walks the affixes in
/// selection order, and picks uniformly among the classes still below
/// capacity. An affix with no open class aborts the attempt. An
/// assignment whose class multiset hits a disallowed combination is
/// discarded and retried. After [`MAX_NAMING_ATTEMPTS`] failures the last
/// attempt's partial assignment is returned with a logged warning rather
/// than blocking item creation.
pub fn resolve_affix_rules(
    affixes: &[&AffixDef],
    config: &NamerConfig,
    rng: &mut impl Rng,
) -> Vec<PickedRule> {
    if affixes.is_empty() {
        return Vec::new();
    }

    let mut last_attempt: Vec<PickedRule> = Vec::new();

    for _ in 0..MAX_NAMING_ATTEMPTS {
        let mut used: HashMap<&str, usize> = HashMap::new();
        let mut picked: Vec<PickedRule> = Vec::with_capacity(affixes.len());
        let mut aborted = false;

        for affix in affixes {
            let open: Vec<&str> = affix
                .words
                .classes()
                .filter(|class| used.get(class).copied().unwrap_or(0) < config.max_for(class))
                .collect();

            let Some(&class) = open.choose(rng) else {
                error!(
                    "no open word class for affix '{}'; ran out of slots or the word fragment is empty",
                    affix.name
                );
                aborted = true;
                break;
            };

            *used.entry(class).or_insert(0) += 1;

            let fragment = affix.words.fragment(class);
            let word = fragment
                .and_then(|f| f.words.choose(rng))
                .cloned()
                .unwrap_or_else(|| affix.label_cap());
            let props = fragment
                .map(|f| f.props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default();

            picked.push(PickedRule {
                rule: AffixRule { class: class.to_string(), word },
                props,
            });
        }

        if !aborted {
            let classes: Vec<&str> = picked.iter().map(|p| p.rule.class.as_str()).collect();
            if config.is_combo_allowed(&classes) {
                return picked;
            }
        }

        last_attempt = picked;
    }

    warn!(
        "no allowed word-class assignment found in {} attempts for [{}]; using last partial assignment",
        MAX_NAMING_ATTEMPTS,
        affixes.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ")
    );
    last_attempt
}

/// Assemble the full display label from assigned words. The plain stuff
/// label ("steel longsword") always appears contiguously so later
/// relabeling can substitute around it.
pub fn compose_full_label(stuff_label: &str, picked: &[PickedRule]) -> String {
    let words: Vec<&str> = picked.iter().map(|p| p.rule.word.as_str()).collect();
    // Suffix words take their own preposition prop when the fragment
    // carries one ("of" otherwise).
    let prep = |idx: usize| -> &str {
        picked
            .get(idx)
            .and_then(|p| p.props.get("preposition"))
            .map(|s| s.as_str())
            .unwrap_or("of")
    };

    match words.len() {
        0 => stuff_label.to_string(),
        1 => format!("{} {}", words[0], stuff_label),
        2 => format!("{} {} {} {}", words[0], stuff_label, prep(1), words[1]),
        3 => format!(
            "{} {} {} {} {}",
            words[0], words[1], stuff_label, prep(2), words[2]
        ),
        _ => format!(
            "{} {} {} {} {} and {}",
            words[0], words[1], stuff_label, prep(2), words[2], words[3]
        ),
    }
}

/// Swap the stuff-label substring inside a decorated label, preserving
/// any prefix/suffix decoration the host added around it.
pub fn replace_stuff_label(decorated: &str, stuff_label: &str, full_label: &str) -> String {
    match decorated.find(stuff_label) {
        Some(pos) => {
            let pre = &decorated[..pos];
            let post = &decorated[pos + stuff_label.len()..];
            format!("{pre}{full_label}{post}")
        }
        None => full_label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AffixWords, WordFragment};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn def_with_classes(name: &str, classes: &[(&str, &[&str])]) -> AffixDef {
        let mut words = AffixWords::default();
        for (class, candidates) in classes {
            words.0.insert(
                class.to_string(),
                WordFragment {
                    words: candidates.iter().map(|s| s.to_string()).collect(),
                    props: BTreeMap::new(),
                },
            );
        }
        AffixDef {
            name: name.into(),
            label: name.into(),
            group_name: name.into(),
            cost: 1.0,
            modifiers: vec![],
            words,
        }
    }

    fn config(caps: &[(&str, usize)], combos: &[&str]) -> NamerConfig {
        let mut cfg = NamerConfig {
            max_word_classes: caps.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            disallowed_combos: combos.iter().map(|s| s.to_string()).collect(),
        };
        cfg.normalize();
        cfg
    }

    #[test]
    fn test_combo_normalization_is_order_independent() {
        let cfg = config(&[], &["noun / adjective"]);
        assert!(!cfg.is_combo_allowed(&["adjective", "noun"]));
        assert!(!cfg.is_combo_allowed(&["noun", "adjective"]));
        assert!(cfg.is_combo_allowed(&["noun", "noun"]));
    }

    #[test]
    fn test_resolve_assigns_one_rule_per_affix() {
        let a = def_with_classes("a", &[("adjective", &["grim"])]);
        let b = def_with_classes("b", &[("noun", &["doom"])]);
        let cfg = config(&[("adjective", 1), ("noun", 1)], &[]);
        let mut rng = StdRng::seed_from_u64(3);

        let picked = resolve_affix_rules(&[&a, &b], &cfg, &mut rng);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].rule.word, "grim");
        assert_eq!(picked[1].rule.word, "doom");
    }

    #[test]
    fn test_capacity_forces_second_class() {
        // Both affixes prefer "adjective" but only one slot exists, so the
        // second must take its other class.
        let a = def_with_classes("a", &[("adjective", &["grim"])]);
        let b = def_with_classes("b", &[("adjective", &["dire"]), ("noun", &["doom"])]);
        let cfg = config(&[("adjective", 1), ("noun", 1)], &[]);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = resolve_affix_rules(&[&a, &b], &cfg, &mut rng);
            assert_eq!(picked.len(), 2);
            assert_eq!(picked[0].rule.class, "adjective");
            assert_eq!(picked[1].rule.class, "noun");
        }
    }

    #[test]
    fn test_disallowed_combo_retries_to_allowed() {
        // "adjective,adjective" forbidden; both affixes can pick noun too,
        // so within 5 attempts an allowed assignment appears in the vast
        // majority of seeds.
        let a = def_with_classes("a", &[("adjective", &["grim"]), ("noun", &["bane"])]);
        let b = def_with_classes("b", &[("adjective", &["dire"]), ("noun", &["doom"])]);
        let cfg = config(&[("adjective", 2), ("noun", 2)], &["adjective,adjective"]);

        let mut allowed = 0;
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = resolve_affix_rules(&[&a, &b], &cfg, &mut rng);
            assert_eq!(picked.len(), 2, "fallback still yields one rule per affix");
            let classes: Vec<&str> = picked.iter().map(|p| p.rule.class.as_str()).collect();
            if cfg.is_combo_allowed(&classes) {
                allowed += 1;
            }
        }
        assert!(allowed >= 95, "only {allowed}/100 allowed");
    }

    #[test]
    fn test_exhausted_attempt_returns_partial() {
        // Single slot, both affixes need it: every attempt aborts on the
        // second affix, and the fallback keeps the first rule.
        let a = def_with_classes("a", &[("adjective", &["grim"])]);
        let b = def_with_classes("b", &[("adjective", &["dire"])]);
        let cfg = config(&[("adjective", 1)], &[]);
        let mut rng = StdRng::seed_from_u64(9);

        let picked = resolve_affix_rules(&[&a, &b], &cfg, &mut rng);
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn test_rule_token_roundtrip() {
        let rule = AffixRule { class: "adjective".into(), word: "grim".into() };
        assert_eq!(rule.token(), "adjective->grim");
        assert_eq!(AffixRule::parse("adjective->grim"), Some(rule));
        assert_eq!(AffixRule::parse("garbage"), None);
    }

    #[test]
    fn test_compose_keeps_stuff_label_contiguous() {
        let picked: Vec<PickedRule> = ["grim", "doom"]
            .iter()
            .map(|w| PickedRule {
                rule: AffixRule { class: "x".into(), word: w.to_string() },
                props: HashMap::new(),
            })
            .collect();
        let label = compose_full_label("steel longsword", &picked);
        assert_eq!(label, "grim steel longsword of doom");
        assert!(label.contains("steel longsword"));
    }

    #[test]
    fn test_replace_stuff_label_preserves_decoration() {
        let out = replace_stuff_label(
            "steel longsword (damaged)",
            "steel longsword",
            "grim steel longsword of doom",
        );
        assert_eq!(out, "grim steel longsword of doom (damaged)");
    }
}
