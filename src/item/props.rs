//! Combat property bags
//!
//! Engine-side copies of the host's ranged verb and melee tool properties,
//! plus the process-wide cache of pristine base copies that modified clones
//! are built from.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The projectile a ranged verb fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileProps {
    pub name: String,
    pub label: String,
    pub damage: f32,
}

/// One ranged attack mode of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbProps {
    pub label: String,
    pub is_primary: bool,
    pub range: f32,
    pub warmup_time: f32,
    pub burst_shot_count: u32,
    pub ticks_between_burst_shots: u32,
    pub accuracy_touch: f32,
    pub accuracy_short: f32,
    pub accuracy_medium: f32,
    pub accuracy_long: f32,
    pub muzzle_flash_scale: f32,
    pub requires_line_of_sight: bool,
    pub projectile: Option<ProjectileProps>,
}

impl Default for VerbProps {
    fn default() -> Self {
        Self {
            label: String::new(),
            is_primary: true,
            range: 25.0,
            warmup_time: 1.0,
            burst_shot_count: 1,
            ticks_between_burst_shots: 10,
            accuracy_touch: 0.8,
            accuracy_short: 0.8,
            accuracy_medium: 0.8,
            accuracy_long: 0.8,
            muzzle_flash_scale: 9.0,
            requires_line_of_sight: true,
            projectile: None,
        }
    }
}

/// An extra damage rider on a melee tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraDamage {
    pub kind: String,
    pub amount: f32,
    pub chance: f32,
}

/// One melee attack mode (a "tool") of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolProps {
    pub label: String,
    pub power: f32,
    pub cooldown_time: f32,
    pub armor_penetration: f32,
    pub chance_factor: f32,
    pub extra_damages: Vec<ExtraDamage>,
}

impl Default for ToolProps {
    fn default() -> Self {
        Self {
            label: String::new(),
            power: 1.0,
            cooldown_time: 2.0,
            armor_penetration: 0.0,
            chance_factor: 1.0,
            extra_damages: Vec::new(),
        }
    }
}

/// Process-wide cache of pristine base properties, keyed by def name.
///
/// Written once per key (idempotent re-writes are safe) at definition load,
/// read-shared by every item of that def. Modified clones in per-item
/// derived state are always built from these, never from a previously
/// modified set.
#[derive(Debug, Clone, Default)]
pub struct BasePropsCache {
    verbs: HashMap<String, Arc<Vec<VerbProps>>>,
    tools: HashMap<String, Arc<Vec<ToolProps>>>,
}

impl BasePropsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a def's pristine properties. First write per key wins.
    pub fn register(&mut self, def_name: &str, verbs: Vec<VerbProps>, tools: Vec<ToolProps>) {
        self.verbs
            .entry(def_name.to_string())
            .or_insert_with(|| Arc::new(verbs));
        self.tools
            .entry(def_name.to_string())
            .or_insert_with(|| Arc::new(tools));
    }

    pub fn verbs(&self, def_name: &str) -> Arc<Vec<VerbProps>> {
        self.verbs.get(def_name).cloned().unwrap_or_default()
    }

    pub fn tools(&self, def_name: &str) -> Arc<Vec<ToolProps>> {
        self.tools.get(def_name).cloned().unwrap_or_default()
    }

    /// Primary verb of a def, if it has one.
    pub fn primary_verb(&self, def_name: &str) -> Option<VerbProps> {
        self.verbs(def_name)
            .iter()
            .find(|v| v.is_primary)
            .cloned()
    }

    /// Drop everything, for a full data reload.
    pub fn clear(&mut self) {
        self.verbs.clear();
        self.tools.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_write_once() {
        let mut cache = BasePropsCache::new();
        let verb = VerbProps { range: 30.0, ..Default::default() };
        cache.register("gun", vec![verb], vec![]);

        // Second write with different values must not clobber the first
        let other = VerbProps { range: 99.0, ..Default::default() };
        cache.register("gun", vec![other], vec![]);

        assert_eq!(cache.verbs("gun")[0].range, 30.0);
    }

    #[test]
    fn test_missing_def_yields_empty() {
        let cache = BasePropsCache::new();
        assert!(cache.verbs("nothing").is_empty());
        assert!(cache.primary_verb("nothing").is_none());
    }
}
