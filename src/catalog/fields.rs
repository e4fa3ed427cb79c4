//! Property field registry
//!
//! Statically-typed accessors for the verb/tool fields that modifiers may
//! touch. The catalog names fields by identifier; this registry maps each
//! identifier to a typed getter/setter, validated once at load time
//! instead of looked up reflectively per call.

use serde::{Deserialize, Serialize};

use crate::item::props::{ToolProps, VerbProps};

/// Numeric fields of [`VerbProps`] a modifier may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbNumField {
    Range,
    WarmupTime,
    BurstShotCount,
    TicksBetweenBurstShots,
    AccuracyTouch,
    AccuracyShort,
    AccuracyMedium,
    AccuracyLong,
    MuzzleFlashScale,
}

impl VerbNumField {
    pub fn get(&self, verb: &VerbProps) -> f32 {
        match self {
            VerbNumField::Range => verb.range,
            VerbNumField::WarmupTime => verb.warmup_time,
            VerbNumField::BurstShotCount => verb.burst_shot_count as f32,
            VerbNumField::TicksBetweenBurstShots => verb.ticks_between_burst_shots as f32,
            VerbNumField::AccuracyTouch => verb.accuracy_touch,
            VerbNumField::AccuracyShort => verb.accuracy_short,
            VerbNumField::AccuracyMedium => verb.accuracy_medium,
            VerbNumField::AccuracyLong => verb.accuracy_long,
            VerbNumField::MuzzleFlashScale => verb.muzzle_flash_scale,
        }
    }

    pub fn set(&self, verb: &mut VerbProps, value: f32) {
        match self {
            VerbNumField::Range => verb.range = value,
            VerbNumField::WarmupTime => verb.warmup_time = value,
            // Integer fields round to nearest, never below zero
            VerbNumField::BurstShotCount => verb.burst_shot_count = value.round().max(0.0) as u32,
            VerbNumField::TicksBetweenBurstShots => {
                verb.ticks_between_burst_shots = value.round().max(0.0) as u32
            }
            VerbNumField::AccuracyTouch => verb.accuracy_touch = value,
            VerbNumField::AccuracyShort => verb.accuracy_short = value,
            VerbNumField::AccuracyMedium => verb.accuracy_medium = value,
            VerbNumField::AccuracyLong => verb.accuracy_long = value,
            VerbNumField::MuzzleFlashScale => verb.muzzle_flash_scale = value,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VerbNumField::Range => "Range",
            VerbNumField::WarmupTime => "Warmup time",
            VerbNumField::BurstShotCount => "Burst shot count",
            VerbNumField::TicksBetweenBurstShots => "Time between burst shots",
            VerbNumField::AccuracyTouch => "Accuracy (touch)",
            VerbNumField::AccuracyShort => "Accuracy (short)",
            VerbNumField::AccuracyMedium => "Accuracy (medium)",
            VerbNumField::AccuracyLong => "Accuracy (long)",
            VerbNumField::MuzzleFlashScale => "Muzzle flash",
        }
    }
}

/// Boolean fields of [`VerbProps`] a modifier may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbBoolField {
    RequiresLineOfSight,
}

impl VerbBoolField {
    pub fn get(&self, verb: &VerbProps) -> bool {
        match self {
            VerbBoolField::RequiresLineOfSight => verb.requires_line_of_sight,
        }
    }

    pub fn set(&self, verb: &mut VerbProps, value: bool) {
        match self {
            VerbBoolField::RequiresLineOfSight => verb.requires_line_of_sight = value,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VerbBoolField::RequiresLineOfSight => "Requires line of sight",
        }
    }
}

/// Numeric fields of [`ToolProps`] a modifier may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolNumField {
    Power,
    CooldownTime,
    ArmorPenetration,
    ChanceFactor,
}

impl ToolNumField {
    pub fn get(&self, tool: &ToolProps) -> f32 {
        match self {
            ToolNumField::Power => tool.power,
            ToolNumField::CooldownTime => tool.cooldown_time,
            ToolNumField::ArmorPenetration => tool.armor_penetration,
            ToolNumField::ChanceFactor => tool.chance_factor,
        }
    }

    pub fn set(&self, tool: &mut ToolProps, value: f32) {
        match self {
            ToolNumField::Power => tool.power = value,
            ToolNumField::CooldownTime => tool.cooldown_time = value,
            ToolNumField::ArmorPenetration => tool.armor_penetration = value,
            ToolNumField::ChanceFactor => tool.chance_factor = value,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolNumField::Power => "Melee damage",
            ToolNumField::CooldownTime => "Melee cooldown",
            ToolNumField::ArmorPenetration => "Armor penetration",
            ToolNumField::ChanceFactor => "Selection chance",
        }
    }
}
