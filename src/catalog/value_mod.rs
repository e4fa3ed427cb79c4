//! Value modifier
//!
//! A small pure transform applied to a numeric property: optional set,
//! pre-clamp, add, multiply, and final clamp.

use serde::{Deserialize, Serialize};

/// A bundled set/add/multiply/clamp transform.
///
/// Application order (when `set` is absent): pre-clamp to `[pre_min, max]`,
/// add, multiply, clamp to `[min, max]`. A `set` value short-circuits
/// everything else. The pre-clamp exists for values that start at zero or
/// too low for a multiplier to matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueModifier {
    #[serde(default)]
    pub set: Option<f32>,
    #[serde(default)]
    pub pre_min: Option<f32>,
    #[serde(default)]
    pub add: f32,
    #[serde(default = "one")]
    pub multiplier: f32,
    #[serde(default)]
    pub min: Option<f32>,
    #[serde(default)]
    pub max: Option<f32>,
}

fn one() -> f32 {
    1.0
}

impl Default for ValueModifier {
    fn default() -> Self {
        Self {
            set: None,
            pre_min: None,
            add: 0.0,
            multiplier: 1.0,
            min: None,
            max: None,
        }
    }
}

impl ValueModifier {
    pub fn set_to(value: f32) -> Self {
        Self { set: Some(value), ..Default::default() }
    }

    pub fn offset(add: f32) -> Self {
        Self { add, ..Default::default() }
    }

    pub fn factor(multiplier: f32) -> Self {
        Self { multiplier, ..Default::default() }
    }

    /// Apply the transform to a value.
    pub fn apply(&self, old: f32) -> f32 {
        if let Some(set) = self.set {
            return set;
        }

        let mut val = old;
        if let Some(pre_min) = self.pre_min {
            val = val.max(pre_min);
        }
        if let Some(max) = self.max {
            val = val.min(max);
        }
        val += self.add;
        val *= self.multiplier;
        if let Some(min) = self.min {
            val = val.max(min);
        }
        if let Some(max) = self.max {
            val = val.min(max);
        }
        val
    }

    /// True if applying this modifier can never change any value.
    pub fn is_noop(&self) -> bool {
        self.set.is_none()
            && self.pre_min.is_none()
            && self.add == 0.0
            && self.multiplier == 1.0
            && self.min.is_none()
            && self.max.is_none()
    }

    /// Human-readable change string, e.g. "+2", "x1.5", "=0 min=1".
    pub fn change_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(pre_min) = self.pre_min {
            parts.push(format!("min={}", trim_num(pre_min)));
        }
        if let Some(set) = self.set {
            parts.push(format!("={}", trim_num(set)));
        }
        if self.add != 0.0 {
            parts.push(if self.add > 0.0 {
                format!("+{}", trim_num(self.add))
            } else {
                trim_num(self.add)
            });
        }
        if self.multiplier != 1.0 {
            parts.push(format!("x{}", trim_num(self.multiplier)));
        }
        if let Some(min) = self.min {
            parts.push(format!("min={}", trim_num(min)));
        }
        if let Some(max) = self.max {
            parts.push(format!("max={}", trim_num(max)));
        }
        parts.join(" ")
    }
}

/// Format a float without trailing zeros ("2" not "2.00").
fn trim_num(v: f32) -> String {
    if (v - v.round()).abs() < 1e-4 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.2}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_short_circuits() {
        let vm = ValueModifier { set: Some(5.0), add: 100.0, multiplier: 3.0, ..Default::default() };
        assert_eq!(vm.apply(1.0), 5.0);
    }

    #[test]
    fn test_apply_order() {
        // pre-clamp lifts zero before the multiplier sees it
        let vm = ValueModifier {
            pre_min: Some(1.0),
            multiplier: 2.0,
            ..Default::default()
        };
        assert_eq!(vm.apply(0.0), 2.0);

        // add then multiply, then final clamp
        let vm = ValueModifier {
            add: 2.0,
            multiplier: 3.0,
            max: Some(10.0),
            ..Default::default()
        };
        assert_eq!(vm.apply(1.0), 9.0);
        assert_eq!(vm.apply(5.0), 10.0);
    }

    #[test]
    fn test_min_clamp() {
        let vm = ValueModifier { add: -5.0, min: Some(0.5), ..Default::default() };
        assert_eq!(vm.apply(1.0), 0.5);
    }

    #[test]
    fn test_noop_detection() {
        assert!(ValueModifier::default().is_noop());
        assert!(!ValueModifier::offset(1.0).is_noop());
        assert!(!ValueModifier::set_to(0.0).is_noop());
    }

    #[test]
    fn test_change_string() {
        assert_eq!(ValueModifier::offset(2.0).change_string(), "+2");
        assert_eq!(ValueModifier::factor(1.5).change_string(), "x1.50");
        assert_eq!(ValueModifier::set_to(0.0).change_string(), "=0");
    }
}
