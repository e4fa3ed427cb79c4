//! Runebrand - procedural item affix engine
//!
//! Rolls randomized affixes onto game items under a point budget,
//! names them through a constrained word grammar, and maintains a
//! lazily recomputed derived-state cache that all consumers read from.

pub mod catalog;
pub mod engine;
pub mod gen;
pub mod host;
pub mod icons;
pub mod item;
pub mod naming;
pub mod save;
pub mod stats;

// Re-export commonly used types
pub use catalog::{AffixDef, Catalog, CatalogData, Modifier, ModifierKind, ValueModifier};
pub use engine::{AffixEngine, DebugOverrides, Signal};
pub use host::{EffectSink, HostContext, Notice, PawnView, Quality, TechLevel};
pub use item::{AffixState, AffixedItem, Item};
pub use naming::{AffixRule, NamerConfig};
