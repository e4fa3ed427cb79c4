//! Item-side state
//!
//! The engine's view of a host item, the persisted affix state attached to
//! it, and the lazily recomputed derived cache everything else reads from.

pub mod affixed;
pub mod item;
pub mod props;
pub mod report;

pub use affixed::{AffixState, AffixedItem, DerivedState};
pub use item::{Item, ItemId};
