//! Affix generation
//!
//! Budget derivation from host wealth/quality signals and the weighted
//! selection of catalog entries against that budget.

pub mod budget;
pub mod select;

pub use budget::affix_budget;
pub use select::{roll_affix_count, select_affixes};
