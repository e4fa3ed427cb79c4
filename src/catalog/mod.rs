//! Affix catalog
//!
//! Static, author-defined affix definitions: costs, exclusivity groups,
//! modifier lists, and naming word fragments. Loaded once, never mutated
//! at runtime.

pub mod defaults;
pub mod entry;
pub mod fields;
pub mod loader;
pub mod modifier;
pub mod value_mod;

pub use entry::{AffixDef, AffixWords, WordFragment, DEADLY_COST_THRESHOLD};
pub use fields::{ToolNumField, VerbBoolField, VerbNumField};
pub use loader::{load_catalog, CatalogData, CatalogError};
pub use modifier::{ActivationEffect, Modifier, ModifierKind, ModifierTarget, StatId};
pub use value_mod::ValueModifier;

use std::collections::HashMap;

/// The full loaded affix catalog with a by-name index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    defs: Vec<AffixDef>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(defs: Vec<AffixDef>) -> Self {
        let by_name = defs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        Self { defs, by_name }
    }

    pub fn defs(&self) -> &[AffixDef] {
        &self.defs
    }

    pub fn get(&self, name: &str) -> Option<&AffixDef> {
        self.by_name.get(name).map(|&i| &self.defs[i])
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(defaults::default_affix_defs());
        assert!(!catalog.is_empty());
        let first = catalog.defs()[0].name.clone();
        assert!(catalog.get(&first).is_some());
        assert!(catalog.get("no_such_affix").is_none());
    }
}
