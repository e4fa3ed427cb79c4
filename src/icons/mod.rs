//! Icon overlays
//!
//! Picks the overlay for an affixed item (the deadly affix if present,
//! otherwise the highest-cost one) and caches composed icon keys
//! process-wide. Actual texture work belongs to the renderer; the engine
//! only decides keys, colors, and cache identity.

use std::collections::HashMap;

use crate::catalog::AffixDef;
use crate::item::props::BasePropsCache;
use crate::item::Item;

/// Identity of a composed icon: overlay texture part plus tint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconKey {
    pub tex_part: String,
    pub color: String,
}

/// Opaque handle the renderer maps to an actual texture.
pub type IconHandle = u32;

/// Process-wide icon cache, keyed by composed identity. Written once per
/// key; re-requesting the same identity returns the same handle.
#[derive(Debug, Clone, Default)]
pub struct IconCache {
    handles: HashMap<IconKey, IconHandle>,
    next: IconHandle,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the handle for an icon identity, allocating one if this is
    /// the first request. Idempotent per key.
    pub fn fetch_or_make(&mut self, key: &IconKey) -> IconHandle {
        if let Some(&handle) = self.handles.get(key) {
            return handle;
        }
        let handle = self.next;
        self.next += 1;
        self.handles.insert(key.clone(), handle);
        handle
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drop everything, for a full data reload.
    pub fn clear(&mut self) {
        self.handles.clear();
        self.next = 0;
    }
}

/// Choose the overlay for an item's affix set: any deadly affix wins,
/// otherwise the highest live cost. Returns `None` for zero affixes.
pub fn overlay_for<'a>(
    affixes: &[&'a AffixDef],
    item: &Item,
    base: &BasePropsCache,
) -> Option<(IconKey, &'a AffixDef)> {
    if affixes.is_empty() {
        return None;
    }

    let marker = affixes
        .iter()
        .find(|def| def.is_deadly(item, base))
        .or_else(|| {
            affixes.iter().max_by(|a, b| {
                a.real_cost(item, base)
                    .partial_cmp(&b.real_cost(item, base))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        })?;

    let tex_part = if marker.is_deadly(item, base) {
        "Deadly".to_string()
    } else {
        format!("{}Affix", affixes.len())
    };

    Some((
        IconKey { tex_part, color: marker.label_color(item, base).to_string() },
        *marker,
    ))
}
