//! Affix selection
//!
//! Picks 0-4 catalog entries for an item via weighted sampling under the
//! point budget, with exclusivity-group pruning.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{AffixDef, Catalog};
use crate::item::props::BasePropsCache;
use crate::item::Item;

/// Chance each successive affix slot opens (compounded, capped at 4).
const SLOT_CHANCE: f64 = 0.25;
/// Chance the first pick ignores budget-fit weighting entirely.
const FIRST_SLOT_UNIFORM_CHANCE: f32 = 0.90;
/// Chance later picks ignore budget-fit weighting.
const LATER_SLOT_UNIFORM_CHANCE: f32 = 0.10;
/// Cost-distance weighting: `WEIGHT_NUMERATOR / max(|cost - ratio|^WEIGHT_EXPONENT, WEIGHT_FLOOR)`.
/// An entry priced exactly at the per-slot ratio scores ~12; one 2 points
/// away scores ~1. The 1.5 exponent is the canonical tuning.
const WEIGHT_NUMERATOR: f32 = 3.0;
const WEIGHT_EXPONENT: f32 = 1.5;
const WEIGHT_FLOOR: f32 = 0.25;

/// Roll how many affixes an item receives: independent 25% trials,
/// stopping at the first failure or at four. Expected count is about 1.33.
pub fn roll_affix_count(rng: &mut impl Rng) -> usize {
    let mut count = 0;
    for _ in 0..4 {
        if !rng.gen_bool(SLOT_CHANCE) {
            break;
        }
        count += 1;
    }
    count
}

/// Select affixes for an item against a point budget.
///
/// `forced_count` bypasses the count roll (debug spawns). Returns fewer
/// entries than the rolled count when the candidate pool runs dry; an
/// empty catalog yields an empty result, never an error.
pub fn select_affixes<'a>(
    catalog: &'a Catalog,
    item: &Item,
    base: &BasePropsCache,
    budget: i32,
    forced_count: Option<usize>,
    rng: &mut impl Rng,
) -> Vec<&'a AffixDef> {
    let count = forced_count.unwrap_or_else(|| roll_affix_count(rng)).min(4);
    if count == 0 {
        return Vec::new();
    }

    // Baseline of applicable entries; points may swing either way during
    // the loop, so the baseline is only filtered by applicability here.
    let mut pool: Vec<&AffixDef> = catalog
        .defs()
        .iter()
        .filter(|def| def.can_apply(item, base))
        .collect();

    let mut chosen: Vec<&AffixDef> = Vec::with_capacity(count);
    let mut points = budget as f32;

    for slot in 1..=count {
        let Some(pick) = pick_affix(&pool, item, base, slot, count, points, rng) else {
            break;
        };

        points -= pick.real_cost(item, base);
        pool.retain(|def| def.group_name != pick.group_name);
        chosen.push(pick);
    }

    chosen
}

/// Pick one affix for a slot: filter to entries that fit the remaining
/// budget, then choose uniformly or by cost-distance weight. The first
/// slot favors variety (90% uniform); later slots favor budget fit
/// (90% weighted).
fn pick_affix<'a>(
    pool: &[&'a AffixDef],
    item: &Item,
    base: &BasePropsCache,
    slot: usize,
    count: usize,
    points: f32,
    rng: &mut impl Rng,
) -> Option<&'a AffixDef> {
    let remaining_slots = (count - slot + 1) as f32;

    let uniform_chance = if slot == 1 {
        FIRST_SLOT_UNIFORM_CHANCE
    } else {
        LATER_SLOT_UNIFORM_CHANCE
    };
    let uniform = rng.gen::<f32>() < uniform_chance;

    let candidates: Vec<&AffixDef> = pool
        .iter()
        .copied()
        .filter(|def| def.real_cost(item, base) <= points)
        .collect();

    if uniform {
        candidates.choose(rng).copied()
    } else {
        let ratio = (points / remaining_slots).clamp(1.0, 6.0);
        candidates
            .choose_weighted(rng, |def| {
                let distance = (def.real_cost(item, base) - ratio).abs();
                WEIGHT_NUMERATOR / distance.powf(WEIGHT_EXPONENT).max(WEIGHT_FLOOR)
            })
            .ok()
            .copied()
    }
}
