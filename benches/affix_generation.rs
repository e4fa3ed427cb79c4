//! Generation hot-path benchmarks: selection and naming.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use runebrand::catalog::defaults::{default_affix_defs, default_namer_config};
use runebrand::gen::select_affixes;
use runebrand::item::props::BasePropsCache;
use runebrand::naming::resolve_affix_rules;
use runebrand::{Catalog, Item};

fn bench_selection(c: &mut Criterion) {
    let catalog = Catalog::new(default_affix_defs());
    let base = BasePropsCache::new();
    let item = Item::melee("longsword", "longsword");
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("select_affixes", |b| {
        b.iter(|| select_affixes(&catalog, black_box(&item), &base, 8, Some(4), &mut rng))
    });
}

fn bench_naming(c: &mut Criterion) {
    let catalog = Catalog::new(default_affix_defs());
    let config = default_namer_config();
    let defs: Vec<_> = catalog.defs().iter().take(3).collect();
    let mut rng = StdRng::seed_from_u64(2);

    c.bench_function("resolve_affix_rules", |b| {
        b.iter(|| resolve_affix_rules(black_box(&defs), &config, &mut rng))
    });
}

criterion_group!(benches, bench_selection, bench_naming);
criterion_main!(benches);
