//! Benchmark the FACTORY LP solver on randomly generated recipe chains.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use factory_belts_core::factory::request::{Limits, MachineSpec, RecipeEntry, Target};
use factory_belts_core::factory::{solve_factory, FactoryRequest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Build a linear recipe chain `raw -> item_0 -> item_1 -> ... -> target`
/// of the given length, with random craft times and ratios, each step on
/// its own machine class of one of three rotating base speeds.
fn chain_request(length: usize, seed: u64) -> FactoryRequest {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut recipes = BTreeMap::new();
    let mut machines = BTreeMap::new();

    let item = |i: usize| if i == 0 { "ore".to_string() } else { format!("item_{i}") };

    for i in 0..length {
        let mut inputs = BTreeMap::new();
        inputs.insert(item(i), rng.gen_range(1.0..3.0));
        let mut outputs = BTreeMap::new();
        outputs.insert(item(i + 1), 1.0);

        let class = format!("class_{}", i % 3);
        machines.entry(class.clone()).or_insert(MachineSpec { crafts_per_min: 60.0 });

        recipes.insert(
            format!("step_{i}"),
            RecipeEntry {
                machine: class,
                time_s: rng.gen_range(1.0..5.0),
                inputs,
                outputs,
            },
        );
    }

    FactoryRequest {
        machines,
        recipes,
        modules: BTreeMap::new(),
        limits: Limits {
            raw_supply_per_min: [("ore".to_string(), 10_000.0)].into_iter().collect(),
            max_machines: BTreeMap::new(),
        },
        target: Target {
            item: item(length),
            rate_per_min: 20.0,
        },
    }
}

fn bench_factory(c: &mut Criterion) {
    let mut group = c.benchmark_group("factory_solve");
    for &length in &[3usize, 8, 20] {
        let req = chain_request(length, 7);
        group.bench_with_input(BenchmarkId::new("chain", length), &req, |b, req| {
            b.iter(|| black_box(solve_factory(req)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_factory);
criterion_main!(benches);
</content>
</invoke>
