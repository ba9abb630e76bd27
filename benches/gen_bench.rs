use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::Path;

use corebind::config::{CoreSpec, GlobalConfig};
use corebind::ident::CoreId;
use corebind::pipeline::generate;
use corebind::topology::{ring_connections, Topology};

// KPI-aligned benchmark scenarios: fixture parse + generate, and generation
// scaling over ring sizes.

fn load_fixture(name: &str) -> String {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let path = manifest_dir.parent().unwrap().join("configs").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}

/// Scaling setup used for the generation scalability KPI: a ring of
/// `num_cores` identical cores.
fn ring_setup(num_cores: u32) -> (GlobalConfig, Vec<CoreSpec>, Topology) {
    let global = GlobalConfig {
        project_name: "bench-array".to_string(),
        project_version: "0.0.0".to_string(),
        num_cores,
        word_width: 32,
        data_mem_size: 16384,
        task_cache_depth: 16,
        topology_kind: "ring".to_string(),
    };
    let cores = (0..num_cores)
        .map(|id| CoreSpec {
            id: CoreId(id),
            isa: "RV32IMC".to_string(),
        })
        .collect();
    let topology =
        Topology::build("ring", num_cores, &ring_connections(num_cores)).expect("valid ring");
    (global, cores, topology)
}

fn bench_fixture_end_to_end(c: &mut Criterion) {
    let source = load_fixture("default.json");
    c.bench_function("fixture_parse_and_generate", |b| {
        b.iter(|| {
            let loaded = corebind::config::parse(black_box(&source)).unwrap();
            let topology = Topology::build(
                loaded.global.topology_kind.clone(),
                loaded.global.num_cores,
                &loaded.connections,
            )
            .unwrap();
            let top = generate(&loaded.global, &loaded.cores, &topology).unwrap();
            black_box(top.verilog.len())
        })
    });
}

fn bench_generation_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_ring");
    for &n in &[4u32, 8, 16, 32, 64] {
        let (global, cores, topology) = ring_setup(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let top = generate(
                    black_box(&global),
                    black_box(&cores),
                    black_box(&topology),
                )
                .unwrap();
                black_box(top.verilog.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fixture_end_to_end, bench_generation_scaling);
criterion_main!(benches);
