//! Benchmarks for the allocation engine.
//!
//! - Allocate and release against fleets of increasing size
//! - Tick throughput with many running tasks
//! - Product pipelines advancing under contention

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use robotic_cell::core::{try_allocate, Fleet, RoboticCell, StageSpec};
use robotic_cell::util::ResourceKind;

fn fleet(robots: usize, workers: usize) -> Fleet {
    let mut fleet = Fleet::new();
    for i in 0..robots {
        fleet.registry_mut(ResourceKind::Robot).add(&format!("r{i}")).unwrap();
    }
    for i in 0..workers {
        fleet.registry_mut(ResourceKind::Worker).add(&format!("w{i}")).unwrap();
    }
    fleet
}

fn cell(robots: usize, workers: usize) -> RoboticCell {
    let cell = RoboticCell::new();
    for i in 0..robots {
        cell.add_resource(ResourceKind::Robot, &format!("r{i}")).unwrap();
    }
    for i in 0..workers {
        cell.add_resource(ResourceKind::Worker, &format!("w{i}")).unwrap();
    }
    cell
}

fn bench_allocate_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocator");
    for size in [8, 64, 512] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("allocate_release", size), &size, |b, &size| {
            let mut fleet = fleet(size, size);
            b.iter(|| {
                let allocation = try_allocate(&mut fleet, size / 2, size / 4).unwrap();
                robotic_cell::core::allocator::release(&mut fleet, black_box(&allocation))
                    .unwrap();
            });
        });
        group.bench_with_input(BenchmarkId::new("rejected", size), &size, |b, &size| {
            let mut fleet = fleet(size, size);
            b.iter(|| black_box(try_allocate(&mut fleet, size + 1, 0)).is_err());
        });
    }
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for tasks in [16, 256] {
        group.throughput(Throughput::Elements(tasks as u64));
        group.bench_with_input(BenchmarkId::new("running_tasks", tasks), &tasks, |b, &tasks| {
            let cell = cell(tasks, 0);
            b.iter(|| {
                while cell.assign_task("weld", 1, 0, 3).is_ok() {}
                black_box(cell.tick());
            });
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    c.bench_function("pipeline/contended_products", |b| {
        b.iter(|| {
            let cell = cell(4, 4);
            for _ in 0..16 {
                cell.define_product(
                    "gear",
                    vec![
                        StageSpec::new("cut", 2, 0, 1),
                        StageSpec::new("weld", 1, 1, 2),
                        StageSpec::new("check", 0, 2, 1),
                    ],
                )
                .unwrap();
            }
            for _ in 0..64 {
                black_box(cell.tick());
            }
        });
    });
}

criterion_group!(benches, bench_allocate_release, bench_tick, bench_pipeline);
criterion_main!(benches);
