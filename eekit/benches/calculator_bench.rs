use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eekit::calculators::{DividerInput, PowerModule};
use eekit::prelude::*;

fn bench_snap_e24(c: &mut Criterion) {
    c.bench_function("snap_e24", |b| {
        b.iter(|| {
            let mut target = 1.0;
            while target < 1e7 {
                black_box(eekit::snap_e24(black_box(target)));
                target *= 1.07;
            }
        });
    });
}

fn bench_evaluate_divider(c: &mut Criterion) {
    let calc = Calculation::Divider(DividerInput {
        vin: 12.0,
        vout: 3.3,
        r1: 10_000.0,
    });
    c.bench_function("evaluate_divider", |b| {
        b.iter(|| ToolboxCore::evaluate(black_box(&calc)));
    });
}

fn bench_power_budget(c: &mut Criterion) {
    let modules: Vec<PowerModule> = (0..64)
        .map(|i| PowerModule::new(format!("load{}", i), [1.8, 3.3, 5.0][i % 3], 10.0 + i as f64, 50.0))
        .collect();
    let calc = Calculation::PowerBudget {
        modules,
        battery_mah: Some(2000.0),
    };
    c.bench_function("power_budget_64", |b| {
        b.iter(|| ToolboxCore::readings(black_box(&calc)));
    });
}

criterion_group!(benches, bench_snap_e24, bench_evaluate_divider, bench_power_budget);
criterion_main!(benches);
