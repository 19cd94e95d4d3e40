//! Benchmarks pour l'évaluation MRE

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geo::{polygon, LineString};
use mre::{evaluate, DiscrepancyZone, EvaluatorConfig, ReferenceLine};

/// Bande de zones alignées le long d'une ligne en dents de scie
fn synthetic_layers(zones: usize) -> (Vec<ReferenceLine>, Vec<DiscrepancyZone>) {
    let coords: Vec<(f64, f64)> = (0..=zones * 4)
        .map(|i| (i as f64 * 5.0, if i % 2 == 0 { 0.0 } else { 0.3 }))
        .collect();
    let lines = coords
        .chunks(64)
        .enumerate()
        .filter(|(_, chunk)| chunk.len() >= 2)
        .map(|(i, chunk)| ReferenceLine::from_line_string(i.to_string(), LineString::from(chunk.to_vec())))
        .collect();

    let polygons = (0..zones)
        .map(|i| {
            let x0 = i as f64 * 20.0;
            let h = 0.5 + (i % 7) as f64 * 0.1;
            DiscrepancyZone::from_polygon(
                i.to_string(),
                polygon![
                    (x: x0, y: -0.1),
                    (x: x0 + 18.0, y: -0.1),
                    (x: x0 + 18.0, y: h),
                    (x: x0, y: h),
                ],
            )
        })
        .collect();

    (lines, polygons)
}

fn bench_evaluate(c: &mut Criterion) {
    let config = EvaluatorConfig::default();
    let mut group = c.benchmark_group("evaluate");

    for zones in [10usize, 100, 1_000] {
        let (lines, polygons) = synthetic_layers(zones);
        group.throughput(Throughput::Elements(zones as u64));
        group.bench_with_input(BenchmarkId::from_parameter(zones), &zones, |b, _| {
            b.iter(|| {
                let evaluation = evaluate(black_box(&lines), black_box(&polygons), &config).unwrap();
                black_box(evaluation)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
