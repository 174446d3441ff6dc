use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;

use neolab::{
    catalog::{mpcorb_reader::parse_mpcorb, NeoRecord},
    ephemeris::{geometry::ephemeris_table, mean_earth::MeanEarthEphemeris},
    hg_app_mag,
};

const SAMPLE: &str = include_str!("../tests/data/nea_sample.txt");

/// Sample catalog spread over the mean anomaly to get `n` distinct objects.
fn synthetic_catalog(n: usize) -> Vec<NeoRecord> {
    let base = parse_mpcorb(SAMPLE).expect("sample catalog parses");
    (0..n)
        .map(|i| {
            let mut record = base[i % base.len()].clone();
            record.mean_anomaly = (record.mean_anomaly + 7.3 * i as f64) % 360.0;
            record.designation = format!("{}-{i}", record.designation);
            record
        })
        .collect()
}

fn bench_hg_app_mag(c: &mut Criterion) {
    let geometries: Vec<(Vector3<f64>, Vector3<f64>)> = (0..10_000)
        .map(|i| {
            let t = i as f64 * 1e-3;
            let object = Vector3::new(1.3 * t.cos(), 1.3 * t.sin(), 0.1 * t.sin());
            let earth = Vector3::new((0.3 * t).cos(), (0.3 * t).sin(), 0.0);
            (earth - object, -object)
        })
        .collect();

    c.bench_function("hg_app_mag/10k_geometries", |b| {
        b.iter(|| {
            geometries
                .iter()
                .filter_map(|(to_obs, to_sun)| hg_app_mag(black_box(18.0), to_obs, to_sun, 0.15).ok())
                .sum::<f64>()
        })
    });
}

fn bench_catalog_table(c: &mut Criterion) {
    let epochs: Vec<f64> = (0..30).map(|d| 60800.0 + d as f64).collect();

    c.bench_function("ephemeris_table/1k_objects_30_epochs_mean_earth", |b| {
        b.iter_batched(
            || synthetic_catalog(1_000),
            |catalog| {
                for record in &catalog {
                    let table = ephemeris_table(record, &epochs, &MeanEarthEphemeris);
                    black_box(table.ok());
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_hg_app_mag, bench_catalog_table);
criterion_main!(benches);
