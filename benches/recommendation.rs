// Micro-benchmarks for the two hot scan paths: recommendation scoring
// and the nearest-station sweep, both over the bundled catalog.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ev_advisor_rust::data::Catalog;
use ev_advisor_rust::geo::nearest_stations;
use ev_advisor_rust::scorer::{recommend, Priority, ScoringPolicy, UserProfile};

fn bench_recommend(c: &mut Criterion) {
    let catalog = Catalog::bundled().expect("bundled catalog must parse");
    let policy = ScoringPolicy::default();
    let profile = UserProfile {
        budget: 20_000_000,
        daily_km: 50.0,
        priorities: vec![Priority::Range, Priority::Charging, Priority::Space],
        usage: None,
    };

    c.bench_function("recommend_top3", |b| {
        b.iter(|| recommend(black_box(&profile), catalog.vehicles(), &policy, 3))
    });
}

fn bench_nearest_stations(c: &mut Criterion) {
    let catalog = Catalog::bundled().expect("bundled catalog must parse");

    c.bench_function("nearest_stations_colombo", |b| {
        b.iter(|| {
            nearest_stations(
                black_box(6.9271),
                black_box(79.8612),
                catalog.stations(),
                5,
            )
        })
    });
}

criterion_group!(benches, bench_recommend, bench_nearest_stations);
criterion_main!(benches);
