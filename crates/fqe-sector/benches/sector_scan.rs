use criterion::{criterion_group, criterion_main, Criterion};
use fqe_core::{MagnitudeTest, RngHandle};
use fqe_sector::{detect, detect_reference, OccupationTable, SectorMap, SectorTables, Spin, XorRule};
use num_complex::Complex64;

const NORB: usize = 8;

fn build_state(dim: usize) -> Vec<Complex64> {
    let mut rng = RngHandle::from_seed(101);
    (0..dim)
        .map(|_| {
            if rng.chance(0.05) {
                Complex64::new(rng.signed_unit(), rng.signed_unit())
            } else {
                Complex64::new(0.0, 0.0)
            }
        })
        .collect()
}

fn bench_sector_scan(c: &mut Criterion) {
    let strings: Vec<u64> = (0..1u64 << NORB).collect();
    let alpha = OccupationTable::from_strings(NORB, Spin::Alpha, &strings).unwrap();
    let beta = OccupationTable::from_strings(NORB, Spin::Beta, &strings).unwrap();
    let tables = SectorTables::new(NORB, alpha.view(), beta.view());
    let state = build_state(1 << (2 * NORB));

    c.bench_function("sector_scan_parallel", |b| {
        b.iter(|| {
            let map = SectorMap::new(NORB);
            detect(&state, 0.5, &map, &tables, &XorRule, MagnitudeTest::Modulus);
            map
        })
    });

    c.bench_function("sector_scan_reference", |b| {
        b.iter(|| {
            let map = SectorMap::new(NORB);
            detect_reference(&state, 0.5, &map, &tables, &XorRule, MagnitudeTest::Modulus);
            map
        })
    });

    c.bench_function("sector_scan_squared", |b| {
        b.iter(|| {
            let map = SectorMap::new(NORB);
            detect(&state, 0.5, &map, &tables, &XorRule, MagnitudeTest::SquaredModulus);
            map
        })
    });
}

criterion_group!(benches, bench_sector_scan);
criterion_main!(benches);
