use fqe_core::MagnitudeTest;
use fqe_sector::{detect, detect_reference, SectorMap, SectorTables, SpinTable, XorRule};
use num_complex::Complex64;

const ADDR: [u64; 1] = [0];
const COUNT: [u32; 1] = [0];

fn single_cell(amplitude: Complex64, threshold: f64, magnitude: MagnitudeTest) -> bool {
    let tables = SectorTables::new(
        0,
        SpinTable::new(&ADDR, &COUNT).unwrap(),
        SpinTable::new(&ADDR, &COUNT).unwrap(),
    );
    let map = SectorMap::new(0);
    detect(&[amplitude], threshold, &map, &tables, &XorRule, magnitude);

    let reference = SectorMap::new(0);
    detect_reference(&[amplitude], threshold, &reference, &tables, &XorRule, magnitude);
    assert_eq!(map, reference);
    map.is_occupied(0, 0)
}

#[test]
fn magnitude_equal_to_threshold_is_marked() {
    // |3 + 4i| = 5 exactly
    let amp = Complex64::new(3.0, 4.0);
    assert!(single_cell(amp, 5.0, MagnitudeTest::Modulus));
    assert!(single_cell(amp, 5.0, MagnitudeTest::SquaredModulus));
}

#[test]
fn just_below_threshold_is_skipped() {
    let threshold = 0.5;
    let amp = Complex64::new(0.0, threshold - 1e-12);
    assert!(!single_cell(amp, threshold, MagnitudeTest::Modulus));
    assert!(!single_cell(amp, threshold, MagnitudeTest::SquaredModulus));
}

#[test]
fn just_above_threshold_is_marked() {
    let threshold = 0.5;
    let amp = Complex64::new(-(threshold + 1e-12), 0.0);
    assert!(single_cell(amp, threshold, MagnitudeTest::Modulus));
    assert!(single_cell(amp, threshold, MagnitudeTest::SquaredModulus));
}

#[test]
fn uses_complex_modulus_not_components() {
    // each component is below the threshold, the modulus is not
    let amp = Complex64::new(0.4, 0.4);
    assert!(single_cell(amp, 0.5, MagnitudeTest::Modulus));
    assert!(!single_cell(Complex64::new(0.3, 0.3), 0.5, MagnitudeTest::Modulus));
}

#[test]
fn zero_amplitude_marked_only_at_zero_threshold() {
    let zero = Complex64::new(0.0, 0.0);
    assert!(single_cell(zero, 0.0, MagnitudeTest::Modulus));
    assert!(!single_cell(zero, f64::MIN_POSITIVE, MagnitudeTest::Modulus));
}
