#![allow(dead_code)]

use fqe_core::RngHandle;
use fqe_sector::{OccupationTable, SectorMap, Spin};
use num_complex::Complex64;

/// Full alpha/beta tables over every occupation string of `norb` orbitals.
pub struct Fixture {
    pub norb: usize,
    pub alpha: OccupationTable,
    pub beta: OccupationTable,
    pub alpha_strings: Vec<u64>,
    pub beta_strings: Vec<u64>,
}

impl Fixture {
    pub fn all_strings(norb: usize) -> Self {
        let strings: Vec<u64> = (0..1u64 << norb).collect();
        Self::from_strings(norb, strings.clone(), strings)
    }

    pub fn from_strings(norb: usize, alpha_strings: Vec<u64>, beta_strings: Vec<u64>) -> Self {
        let alpha = OccupationTable::from_strings(norb, Spin::Alpha, &alpha_strings).unwrap();
        let beta = OccupationTable::from_strings(norb, Spin::Beta, &beta_strings).unwrap();
        Self {
            norb,
            alpha,
            beta,
            alpha_strings,
            beta_strings,
        }
    }

    pub fn dim(&self) -> usize {
        1usize << (2 * self.norb)
    }
}

/// Sparse random wavefunction of length `dim`; each amplitude is non-zero with probability `fill`.
pub fn random_state(dim: usize, fill: f64, seed: u64) -> Vec<Complex64> {
    let mut rng = RngHandle::from_seed(seed);
    (0..dim)
        .map(|_| {
            if rng.chance(fill) {
                Complex64::new(rng.signed_unit(), rng.signed_unit())
            } else {
                Complex64::new(0.0, 0.0)
            }
        })
        .collect()
}

/// Straight-line oracle for the occupancy grid.
pub fn expected_map(fixture: &Fixture, state: &[Complex64], threshold: f64) -> SectorMap {
    let map = SectorMap::new(fixture.norb);
    let alpha = fixture.alpha.view();
    let beta = fixture.beta.view();
    for i in 0..alpha.len() {
        for j in 0..beta.len() {
            let addr = (alpha.addrs()[i] ^ beta.addrs()[j]) as usize;
            if state[addr].norm() >= threshold {
                let na = alpha.counts()[i] as usize;
                let nb = beta.counts()[j] as usize;
                map.mark(na + nb, na + fixture.norb - nb);
            }
        }
    }
    map
}
