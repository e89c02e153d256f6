use fqe_core::{CodePath, ErrorInfo, FqeError, MagnitudeTest, Settings};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::map::SectorMap;
use crate::rule::AddressRule;
use crate::tables::{SectorTables, SpinTable};

/// Marks every sector holding an amplitude whose magnitude is not below `threshold`.
///
/// Alpha strings are split into equal contiguous chunks, one per worker of
/// the current rayon pool; each worker walks all beta strings for its rows.
/// Marks are idempotent constant stores, so the result does not depend on the
/// partitioning. Existing marks in `sectors` are kept.
///
/// The caller guarantees the encoding contract (see
/// [`SectorTables::validate`]); it is only asserted in debug builds. A
/// composed address outside `state` panics.
pub fn detect<R: AddressRule + ?Sized>(
    state: &[Complex64],
    threshold: f64,
    sectors: &SectorMap,
    tables: &SectorTables<'_>,
    rule: &R,
    magnitude: MagnitudeTest,
) {
    debug_assert_contract(threshold, sectors, tables);
    let alpha = tables.alpha();
    if alpha.is_empty() {
        return;
    }
    let workers = rayon::current_num_threads().max(1);
    let chunk = alpha.len().div_ceil(workers);
    let bound = magnitude.bound(threshold);

    alpha
        .addrs()
        .par_chunks(chunk)
        .zip(alpha.counts().par_chunks(chunk))
        .for_each(|(addrs, counts)| {
            tracing::trace!(rows = addrs.len(), "scanning alpha chunk");
            scan_rows(
                state,
                bound,
                magnitude,
                sectors,
                tables.norb(),
                addrs,
                counts,
                tables.beta(),
                rule,
            );
        });
}

/// Single-threaded variant of [`detect`] with identical results.
pub fn detect_reference<R: AddressRule + ?Sized>(
    state: &[Complex64],
    threshold: f64,
    sectors: &SectorMap,
    tables: &SectorTables<'_>,
    rule: &R,
    magnitude: MagnitudeTest,
) {
    debug_assert_contract(threshold, sectors, tables);
    let alpha = tables.alpha();
    scan_rows(
        state,
        magnitude.bound(threshold),
        magnitude,
        sectors,
        tables.norb(),
        alpha.addrs(),
        alpha.counts(),
        tables.beta(),
        rule,
    );
}

/// Validates every precondition, then runs the default accelerated scan.
pub fn detect_checked<R: AddressRule + ?Sized>(
    state: &[Complex64],
    threshold: f64,
    sectors: &SectorMap,
    tables: &SectorTables<'_>,
    rule: &R,
) -> Result<(), FqeError> {
    Detector::new().run_checked(state, threshold, sectors, tables, rule)
}

#[allow(clippy::too_many_arguments)]
#[inline]
fn scan_rows<R: AddressRule + ?Sized>(
    state: &[Complex64],
    bound: f64,
    magnitude: MagnitudeTest,
    sectors: &SectorMap,
    norb: usize,
    alpha_addrs: &[u64],
    alpha_counts: &[u32],
    beta: SpinTable<'_>,
    rule: &R,
) {
    for (&a_part, &a_num) in alpha_addrs.iter().zip(alpha_counts) {
        let a_num = a_num as usize;
        for (&b_part, &b_num) in beta.addrs().iter().zip(beta.counts()) {
            let amp = state[rule.combine(a_part, b_part) as usize];
            if below(amp, bound, magnitude) {
                continue;
            }
            let b_num = b_num as usize;
            sectors.mark(a_num + b_num, a_num + norb - b_num);
        }
    }
}

#[inline]
fn below(amp: Complex64, bound: f64, magnitude: MagnitudeTest) -> bool {
    match magnitude {
        MagnitudeTest::Modulus => amp.norm() < bound,
        MagnitudeTest::SquaredModulus => amp.norm_sqr() < bound,
    }
}

fn debug_assert_contract(threshold: f64, sectors: &SectorMap, tables: &SectorTables<'_>) {
    debug_assert!(threshold >= 0.0, "threshold must be non-negative");
    debug_assert_eq!(sectors.norb(), tables.norb(), "sector map sized for another norb");
    debug_assert!(tables.counts_within_norb(), "occupation number exceeds norb");
}

/// Settings-driven front end over the sector scans.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    settings: Settings,
}

impl Detector {
    /// Detector with default settings (accelerated, ambient pool, exact modulus).
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector using the supplied settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    /// Active settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the configured scan without checking the encoding contract.
    pub fn run<R: AddressRule + ?Sized>(
        &self,
        state: &[Complex64],
        threshold: f64,
        sectors: &SectorMap,
        tables: &SectorTables<'_>,
        rule: &R,
    ) -> Result<(), FqeError> {
        self.settings.validate()?;
        let magnitude = self.settings.magnitude;
        tracing::debug!(
            code_path = ?self.settings.code_path,
            num_threads = ?self.settings.num_threads,
            dim = state.len(),
            alpha_states = tables.alpha_states(),
            beta_states = tables.beta_states(),
            threshold,
            "sector scan"
        );

        match (self.settings.code_path, self.settings.num_threads) {
            (CodePath::Reference, _) => {
                detect_reference(state, threshold, sectors, tables, rule, magnitude)
            }
            (CodePath::Accelerated, None) => {
                detect(state, threshold, sectors, tables, rule, magnitude)
            }
            (CodePath::Accelerated, Some(threads)) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|err| {
                        FqeError::Runtime(
                            ErrorInfo::new("thread-pool", err.to_string())
                                .with_context("num_threads", threads),
                        )
                    })?;
                pool.install(|| detect(state, threshold, sectors, tables, rule, magnitude));
            }
        }

        tracing::debug!(occupied = sectors.count_occupied(), "sector scan complete");
        Ok(())
    }

    /// Checks every precondition of the scan before running it.
    ///
    /// On failure the map is left untouched.
    pub fn run_checked<R: AddressRule + ?Sized>(
        &self,
        state: &[Complex64],
        threshold: f64,
        sectors: &SectorMap,
        tables: &SectorTables<'_>,
        rule: &R,
    ) -> Result<(), FqeError> {
        if let Err(err) = check_contract(state, threshold, sectors, tables, rule) {
            tracing::warn!(error = %err, "rejected sector scan inputs");
            return Err(err);
        }
        self.run(state, threshold, sectors, tables, rule)
    }
}

fn check_contract<R: AddressRule + ?Sized>(
    state: &[Complex64],
    threshold: f64,
    sectors: &SectorMap,
    tables: &SectorTables<'_>,
    rule: &R,
) -> Result<(), FqeError> {
    // also rejects NaN; +inf is allowed and marks only infinite amplitudes
    if !(threshold >= 0.0) {
        let info = ErrorInfo::new("invalid-threshold", "threshold must be non-negative")
            .with_context("threshold", threshold);
        return Err(FqeError::Contract(info));
    }
    if sectors.norb() != tables.norb() {
        let info = ErrorInfo::new("map-shape-mismatch", "sector map sized for another norb")
            .with_context("map_norb", sectors.norb())
            .with_context("tables_norb", tables.norb());
        return Err(FqeError::Contract(info));
    }
    tables.validate(state.len(), rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_amplitude_is_never_below() {
        let nan = Complex64::new(f64::NAN, 0.0);
        assert!(!below(nan, 0.5, MagnitudeTest::Modulus));
        assert!(!below(nan, 0.25, MagnitudeTest::SquaredModulus));
    }

    #[test]
    fn infinite_component_is_never_below() {
        let inf = Complex64::new(0.0, f64::INFINITY);
        assert!(!below(inf, f64::MAX, MagnitudeTest::Modulus));
    }
}
