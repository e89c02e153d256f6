use fqe_core::{ErrorInfo, FqeError, GLOBAL_MAX_NORB};

use crate::rule::AddressRule;

/// Address contributions and occupation numbers for one spin species.
#[derive(Debug, Clone, Copy)]
pub struct SpinTable<'a> {
    addrs: &'a [u64],
    counts: &'a [u32],
}

impl<'a> SpinTable<'a> {
    /// Pairs parallel address and count arrays.
    pub fn new(addrs: &'a [u64], counts: &'a [u32]) -> Result<Self, FqeError> {
        if addrs.len() != counts.len() {
            let info = ErrorInfo::new(
                "table-length-mismatch",
                "address and count arrays must have equal length",
            )
            .with_context("addrs_len", addrs.len())
            .with_context("counts_len", counts.len());
            return Err(FqeError::Contract(info));
        }
        Ok(Self { addrs, counts })
    }

    /// Number of strings in the table.
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// Returns true when the table holds no strings.
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Address contribution per string.
    pub fn addrs(&self) -> &'a [u64] {
        self.addrs
    }

    /// Occupation number per string.
    pub fn counts(&self) -> &'a [u32] {
        self.counts
    }
}

/// Alpha and beta tables for a wavefunction over `norb` spatial orbitals.
#[derive(Debug, Clone, Copy)]
pub struct SectorTables<'a> {
    norb: usize,
    alpha: SpinTable<'a>,
    beta: SpinTable<'a>,
}

impl<'a> SectorTables<'a> {
    /// Bundles both species without validating them; see [`SectorTables::validate`].
    pub fn new(norb: usize, alpha: SpinTable<'a>, beta: SpinTable<'a>) -> Self {
        Self { norb, alpha, beta }
    }

    /// Number of spatial orbitals.
    pub fn norb(&self) -> usize {
        self.norb
    }

    /// Alpha species table.
    pub fn alpha(&self) -> SpinTable<'a> {
        self.alpha
    }

    /// Beta species table.
    pub fn beta(&self) -> SpinTable<'a> {
        self.beta
    }

    /// Number of alpha strings.
    pub fn alpha_states(&self) -> usize {
        self.alpha.len()
    }

    /// Number of beta strings.
    pub fn beta_states(&self) -> usize {
        self.beta.len()
    }

    pub(crate) fn counts_within_norb(&self) -> bool {
        let limit = self.norb as u64;
        self.alpha
            .counts()
            .iter()
            .chain(self.beta.counts())
            .all(|&count| u64::from(count) <= limit)
    }

    /// Checks the full encoding contract against a state vector of length `dim`.
    ///
    /// Every occupation number must be at most `norb`, and every composed
    /// address must fall in `[0, dim)` and be distinct from all others.
    pub fn validate<R: AddressRule + ?Sized>(&self, dim: usize, rule: &R) -> Result<(), FqeError> {
        if self.norb > GLOBAL_MAX_NORB {
            let info = ErrorInfo::new("norb-too-large", "orbital count exceeds supported maximum")
                .with_context("norb", self.norb)
                .with_context("max_norb", GLOBAL_MAX_NORB);
            return Err(FqeError::Contract(info));
        }
        check_counts("alpha", self.alpha, self.norb)?;
        check_counts("beta", self.beta, self.norb)?;

        let mut seen = vec![false; dim];
        for (alpha_id, &a_part) in self.alpha.addrs().iter().enumerate() {
            for (beta_id, &b_part) in self.beta.addrs().iter().enumerate() {
                let addr = rule.combine(a_part, b_part);
                let slot = usize::try_from(addr)
                    .ok()
                    .and_then(|idx| seen.get_mut(idx))
                    .ok_or_else(|| {
                        let info = ErrorInfo::new(
                            "address-out-of-range",
                            "composed address lies outside the state vector",
                        )
                        .with_context("alpha_id", alpha_id)
                        .with_context("beta_id", beta_id)
                        .with_context("address", addr)
                        .with_context("dim", dim);
                        FqeError::Contract(info)
                    })?;
                if *slot {
                    let info = ErrorInfo::new(
                        "address-collision",
                        "two string pairs compose to the same address",
                    )
                    .with_context("alpha_id", alpha_id)
                    .with_context("beta_id", beta_id)
                    .with_context("address", addr)
                    .with_hint("the encoder must be injective over alpha/beta pairs");
                    return Err(FqeError::Contract(info));
                }
                *slot = true;
            }
        }
        Ok(())
    }
}

fn check_counts(species: &str, table: SpinTable<'_>, norb: usize) -> Result<(), FqeError> {
    for (idx, &count) in table.counts().iter().enumerate() {
        if count as usize > norb {
            let info = ErrorInfo::new("count-exceeds-norb", "occupation number exceeds norb")
                .with_context("species", species)
                .with_context("index", idx)
                .with_context("count", count)
                .with_context("norb", norb);
            return Err(FqeError::Contract(info));
        }
    }
    Ok(())
}

/// Spin species of an occupation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    /// Spin up; orbital `k` maps to bit `2k`.
    Alpha,
    /// Spin down; orbital `k` maps to bit `2k + 1`.
    Beta,
}

/// Owned table built from raw occupation bitstrings.
///
/// Uses the interleaved Jordan-Wigner layout, which is linear over GF(2) and
/// keeps alpha and beta bits disjoint, so [`XorRule`](crate::rule::XorRule)
/// composes the two halves into a unique index below `4^norb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupationTable {
    addrs: Vec<u64>,
    counts: Vec<u32>,
}

impl OccupationTable {
    /// Builds the table for `strings` of species `spin` over `norb` orbitals.
    pub fn from_strings(norb: usize, spin: Spin, strings: &[u64]) -> Result<Self, FqeError> {
        if norb > (u64::BITS / 2) as usize {
            let info = ErrorInfo::new(
                "norb-too-large",
                "interleaved addresses need 2*norb bits to fit in 64",
            )
            .with_context("norb", norb);
            return Err(FqeError::Contract(info));
        }
        let offset = match spin {
            Spin::Alpha => 0,
            Spin::Beta => 1,
        };
        let mut addrs = Vec::with_capacity(strings.len());
        let mut counts = Vec::with_capacity(strings.len());
        for (idx, &string) in strings.iter().enumerate() {
            if string >> norb != 0 {
                let info = ErrorInfo::new("string-out-of-range", "string occupies orbitals >= norb")
                    .with_context("index", idx)
                    .with_context("string", string)
                    .with_context("norb", norb);
                return Err(FqeError::Contract(info));
            }
            let addr = (0..norb)
                .filter(|orb| string >> orb & 1 == 1)
                .fold(0u64, |acc, orb| acc | 1 << (2 * orb + offset));
            addrs.push(addr);
            counts.push(string.count_ones());
        }
        Ok(Self { addrs, counts })
    }

    /// Borrows the table for use with [`SectorTables`].
    pub fn view(&self) -> SpinTable<'_> {
        SpinTable {
            addrs: &self.addrs,
            counts: &self.counts,
        }
    }
}
