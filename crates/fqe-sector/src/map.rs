use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use fqe_core::{ErrorInfo, FqeError, GLOBAL_MAX_NORB};
use serde::{Deserialize, Serialize};

/// One symmetry sector: total particle number and spin projection.
///
/// `sz` is `n_alpha - n_beta`, i.e. twice the spin projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sector {
    /// Total number of electrons.
    pub nele: usize,
    /// Alpha minus beta electron count.
    pub sz: i64,
}

impl Sector {
    /// Decodes the sector addressed by grid cell `(pnum, shift)`.
    pub fn from_cell(pnum: usize, shift: usize, norb: usize) -> Self {
        Self {
            nele: pnum,
            sz: shift as i64 - norb as i64,
        }
    }

    /// Grid cell `(pnum, shift)` for this sector, if it fits a grid over `norb` orbitals.
    pub fn cell(&self, norb: usize) -> Option<(usize, usize)> {
        let norb_shift = i64::try_from(norb).ok()?;
        let shift = usize::try_from(self.sz.checked_add(norb_shift)?).ok()?;
        let width = norb.checked_mul(2)?.checked_add(1)?;
        (self.nele < width && shift < width).then_some((self.nele, shift))
    }
}

/// Row-major occupancy grid of shape `(2*norb+1) x (2*norb+1)`.
///
/// Rows are indexed by particle number, columns by spin shift
/// `n_alpha - n_beta + norb`. Cells only ever go from 0 to 1 through
/// [`SectorMap::mark`]; concurrent marks are relaxed atomic stores of the
/// same constant, so any interleaving leaves the same bit pattern.
pub struct SectorMap {
    norb: usize,
    cells: Box<[AtomicU8]>,
}

impl SectorMap {
    /// Allocates an all-empty grid for `norb` orbitals.
    ///
    /// Panics if the grid size overflows `usize`; use [`SectorMap::try_new`]
    /// for untrusted orbital counts.
    pub fn new(norb: usize) -> Self {
        let width = 2 * norb + 1;
        let cells = (0..width * width).map(|_| AtomicU8::new(0)).collect();
        Self { norb, cells }
    }

    /// Allocates an all-empty grid, rejecting `norb > GLOBAL_MAX_NORB`.
    pub fn try_new(norb: usize) -> Result<Self, FqeError> {
        check_norb(norb)?;
        Ok(Self::new(norb))
    }

    /// Rebuilds a grid from a row-major flag buffer (non-zero means occupied).
    pub fn from_flags(norb: usize, flags: &[u8]) -> Result<Self, FqeError> {
        check_norb(norb)?;
        let width = 2 * norb + 1;
        if flags.len() != width * width {
            let info = ErrorInfo::new("map-shape-mismatch", "flag buffer has wrong size")
                .with_context("norb", norb)
                .with_context("expected", width * width)
                .with_context("actual", flags.len());
            return Err(FqeError::Contract(info));
        }
        let cells = flags
            .iter()
            .map(|&flag| AtomicU8::new(u8::from(flag != 0)))
            .collect();
        Ok(Self { norb, cells })
    }

    /// Number of spatial orbitals the grid was sized for.
    pub fn norb(&self) -> usize {
        self.norb
    }

    /// Row width `2*norb + 1`.
    pub fn leading_dim(&self) -> usize {
        2 * self.norb + 1
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Marks cell `(pnum, shift)` as occupied.
    ///
    /// Panics if the cell lies outside the grid.
    #[inline]
    pub fn mark(&self, pnum: usize, shift: usize) {
        self.cells[pnum * self.leading_dim() + shift].store(1, Ordering::Relaxed);
    }

    /// Returns whether cell `(pnum, shift)` is occupied; false outside the grid.
    pub fn is_occupied(&self, pnum: usize, shift: usize) -> bool {
        let width = self.leading_dim();
        if pnum >= width || shift >= width {
            return false;
        }
        self.cells[pnum * width + shift].load(Ordering::Relaxed) != 0
    }

    /// Whether `sector` is occupied.
    pub fn contains(&self, sector: Sector) -> bool {
        sector
            .cell(self.norb)
            .is_some_and(|(pnum, shift)| self.is_occupied(pnum, shift))
    }

    /// Row-major copy of the grid, one byte per cell.
    pub fn to_flags(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed))
            .collect()
    }

    /// Occupied sectors in row-major order.
    pub fn occupied(&self) -> Vec<Sector> {
        let width = self.leading_dim();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.load(Ordering::Relaxed) != 0)
            .map(|(idx, _)| Sector::from_cell(idx / width, idx % width, self.norb))
            .collect()
    }

    /// Number of occupied cells.
    pub fn count_occupied(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.load(Ordering::Relaxed) != 0)
            .count()
    }

    /// Resets every cell to empty.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell.get_mut() = 0;
        }
    }
}

fn check_norb(norb: usize) -> Result<(), FqeError> {
    if norb > GLOBAL_MAX_NORB {
        let info = ErrorInfo::new("norb-too-large", "orbital count exceeds supported maximum")
            .with_context("norb", norb)
            .with_context("max_norb", GLOBAL_MAX_NORB);
        return Err(FqeError::Contract(info));
    }
    Ok(())
}

impl Clone for SectorMap {
    fn clone(&self) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|cell| AtomicU8::new(cell.load(Ordering::Relaxed)))
            .collect();
        Self {
            norb: self.norb,
            cells,
        }
    }
}

impl PartialEq for SectorMap {
    fn eq(&self, other: &Self) -> bool {
        self.norb == other.norb && self.to_flags() == other.to_flags()
    }
}

impl Eq for SectorMap {}

impl fmt::Debug for SectorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectorMap")
            .field("norb", &self.norb)
            .field("occupied", &self.occupied())
            .finish()
    }
}
