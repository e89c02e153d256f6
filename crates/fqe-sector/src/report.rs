use fqe_core::{ErrorInfo, FqeError};
use serde::{Deserialize, Serialize};

use crate::map::{Sector, SectorMap};

/// Sparse listing of the occupied sectors of a [`SectorMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorReport {
    /// Number of spatial orbitals the grid covers.
    pub norb: usize,
    /// Occupied sectors in row-major grid order.
    pub sectors: Vec<Sector>,
}

impl SectorReport {
    /// Lists the occupied sectors of `map`.
    pub fn from_map(map: &SectorMap) -> Self {
        Self {
            norb: map.norb(),
            sectors: map.occupied(),
        }
    }

    /// Rebuilds the dense grid, rejecting sectors that fall outside it.
    pub fn to_map(&self) -> Result<SectorMap, FqeError> {
        let map = SectorMap::try_new(self.norb)?;
        for sector in &self.sectors {
            let (pnum, shift) = sector.cell(self.norb).ok_or_else(|| {
                let info = ErrorInfo::new("sector-out-of-range", "sector lies outside the grid")
                    .with_context("nele", sector.nele)
                    .with_context("sz", sector.sz)
                    .with_context("norb", self.norb);
                FqeError::Serde(info)
            })?;
            map.mark(pnum, shift);
        }
        Ok(map)
    }
}

/// Serializes the occupied sectors of `map` to pretty JSON.
pub fn to_json(map: &SectorMap) -> Result<String, FqeError> {
    serde_json::to_string_pretty(&SectorReport::from_map(map))
        .map_err(|err| FqeError::Serde(ErrorInfo::new("json-serialize", err.to_string())))
}

/// Restores a [`SectorMap`] from JSON written by [`to_json`].
pub fn from_json(data: &str) -> Result<SectorMap, FqeError> {
    let report: SectorReport = serde_json::from_str(data)
        .map_err(|err| FqeError::Serde(ErrorInfo::new("json-deserialize", err.to_string())))?;
    report.to_map()
}
