#![deny(missing_docs)]
#![doc = "Detection of occupied (particle number, spin) sectors in dense complex wavefunctions."]

/// Sector scan kernels and the configurable detector front end.
pub mod detect;
/// Occupancy grid over (particle number, spin shift) cells.
pub mod map;
/// Serializable sector listings and JSON helpers.
pub mod report;
/// Address composition rules for linear encoders.
pub mod rule;
/// Borrowed alpha/beta address and occupation tables.
pub mod tables;

pub use detect::{detect, detect_checked, detect_reference, Detector};
pub use map::{Sector, SectorMap};
pub use report::{from_json, to_json, SectorReport};
pub use rule::{AddressRule, OffsetRule, XorRule};
pub use tables::{OccupationTable, SectorTables, Spin, SpinTable};
