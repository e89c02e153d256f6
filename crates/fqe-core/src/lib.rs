#![deny(missing_docs)]
#![doc = "Core error, settings and seeding types shared by the FQE sector kernels."]

pub mod errors;
pub mod rng;
pub mod settings;

pub use errors::{ErrorInfo, FqeError};
pub use rng::{derive_substream_seed, RngHandle};
pub use settings::{CodePath, MagnitudeTest, Settings, GLOBAL_MAX_NORB};
