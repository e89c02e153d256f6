//! Runtime settings selecting how the sector kernels execute.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FqeError};

/// Widest orbital count representable by a 64-bit occupation string.
pub const GLOBAL_MAX_NORB: usize = 64;

/// Available implementations of the sector scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CodePath {
    /// Data-parallel scan over alpha strings on a rayon pool.
    #[default]
    Accelerated,
    /// Single-threaded scan, useful as an oracle.
    Reference,
}

/// Amplitude magnitude test applied against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MagnitudeTest {
    /// Exact complex modulus `|z| < threshold` skips the amplitude.
    #[default]
    Modulus,
    /// `re² + im² < threshold²` skips the amplitude.
    ///
    /// Avoids the square root but may disagree with [`MagnitudeTest::Modulus`]
    /// for amplitudes whose modulus rounds onto the threshold.
    SquaredModulus,
}

impl MagnitudeTest {
    /// Returns the value compared against amplitudes for a given threshold.
    pub fn bound(self, threshold: f64) -> f64 {
        match self {
            MagnitudeTest::Modulus => threshold,
            MagnitudeTest::SquaredModulus => threshold * threshold,
        }
    }
}

/// YAML-configurable execution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Which scan implementation to run.
    #[serde(default)]
    pub code_path: CodePath,
    /// Dedicated worker count; `None` runs on the caller's ambient rayon pool.
    #[serde(default)]
    pub num_threads: Option<usize>,
    /// Magnitude comparison rule.
    #[serde(default)]
    pub magnitude: MagnitudeTest,
}

impl Settings {
    /// Parses settings from a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, FqeError> {
        let settings: Settings = serde_yaml::from_str(contents)
            .map_err(|err| FqeError::Serde(ErrorInfo::new("yaml-deserialize", err.to_string())))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a YAML file on disk.
    pub fn from_path(path: &Path) -> Result<Self, FqeError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            FqeError::Config(
                ErrorInfo::new("settings-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Rejects settings that cannot describe a runnable configuration.
    pub fn validate(&self) -> Result<(), FqeError> {
        if self.num_threads == Some(0) {
            let info = ErrorInfo::new("zero-threads", "num_threads must be at least 1")
                .with_hint("omit num_threads to use the ambient rayon pool");
            return Err(FqeError::Config(info));
        }
        Ok(())
    }

    /// Settings selecting the single-threaded scan.
    pub fn reference() -> Self {
        Self {
            code_path: CodePath::Reference,
            ..Self::default()
        }
    }
}
