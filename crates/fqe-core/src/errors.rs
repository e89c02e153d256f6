//! Error type returned by every fallible sector-kernel entry point.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic carried by an [`FqeError`]: a stable code plus the offending values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case code such as `address-out-of-range`.
    pub code: String,
    /// One-line description of the violated condition.
    pub message: String,
    /// Offending values keyed by name (`alpha_id`, `dim`, `norb`, ...).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Suggested remedy, when one is obvious.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records an offending value under `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Attaches a remedy.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Failure families of the sector kernels.
///
/// The unchecked scans never produce these; only validating entry points,
/// settings loading, serialization and pool construction do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FqeError {
    /// Kernel precondition violations caught by a checked entry point.
    #[error("contract error: {0}")]
    Contract(ErrorInfo),
    /// Invalid runtime settings.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Worker pool and other runtime failures.
    #[error("runtime error: {0}")]
    Runtime(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl FqeError {
    /// Payload regardless of family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FqeError::Contract(info)
            | FqeError::Config(info)
            | FqeError::Serde(info)
            | FqeError::Runtime(info) => info,
        }
    }

    /// Shorthand for a [`FqeError::Contract`] with the given code and message.
    pub fn contract(code: &str, message: &str) -> Self {
        FqeError::Contract(ErrorInfo::new(code, message))
    }
}
