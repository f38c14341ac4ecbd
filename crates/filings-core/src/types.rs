//! Core data types shared across the workspace.
//!
//! - [`Symbol`] - Company ticker or CIK
//! - [`RatioKind`] - The financial ratios the workspace computes
//! - [`RatioResult`] - One ratio value for one reporting period

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A company identifier: a ticker symbol or a CIK.
///
/// Symbols are trimmed and uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A financial ratio computed per reporting period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatioKind {
    /// Current assets over current liabilities.
    CurrentRatio,
    /// Net income over total assets.
    ReturnOnAssets,
    /// Operating cash flow over current liabilities.
    OperatingCashFlowRatio,
}

impl RatioKind {
    /// Returns the display name of the ratio.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CurrentRatio => "Current Ratio",
            Self::ReturnOnAssets => "Return on Assets",
            Self::OperatingCashFlowRatio => "Operating Cash Flow Ratio",
        }
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One ratio value for one reporting period.
///
/// A zero denominator is reported as `f64::INFINITY` rather than an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    /// Which ratio this is.
    pub kind: RatioKind,
    /// Period identifier the value belongs to.
    pub period: String,
    /// The computed value.
    pub value: f64,
}

impl RatioResult {
    /// Creates a new ratio result.
    #[must_use]
    pub fn new(kind: RatioKind, period: impl Into<String>, value: f64) -> Self {
        Self {
            kind,
            period: period.into(),
            value,
        }
    }

    /// Returns the display name of the ratio.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }
}
