//! SEC filing type definitions.
//!
//! This module defines [`FilingType`], the annual/quarterly selector used when
//! asking a provider for a company's latest filing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FilingsError;

/// Type of periodic report filed with the SEC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingType {
    /// Annual report (Form 10-K).
    #[default]
    Annual,
    /// Quarterly report (Form 10-Q).
    Quarterly,
}

impl FilingType {
    /// Returns the SEC form name for this filing type.
    #[must_use]
    pub const fn form(&self) -> &'static str {
        match self {
            Self::Annual => "10-K",
            Self::Quarterly => "10-Q",
        }
    }

    /// Maps an SEC form name back to a filing type.
    ///
    /// Only the two periodic forms are recognised; amendments and other forms
    /// return `None`.
    #[must_use]
    pub fn from_form(form: &str) -> Option<Self> {
        match form {
            "10-K" => Some(Self::Annual),
            "10-Q" => Some(Self::Quarterly),
            _ => None,
        }
    }
}

impl fmt::Display for FilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form())
    }
}

impl FromStr for FilingType {
    type Err = FilingsError;

    /// Accepts the short and long spellings a user would type: `k`, `10-k`,
    /// `10k`, `annual` and their quarterly counterparts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "k" | "10-k" | "10k" | "annual" => Ok(Self::Annual),
            "q" | "10-q" | "10q" | "quarterly" => Ok(Self::Quarterly),
            other => Err(FilingsError::InvalidParameter(format!(
                "unknown filing type '{other}', expected 'k' (annual) or 'q' (quarterly)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spellings() {
        for s in ["k", "K", "10-K", "10k", "annual", " Annual "] {
            assert_eq!(s.parse::<FilingType>().unwrap(), FilingType::Annual, "{s}");
        }
        for s in ["q", "10-q", "10Q", "quarterly"] {
            assert_eq!(s.parse::<FilingType>().unwrap(), FilingType::Quarterly, "{s}");
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            "8-k".parse::<FilingType>(),
            Err(FilingsError::InvalidParameter(_))
        ));
        assert!("".parse::<FilingType>().is_err());
    }

    #[test]
    fn test_form_names() {
        assert_eq!(FilingType::Annual.form(), "10-K");
        assert_eq!(FilingType::Quarterly.to_string(), "10-Q");
        assert_eq!(FilingType::from_form("10-Q"), Some(FilingType::Quarterly));
        assert_eq!(FilingType::from_form("10-K/A"), None);
    }
}
