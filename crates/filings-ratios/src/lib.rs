#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial ratio computation over period-indexed statements.
//!
//! [`RatioAnalyzer`] aligns a balance sheet, an income statement and an
//! optional cash flow statement on their reporting periods and computes:
//!
//! - Current ratio (current assets / current liabilities)
//! - Return on assets (net income / total assets)
//! - Operating cash flow ratio (operating cash flow / current liabilities)
//!
//! # Example
//!
//! ```
//! use filings_ratios::RatioAnalyzer;
//! use polars::prelude::*;
//!
//! let balance_sheet = df![
//!     "period" => ["2023Q1", "2023Q2"],
//!     "current_assets" => [200.0, 150.0],
//!     "current_liabilities" => [100.0, 0.0],
//!     "total_assets" => [1000.0, 900.0]
//! ]?;
//! let income_statement = df![
//!     "period" => ["2023Q1", "2023Q2"],
//!     "net_income" => [50.0, 45.0]
//! ]?;
//!
//! let analyzer = RatioAnalyzer::from_frames(&balance_sheet, &income_statement, None)?;
//! let current = analyzer.current_ratio()?;
//! assert_eq!(current[0].value, 2.0);
//! assert_eq!(current[1].value, f64::INFINITY);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod analyzer;

pub use analyzer::{RatioAnalyzer, RatioReport};
