#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial statements from periodic filings, normalized and analyzed.
//!
//! This crate re-exports the workspace crates and provides a
//! [`StatementPipeline`] that finds a company's latest filing across providers,
//! coerces its statements into period-indexed tables, and computes ratios.
//!
//! # Features
//!
//! - `edgar` - SEC EDGAR provider (enabled by default)
//!
//! # Example
//!
//! ```rust,ignore
//! use filings::{FilingType, StatementPipeline, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> filings::Result<()> {
//!     let pipeline = StatementPipeline::new()
//!         .with_edgar("MyApp/1.0 (contact@example.com)");
//!
//!     let report = pipeline.analyze(&Symbol::new("AAPL"), FilingType::Annual).await?;
//!     println!("{:?}", report.return_on_assets);
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use filings_core::*;

// Statement normalization and ratios
pub use filings_ratios::{RatioAnalyzer, RatioReport};
pub use filings_table::{
    CONVERSION_METHODS, PERIOD_COLUMN, StatementTable, TABULAR_ATTRIBUTES, coerce,
};

// Providers
#[cfg(feature = "edgar")]
pub use filings_edgar::{EdgarFiling, EdgarProvider};

mod pipeline;
pub use pipeline::{PreparedStatements, StatementPipeline};
