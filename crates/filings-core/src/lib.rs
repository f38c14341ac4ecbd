#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for filing statement pipelines.
//!
//! This crate provides the foundational abstractions shared by the workspace:
//!
//! - [`FilingsProvider`](provider::FilingsProvider) - Looks up a company's latest filing
//! - [`Filing`](provider::Filing) - Hands out a filing's financial statements
//! - [`StatementValue`](statement::StatementValue) - A statement of provider-defined shape
//! - [`RatioResult`](types::RatioResult) - One ratio value for one period
//! - [`FilingsError`](error::FilingsError) - Error type for every stage

/// Error types for filing operations.
pub mod error;
/// Filing type definitions.
pub mod form;
/// Provider traits for fetching filings.
pub mod provider;
/// Provider-defined statement values.
pub mod statement;
/// Core data types (Symbol, RatioResult, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{FilingsError, Result};
pub use form::FilingType;
pub use provider::{Filing, FilingsProvider};
pub use statement::{FilingStatements, StatementObject, StatementValue};
pub use types::{RatioKind, RatioResult, Symbol};
