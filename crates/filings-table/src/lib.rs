#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Coercion of provider statement values into period-indexed tables.
//!
//! - [`coerce`] - Reduces a [`StatementValue`](filings_core::StatementValue) to a [`StatementTable`]
//! - [`StatementTable`] - A statement keyed by reporting period
//! - [`frame_from_json`] - Builds a DataFrame from list/mapping structures
//!
//! # Example
//!
//! ```
//! use filings_core::StatementValue;
//! use filings_table::coerce;
//! use serde_json::json;
//!
//! let value = StatementValue::Structured(json!({
//!     "period": ["2023Q1", "2023Q2"],
//!     "net_income": [50, 45],
//! }));
//!
//! let table = coerce(value, "income_statement").unwrap();
//! assert_eq!(table.value("2023Q2", "net_income"), Some(45.0));
//! ```

/// Strategy chain reducing statement values to tables.
pub mod coerce;
/// DataFrame construction from list/mapping structures.
pub mod frame;
/// Period-indexed statement tables.
pub mod table;

pub use coerce::{CONVERSION_METHODS, TABULAR_ATTRIBUTES, coerce, coerce_frame};
pub use frame::{frame_from_fields, frame_from_json};
pub use table::{PERIOD_COLUMN, StatementTable};
