//! Error types for filing and statement operations.
//!
//! This module defines [`FilingsError`] which covers every failure that can occur
//! while fetching filings, coercing statements into tables, or computing ratios.
//! Per-period data quality problems (a missing period, a non-numeric cell) are
//! not errors; ratio calculations skip those rows instead.

use thiserror::Error;

/// Errors that can occur during filing and statement operations.
#[derive(Error, Debug)]
pub enum FilingsError {
    /// A statement value could not be reduced to a table by any known strategy.
    #[error(
        "{label} is a {type_name} and could not be converted automatically to a table. \
         Inspect the value manually (its type, exposed conversions and attributes) \
         and convert it before passing it in"
    )]
    Conversion {
        /// Label of the statement being coerced (e.g. "balance_sheet").
        label: String,
        /// Declared type of the value that failed.
        type_name: String,
    },

    /// Required columns are absent from a statement table.
    #[error("{table} missing columns: {missing:?}")]
    Schema {
        /// Name of the table that failed validation.
        table: String,
        /// Every required column that is absent.
        missing: Vec<String>,
    },

    /// No filing of the requested type exists for the company.
    #[error("No latest {form} filing found for {symbol}")]
    NotFound {
        /// The company that was requested.
        symbol: String,
        /// The SEC form that was requested (e.g. "10-K").
        form: String,
    },

    /// A filing does not carry the requested statement.
    #[error("Statement not available: {0}")]
    StatementUnavailable(String),

    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error raised by the DataFrame engine.
    #[error("DataFrame error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    /// No provider is configured.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl FilingsError {
    /// Creates a [`FilingsError::Conversion`] for the labelled statement.
    pub fn conversion(label: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::Conversion {
            label: label.into(),
            type_name: type_name.into(),
        }
    }
}

/// Result type alias using [`FilingsError`].
pub type Result<T> = std::result::Result<T, FilingsError>;
