//! Period-indexed statement tables.

use filings_core::{FilingsError, Result};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::warn;

/// Name of the column promoted to the row key.
pub const PERIOD_COLUMN: &str = "period";

/// A financial statement as a period-indexed table.
///
/// Rows are reporting periods, columns are line items. When the source frame
/// carries a `period` column it becomes the row key (cast to text) and is
/// removed from the line items; otherwise each row is keyed by its position.
/// Rows keep their source order.
#[derive(Debug, Clone)]
pub struct StatementTable {
    frame: DataFrame,
    periods: Vec<String>,
    rows: HashMap<String, usize>,
}

impl StatementTable {
    /// Normalizes a frame into a period-indexed table.
    ///
    /// Duplicate period keys resolve to the last row carrying them. A null
    /// period cell is a [`FilingsError::Parse`] error.
    pub fn new(frame: DataFrame) -> Result<Self> {
        let has_period = frame
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == PERIOD_COLUMN);

        let (frame, periods) = if has_period {
            let keys = frame
                .column(PERIOD_COLUMN)?
                .as_materialized_series()
                .cast(&DataType::String)?;
            let keys = keys.str()?;
            if keys.null_count() > 0 {
                return Err(FilingsError::Parse(format!(
                    "{} of {} rows have no {PERIOD_COLUMN}",
                    keys.null_count(),
                    keys.len()
                )));
            }
            let periods: Vec<String> = keys.into_iter().flatten().map(str::to_string).collect();
            (frame.drop(PERIOD_COLUMN)?, periods)
        } else {
            let periods: Vec<String> = (0..frame.height()).map(|i| i.to_string()).collect();
            (frame, periods)
        };

        let mut rows = HashMap::with_capacity(periods.len());
        for (i, period) in periods.iter().enumerate() {
            if rows.insert(period.clone(), i).is_some() {
                warn!(period = %period, "Duplicate period key, keeping the last row");
            }
        }

        Ok(Self {
            frame,
            periods,
            rows,
        })
    }

    /// Returns the line-item columns.
    #[must_use]
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Returns the period key of every row, in row order.
    #[must_use]
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Returns true if the table has a row for `period`.
    #[must_use]
    pub fn contains_period(&self, period: &str) -> bool {
        self.rows.contains_key(period)
    }

    /// Returns the row index for `period`.
    #[must_use]
    pub fn row(&self, period: &str) -> Option<usize> {
        self.rows.get(period).copied()
    }

    /// Returns true if the table has a line-item column named `name`.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.frame
            .get_column_names()
            .iter()
            .any(|column| column.as_str() == name)
    }

    /// Checks that every column in `columns` exists.
    ///
    /// The error lists all missing columns, not just the first.
    pub fn require_columns(&self, columns: &[&str], table: &str) -> Result<()> {
        let missing: Vec<String> = columns
            .iter()
            .filter(|column| !self.has_column(column))
            .map(|column| column.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(FilingsError::Schema {
                table: table.to_string(),
                missing,
            })
        }
    }

    /// Reads a cell as a number.
    ///
    /// Returns `None` when the period or column is absent, the cell is null or
    /// NaN, or the cell holds text that does not parse as a number.
    #[must_use]
    pub fn value(&self, period: &str, column: &str) -> Option<f64> {
        let row = self.row(period)?;
        let cell = self.frame.column(column).ok()?.get(row).ok()?;
        numeric(&cell)
    }
}

fn numeric(cell: &AnyValue<'_>) -> Option<f64> {
    let number = match cell {
        AnyValue::Null => None,
        AnyValue::String(s) => s.trim().parse::<f64>().ok(),
        AnyValue::StringOwned(s) => s.trim().parse::<f64>().ok(),
        other => other.extract::<f64>(),
    };
    number.filter(|n| !n.is_nan())
}
