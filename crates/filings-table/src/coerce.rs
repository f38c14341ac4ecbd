//! Coercion of provider statement values into [`StatementTable`]s.
//!
//! Strategies run in a fixed priority order and the first success wins:
//!
//! 1. a table is returned unchanged
//! 2. a deferred statement is invoked once and coercion restarts on its result
//! 3. conversion methods from [`CONVERSION_METHODS`] are tried in order
//! 4. attributes from [`TABULAR_ATTRIBUTES`] are tried in order
//! 5. list/mapping structures are built directly
//! 6. a non-empty field bag is flattened into a single row
//!
//! Failed attempts are logged and the next strategy runs. Only when every
//! strategy is exhausted does coercion fail with [`FilingsError::Conversion`].

use filings_core::{FilingsError, Result, StatementObject, StatementValue};
use polars::prelude::DataFrame;
use tracing::{debug, warn};

use crate::frame::{frame_from_fields, frame_from_json};
use crate::table::StatementTable;

/// Conversion methods tried on object statements, in priority order.
pub const CONVERSION_METHODS: &[&str] = &[
    "to_frame",
    "to_dataframe",
    "to_df",
    "to_pandas",
    "as_dataframe",
    "as_df",
    "as_pandas",
    "get_dataframe",
];

/// Attributes that may hold tabular data, in priority order.
pub const TABULAR_ATTRIBUTES: &[&str] = &[
    "df",
    "data",
    "dataframe",
    "table",
    "rows",
    "items",
    "statements",
];

/// Coerces a statement value into a period-indexed table.
///
/// `label` names the statement (e.g. "balance_sheet") in logs and errors.
pub fn coerce(value: StatementValue, label: &str) -> Result<StatementTable> {
    let frame = coerce_frame(value, label)?;
    StatementTable::new(frame)
}

/// Coerces a statement value into a DataFrame, without period normalization.
pub fn coerce_frame(value: StatementValue, label: &str) -> Result<DataFrame> {
    reduce(value, label, true)
}

fn reduce(value: StatementValue, label: &str, invoke_deferred: bool) -> Result<DataFrame> {
    match value {
        StatementValue::Table(df) => Ok(df),
        StatementValue::Deferred(produce) if invoke_deferred => {
            debug!(label, "Invoking deferred statement");
            reduce(produce(), label, false)
        }
        StatementValue::Deferred(_) => {
            debug!(label, "Deferred statement produced another deferred statement");
            Err(FilingsError::conversion(label, "deferred statement"))
        }
        StatementValue::Object(object) => from_object(object.as_ref(), label),
        StatementValue::Structured(value) => match frame_from_json(&value) {
            Ok(df) => Ok(df),
            Err(e) => {
                debug!(label, error = %e, "Structured statement is not tabular");
                let type_name = StatementValue::Structured(value).type_name();
                Err(FilingsError::conversion(label, type_name))
            }
        },
    }
}

fn from_object(object: &dyn StatementObject, label: &str) -> Result<DataFrame> {
    for &method in CONVERSION_METHODS {
        let Some(converted) = object.convert(method) else {
            continue;
        };
        let frame = converted.and_then(|value| tabular(value, label));
        if let Some(df) = attempt(label, "conversion", method, frame) {
            return Ok(df);
        }
    }

    for &name in TABULAR_ATTRIBUTES {
        let Some(value) = object.attribute(name) else {
            continue;
        };
        if let Some(df) = attempt(label, "attribute", name, tabular(value, label)) {
            return Ok(df);
        }
    }

    if let Some(fields) = object.fields().filter(|fields| !fields.is_empty()) {
        if let Some(df) = attempt(label, "fields", "fields", frame_from_fields(&fields)) {
            return Ok(df);
        }
    }

    Err(FilingsError::conversion(label, object.type_name()))
}

/// Accepts a candidate value only when it is a table or a buildable structure.
fn tabular(value: StatementValue, label: &str) -> Result<DataFrame> {
    match value {
        StatementValue::Table(df) => Ok(df),
        StatementValue::Structured(value) => frame_from_json(&value),
        other => Err(FilingsError::conversion(label, other.type_name())),
    }
}

/// Runs one strategy attempt, logging a failure instead of propagating it.
fn attempt(
    label: &str,
    strategy: &str,
    candidate: &str,
    result: Result<DataFrame>,
) -> Option<DataFrame> {
    match result {
        Ok(df) => {
            debug!(label, strategy, candidate, rows = df.height(), "Statement coerced");
            Some(df)
        }
        Err(e) => {
            warn!(
                label,
                strategy,
                candidate,
                error = %e,
                "Coercion attempt failed, trying next"
            );
            None
        }
    }
}
