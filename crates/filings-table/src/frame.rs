//! Construction of DataFrames from list/mapping structures.
//!
//! Supported shapes:
//!
//! - array of objects: one row per object, columns in first-seen key order
//! - object of arrays: one column per key, all arrays of equal length
//! - array of arrays: positional columns named `"0"`, `"1"`, ...
//! - array of scalars: a single column named `"0"`
//!
//! A mapping of scalars is not a table. Use [`frame_from_fields`] to flatten
//! one into a single row.

use filings_core::{FilingsError, Result};
use polars::prelude::*;
use serde_json::{Map, Value};

/// Builds a DataFrame from a list/mapping structure.
pub fn frame_from_json(value: &Value) -> Result<DataFrame> {
    match value {
        Value::Array(items) => from_array(items),
        Value::Object(map) => from_columns(map),
        other => Err(FilingsError::Parse(format!(
            "a scalar ({other}) cannot be built into a table"
        ))),
    }
}

/// Flattens a field bag into a single-row DataFrame.
///
/// Nested objects become dotted column names (`meta.currency`). Arrays are
/// kept as their JSON text.
pub fn frame_from_fields(fields: &Map<String, Value>) -> Result<DataFrame> {
    let mut flat = Vec::new();
    flatten_into(&mut flat, None, fields);
    build(flat.iter().map(|(name, value)| (name.clone(), vec![value])))
}

fn flatten_into(
    out: &mut Vec<(String, Value)>,
    prefix: Option<&str>,
    fields: &Map<String, Value>,
) {
    for (key, value) in fields {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => flatten_into(out, Some(&name), nested),
            Value::Array(_) | Value::Object(_) => {
                out.push((name, Value::String(value.to_string())));
            }
            scalar => out.push((name, scalar.clone())),
        }
    }
}

fn from_array(items: &[Value]) -> Result<DataFrame> {
    if items.is_empty() {
        return Ok(DataFrame::empty());
    }
    if items.iter().all(Value::is_object) {
        return from_records(items);
    }
    if items.iter().all(Value::is_array) {
        return from_rows(items);
    }
    if items.iter().any(|v| v.is_object() || v.is_array()) {
        return Err(FilingsError::Parse(
            "array mixes nested and scalar entries".to_string(),
        ));
    }
    build(std::iter::once(("0".to_string(), items.iter().collect())))
}

fn from_records(items: &[Value]) -> Result<DataFrame> {
    let mut names: Vec<&str> = Vec::new();
    for record in items.iter().filter_map(Value::as_object) {
        for key in record.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key);
            }
        }
    }

    build(names.into_iter().map(|name| {
        let cells = items
            .iter()
            .map(|record| record.get(name).unwrap_or(&Value::Null))
            .collect();
        (name.to_string(), cells)
    }))
}

fn from_rows(items: &[Value]) -> Result<DataFrame> {
    let width = items
        .iter()
        .filter_map(Value::as_array)
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    build((0..width).map(|i| {
        let cells = items
            .iter()
            .map(|row| row.get(i).unwrap_or(&Value::Null))
            .collect();
        (i.to_string(), cells)
    }))
}

fn from_columns(map: &Map<String, Value>) -> Result<DataFrame> {
    let mut height = None;
    let mut columns = Vec::with_capacity(map.len());
    for (name, value) in map {
        let Value::Array(cells) = value else {
            return Err(FilingsError::Parse(format!(
                "mapping entry '{name}' is not a list; a mapping of scalars is not a table"
            )));
        };
        match height {
            Some(h) if h != cells.len() => {
                return Err(FilingsError::Parse(format!(
                    "column '{name}' has {} values, expected {h}",
                    cells.len()
                )));
            }
            _ => height = Some(cells.len()),
        }
        columns.push((name.clone(), cells.iter().collect()));
    }
    build(columns)
}

fn build<'a, I>(columns: I) -> Result<DataFrame>
where
    I: IntoIterator<Item = (String, Vec<&'a Value>)>,
{
    let columns = columns
        .into_iter()
        .map(|(name, cells)| column_from_cells(&name, &cells))
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Types a column from its non-null cells: integers, floats, booleans, else text.
fn column_from_cells(name: &str, cells: &[&Value]) -> Column {
    let name = PlSmallStr::from(name);
    let mut present = cells.iter().filter(|v| !v.is_null());

    if present.clone().all(|v| v.is_i64()) {
        let values: Vec<Option<i64>> = cells.iter().map(|v| v.as_i64()).collect();
        Column::new(name, values)
    } else if present.clone().all(|v| v.is_number()) {
        let values: Vec<Option<f64>> = cells.iter().map(|v| v.as_f64()).collect();
        Column::new(name, values)
    } else if present.all(|v| v.is_boolean()) {
        let values: Vec<Option<bool>> = cells.iter().map(|v| v.as_bool()).collect();
        Column::new(name, values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Column::new(name, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records() {
        let df = frame_from_json(&json!([
            {"period": "2023Q1", "net_income": 50},
            {"period": "2023Q2", "net_income": 45.5, "revenue": 300}
        ]))
        .unwrap();

        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("net_income").unwrap().dtype(), &DataType::Float64);
        let revenue = df.column("revenue").unwrap();
        assert_eq!(revenue.dtype(), &DataType::Int64);
        assert_eq!(revenue.null_count(), 1);
        assert_eq!(df.column("period").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_whole_numbers_stay_integers() {
        let records = frame_from_json(&json!([
            {"period": 2023, "net_income": 1},
            {"period": 2024, "net_income": 2}
        ]))
        .unwrap();
        assert_eq!(records.column("period").unwrap().dtype(), &DataType::Int64);

        let columns = frame_from_json(&json!({
            "period": [2023, null],
            "net_income": [1, 2.5]
        }))
        .unwrap();
        assert_eq!(columns.column("period").unwrap().dtype(), &DataType::Int64);
        assert_eq!(columns.column("net_income").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_columns() {
        let df = frame_from_json(&json!({
            "period": ["2023Q1", "2023Q2"],
            "total_assets": [1000, 900]
        }))
        .unwrap();
        assert_eq!(df.shape(), (2, 2));
    }

    #[test]
    fn test_columns_length_mismatch() {
        let result = frame_from_json(&json!({"a": [1, 2], "b": [1]}));
        assert!(matches!(result, Err(FilingsError::Parse(_))));
    }

    #[test]
    fn test_mapping_of_scalars_rejected() {
        assert!(frame_from_json(&json!({"a": 1, "b": 2})).is_err());
        assert!(frame_from_json(&json!("text")).is_err());
    }

    #[test]
    fn test_rows_and_scalars() {
        let rows = frame_from_json(&json!([["2023Q1", 1], ["2023Q2", 2, true]])).unwrap();
        assert_eq!(rows.shape(), (2, 3));
        assert_eq!(rows.get_column_names()[0].as_str(), "0");

        let scalars = frame_from_json(&json!([1, 2, 3])).unwrap();
        assert_eq!(scalars.shape(), (3, 1));

        assert_eq!(frame_from_json(&json!([])).unwrap().height(), 0);
    }

    #[test]
    fn test_mixed_text_column() {
        let df = frame_from_json(&json!({"v": [1, "n/a", null]})).unwrap();
        let column = df.column("v").unwrap();
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn test_fields_flatten_to_single_row() {
        let fields = json!({
            "period": "FY2023",
            "meta": {"currency": "USD", "scale": 1000},
            "tags": ["a", "b"]
        });
        let df = frame_from_fields(fields.as_object().unwrap()).unwrap();

        assert_eq!(df.height(), 1);
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert!(names.contains(&"meta.currency"));
        assert!(names.contains(&"meta.scale"));
        assert!(names.contains(&"tags"));
    }
}
