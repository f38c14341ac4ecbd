//! Provider-defined statement values.
//!
//! Providers hand statements over in whatever shape their extractor produces.
//! [`StatementValue`] wraps those shapes in a closed set of tags at the
//! provider boundary so the coercion engine can match on them instead of
//! probing arbitrary values at runtime.

use polars::prelude::DataFrame;
use serde_json::{Map, Value};
use std::fmt;

use crate::error::Result;

/// A financial statement of provider-defined shape, before normalization.
pub enum StatementValue {
    /// Already a table.
    Table(DataFrame),
    /// A zero-argument producer that yields the statement when invoked.
    Deferred(Box<dyn FnOnce() -> Self + Send>),
    /// An object that may expose conversions, tabular attributes or a field bag.
    Object(Box<dyn StatementObject>),
    /// A list, mapping or tuple-like structure.
    Structured(Value),
}

impl StatementValue {
    /// Wraps a producer closure as a deferred statement.
    pub fn deferred<F>(f: F) -> Self
    where
        F: FnOnce() -> Self + Send + 'static,
    {
        Self::Deferred(Box::new(f))
    }

    /// Wraps an object as a statement value.
    pub fn object<O>(object: O) -> Self
    where
        O: StatementObject + 'static,
    {
        Self::Object(Box::new(object))
    }

    /// Returns the declared type of the value, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Table(_) => "DataFrame".to_string(),
            Self::Deferred(_) => "deferred statement".to_string(),
            Self::Object(object) => object.type_name().to_string(),
            Self::Structured(value) => json_type_name(value).to_string(),
        }
    }
}

impl fmt::Debug for StatementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(df) => f.debug_tuple("Table").field(&df.shape()).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
            Self::Object(object) => f.debug_tuple("Object").field(object).finish(),
            Self::Structured(value) => f
                .debug_tuple("Structured")
                .field(&json_type_name(value))
                .finish(),
        }
    }
}

impl From<DataFrame> for StatementValue {
    fn from(df: DataFrame) -> Self {
        Self::Table(df)
    }
}

impl From<Value> for StatementValue {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

/// An object-shaped statement exposing optional capabilities.
///
/// Each capability returns `None` when the object does not have the capability at
/// all, so the coercion engine can tell "absent" apart from "present but
/// failed".
pub trait StatementObject: Send + fmt::Debug {
    /// Declared type of the object, used in conversion error messages.
    fn type_name(&self) -> &str;

    /// Invokes the named zero-argument conversion, if the object has one.
    fn convert(&self, method: &str) -> Option<Result<StatementValue>> {
        let _ = method;
        None
    }

    /// Returns the value of the named attribute, if the object has one.
    fn attribute(&self, name: &str) -> Option<StatementValue> {
        let _ = name;
        None
    }

    /// Returns the object's generic field bag, if it exposes one.
    fn fields(&self) -> Option<Map<String, Value>> {
        None
    }
}

/// The statements extracted from one filing.
#[derive(Debug)]
pub struct FilingStatements {
    /// Balance sheet.
    pub balance_sheet: StatementValue,
    /// Income statement.
    pub income_statement: StatementValue,
    /// Cash flow statement, `None` when the filing does not provide one.
    pub cash_flow: Option<StatementValue>,
}

pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "json bool",
        Value::Number(_) => "json number",
        Value::String(_) => "json string",
        Value::Array(_) => "json array",
        Value::Object(_) => "json object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Opaque;

    impl StatementObject for Opaque {
        fn type_name(&self) -> &str {
            "Opaque"
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(StatementValue::from(DataFrame::empty()).type_name(), "DataFrame");
        assert_eq!(StatementValue::from(json!([1, 2])).type_name(), "json array");
        assert_eq!(StatementValue::from(Value::Null).type_name(), "null");
        assert_eq!(StatementValue::object(Opaque).type_name(), "Opaque");
        assert_eq!(
            StatementValue::deferred(|| StatementValue::Structured(Value::Null)).type_name(),
            "deferred statement"
        );
    }

    #[test]
    fn test_default_capabilities_are_absent() {
        let object = Opaque;
        assert!(object.convert("to_frame").is_none());
        assert!(object.attribute("df").is_none());
        assert!(object.fields().is_none());
    }
}
