//! Validated tool arguments.

use super::schema::exact_i64;
use crate::error::{ChorusError, Result};
use serde_json::{Map, Value};

/// Arguments of a tool call that already passed schema validation.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    pub(crate) fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Build arguments from a single string parameter.
    pub fn single(name: &str, value: &str) -> Self {
        let mut values = Map::new();
        values.insert(name.to_string(), Value::String(value.to_string()));
        Self { values }
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.opt_string(name)?.ok_or_else(|| missing(name))
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.opt_integer(name)?.ok_or_else(|| missing(name))
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        self.opt_float(name)?.ok_or_else(|| missing(name))
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        self.opt_boolean(name)?.ok_or_else(|| missing(name))
    }

    pub fn opt_string(&self, name: &str) -> Result<Option<&str>> {
        match self.present(name) {
            None => Ok(None),
            Some(v) => v.as_str().map(Some).ok_or_else(|| mistyped(name, "a string")),
        }
    }

    pub fn opt_integer(&self, name: &str) -> Result<Option<i64>> {
        match self.present(name) {
            None => Ok(None),
            Some(v) => exact_i64(v)
                .map(Some)
                .ok_or_else(|| mistyped(name, "an integer")),
        }
    }

    pub fn opt_float(&self, name: &str) -> Result<Option<f64>> {
        match self.present(name) {
            None => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| mistyped(name, "a number")),
        }
    }

    pub fn opt_boolean(&self, name: &str) -> Result<Option<bool>> {
        match self.present(name) {
            None => Ok(None),
            Some(v) => v.as_bool().map(Some).ok_or_else(|| mistyped(name, "a boolean")),
        }
    }

    fn present(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }
}

fn missing(name: &str) -> ChorusError {
    ChorusError::Dispatch(format!("missing argument '{}'", name))
}

fn mistyped(name: &str, expected: &str) -> ChorusError {
    ChorusError::Dispatch(format!("argument '{}' must be {}", name, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArgs {
        match value {
            Value::Object(map) => ToolArgs::new(map),
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_typed_accessors() {
        let a = args(json!({"s": "hi", "i": 4, "f": 1.5, "b": true}));
        assert_eq!(a.string("s").unwrap(), "hi");
        assert_eq!(a.integer("i").unwrap(), 4);
        assert_eq!(a.float("f").unwrap(), 1.5);
        assert!(a.boolean("b").unwrap());
        assert_eq!(a.float("i").unwrap(), 4.0);
    }

    #[test]
    fn test_optional_accessors_treat_null_as_absent() {
        let a = args(json!({"s": null}));
        assert_eq!(a.opt_string("s").unwrap(), None);
        assert!(a.string("s").is_err());
        assert_eq!(a.opt_integer("missing").unwrap(), None);
    }

    #[test]
    fn test_integer_never_saturates() {
        let a = args(json!({"big": u64::MAX, "huge": 1e300, "whole": 7.0}));
        assert!(a.integer("big").is_err());
        assert!(a.integer("huge").is_err());
        assert_eq!(a.integer("whole").unwrap(), 7);
    }

    #[test]
    fn test_single_string_argument() {
        let a = ToolArgs::single("query", "summarize this");
        assert_eq!(a.string("query").unwrap(), "summarize this");
    }
}
