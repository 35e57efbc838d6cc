//! Parameter schema inference for registered tools.
//!
//! A tool declares its parameters as `(name, type name, required)` triples.
//! Type names are mapped onto the four supported JSON types; anything else is
//! rejected at registration time so a bad tool never reaches a model call.

use super::args::ToolArgs;
use crate::error::{ChorusError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Supported tool parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Float,
    Boolean,
}

impl ParamType {
    /// Map a declared type name onto a supported type.
    pub fn from_declared(name: &str) -> Option<Self> {
        match name.trim() {
            "string" | "str" | "String" | "&str" => Some(ParamType::String),
            "integer" | "int" | "i32" | "i64" | "u32" | "u64" | "usize" => Some(ParamType::Integer),
            "float" | "number" | "f32" | "f64" => Some(ParamType::Float),
            "boolean" | "bool" => Some(ParamType::Boolean),
            _ => None,
        }
    }

    /// JSON-schema type keyword for this parameter type.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Float => "number",
            ParamType::Boolean => "boolean",
        }
    }

    /// Check whether a raw JSON value satisfies this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => exact_i64(value).is_some(),
            ParamType::Float => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

/// The value as an `i64`, if it is a JSON number `i64` represents exactly.
pub(crate) fn exact_i64(value: &Value) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63

    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    if value.is_u64() {
        return None;
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= -LIMIT && *f < LIMIT)
        .map(|f| f as i64)
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.json_type())
    }
}

/// A parameter as declared by a tool implementation, before inference.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub ty: String,
    pub required: bool,
    pub description: Option<String>,
}

impl ParamDecl {
    /// Declare a required parameter.
    pub fn required(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            required: true,
            description: None,
        }
    }

    /// Declare an optional parameter.
    pub fn optional(name: &str, ty: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    /// Attach a description shown to the model.
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// An inferred, validated parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: ParamType,
    pub required: bool,
    pub description: Option<String>,
}

/// Ordered parameter contract of one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    params: Vec<Parameter>,
}

impl ParameterSchema {
    /// Infer a schema from declared parameters.
    ///
    /// Fails with [`ChorusError::SchemaType`] naming the tool, the parameter
    /// and the offending type when a declared type is unsupported.
    pub fn infer(tool: &str, decls: &[ParamDecl]) -> Result<Self> {
        let mut params: Vec<Parameter> = Vec::with_capacity(decls.len());

        for decl in decls {
            let ty = ParamType::from_declared(&decl.ty).ok_or_else(|| ChorusError::SchemaType {
                tool: tool.to_string(),
                parameter: decl.name.clone(),
                ty: decl.ty.clone(),
            })?;

            if params.iter().any(|p| p.name == decl.name) {
                return Err(ChorusError::Config(format!(
                    "Tool '{}' declares parameter '{}' more than once",
                    tool, decl.name
                )));
            }

            params.push(Parameter {
                name: decl.name.clone(),
                ty,
                required: decl.required,
                description: decl.description.clone(),
            });
        }

        Ok(Self { params })
    }

    /// Schema of an agent exposed as a tool: a single required free-text query.
    pub fn query() -> Self {
        Self {
            params: vec![Parameter {
                name: "query".to_string(),
                ty: ParamType::String,
                required: true,
                description: Some("The request to delegate to this agent".to_string()),
            }],
        }
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Strict mode is only valid when every parameter is required.
    pub fn is_strict(&self) -> bool {
        self.params.iter().all(|p| p.required)
    }

    /// Render as a JSON-schema object.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.params {
            let mut prop = json!({ "type": param.ty.json_type() });
            if let Some(ref description) = param.description {
                prop["description"] = Value::String(description.clone());
            }
            properties.insert(param.name.clone(), prop);
        }

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }

    /// Validate raw model-issued arguments against this schema.
    pub fn validate(&self, tool: &str, raw: &str) -> Result<ToolArgs> {
        let raw = raw.trim();
        let value: Value = if raw.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(raw).map_err(|e| {
                ChorusError::Dispatch(format!("arguments for '{}' are not valid JSON: {}", tool, e))
            })?
        };

        let Value::Object(map) = value else {
            return Err(ChorusError::Dispatch(format!(
                "arguments for '{}' must be a JSON object",
                tool
            )));
        };

        for key in map.keys() {
            if !self.params.iter().any(|p| &p.name == key) {
                return Err(ChorusError::Dispatch(format!(
                    "'{}' has no parameter named '{}'",
                    tool, key
                )));
            }
        }

        for param in &self.params {
            match map.get(&param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(ChorusError::Dispatch(format!(
                        "missing required parameter '{}' for '{}'",
                        param.name, tool
                    )));
                }
                None | Some(Value::Null) => {}
                Some(value) if !param.ty.accepts(value) => {
                    return Err(ChorusError::Dispatch(format!(
                        "parameter '{}' for '{}' must be {}, got {}",
                        param.name, tool, param.ty, value
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(ToolArgs::new(map))
    }
}
