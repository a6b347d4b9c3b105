//! JSON export
//!
//! Walks a bound handle against its schema and renders the present part of
//! the document as JSON. Containers become objects holding their present
//! fields in declaration order, lists become arrays, and values become
//! numbers, booleans or strings according to their declared type.

use crate::error::{Error, Result};
use crate::values::Scalar;
use crate::wrappers::{Handle, Wrapper};
use serde_json::{Map, Number, Value as Json};

/// Render a handle as JSON; absent positions render as `null`
pub fn to_json(handle: &Handle) -> Result<Json> {
    if handle.is_missing() {
        return Ok(Json::Null);
    }
    match handle {
        Handle::Container(container) => {
            let mut object = Map::new();
            for name in container.field_names() {
                let field = container.get(name)?;
                if field.is_present() {
                    object.insert(name.to_string(), to_json(&field)?);
                }
            }
            Ok(Json::Object(object))
        }
        Handle::List(list) => list
            .iter()
            .map(|item| to_json(&item))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array),
        Handle::Value(value) => Ok(value.value()?.map_or(Json::Null, scalar_to_json)),
    }
}

/// Render a handle as a JSON string
pub fn to_json_string(handle: &Handle, pretty: bool) -> Result<String> {
    let json = to_json(handle)?;
    let text = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    text.map_err(|e| Error::InvalidValue(format!("JSON export failed: {}", e)))
}

fn scalar_to_json(scalar: Scalar) -> Json {
    match scalar {
        Scalar::Integer(v) => Json::Number(Number::from(v)),
        Scalar::Boolean(v) => Json::Bool(v),
        other => Json::String(other.to_string()),
    }
}
