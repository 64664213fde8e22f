//! Conversions between Rust values and runtime `Value`s.
//!
//! `From` impls cover the argument direction; `FromValue` is the fallible
//! return direction used by typed call sites.

use std::sync::Arc;

use crate::error::{RuntimeError, RuntimeResult};
use crate::object::{ArrayRef, ObjectRef};
use crate::value::Value;

/// Extract a Rust value from a runtime `Value`
pub trait FromValue: Sized {
    /// Convert, failing with `TypeMismatch` when the variant does not fit
    fn from_value(value: Value) -> RuntimeResult<Self>;
}

fn mismatch(expected: &str, got: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected: expected.to_string(),
        got: got.type_name(),
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        Ok(value)
    }
}

impl FromValue for () {
    fn from_value(_value: Value) -> RuntimeResult<Self> {
        Ok(())
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("boolean", &value))
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        value.as_char().ok_or_else(|| mismatch("char", &value))
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        value.as_i32().ok_or_else(|| mismatch("int", &value))
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        value.as_i64().ok_or_else(|| mismatch("long", &value))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        value.as_f64().ok_or_else(|| mismatch("double", &value))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("java.lang.String", &value))
    }
}

impl FromValue for ObjectRef {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        match value {
            Value::Object(o) => Ok(o),
            other => Err(mismatch("object", &other)),
        }
    }
}

impl FromValue for ArrayRef {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        match value {
            Value::Array(a) => Ok(a),
            other => Err(mismatch("array", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> RuntimeResult<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Long(l)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<&ObjectRef> for Value {
    fn from(o: &ObjectRef) -> Self {
        Value::Object(o.clone())
    }
}

impl From<ArrayRef> for Value {
    fn from(a: ArrayRef) -> Self {
        Value::Array(a)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
