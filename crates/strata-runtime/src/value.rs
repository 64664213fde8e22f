//! Runtime values
//!
//! Primitives are stored inline; strings are immutable shared slices; objects
//! and arrays are shared references compared by identity.

use std::fmt;
use std::sync::Arc;

use crate::object::{ArrayRef, ObjectRef};
use crate::types::{PrimitiveType, TypeRef, STRING_CLASS};

/// A value held in a field, passed as an argument or returned from a call
#[derive(Clone)]
pub enum Value {
    /// `null` (also the result of `void` calls)
    Null,
    /// `boolean`
    Bool(bool),
    /// `char`
    Char(char),
    /// `byte`, `short` and `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float` and `double`
    Double(f64),
    /// `java.lang.String`
    Str(Arc<str>),
    /// Class instance
    Object(ObjectRef),
    /// Array
    Array(ArrayRef),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// Check if this is `null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as char if this is a char
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Get as i32 if this is an int
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as i64 (ints widen)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i as i64),
            Value::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Get as f64 if this is a double
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the object reference if this is an object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get the array reference if this is an array
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Runtime type of this value (`None` for null)
    pub fn runtime_type(&self) -> Option<TypeRef> {
        Some(match self {
            Value::Null => return None,
            Value::Bool(_) => TypeRef::Primitive(PrimitiveType::Boolean),
            Value::Char(_) => TypeRef::Primitive(PrimitiveType::Char),
            Value::Int(_) => TypeRef::Primitive(PrimitiveType::Int),
            Value::Long(_) => TypeRef::Primitive(PrimitiveType::Long),
            Value::Double(_) => TypeRef::Primitive(PrimitiveType::Double),
            Value::Str(_) => TypeRef::class(STRING_CLASS),
            Value::Object(o) => TypeRef::class(o.class_name()),
            Value::Array(a) => TypeRef::array(a.element_type().clone()),
        })
    }

    /// Type name used in diagnostics
    pub fn type_name(&self) -> String {
        self.runtime_type()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "null".to_string())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{:?}", c),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}L", l),
            Value::Double(d) => write!(f, "{}d", d),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Object(o) => write!(f, "{:?}", o),
            Value::Array(a) => write!(f, "{:?}", a),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Double(d) => write!(f, "{}", d),
            Value::Str(s) => f.write_str(s),
            Value::Object(o) => write!(f, "{:?}", o),
            Value::Array(a) => write!(f, "{:?}", a),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}
