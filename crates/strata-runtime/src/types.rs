//! Declared types
//!
//! `TypeRef` is the erased, structural form of a type as it appears in a
//! member declaration: a primitive keyword, a class binary name
//! (`java.lang.String`, `com.example.Outer$Inner`) or an array of either.

use std::fmt;

/// Binary name of the root class
pub const OBJECT_CLASS: &str = "java.lang.Object";
/// Binary name of the string class
pub const STRING_CLASS: &str = "java.lang.String";
/// Binary name of the enum base class
pub const ENUM_CLASS: &str = "java.lang.Enum";

/// Primitive type keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `void` (method return only)
    Void,
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `char`
    Char,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
}

impl PrimitiveType {
    /// Source keyword for this primitive
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Void => "void",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Parse a primitive keyword
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "void" => PrimitiveType::Void,
            "boolean" => PrimitiveType::Boolean,
            "byte" => PrimitiveType::Byte,
            "char" => PrimitiveType::Char,
            "short" => PrimitiveType::Short,
            "int" => PrimitiveType::Int,
            "long" => PrimitiveType::Long,
            "float" => PrimitiveType::Float,
            "double" => PrimitiveType::Double,
            _ => return None,
        })
    }
}

/// A declared (erased) type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Primitive type
    Primitive(PrimitiveType),
    /// Class, interface or enum by binary name
    Class(String),
    /// Array of the element type
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// `void`
    pub const VOID: TypeRef = TypeRef::Primitive(PrimitiveType::Void);
    /// `boolean`
    pub const BOOLEAN: TypeRef = TypeRef::Primitive(PrimitiveType::Boolean);
    /// `char`
    pub const CHAR: TypeRef = TypeRef::Primitive(PrimitiveType::Char);
    /// `int`
    pub const INT: TypeRef = TypeRef::Primitive(PrimitiveType::Int);
    /// `long`
    pub const LONG: TypeRef = TypeRef::Primitive(PrimitiveType::Long);
    /// `double`
    pub const DOUBLE: TypeRef = TypeRef::Primitive(PrimitiveType::Double);

    /// Class type by binary name
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    /// `java.lang.String`
    pub fn string() -> Self {
        TypeRef::Class(STRING_CLASS.to_string())
    }

    /// `java.lang.Object`
    pub fn object() -> Self {
        TypeRef::Class(OBJECT_CLASS.to_string())
    }

    /// Array of `element`
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// Whether this is `void`
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveType::Void))
    }

    /// Whether this is a primitive (including `void`)
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// Whether values of this type are references (nullable)
    pub fn is_reference(&self) -> bool {
        !self.is_primitive()
    }

    /// Class binary name, if this is a class type
    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Element type, if this is an array type
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(elem) => Some(elem),
            _ => None,
        }
    }

    /// Name as written in source: the simple class name for classes
    /// (`Outer$Inner` → `Inner`), keywords for primitives, `[]` suffixes for arrays.
    pub fn simple_name(&self) -> String {
        match self {
            TypeRef::Primitive(p) => p.keyword().to_string(),
            TypeRef::Class(name) => simple_class_name(name).to_string(),
            TypeRef::Array(elem) => format!("{}[]", elem.simple_name()),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => f.write_str(p.keyword()),
            TypeRef::Class(name) => f.write_str(name),
            TypeRef::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(p: PrimitiveType) -> Self {
        TypeRef::Primitive(p)
    }
}

/// Split a binary name into (package, simple name, enclosing binary name).
///
/// `com.example.Outer$Inner` → (`com.example`, `Inner`, `Some("com.example.Outer")`)
pub fn split_binary_name(name: &str) -> (&str, &str, Option<&str>) {
    let (package, local) = match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("", name),
    };
    match name.rfind('$') {
        Some(pos) if pos > package.len() => (package, &name[pos + 1..], Some(&name[..pos])),
        _ => (package, local, None),
    }
}

/// Simple name of a binary class name
pub fn simple_class_name(name: &str) -> &str {
    split_binary_name(name).1
}
