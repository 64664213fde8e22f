//! Member declarations
//!
//! A [`Signature`] is the structured form of a human-written declaration:
//!
//! ```text
//! private final String test;
//! private String[] split(char ch, int limit, boolean withDelimiters);
//! public ReflectionTests(String test, int other);
//! package com.example; public final class ReflectionTests {}
//! ```
//!
//! Simple type names resolve through an [`ImportTable`]; qualified names are
//! taken as written. Generic arguments are checked for syntax and erased.
//! Rendering a signature (`Display`) produces a declaration that parses back
//! to the same signature.

mod imports;
mod lexer;
mod parser;

use std::fmt;

use strata_runtime::{ClassKind, Modifiers, TypeRef};
use thiserror::Error;

pub use imports::ImportTable;
pub use parser::SignatureParser;

/// Errors raised while parsing a declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Declaration does not match the grammar
    #[error("Malformed declaration `{declaration}`: {reason}")]
    Malformed {
        /// Declaration as written
        declaration: String,
        /// What did not match
        reason: String,
    },

    /// A simple type name is not imported
    #[error("Unresolved type `{name}` in `{declaration}`")]
    UnresolvedType {
        /// Declaration as written
        declaration: String,
        /// Type token
        name: String,
    },
}

/// Kind of declared member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    /// Field declaration
    Field,
    /// Method declaration
    Method,
    /// Constructor declaration
    Constructor,
    /// Class, interface or enum declaration
    Class(ClassKind),
}

/// A declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Parameter type
    pub ty: TypeRef,
    /// Parameter name, if written
    pub name: Option<String>,
}

impl Parameter {
    /// Unnamed parameter
    pub fn new(ty: TypeRef) -> Self {
        Self { ty, name: None }
    }

    /// Named parameter
    pub fn named(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: Some(name.into()),
        }
    }
}

/// Structured declaration
///
/// - fields: `declared_type` is the field type, `name` is set, no parameters
/// - methods: `declared_type` is the return type, `name` is set
/// - constructors: `declared_type` is the constructed class, no `name`
/// - classes: `name` is the simple name, `package` the optional package
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Declared modifiers
    pub modifiers: Modifiers,
    /// Member kind
    pub kind: SignatureKind,
    /// Field type, return type or constructed class
    pub declared_type: Option<TypeRef>,
    /// Member or class name
    pub name: Option<String>,
    /// Parameters, in order
    pub parameters: Vec<Parameter>,
    /// Package of a class declaration
    pub package: Option<String>,
}

impl Signature {
    /// Field signature
    pub fn field(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            kind: SignatureKind::Field,
            declared_type: Some(ty),
            name: Some(name.into()),
            parameters: Vec::new(),
            package: None,
        }
    }

    /// Method signature
    pub fn method(return_type: TypeRef, name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            kind: SignatureKind::Method,
            declared_type: Some(return_type),
            name: Some(name.into()),
            parameters,
            package: None,
        }
    }

    /// Constructor signature for `owner`
    pub fn constructor(owner: TypeRef, parameters: Vec<Parameter>) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            kind: SignatureKind::Constructor,
            declared_type: Some(owner),
            name: None,
            parameters,
            package: None,
        }
    }

    /// Class declaration signature
    pub fn class(kind: ClassKind, name: impl Into<String>) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            kind: SignatureKind::Class(kind),
            declared_type: None,
            name: Some(name.into()),
            parameters: Vec::new(),
            package: None,
        }
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the package of a class declaration
    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Parameter types, in order
    pub fn parameter_types(&self) -> Vec<TypeRef> {
        self.parameters.iter().map(|p| p.ty.clone()).collect()
    }

    /// Whether `static` was declared
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// Fully qualified name of a class declaration
    pub fn qualified_name(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        Some(match self.package.as_deref() {
            Some(pkg) if !pkg.is_empty() => format!("{}.{}", pkg, name),
            _ => name.to_string(),
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let SignatureKind::Class(kind) = self.kind {
            if let Some(pkg) = &self.package {
                write!(f, "package {}; ", pkg)?;
            }
            if !self.modifiers.is_empty() {
                write!(f, "{} ", self.modifiers)?;
            }
            return write!(f, "{} {} {{}}", kind, self.name.as_deref().unwrap_or_default());
        }

        if !self.modifiers.is_empty() {
            write!(f, "{} ", self.modifiers)?;
        }
        if let Some(ty) = &self.declared_type {
            write!(f, "{}", ty)?;
        }
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        if self.kind != SignatureKind::Field {
            f.write_str("(")?;
            for (i, param) in self.parameters.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", param.ty)?;
                if let Some(name) = &param.name {
                    write!(f, " {}", name)?;
                }
            }
            f.write_str(")")?;
        }
        f.write_str(";")
    }
}

/// Parse a declaration against an import table
pub fn parse(declaration: &str, imports: &ImportTable) -> Result<Signature, SignatureError> {
    SignatureParser::new(imports).parse(declaration)
}
