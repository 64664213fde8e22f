//! Member references
//!
//! Introspection hands out fresh `FieldRef` / `MethodRef` / `ConstructorRef`
//! values. Each carries its own accessibility flag: non-public members can
//! only be used through a reference on which `set_accessible` was called.

use std::fmt;
use std::sync::Arc;

use crate::class::{ClassId, ConstructorDef, FieldDef, MethodDef};
use crate::error::RuntimeError;
use crate::modifiers::Modifiers;
use crate::types::TypeRef;

/// Reference to a declared field
#[derive(Debug, Clone)]
pub struct FieldRef {
    pub(crate) declaring: ClassId,
    pub(crate) declaring_name: Arc<str>,
    pub(crate) def: Arc<FieldDef>,
    accessible: bool,
}

impl FieldRef {
    pub(crate) fn new(declaring: ClassId, declaring_name: Arc<str>, def: Arc<FieldDef>) -> Self {
        Self {
            declaring,
            declaring_name,
            def,
            accessible: false,
        }
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Declared type
    pub fn field_type(&self) -> &TypeRef {
        &self.def.ty
    }

    /// Modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.def.modifiers
    }

    /// Declaring class
    pub fn declaring_class(&self) -> ClassId {
        self.declaring
    }

    /// Binary name of the declaring class
    pub fn declaring_class_name(&self) -> &str {
        &self.declaring_name
    }

    /// Whether visibility checks are suppressed for this reference
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Suppress visibility checks for this reference
    pub fn set_accessible(&mut self) {
        self.accessible = true;
    }

    pub(crate) fn check_access(&self) -> Result<(), RuntimeError> {
        check_access(self.accessible, self.def.modifiers, || self.to_string())
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.declaring_name, self.def.name)
    }
}

/// Reference to a declared method
#[derive(Debug, Clone)]
pub struct MethodRef {
    pub(crate) declaring: ClassId,
    pub(crate) declaring_name: Arc<str>,
    pub(crate) def: Arc<MethodDef>,
    accessible: bool,
}

impl MethodRef {
    pub(crate) fn new(declaring: ClassId, declaring_name: Arc<str>, def: Arc<MethodDef>) -> Self {
        Self {
            declaring,
            declaring_name,
            def,
            accessible: false,
        }
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Return type
    pub fn return_type(&self) -> &TypeRef {
        &self.def.return_type
    }

    /// Parameter types
    pub fn parameter_types(&self) -> &[TypeRef] {
        &self.def.parameters
    }

    /// Modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.def.modifiers
    }

    /// Declaring class
    pub fn declaring_class(&self) -> ClassId {
        self.declaring
    }

    /// Binary name of the declaring class
    pub fn declaring_class_name(&self) -> &str {
        &self.declaring_name
    }

    /// Whether visibility checks are suppressed for this reference
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Suppress visibility checks for this reference
    pub fn set_accessible(&mut self) {
        self.accessible = true;
    }

    pub(crate) fn check_access(&self) -> Result<(), RuntimeError> {
        check_access(self.accessible, self.def.modifiers, || self.to_string())
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}(", self.declaring_name, self.def.name)?;
        write_params(f, &self.def.parameters)?;
        f.write_str(")")
    }
}

/// Reference to a declared constructor
#[derive(Debug, Clone)]
pub struct ConstructorRef {
    pub(crate) declaring: ClassId,
    pub(crate) declaring_name: Arc<str>,
    pub(crate) def: Arc<ConstructorDef>,
    accessible: bool,
}

impl ConstructorRef {
    pub(crate) fn new(
        declaring: ClassId,
        declaring_name: Arc<str>,
        def: Arc<ConstructorDef>,
    ) -> Self {
        Self {
            declaring,
            declaring_name,
            def,
            accessible: false,
        }
    }

    /// Parameter types
    pub fn parameter_types(&self) -> &[TypeRef] {
        &self.def.parameters
    }

    /// Modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.def.modifiers
    }

    /// Declaring class
    pub fn declaring_class(&self) -> ClassId {
        self.declaring
    }

    /// Binary name of the declaring class
    pub fn declaring_class_name(&self) -> &str {
        &self.declaring_name
    }

    /// Whether visibility checks are suppressed for this reference
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Suppress visibility checks for this reference
    pub fn set_accessible(&mut self) {
        self.accessible = true;
    }

    pub(crate) fn check_access(&self) -> Result<(), RuntimeError> {
        check_access(self.accessible, self.def.modifiers, || self.to_string())
    }
}

impl fmt::Display for ConstructorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#<init>(", self.declaring_name)?;
        write_params(f, &self.def.parameters)?;
        f.write_str(")")
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[TypeRef]) -> fmt::Result {
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", p)?;
    }
    Ok(())
}

fn check_access(
    accessible: bool,
    modifiers: Modifiers,
    describe: impl FnOnce() -> String,
) -> Result<(), RuntimeError> {
    if accessible || modifiers.is_public() {
        return Ok(());
    }
    Err(RuntimeError::IllegalAccess {
        member: describe(),
        visibility: modifiers.visibility().to_string(),
    })
}
