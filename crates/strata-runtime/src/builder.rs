//! Class Builder
//!
//! Declares classes for registration with [`Runtime::define`]. Superclass,
//! interfaces and the enclosing class are referenced by binary name and
//! resolved at registration time.
//!
//! ```rust,ignore
//! let id = runtime.define(
//!     ClassBuilder::class("com.example.Counter")
//!         .modifiers(Modifiers::PUBLIC)
//!         .field(FieldDefinition::new("count", TypeRef::INT).modifiers(Modifiers::PRIVATE))
//!         .method(
//!             MethodDefinition::new("count", |rt, this, _args| {
//!                 rt.load(receiver(this)?, "count")
//!             })
//!             .returns(TypeRef::INT)
//!             .modifiers(Modifiers::PUBLIC),
//!         ),
//! )?;
//! ```
//!
//! [`Runtime::define`]: crate::Runtime::define

use std::sync::Arc;

use crate::class::{ClassKind, ConstructorFn, MethodFn};
use crate::error::RuntimeResult;
use crate::modifiers::Modifiers;
use crate::object::ObjectRef;
use crate::registry::Runtime;
use crate::types::{PrimitiveType, TypeRef};
use crate::value::Value;

/// Definition for a field
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: TypeRef,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Initial value (defaults to the zero value of `ty`)
    pub initial_value: Option<Value>,
}

impl FieldDefinition {
    /// Create a package-private field definition
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::NONE,
            initial_value: None,
        }
    }

    /// Set the modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the initial value
    pub fn initial_value(mut self, value: impl Into<Value>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    /// Mark as static field
    pub fn as_static(mut self) -> Self {
        self.modifiers |= Modifiers::STATIC;
        self
    }

    pub(crate) fn resolved_initial(&self) -> Value {
        self.initial_value
            .clone()
            .unwrap_or_else(|| zero_value(&self.ty))
    }
}

/// Zero value of a type
pub fn zero_value(ty: &TypeRef) -> Value {
    match ty {
        TypeRef::Primitive(p) => match p {
            PrimitiveType::Void => Value::Null,
            PrimitiveType::Boolean => Value::Bool(false),
            PrimitiveType::Char => Value::Char('\0'),
            PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int => Value::Int(0),
            PrimitiveType::Long => Value::Long(0),
            PrimitiveType::Float | PrimitiveType::Double => Value::Double(0.0),
        },
        _ => Value::Null,
    }
}

/// Definition for a method
#[derive(Clone)]
pub struct MethodDefinition {
    /// Method name
    pub name: String,
    /// Return type
    pub return_type: TypeRef,
    /// Parameter types
    pub parameters: Vec<TypeRef>,
    /// Modifiers
    pub modifiers: Modifiers,
    pub(crate) body: MethodFn,
}

impl MethodDefinition {
    /// Create a package-private `void` method with no parameters
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Runtime, Option<&ObjectRef>, &[Value]) -> RuntimeResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            return_type: TypeRef::VOID,
            parameters: Vec::new(),
            modifiers: Modifiers::NONE,
            body: Arc::new(body),
        }
    }

    /// Set return type
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    /// Add a parameter
    pub fn with_param(mut self, ty: TypeRef) -> Self {
        self.parameters.push(ty);
        self
    }

    /// Set the modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark as static method
    pub fn as_static(mut self) -> Self {
        self.modifiers |= Modifiers::STATIC;
        self
    }
}

/// Definition for a constructor
#[derive(Clone)]
pub struct ConstructorDefinition {
    /// Parameter types
    pub parameters: Vec<TypeRef>,
    /// Modifiers
    pub modifiers: Modifiers,
    pub(crate) body: ConstructorFn,
}

impl ConstructorDefinition {
    /// Create a package-private constructor with no parameters
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&Runtime, &ObjectRef, &[Value]) -> RuntimeResult<()> + Send + Sync + 'static,
    {
        Self {
            parameters: Vec::new(),
            modifiers: Modifiers::NONE,
            body: Arc::new(body),
        }
    }

    /// Constructor that leaves every field at its initial value
    pub fn empty() -> Self {
        Self::new(|_, _, _| Ok(()))
    }

    /// Add a parameter
    pub fn with_param(mut self, ty: TypeRef) -> Self {
        self.parameters.push(ty);
        self
    }

    /// Set the modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Complete definition of a class awaiting registration
#[derive(Clone)]
pub struct ClassBuilder {
    pub(crate) name: String,
    pub(crate) kind: ClassKind,
    pub(crate) modifiers: Modifiers,
    pub(crate) superclass: Option<String>,
    pub(crate) interfaces: Vec<String>,
    pub(crate) fields: Vec<FieldDefinition>,
    pub(crate) methods: Vec<MethodDefinition>,
    pub(crate) constructors: Vec<ConstructorDefinition>,
    pub(crate) enum_constants: Vec<String>,
}

impl ClassBuilder {
    fn with_kind(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::PUBLIC,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            enum_constants: Vec::new(),
        }
    }

    /// Start a `class` by binary name
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Class)
    }

    /// Start an `interface` by binary name
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Interface)
    }

    /// Start an `enum` by binary name
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Enum)
    }

    /// Binary name of the class being built
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the class modifiers (default `public`)
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the superclass by binary name
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Add an implemented interface by binary name
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Add a field
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a method
    pub fn method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a constructor
    pub fn constructor(mut self, constructor: ConstructorDefinition) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Add an enum constant (enums only); becomes a `public static final` field
    pub fn enum_constant(mut self, name: impl Into<String>) -> Self {
        self.enum_constants.push(name.into());
        self
    }
}
