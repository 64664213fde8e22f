//! Class definitions
//!
//! A `ClassDef` is immutable once registered, except for its static field
//! storage. Member bodies are native closures registered through the
//! builder; the runtime calls them with the receiver and positional arguments.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::RuntimeResult;
use crate::modifiers::Modifiers;
use crate::object::ObjectRef;
use crate::registry::Runtime;
use crate::types::TypeRef;
use crate::value::Value;

/// Class identifier (index into the runtime class table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub usize);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a class declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// `class`
    Class,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
}

impl ClassKind {
    /// Declaration keyword
    pub const fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
        }
    }

    /// Parse a declaration keyword
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "class" => Some(ClassKind::Class),
            "interface" => Some(ClassKind::Interface),
            "enum" => Some(ClassKind::Enum),
            _ => None,
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Native method body: `(runtime, receiver, args) -> result`
pub type MethodFn =
    Arc<dyn Fn(&Runtime, Option<&ObjectRef>, &[Value]) -> RuntimeResult<Value> + Send + Sync>;

/// Native constructor body: initialises a freshly allocated instance
pub type ConstructorFn =
    Arc<dyn Fn(&Runtime, &ObjectRef, &[Value]) -> RuntimeResult<()> + Send + Sync>;

/// A declared field
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: TypeRef,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Instance slot, or static slot for static fields
    pub slot: usize,
    /// Value the slot holds before any constructor runs
    pub initial: Value,
}

/// A declared method
#[derive(Clone)]
pub struct MethodDef {
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

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("return_type", &self.return_type)
            .field("parameters", &self.parameters)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}

/// A declared constructor
#[derive(Clone)]
pub struct ConstructorDef {
    /// Parameter types
    pub parameters: Vec<TypeRef>,
    /// Modifiers
    pub modifiers: Modifiers,
    pub(crate) body: ConstructorFn,
}

impl fmt::Debug for ConstructorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDef")
            .field("parameters", &self.parameters)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}

/// A registered class
#[derive(Debug)]
pub struct ClassDef {
    /// Class ID
    pub id: ClassId,
    /// Binary name (`pkg.Outer$Inner`)
    pub name: Arc<str>,
    /// Simple name (`Inner`)
    pub simple_name: String,
    /// Package (`pkg`), empty for the default package
    pub package: String,
    /// Declaration kind
    pub kind: ClassKind,
    /// Class modifiers
    pub modifiers: Modifiers,
    /// Superclass (`None` only for the root class and interfaces)
    pub superclass: Option<ClassId>,
    /// Directly implemented (or, for interfaces, extended) interfaces
    pub interfaces: Vec<ClassId>,
    /// Enclosing class for nested classes
    pub enclosing: Option<ClassId>,
    /// Declared fields, in declaration order
    pub fields: Vec<Arc<FieldDef>>,
    /// Declared methods, in declaration order
    pub methods: Vec<Arc<MethodDef>>,
    /// Declared constructors, in declaration order
    pub constructors: Vec<Arc<ConstructorDef>>,
    /// Enum constant names, in ordinal order
    pub enum_constants: Vec<String>,
    /// Initial values of every instance slot (inherited slots first)
    pub(crate) instance_template: Vec<Value>,
    pub(crate) statics: RwLock<Vec<Value>>,
}

impl ClassDef {
    /// Class type of this class
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::class(self.name.to_string())
    }

    /// Number of instance slots, inherited included
    pub fn instance_slot_count(&self) -> usize {
        self.instance_template.len()
    }

    /// Whether this is an interface
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Declared field by name
    pub fn declared_field(&self, name: &str) -> Option<&Arc<FieldDef>> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn static_value(&self, slot: usize) -> Option<Value> {
        self.statics.read().get(slot).cloned()
    }

    pub(crate) fn set_static_value(&self, slot: usize, value: Value) -> bool {
        match self.statics.write().get_mut(slot) {
            Some(s) => {
                *s = value;
                true
            }
            None => false,
        }
    }
}
