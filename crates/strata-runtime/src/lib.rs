//! Strata Runtime - the managed class model Strata reflects over
//!
//! Classes are registered with [`Runtime::define`] from a [`ClassBuilder`].
//! Member bodies are native closures. Everything the reflective layer needs is
//! exposed here: class lookup by binary name, superclass and interface
//! relations, per-class member introspection, and checked member access
//! through [`FieldRef`], [`MethodRef`] and [`ConstructorRef`].
//!
//! # Example
//!
//! ```ignore
//! use strata_runtime::{ClassBuilder, FieldDefinition, Modifiers, Runtime, TypeRef};
//!
//! let rt = Runtime::new();
//! let id = rt.define(
//!     ClassBuilder::class("com.example.Point")
//!         .field(FieldDefinition::new("x", TypeRef::INT).modifiers(Modifiers::PRIVATE)),
//! )?;
//! let mut x = rt.declared_fields(id)?.remove(0);
//! x.set_accessible();
//! let point = rt.instantiate(id)?;
//! rt.set_field(&x, Some(&point), 3.into())?;
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod class;
pub mod convert;
pub mod error;
pub mod member;
pub mod modifiers;
pub mod object;
pub mod registry;
pub mod types;
pub mod value;

pub use builder::{zero_value, ClassBuilder, ConstructorDefinition, FieldDefinition, MethodDefinition};
pub use class::{ClassDef, ClassId, ClassKind, ConstructorDef, FieldDef, MethodDef};
pub use convert::FromValue;
pub use error::{RuntimeError, RuntimeResult};
pub use member::{ConstructorRef, FieldRef, MethodRef};
pub use modifiers::{Modifiers, Visibility};
pub use object::{ArrayRef, ObjectRef};
pub use registry::{receiver, Runtime, RuntimeStats};
pub use types::{PrimitiveType, TypeRef, ENUM_CLASS, OBJECT_CLASS, STRING_CLASS};
pub use value::Value;
