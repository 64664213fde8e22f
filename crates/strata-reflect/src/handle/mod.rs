//! Lazily resolved handles to classes and members
//!
//! Handles are created from declarations without touching the runtime. The
//! first access resolves the target, runs the constraint chain and records
//! the outcome in the handle's arena node; later accesses reuse it.

mod any;
mod arena;
mod builder;
mod class;
mod member;

pub use any::{AnyOf, Resolvable};
pub use arena::{HandleId, HandleState};
pub use builder::{ConstructorBuilder, FieldBuilder, MethodBuilder};
pub use class::ClassHandle;
pub use member::{ConstructorHandle, FieldHandle, MemberKind, MethodHandle};

pub(crate) use arena::HandleArena;
pub(crate) use class::from_class_declaration;
