//! Structured member builders
//!
//! The declaration-string entry points cover the common case; builders cover
//! alternative names and declared-only lookups, which the grammar cannot
//! express.

use strata_runtime::{Modifiers, TypeRef};

use super::class::ClassHandle;
use super::member::{ConstructorHandle, FieldHandle, MemberKind, MemberSpec, MethodHandle};
use crate::alias::SymbolCategory;
use crate::constraint::Declaration;
use crate::error::{ReflectError, ReflectResult};

#[derive(Debug, Clone, Default)]
struct Common {
    names: Vec<String>,
    modifiers: Modifiers,
    declared_type: Option<TypeRef>,
    parameters: Vec<TypeRef>,
    declared_only: bool,
}

impl Common {
    fn spec(self, kind: MemberKind, category: SymbolCategory) -> MemberSpec {
        MemberSpec {
            kind,
            category,
            names: self.names,
            parameters: match kind {
                MemberKind::Field => None,
                MemberKind::Method | MemberKind::Constructor => Some(self.parameters),
            },
            declaration: Declaration {
                modifiers: self.modifiers,
                declared_type: self.declared_type,
                class_kind: None,
            },
            declared_only: self.declared_only,
        }
    }

    fn require_names(&self, owner: &ClassHandle, kind: &str) -> ReflectResult<()> {
        if self.names.iter().all(|n| n.is_empty()) {
            return Err(ReflectError::MalformedSignature {
                declaration: owner.describe_member("?"),
                reason: format!("{} builder needs at least one name", kind),
            });
        }
        Ok(())
    }
}

macro_rules! common_setters {
    () => {
        /// Add an alternative name; earlier names are preferred
        pub fn named(mut self, name: impl Into<String>) -> Self {
            self.common.names.push(name.into());
            self
        }

        /// Add several alternative names, in preference order
        pub fn names<I, S>(mut self, names: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.common.names.extend(names.into_iter().map(Into::into));
            self
        }

        /// Declared modifiers
        pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
            self.common.modifiers = modifiers;
            self
        }

        /// Declare the member static
        pub fn as_static(mut self) -> Self {
            self.common.modifiers |= Modifiers::STATIC;
            self
        }

        /// Only consider members declared by the owner itself
        pub fn declared_only(mut self) -> Self {
            self.common.declared_only = true;
            self
        }
    };
}

/// Builder for [`FieldHandle`]
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    owner: ClassHandle,
    common: Common,
}

impl FieldBuilder {
    pub(crate) fn new(owner: ClassHandle) -> Self {
        Self {
            owner,
            common: Common::default(),
        }
    }

    common_setters!();

    /// Declared field type
    pub fn of_type(mut self, ty: TypeRef) -> Self {
        self.common.declared_type = Some(ty);
        self
    }

    /// Create the handle
    pub fn build(self) -> ReflectResult<FieldHandle> {
        self.common.require_names(&self.owner, "field")?;
        let spec = self.common.spec(MemberKind::Field, SymbolCategory::Field);
        Ok(FieldHandle::new(self.owner, spec))
    }
}

/// Builder for [`MethodHandle`]
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    owner: ClassHandle,
    common: Common,
}

impl MethodBuilder {
    pub(crate) fn new(owner: ClassHandle) -> Self {
        Self {
            owner,
            common: Common::default(),
        }
    }

    common_setters!();

    /// Declared return type
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.common.declared_type = Some(ty);
        self
    }

    /// Append a parameter type
    pub fn with_param(mut self, ty: TypeRef) -> Self {
        self.common.parameters.push(ty);
        self
    }

    /// Replace the parameter types
    pub fn parameters(mut self, parameters: Vec<TypeRef>) -> Self {
        self.common.parameters = parameters;
        self
    }

    /// Create the handle
    pub fn build(self) -> ReflectResult<MethodHandle> {
        self.common.require_names(&self.owner, "method")?;
        let spec = self.common.spec(MemberKind::Method, SymbolCategory::Method);
        Ok(MethodHandle::new(self.owner, spec))
    }
}

/// Builder for [`ConstructorHandle`]
#[derive(Debug, Clone)]
pub struct ConstructorBuilder {
    owner: ClassHandle,
    common: Common,
}

impl ConstructorBuilder {
    pub(crate) fn new(owner: ClassHandle) -> Self {
        Self {
            owner,
            common: Common::default(),
        }
    }

    /// Declared modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.common.modifiers = modifiers;
        self
    }

    /// Append a parameter type
    pub fn with_param(mut self, ty: TypeRef) -> Self {
        self.common.parameters.push(ty);
        self
    }

    /// Replace the parameter types
    pub fn parameters(mut self, parameters: Vec<TypeRef>) -> Self {
        self.common.parameters = parameters;
        self
    }

    /// Create the handle
    pub fn build(self) -> ReflectResult<ConstructorHandle> {
        let spec = self
            .common
            .spec(MemberKind::Constructor, SymbolCategory::Method);
        Ok(ConstructorHandle::new(self.owner, spec))
    }
}
