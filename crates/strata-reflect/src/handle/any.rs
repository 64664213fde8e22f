//! Aggregate handles
//!
//! `AnyOf` holds several alternative handles for the same logical target
//! (for example one per platform generation) and yields the first one that
//! resolves.

use strata_runtime::{ClassId, ConstructorRef, FieldRef, MethodRef};

use super::class::ClassHandle;
use super::member::{ConstructorHandle, FieldHandle, MethodHandle};
use crate::error::{ReflectError, ReflectResult};

/// A handle that can be resolved
pub trait Resolvable: Clone {
    /// What resolution produces
    type Target;

    /// Resolve (memoised by the handle itself)
    fn resolve_target(&self) -> ReflectResult<Self::Target>;
}

impl Resolvable for ClassHandle {
    type Target = ClassId;

    fn resolve_target(&self) -> ReflectResult<ClassId> {
        self.resolve()
    }
}

impl Resolvable for FieldHandle {
    type Target = FieldRef;

    fn resolve_target(&self) -> ReflectResult<FieldRef> {
        self.resolve()
    }
}

impl Resolvable for MethodHandle {
    type Target = MethodRef;

    fn resolve_target(&self) -> ReflectResult<MethodRef> {
        self.resolve()
    }
}

impl Resolvable for ConstructorHandle {
    type Target = ConstructorRef;

    fn resolve_target(&self) -> ReflectResult<ConstructorRef> {
        self.resolve()
    }
}

/// First-that-resolves over alternative handles
#[derive(Debug, Clone)]
pub struct AnyOf<H> {
    alternatives: Vec<H>,
}

impl<H: Resolvable> AnyOf<H> {
    /// Empty aggregate
    pub fn new() -> Self {
        Self {
            alternatives: Vec::new(),
        }
    }

    /// Append an alternative
    pub fn or(mut self, handle: H) -> Self {
        self.alternatives.push(handle);
        self
    }

    /// Append an alternative that may have failed to build
    pub fn or_try(self, handle: ReflectResult<H>) -> ReflectResult<Self> {
        Ok(self.or(handle?))
    }

    /// Alternatives in order
    pub fn alternatives(&self) -> &[H] {
        &self.alternatives
    }

    /// First alternative that resolves; every error otherwise
    pub fn resolve(&self) -> ReflectResult<H> {
        let mut errors = Vec::with_capacity(self.alternatives.len());
        for handle in &self.alternatives {
            match handle.resolve_target() {
                Ok(_) => return Ok(handle.clone()),
                Err(e) => errors.push(e),
            }
        }
        tracing::debug!(alternatives = self.alternatives.len(), "no alternative resolved");
        Err(ReflectError::NoAlternative(errors))
    }
}

impl<H: Resolvable> Default for AnyOf<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Resolvable> FromIterator<H> for AnyOf<H> {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        Self {
            alternatives: iter.into_iter().collect(),
        }
    }
}
