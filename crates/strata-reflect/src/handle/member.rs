//! Member handles and member resolution
//!
//! Member resolution walks the owner (and unless restricted, its ancestors:
//! superclass chain first, then interfaces breadth-first), keeps members
//! whose kind, name, parameter types and static-ness match, and ranks them by
//! `(depth of the declaring class, index of the matched name)`.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use strata_runtime::{
    ClassId, ConstructorRef, FieldRef, MethodRef, Modifiers, ObjectRef, Runtime, RuntimeError,
    TypeRef, Value,
};

use super::arena::{HandleId, HandleKey, HandleNode, HandleState, Resolution, Resolved};
use super::class::ClassHandle;
use crate::alias::SymbolCategory;
use crate::constraint::{
    type_accepts, Candidate, ConstraintContext, ConstraintResult, Declaration,
};
use crate::error::{ReflectError, ReflectResult};
use crate::reflector::Reflector;
use crate::signature::Signature;

/// Kind of member a handle targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Field
    Field,
    /// Method
    Method,
    /// Constructor
    Constructor,
}

/// What a member handle looks for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MemberSpec {
    pub kind: MemberKind,
    /// Category used for rename lookups
    pub category: SymbolCategory,
    /// Alternative names, most preferred first; empty for constructors
    pub names: Vec<String>,
    /// Exact parameter types; `None` for fields
    pub parameters: Option<Vec<TypeRef>>,
    pub declaration: Declaration,
    /// Only look at the owner's own members
    pub declared_only: bool,
}

impl MemberSpec {
    pub fn from_signature(sig: &Signature, kind: MemberKind) -> Self {
        let (category, names, parameters) = match kind {
            MemberKind::Field => (SymbolCategory::Field, sig.name.iter().cloned().collect(), None),
            MemberKind::Method => (
                SymbolCategory::Method,
                sig.name.iter().cloned().collect(),
                Some(sig.parameter_types()),
            ),
            MemberKind::Constructor => {
                (SymbolCategory::Method, Vec::new(), Some(sig.parameter_types()))
            }
        };
        Self {
            kind,
            category,
            names,
            parameters,
            declaration: Declaration::from(sig),
            declared_only: false,
        }
    }

    pub fn enum_constant(name: String) -> Self {
        Self {
            kind: MemberKind::Field,
            category: SymbolCategory::Constant,
            names: vec![name],
            parameters: None,
            declaration: Declaration {
                modifiers: Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
                declared_type: None,
                class_kind: None,
            },
            declared_only: true,
        }
    }

    fn wants_static(&self) -> bool {
        self.declaration.modifiers.is_static()
    }

    /// Short form used in diagnostics: `name`, `a|b(int)`, `<init>(String)`
    pub fn describe(&self) -> String {
        let name = match self.kind {
            MemberKind::Constructor => "<init>".to_string(),
            _ => self.names.join("|"),
        };
        match &self.parameters {
            Some(params) => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                format!("{}({})", name, params.join(", "))
            }
            None => name,
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Classes to search, paired with their depth below `start`
fn hierarchy(runtime: &Runtime, start: ClassId) -> Vec<(ClassId, usize)> {
    let mut order = Vec::new();
    let mut seen = FxHashSet::default();

    let mut current = Some(start);
    while let Some(id) = current {
        if !seen.insert(id) {
            break;
        }
        order.push((id, order.len()));
        current = runtime.superclass(id);
    }

    let base = order.len();
    let mut queue: VecDeque<(ClassId, usize)> = order
        .iter()
        .flat_map(|(id, _)| runtime.interfaces(*id))
        .map(|iface| (iface, 0))
        .collect();
    while let Some((iface, level)) = queue.pop_front() {
        if !seen.insert(iface) {
            continue;
        }
        order.push((iface, base + level));
        queue.extend(runtime.interfaces(iface).into_iter().map(|i| (i, level + 1)));
    }
    order
}

fn effective_names(reflector: &Reflector, spec: &MemberSpec) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(spec.names.len());
    for name in &spec.names {
        let effective = reflector.effective_name(spec.category, name);
        if !names.contains(&effective) {
            names.push(effective);
        }
    }
    names
}

fn lookup_error(owner: &str, spec: &MemberSpec, e: RuntimeError) -> ReflectError {
    match e {
        RuntimeError::ClassNotFound(name) => ReflectError::ClassNotFound { names: vec![name] },
        _ => ReflectError::MemberNotFound {
            owner: owner.to_string(),
            member: spec.describe(),
        },
    }
}

fn collect_candidates(
    runtime: &Runtime,
    owner_name: &str,
    spec: &MemberSpec,
    names: &[String],
    class: ClassId,
    depth: usize,
    found: &mut Vec<((usize, usize), Resolved)>,
) -> ReflectResult<()> {
    let wants_static = spec.wants_static();
    let params_match = |actual: &[TypeRef]| {
        spec.parameters
            .as_deref()
            .map_or(true, |expected| expected == actual)
    };
    match spec.kind {
        MemberKind::Field => {
            for field in runtime
                .declared_fields(class)
                .map_err(|e| lookup_error(owner_name, spec, e))?
            {
                let Some(index) = names.iter().position(|n| n == field.name()) else {
                    continue;
                };
                if field.modifiers().is_static() == wants_static {
                    tracing::trace!(candidate = %field, depth, index, "field candidate");
                    found.push(((depth, index), Resolved::Field(field)));
                }
            }
        }
        MemberKind::Method => {
            for method in runtime
                .declared_methods(class)
                .map_err(|e| lookup_error(owner_name, spec, e))?
            {
                let Some(index) = names.iter().position(|n| n == method.name()) else {
                    continue;
                };
                if method.modifiers().is_static() == wants_static
                    && params_match(method.parameter_types())
                {
                    tracing::trace!(candidate = %method, depth, index, "method candidate");
                    found.push(((depth, index), Resolved::Method(method)));
                }
            }
        }
        MemberKind::Constructor => {
            for constructor in runtime
                .declared_constructors(class)
                .map_err(|e| lookup_error(owner_name, spec, e))?
            {
                if params_match(constructor.parameter_types()) {
                    tracing::trace!(candidate = %constructor, "constructor candidate");
                    found.push(((depth, 0), Resolved::Constructor(constructor)));
                }
            }
        }
    }
    Ok(())
}

fn resolved_type(resolved: &Resolved) -> Option<&TypeRef> {
    match resolved {
        Resolved::Field(f) => Some(f.field_type()),
        Resolved::Method(m) => Some(m.return_type()),
        Resolved::Class(_) | Resolved::Constructor(_) => None,
    }
}

fn describe_resolved(resolved: &Resolved) -> String {
    match resolved {
        Resolved::Class(id) => id.to_string(),
        Resolved::Field(f) => f.to_string(),
        Resolved::Method(m) => m.to_string(),
        Resolved::Constructor(c) => c.to_string(),
    }
}

/// Resolve `spec` against the class `owner`
pub(crate) fn resolve_member(
    reflector: &Reflector,
    owner: ClassId,
    spec: &MemberSpec,
) -> ReflectResult<Resolution> {
    let runtime = reflector.runtime();
    let owner_name = runtime
        .class(owner)
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| owner.to_string());
    let names = effective_names(reflector, spec);

    let scope = if spec.declared_only || spec.kind == MemberKind::Constructor {
        vec![(owner, 0)]
    } else {
        hierarchy(runtime, owner)
    };

    let mut found = Vec::new();
    for (class, depth) in scope {
        collect_candidates(runtime, &owner_name, spec, &names, class, depth, &mut found)?;
    }

    // Keep only candidates whose type fits the declaration. If none fits, keep
    // them all so the constraint chain reports the mismatch.
    if let Some(declared) = spec.declaration.declared_type.as_ref() {
        let fits = |resolved: &Resolved| match resolved_type(resolved) {
            Some(actual) => type_accepts(runtime, declared, actual),
            None => true,
        };
        if found.iter().any(|(_, resolved)| fits(resolved)) {
            found.retain(|(_, resolved)| fits(resolved));
        }
    }

    let Some(best) = found.iter().map(|(rank, _)| *rank).min() else {
        return Err(ReflectError::MemberNotFound {
            owner: owner_name,
            member: spec.describe(),
        });
    };
    let mut winners: Vec<Resolved> = found
        .into_iter()
        .filter(|(rank, _)| *rank == best)
        .map(|(_, resolved)| resolved)
        .collect();
    if winners.len() > 1 {
        return Err(ReflectError::AmbiguousMember {
            owner: owner_name,
            member: spec.describe(),
            candidates: winners.iter().map(describe_resolved).collect(),
        });
    }
    let mut target = winners.remove(0);

    let candidate = match &target {
        Resolved::Class(_) => None,
        Resolved::Field(f) => Some(Candidate::Field(f)),
        Resolved::Method(m) => Some(Candidate::Method(m)),
        Resolved::Constructor(c) => Some(Candidate::Constructor(c)),
    };
    let constraints = match candidate {
        Some(candidate) => {
            let ctx = ConstraintContext {
                runtime,
                declaration: &spec.declaration,
                candidate,
            };
            reflector
                .constraints()
                .evaluate(&ctx)
                .map_err(|failure| ReflectError::violation(candidate.describe(), failure))?
        }
        None => Vec::new(),
    };

    match &mut target {
        Resolved::Class(_) => {}
        Resolved::Field(f) => f.set_accessible(),
        Resolved::Method(m) => m.set_accessible(),
        Resolved::Constructor(c) => c.set_accessible(),
    }
    Ok(Resolution {
        target,
        constraints,
    })
}

/// Node plus owner, shared by the three member handle types
#[derive(Clone)]
struct MemberNode {
    owner: ClassHandle,
    spec: Arc<MemberSpec>,
    node: Arc<HandleNode>,
}

impl MemberNode {
    fn new(owner: ClassHandle, spec: MemberSpec) -> Self {
        let node = owner.reflector.arena().get_or_create(HandleKey::Member {
            owner: owner.id(),
            spec: spec.clone(),
        });
        Self {
            owner,
            spec: Arc::new(spec),
            node,
        }
    }

    fn describe(&self) -> String {
        self.owner.describe_member(&self.spec.describe())
    }

    fn resolution(&self) -> ReflectResult<&Resolution> {
        self.node.resolve_with(|| {
            let description = self.describe();
            tracing::debug!(handle = %self.node.id(), member = %description, "resolving member");
            let result = self
                .owner
                .resolve()
                .and_then(|owner| resolve_member(&self.owner.reflector, owner, &self.spec));
            match &result {
                Ok(res) => tracing::debug!(
                    handle = %self.node.id(),
                    member = %describe_resolved(&res.target),
                    "resolved member"
                ),
                Err(e) => tracing::warn!(
                    handle = %self.node.id(),
                    member = %description,
                    error = %e,
                    "member handle failed"
                ),
            }
            result
        })
    }
}

impl fmt::Debug for MemberNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberNode")
            .field("owner", &self.owner.id())
            .field("node", &self.node)
            .finish()
    }
}

fn kind_mismatch(expected: &str, resolved: &Resolved) -> ReflectError {
    ReflectError::TypeMismatch {
        expected: expected.to_string(),
        got: describe_resolved(resolved),
    }
}

// ============================================================================
// Field handles
// ============================================================================

/// Lazily resolved field
#[derive(Debug, Clone)]
pub struct FieldHandle {
    inner: MemberNode,
}

impl FieldHandle {
    pub(crate) fn new(owner: ClassHandle, spec: MemberSpec) -> Self {
        Self {
            inner: MemberNode::new(owner, spec),
        }
    }

    /// Arena address
    pub fn id(&self) -> HandleId {
        self.inner.node.id()
    }

    /// Current resolution state
    pub fn state(&self) -> HandleState {
        self.inner.node.state()
    }

    /// Owning class handle
    pub fn owner(&self) -> &ClassHandle {
        &self.inner.owner
    }

    /// Resolve the field, memoised
    pub fn resolve(&self) -> ReflectResult<FieldRef> {
        match &self.inner.resolution()?.target {
            Resolved::Field(field) => Ok(field.clone()),
            other => Err(kind_mismatch("field", other)),
        }
    }

    /// Constraint results recorded at resolution
    pub fn constraint_results(&self) -> ReflectResult<Vec<ConstraintResult>> {
        Ok(self.inner.resolution()?.constraints.clone())
    }

    /// Read the field; `receiver` is ignored for static fields
    pub fn read(&self, receiver: Option<&ObjectRef>) -> ReflectResult<Value> {
        let field = self.resolve()?;
        let runtime = self.inner.owner.reflector.runtime();
        runtime
            .get_field(&field, receiver)
            .map_err(|e| ReflectError::invocation(field.to_string(), e))
    }

    /// Write the field; `receiver` is ignored for static fields
    pub fn write(&self, receiver: Option<&ObjectRef>, value: Value) -> ReflectResult<()> {
        let field = self.resolve()?;
        let runtime = self.inner.owner.reflector.runtime();
        runtime
            .set_field(&field, receiver, value)
            .map_err(|e| ReflectError::invocation(field.to_string(), e))
    }

    /// Read an instance field
    pub fn get(&self, receiver: &ObjectRef) -> ReflectResult<Value> {
        self.read(Some(receiver))
    }

    /// Read a static field
    pub fn get_static(&self) -> ReflectResult<Value> {
        self.read(None)
    }

    /// Write an instance field
    pub fn set(&self, receiver: &ObjectRef, value: impl Into<Value>) -> ReflectResult<()> {
        self.write(Some(receiver), value.into())
    }

    /// Write a static field
    pub fn set_static(&self, value: impl Into<Value>) -> ReflectResult<()> {
        self.write(None, value.into())
    }
}

// ============================================================================
// Method handles
// ============================================================================

/// Lazily resolved method
#[derive(Debug, Clone)]
pub struct MethodHandle {
    inner: MemberNode,
}

impl MethodHandle {
    pub(crate) fn new(owner: ClassHandle, spec: MemberSpec) -> Self {
        Self {
            inner: MemberNode::new(owner, spec),
        }
    }

    /// Arena address
    pub fn id(&self) -> HandleId {
        self.inner.node.id()
    }

    /// Current resolution state
    pub fn state(&self) -> HandleState {
        self.inner.node.state()
    }

    /// Owning class handle
    pub fn owner(&self) -> &ClassHandle {
        &self.inner.owner
    }

    /// Resolve the method, memoised
    pub fn resolve(&self) -> ReflectResult<MethodRef> {
        match &self.inner.resolution()?.target {
            Resolved::Method(method) => Ok(method.clone()),
            other => Err(kind_mismatch("method", other)),
        }
    }

    /// Constraint results recorded at resolution
    pub fn constraint_results(&self) -> ReflectResult<Vec<ConstraintResult>> {
        Ok(self.inner.resolution()?.constraints.clone())
    }

    /// Invoke with an optional receiver; `None` for static methods
    pub fn call(&self, receiver: Option<&ObjectRef>, args: &[Value]) -> ReflectResult<Value> {
        let method = self.resolve()?;
        let runtime = self.inner.owner.reflector.runtime();
        runtime
            .invoke(&method, receiver, args)
            .map_err(|e| ReflectError::invocation(method.to_string(), e))
    }

    /// Invoke an instance method on `receiver`
    pub fn invoke(&self, receiver: &ObjectRef, args: &[Value]) -> ReflectResult<Value> {
        self.call(Some(receiver), args)
    }

    /// Invoke a static method
    pub fn invoke_static(&self, args: &[Value]) -> ReflectResult<Value> {
        self.call(None, args)
    }
}

// ============================================================================
// Constructor handles
// ============================================================================

/// Lazily resolved constructor
#[derive(Debug, Clone)]
pub struct ConstructorHandle {
    inner: MemberNode,
}

impl ConstructorHandle {
    pub(crate) fn new(owner: ClassHandle, spec: MemberSpec) -> Self {
        Self {
            inner: MemberNode::new(owner, spec),
        }
    }

    /// Arena address
    pub fn id(&self) -> HandleId {
        self.inner.node.id()
    }

    /// Current resolution state
    pub fn state(&self) -> HandleState {
        self.inner.node.state()
    }

    /// Owning class handle
    pub fn owner(&self) -> &ClassHandle {
        &self.inner.owner
    }

    /// Resolve the constructor, memoised
    pub fn resolve(&self) -> ReflectResult<ConstructorRef> {
        match &self.inner.resolution()?.target {
            Resolved::Constructor(constructor) => Ok(constructor.clone()),
            other => Err(kind_mismatch("constructor", other)),
        }
    }

    /// Constraint results recorded at resolution
    pub fn constraint_results(&self) -> ReflectResult<Vec<ConstraintResult>> {
        Ok(self.inner.resolution()?.constraints.clone())
    }

    /// Create a new instance
    pub fn new_instance(&self, args: &[Value]) -> ReflectResult<ObjectRef> {
        let constructor = self.resolve()?;
        let runtime = self.inner.owner.reflector.runtime();
        runtime
            .construct(&constructor, args)
            .map_err(|e| ReflectError::invocation(constructor.to_string(), e))
    }
}
