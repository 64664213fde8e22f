//! Constraint Engine
//!
//! Constraints are named acceptance rules run against the candidate a handle
//! resolved to. Each one may abstain, pass or fail; the first failure rejects
//! the candidate and the handle fails with it.

use std::fmt;
use std::sync::Arc;

use strata_runtime::{
    ClassDef, ClassKind, ConstructorRef, FieldRef, MethodRef, Modifiers, Runtime, TypeRef,
};

use crate::signature::{Signature, SignatureKind};

// ============================================================================
// Declarations and candidates
// ============================================================================

/// What the caller declared about the target
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Declaration {
    /// Declared modifiers
    pub modifiers: Modifiers,
    /// Declared field type or return type
    pub declared_type: Option<TypeRef>,
    /// Declared class kind, for class targets
    pub class_kind: Option<ClassKind>,
}

impl From<&Signature> for Declaration {
    fn from(sig: &Signature) -> Self {
        let (declared_type, class_kind) = match sig.kind {
            SignatureKind::Field | SignatureKind::Method => (sig.declared_type.clone(), None),
            SignatureKind::Constructor => (None, None),
            SignatureKind::Class(kind) => (None, Some(kind)),
        };
        Self {
            modifiers: sig.modifiers,
            declared_type,
            class_kind,
        }
    }
}

/// A resolution candidate
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'a> {
    /// Class
    Class(&'a ClassDef),
    /// Field
    Field(&'a FieldRef),
    /// Method
    Method(&'a MethodRef),
    /// Constructor
    Constructor(&'a ConstructorRef),
}

impl Candidate<'_> {
    /// Actual modifiers
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Candidate::Class(c) => c.modifiers,
            Candidate::Field(f) => f.modifiers(),
            Candidate::Method(m) => m.modifiers(),
            Candidate::Constructor(c) => c.modifiers(),
        }
    }

    /// Actual field type or return type
    pub fn actual_type(&self) -> Option<&TypeRef> {
        match self {
            Candidate::Field(f) => Some(f.field_type()),
            Candidate::Method(m) => Some(m.return_type()),
            _ => None,
        }
    }

    /// Name used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            Candidate::Class(c) => c.name.to_string(),
            Candidate::Field(f) => f.to_string(),
            Candidate::Method(m) => m.to_string(),
            Candidate::Constructor(c) => c.to_string(),
        }
    }
}

/// Input to a constraint
#[derive(Debug, Clone, Copy)]
pub struct ConstraintContext<'a> {
    /// Runtime the candidate lives in
    pub runtime: &'a Runtime,
    /// What the caller declared
    pub declaration: &'a Declaration,
    /// What resolution found
    pub candidate: Candidate<'a>,
}

// ============================================================================
// Verdicts
// ============================================================================

/// Outcome of one constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The constraint accepted the candidate
    Pass,
    /// The constraint rejected the candidate
    Fail(String),
    /// The constraint does not apply to this candidate
    NotApplicable,
}

impl Verdict {
    /// `Pass` when `ok`, otherwise `Fail(reason())`
    pub fn check(ok: bool, reason: impl FnOnce() -> String) -> Self {
        if ok {
            Verdict::Pass
        } else {
            Verdict::Fail(reason())
        }
    }
}

/// Recorded outcome of one constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintResult {
    /// Constraint category
    pub category: String,
    /// Constraint name
    pub name: String,
    /// Verdict
    pub verdict: Verdict,
}

impl ConstraintResult {
    /// `category/name`
    pub fn id(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }

    /// Whether the verdict is a failure
    pub fn failed(&self) -> bool {
        matches!(self.verdict, Verdict::Fail(_))
    }
}

impl fmt::Display for ConstraintResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.verdict {
            Verdict::Pass => write!(f, "{}: pass", self.id()),
            Verdict::Fail(reason) => write!(f, "{}: fail ({})", self.id(), reason),
            Verdict::NotApplicable => write!(f, "{}: n/a", self.id()),
        }
    }
}

/// A named acceptance rule
pub trait ReflectiveConstraint: Send + Sync {
    /// Category, e.g. `visibility`
    fn category(&self) -> &str;

    /// Name within the category
    fn name(&self) -> &str;

    /// Evaluate against a candidate
    fn applies_to(&self, ctx: &ConstraintContext<'_>) -> Verdict;
}

// ============================================================================
// Engine
// ============================================================================

/// Ordered chain of constraints
#[derive(Clone, Default)]
pub struct ConstraintEngine {
    constraints: Vec<Arc<dyn ReflectiveConstraint>>,
}

impl ConstraintEngine {
    /// Empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain with every built-in constraint
    pub fn with_defaults() -> Self {
        Self::new()
            .with(VisibilityConstraint)
            .with(DeclaredTypeConstraint)
            .with(ClassKindConstraint)
    }

    /// Append a constraint (builder style)
    pub fn with(mut self, constraint: impl ReflectiveConstraint + 'static) -> Self {
        self.register(constraint);
        self
    }

    /// Append a constraint
    pub fn register(&mut self, constraint: impl ReflectiveConstraint + 'static) {
        self.constraints.push(Arc::new(constraint));
    }

    /// Remove every constraint with this category and name
    pub fn remove(&mut self, category: &str, name: &str) -> bool {
        let before = self.constraints.len();
        self.constraints
            .retain(|c| !(c.category() == category && c.name() == name));
        self.constraints.len() != before
    }

    /// `category/name` of every constraint, in order
    pub fn ids(&self) -> Vec<String> {
        self.constraints
            .iter()
            .map(|c| format!("{}/{}", c.category(), c.name()))
            .collect()
    }

    /// Number of constraints
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Run the chain, stopping at the first failure.
    ///
    /// Returns every result on success, or the failing result.
    pub fn evaluate(
        &self,
        ctx: &ConstraintContext<'_>,
    ) -> Result<Vec<ConstraintResult>, ConstraintResult> {
        let mut results = Vec::with_capacity(self.constraints.len());
        for constraint in &self.constraints {
            let result = ConstraintResult {
                category: constraint.category().to_string(),
                name: constraint.name().to_string(),
                verdict: constraint.applies_to(ctx),
            };
            tracing::trace!(candidate = %ctx.candidate.describe(), %result, "constraint");
            if result.failed() {
                return Err(result);
            }
            results.push(result);
        }
        Ok(results)
    }
}

impl fmt::Debug for ConstraintEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintEngine")
            .field("constraints", &self.ids())
            .finish()
    }
}

// ============================================================================
// Built-in constraints
// ============================================================================

/// Declared visibility must match the actual visibility
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityConstraint;

impl ReflectiveConstraint for VisibilityConstraint {
    fn category(&self) -> &str {
        "visibility"
    }

    fn name(&self) -> &str {
        "modifiers"
    }

    fn applies_to(&self, ctx: &ConstraintContext<'_>) -> Verdict {
        let declared = ctx.declaration.modifiers;
        if !declared.has_explicit_visibility() {
            return Verdict::NotApplicable;
        }
        let actual = ctx.candidate.modifiers();
        Verdict::check(declared.visibility() == actual.visibility(), || {
            format!(
                "declared {} but {} is {}",
                declared.visibility(),
                ctx.candidate.describe(),
                actual.visibility()
            )
        })
    }
}

/// Whether a value of type `actual` can stand where `declared` was written.
/// `void` only matches itself.
pub(crate) fn type_accepts(runtime: &Runtime, declared: &TypeRef, actual: &TypeRef) -> bool {
    if declared.is_void() || actual.is_void() {
        declared == actual
    } else {
        runtime.is_assignable(declared, actual)
    }
}

/// Declared type must be assignable from the actual field or return type
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredTypeConstraint;

impl ReflectiveConstraint for DeclaredTypeConstraint {
    fn category(&self) -> &str {
        "type"
    }

    fn name(&self) -> &str {
        "declared-type"
    }

    fn applies_to(&self, ctx: &ConstraintContext<'_>) -> Verdict {
        let (Some(declared), Some(actual)) =
            (ctx.declaration.declared_type.as_ref(), ctx.candidate.actual_type())
        else {
            return Verdict::NotApplicable;
        };
        let ok = type_accepts(ctx.runtime, declared, actual);
        Verdict::check(ok, || {
            format!("declared {} is not assignable from {}", declared, actual)
        })
    }
}

/// Declared class kind must match the actual class kind
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassKindConstraint;

impl ReflectiveConstraint for ClassKindConstraint {
    fn category(&self) -> &str {
        "class"
    }

    fn name(&self) -> &str {
        "kind"
    }

    fn applies_to(&self, ctx: &ConstraintContext<'_>) -> Verdict {
        let (Candidate::Class(class), Some(declared)) = (ctx.candidate, ctx.declaration.class_kind)
        else {
            return Verdict::NotApplicable;
        };
        Verdict::check(class.kind == declared, || {
            format!("declared {} but {} is {}", declared, class.name, class.kind)
        })
    }
}
