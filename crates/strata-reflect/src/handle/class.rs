//! Class handles
//!
//! A class handle names a class by one or more candidate binary names (or, for
//! nested classes, simple names inside an enclosing handle). Names go through
//! the rename table before lookup; the first candidate that exists wins.

use std::sync::Arc;

use strata_runtime::{ClassDef, ClassId, TypeRef, Value};

use super::arena::{ClassTarget, HandleId, HandleKey, HandleNode, HandleState, Resolution, Resolved};
use super::builder::{ConstructorBuilder, FieldBuilder, MethodBuilder};
use super::member::{ConstructorHandle, FieldHandle, MemberKind, MemberSpec, MethodHandle};
use crate::alias::SymbolCategory;
use crate::constraint::{Candidate, ConstraintContext, ConstraintResult, Declaration};
use crate::error::{ReflectError, ReflectResult};
use crate::reflector::Reflector;
use crate::signature::{ImportTable, Signature, SignatureKind, SignatureParser};

/// Lazily resolved reference to a class
#[derive(Debug, Clone)]
pub struct ClassHandle {
    pub(crate) reflector: Reflector,
    pub(crate) node: Arc<HandleNode>,
    outer: Option<Box<ClassHandle>>,
    /// Binary name the caller expects; used to parse member declarations
    hint: Arc<str>,
    imports: Arc<ImportTable>,
}

impl ClassHandle {
    pub(crate) fn top_level(
        reflector: &Reflector,
        names: Vec<String>,
        declaration: Declaration,
        imports: &ImportTable,
    ) -> Self {
        let hint: Arc<str> = Arc::from(names.first().map(String::as_str).unwrap_or_default());
        let node = reflector.arena().get_or_create(HandleKey::Class(ClassTarget {
            names,
            owner: None,
            declaration,
        }));
        let mut imports = imports.clone();
        imports.import(hint.to_string());
        Self {
            reflector: reflector.clone(),
            node,
            outer: None,
            hint,
            imports: Arc::new(imports),
        }
    }

    /// Arena address
    pub fn id(&self) -> HandleId {
        self.node.id()
    }

    /// Current resolution state
    pub fn state(&self) -> HandleState {
        self.node.state()
    }

    /// Binary name this handle expects, before renames
    pub fn expected_name(&self) -> &str {
        &self.hint
    }

    /// Enclosing class handle of a nested class handle
    pub fn outer(&self) -> Option<&ClassHandle> {
        self.outer.as_deref()
    }

    /// Member and nested-class handles created under this handle
    pub fn children(&self) -> Vec<HandleId> {
        self.reflector.arena().children(self.id())
    }

    /// Return a copy whose member declarations may use `binary_name` by its simple name
    pub fn with_import(mut self, binary_name: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.imports).import(binary_name);
        self
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    fn resolution(&self) -> ReflectResult<&Resolution> {
        self.node.resolve_with(|| self.resolve_uncached())
    }

    /// Resolve the class, memoised
    pub fn resolve(&self) -> ReflectResult<ClassId> {
        match &self.resolution()?.target {
            Resolved::Class(id) => Ok(*id),
            _ => Err(self.not_a_class()),
        }
    }

    /// Constraint results recorded when the class resolved
    pub fn constraint_results(&self) -> ReflectResult<Vec<ConstraintResult>> {
        Ok(self.resolution()?.constraints.clone())
    }

    fn target(&self) -> Option<&ClassTarget> {
        match self.node.key() {
            HandleKey::Class(target) => Some(target),
            HandleKey::Member { .. } => None,
        }
    }

    fn not_a_class(&self) -> ReflectError {
        ReflectError::ClassNotFound {
            names: vec![self.hint.to_string()],
        }
    }

    fn resolve_uncached(&self) -> ReflectResult<Resolution> {
        let target = self.target().ok_or_else(|| self.not_a_class())?;
        let result = self.lookup(target);
        match &result {
            Ok(res) => {
                if let Resolved::Class(id) = &res.target {
                    tracing::debug!(handle = %self.id(), class = %self.hint, id = %id, "resolved class");
                }
            }
            Err(e) => {
                tracing::warn!(handle = %self.id(), class = %self.hint, error = %e, "class handle failed")
            }
        }
        result
    }

    fn lookup(&self, target: &ClassTarget) -> ReflectResult<Resolution> {
        let runtime = self.reflector.runtime();
        let enclosing = match &self.outer {
            Some(outer) => {
                let outer_id = outer.resolve()?;
                let outer_def = runtime.class(outer_id).ok_or_else(|| ReflectError::ClassNotFound {
                    names: vec![outer.hint.to_string()],
                })?;
                Some(outer_def.name.to_string())
            }
            None => None,
        };

        let mut tried = Vec::new();
        for name in &target.names {
            let candidate = match &enclosing {
                Some(outer) => format!("{}${}", outer, name),
                None => name.clone(),
            };
            let effective = self.reflector.effective_name(SymbolCategory::Class, &candidate);
            if tried.contains(&effective) {
                continue;
            }
            tracing::trace!(handle = %self.id(), candidate = %effective, "class lookup");
            if let Some(def) = runtime.class_by_name(&effective) {
                let ctx = ConstraintContext {
                    runtime,
                    declaration: &target.declaration,
                    candidate: Candidate::Class(&def),
                };
                let constraints = self
                    .reflector
                    .constraints()
                    .evaluate(&ctx)
                    .map_err(|failure| ReflectError::violation(def.name.to_string(), failure))?;
                return Ok(Resolution {
                    target: Resolved::Class(def.id),
                    constraints,
                });
            }
            tried.push(effective);
        }
        Err(ReflectError::ClassNotFound { names: tried })
    }

    /// Registered definition of the resolved class
    pub fn class_def(&self) -> ReflectResult<Arc<ClassDef>> {
        let id = self.resolve()?;
        self.reflector
            .runtime()
            .class(id)
            .ok_or_else(|| self.not_a_class())
    }

    /// Binary name of the resolved class
    pub fn binary_name(&self) -> ReflectResult<String> {
        Ok(self.class_def()?.name.to_string())
    }

    /// Type of the resolved class
    pub fn type_ref(&self) -> ReflectResult<TypeRef> {
        Ok(self.class_def()?.type_ref())
    }

    /// Array type whose elements are the resolved class
    pub fn as_array_type(&self) -> ReflectResult<TypeRef> {
        Ok(TypeRef::array(self.type_ref()?))
    }

    /// Whether `value` is an instance of the resolved class
    pub fn is_instance(&self, value: &Value) -> ReflectResult<bool> {
        let id = self.resolve()?;
        Ok(self.reflector.runtime().is_instance(value, id))
    }

    // ========================================================================
    // Children
    // ========================================================================

    fn parser(&self) -> SignatureParser<'_> {
        SignatureParser::new(&self.imports).with_owner(&self.hint)
    }

    /// Nested class from a declaration such as `private static final class A<T> {}`
    pub fn inner(&self, declaration: &str) -> ReflectResult<ClassHandle> {
        let sig = self.parser().parse(declaration)?;
        let SignatureKind::Class(_) = sig.kind else {
            return Err(expected_kind(declaration, "a class declaration"));
        };
        if sig.package.is_some() {
            return Err(ReflectError::MalformedSignature {
                declaration: declaration.to_string(),
                reason: "nested classes cannot declare a package".to_string(),
            });
        }
        let name = sig.name.clone().unwrap_or_default();
        Ok(self.nested(vec![name], Declaration::from(&sig)))
    }

    /// Nested class by candidate simple names
    pub fn inner_named<I, S>(&self, names: I) -> ClassHandle
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nested(names.into_iter().map(Into::into).collect(), Declaration::default())
    }

    fn nested(&self, names: Vec<String>, declaration: Declaration) -> ClassHandle {
        let simple = names.first().cloned().unwrap_or_default();
        let hint: Arc<str> = Arc::from(format!("{}${}", self.hint, simple));
        let node = self.reflector.arena().get_or_create(HandleKey::Class(ClassTarget {
            names,
            owner: Some(self.id()),
            declaration,
        }));
        let mut imports = (*self.imports).clone();
        imports.import(hint.to_string());
        ClassHandle {
            reflector: self.reflector.clone(),
            node,
            outer: Some(Box::new(self.clone())),
            hint,
            imports: Arc::new(imports),
        }
    }

    /// Field from a declaration such as `private final String test;`
    pub fn field(&self, declaration: &str) -> ReflectResult<FieldHandle> {
        let sig = self.parser().parse(declaration)?;
        if sig.kind != SignatureKind::Field {
            return Err(expected_kind(declaration, "a field declaration"));
        }
        Ok(FieldHandle::new(self.clone(), MemberSpec::from_signature(&sig, MemberKind::Field)))
    }

    /// Method from a declaration such as `void method(String a, int b);`
    pub fn method(&self, declaration: &str) -> ReflectResult<MethodHandle> {
        let sig = self.parser().parse(declaration)?;
        if sig.kind != SignatureKind::Method {
            return Err(expected_kind(declaration, "a method declaration"));
        }
        Ok(MethodHandle::new(self.clone(), MemberSpec::from_signature(&sig, MemberKind::Method)))
    }

    /// Constructor from a declaration such as `public Name(String a);`
    pub fn constructor(&self, declaration: &str) -> ReflectResult<ConstructorHandle> {
        let sig = self.parser().parse(declaration)?;
        if sig.kind != SignatureKind::Constructor {
            return Err(expected_kind(declaration, "a constructor declaration"));
        }
        Ok(ConstructorHandle::new(
            self.clone(),
            MemberSpec::from_signature(&sig, MemberKind::Constructor),
        ))
    }

    /// Structured field builder
    pub fn field_builder(&self) -> FieldBuilder {
        FieldBuilder::new(self.clone())
    }

    /// Structured method builder
    pub fn method_builder(&self) -> MethodBuilder {
        MethodBuilder::new(self.clone())
    }

    /// Structured constructor builder
    pub fn constructor_builder(&self) -> ConstructorBuilder {
        ConstructorBuilder::new(self.clone())
    }

    /// Handle to the enum constant `name` (renames apply under the constant category)
    pub fn enum_constant_handle(&self, name: impl Into<String>) -> FieldHandle {
        FieldHandle::new(self.clone(), MemberSpec::enum_constant(name.into()))
    }

    /// Value of the enum constant `name`
    pub fn enum_constant(&self, name: impl Into<String>) -> ReflectResult<Value> {
        let def = self.class_def()?;
        if def.kind != strata_runtime::ClassKind::Enum {
            return Err(ReflectError::TypeMismatch {
                expected: "enum".to_string(),
                got: format!("{} {}", def.kind, def.name),
            });
        }
        self.enum_constant_handle(name).get_static()
    }

    pub(crate) fn describe_member(&self, member: &str) -> String {
        format!("{}#{}", self.hint, member)
    }
}

fn expected_kind(declaration: &str, expected: &str) -> ReflectError {
    ReflectError::MalformedSignature {
        declaration: declaration.to_string(),
        reason: format!("expected {}", expected),
    }
}

/// Class handle from a class declaration such as `package a.b; public class C {}`
pub(crate) fn from_class_declaration(
    reflector: &Reflector,
    declaration: &str,
    imports: &ImportTable,
) -> ReflectResult<ClassHandle> {
    let sig: Signature = SignatureParser::new(imports).parse(declaration)?;
    let SignatureKind::Class(_) = sig.kind else {
        return Err(expected_kind(declaration, "a class declaration"));
    };
    let name = sig.qualified_name().unwrap_or_default();
    Ok(ClassHandle::top_level(
        reflector,
        vec![name],
        Declaration::from(&sig),
        imports,
    ))
}
