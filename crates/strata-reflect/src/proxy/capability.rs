//! Capability interface metadata
//!
//! A capability interface describes, method by method, how a Rust-side
//! facade maps onto a runtime class: which methods are fields, which are
//! constructors, and which names they carry on the target.

use strata_runtime::{Modifiers, TypeRef};

use crate::error::{ReflectError, ReflectResult};

/// What an interface method stands for on the target class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberMarker {
    /// Field getter (no parameters) or setter (one parameter, `void`)
    Field,
    /// Method with the same parameters
    Method,
    /// Constructor of the target class
    Constructor,
}

/// One method of a capability interface
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityMethod {
    /// Interface method name
    pub name: String,
    /// Member kind on the target
    pub marker: MemberMarker,
    /// `static` / `private` / `final` markers
    pub modifiers: Modifiers,
    /// Target member names overriding `name`, most preferred first
    pub target_names: Vec<String>,
    /// Return type
    pub return_type: TypeRef,
    /// Parameter types
    pub parameters: Vec<TypeRef>,
}

impl CapabilityMethod {
    fn new(name: impl Into<String>, marker: MemberMarker) -> Self {
        Self {
            name: name.into(),
            marker,
            modifiers: Modifiers::NONE,
            target_names: Vec::new(),
            return_type: TypeRef::VOID,
            parameters: Vec::new(),
        }
    }

    /// Field accessor
    pub fn field(name: impl Into<String>) -> Self {
        Self::new(name, MemberMarker::Field)
    }

    /// Method
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, MemberMarker::Method)
    }

    /// Constructor
    pub fn constructor(name: impl Into<String>) -> Self {
        Self::new(name, MemberMarker::Constructor)
    }

    /// Mark static
    pub fn as_static(mut self) -> Self {
        self.modifiers |= Modifiers::STATIC;
        self
    }

    /// Mark private
    pub fn as_private(mut self) -> Self {
        self.modifiers |= Modifiers::PRIVATE;
        self
    }

    /// Mark final
    pub fn as_final(mut self) -> Self {
        self.modifiers |= Modifiers::FINAL;
        self
    }

    /// Add a target member name
    pub fn target_name(mut self, name: impl Into<String>) -> Self {
        self.target_names.push(name.into());
        self
    }

    /// Return type
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    /// Append a parameter type
    pub fn with_param(mut self, ty: TypeRef) -> Self {
        self.parameters.push(ty);
        self
    }

    /// Names to look up on the target
    pub fn effective_targets(&self) -> Vec<String> {
        if self.target_names.is_empty() {
            vec![self.name.clone()]
        } else {
            self.target_names.clone()
        }
    }

    /// Whether the method is bound to the class rather than a receiver
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }
}

/// Capability interface: a named set of methods against one target class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityInterface {
    /// Interface name
    pub name: String,
    /// Package of the target class
    pub package: Option<String>,
    /// Target class names, most preferred first
    pub target_names: Vec<String>,
    /// Do not use the interface's own name as a target candidate
    pub ignore_current_name: bool,
    /// Methods, in declaration order
    pub methods: Vec<CapabilityMethod>,
}

impl CapabilityInterface {
    /// Interface with no methods
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            target_names: Vec::new(),
            ignore_current_name: false,
            methods: Vec::new(),
        }
    }

    /// Target package
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Add a target class name
    pub fn target_name(mut self, name: impl Into<String>) -> Self {
        self.target_names.push(name.into());
        self
    }

    /// Only use the explicit target names
    pub fn ignore_current_name(mut self) -> Self {
        self.ignore_current_name = true;
        self
    }

    /// Add a method
    pub fn method(mut self, method: CapabilityMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// `package.Name`, or the bare name without a package
    pub fn qualified_name(&self) -> String {
        self.qualify(&self.name)
    }

    fn qualify(&self, name: &str) -> String {
        match self.package.as_deref() {
            Some(pkg) if !pkg.is_empty() && !name.contains('.') => format!("{}.{}", pkg, name),
            _ => name.to_string(),
        }
    }

    /// Binary names of the target class candidates
    pub fn target_classes(&self) -> ReflectResult<Vec<String>> {
        let mut names: Vec<String> = self.target_names.iter().map(|n| self.qualify(n)).collect();
        if !self.ignore_current_name {
            names.push(self.qualify(&self.name));
        }
        names.dedup();
        if names.is_empty() {
            return Err(ReflectError::MalformedSignature {
                declaration: self.name.clone(),
                reason: "capability interface names no target class".to_string(),
            });
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_classes() {
        let iface = CapabilityInterface::new("ProxyTestProxified")
            .package("a.b")
            .target_name("ProxyTestClass");
        assert_eq!(
            iface.target_classes().unwrap(),
            vec!["a.b.ProxyTestClass", "a.b.ProxyTestProxified"]
        );

        let iface = iface.ignore_current_name();
        assert_eq!(iface.target_classes().unwrap(), vec!["a.b.ProxyTestClass"]);
    }

    #[test]
    fn test_no_target_class() {
        let iface = CapabilityInterface::new("Nothing").ignore_current_name();
        assert!(matches!(
            iface.target_classes(),
            Err(ReflectError::MalformedSignature { .. })
        ));
    }

    #[test]
    fn test_method_markers() {
        let m = CapabilityMethod::field("finalId")
            .as_static()
            .as_final()
            .returns(TypeRef::INT);
        assert!(m.is_static());
        assert!(m.modifiers.is_final());
        assert_eq!(m.effective_targets(), vec!["finalId"]);

        let m = CapabilityMethod::method("run").target_name("a").target_name("b");
        assert_eq!(m.effective_targets(), vec!["a", "b"]);
    }
}
