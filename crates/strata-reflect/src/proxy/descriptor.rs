//! Proxy descriptors and bound proxies
//!
//! A descriptor is the dispatch table of one capability interface: for
//! every `(method name, arity)` it records the handle it forwards to and
//! how. Nothing is resolved while the table is built.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use strata_runtime::{Modifiers, ObjectRef, Value};

use super::capability::{CapabilityInterface, CapabilityMethod, MemberMarker};
use crate::error::{ReflectError, ReflectResult};
use crate::handle::{ClassHandle, ConstructorHandle, FieldHandle, MethodHandle};

/// How a binding obtains its receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// No receiver
    Static,
    /// The bound proxy's receiver
    Instance,
    /// Creates the receiver
    Constructor,
}

/// What a binding does with its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read a field
    Getter,
    /// Write a field
    Setter,
    /// Invoke a method
    Invoke,
    /// Run a constructor
    Construct,
}

#[derive(Debug, Clone)]
enum Target {
    Field(FieldHandle),
    Method(MethodHandle),
    Constructor(ConstructorHandle),
}

/// Forwarding rule for one interface method
#[derive(Debug, Clone)]
pub struct TargetBinding {
    kind: BindingKind,
    access: Access,
    target: Target,
}

impl TargetBinding {
    /// Receiver kind
    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    /// Access kind
    pub fn access(&self) -> Access {
        self.access
    }

    /// Whether the target member has been resolved
    pub fn is_resolved(&self) -> bool {
        use crate::handle::HandleState;
        let state = match &self.target {
            Target::Field(h) => h.state(),
            Target::Method(h) => h.state(),
            Target::Constructor(h) => h.state(),
        };
        state == HandleState::Resolved
    }

    fn dispatch(&self, receiver: Option<&ObjectRef>, args: &[Value]) -> ReflectResult<Value> {
        match (&self.target, self.access) {
            (Target::Field(field), Access::Setter) => {
                let value = args.first().cloned().unwrap_or(Value::Null);
                field.write(receiver, value)?;
                Ok(Value::Null)
            }
            (Target::Field(field), _) => field.read(receiver),
            (Target::Method(method), _) => method.call(receiver, args),
            (Target::Constructor(constructor), _) => {
                constructor.new_instance(args).map(Value::Object)
            }
        }
    }
}

/// Declaration modifiers derived from the method markers
fn declared_modifiers(method: &CapabilityMethod) -> Modifiers {
    method
        .modifiers
        .intersection(Modifiers::STATIC | Modifiers::PRIVATE | Modifiers::FINAL)
}

fn malformed(iface: &CapabilityInterface, method: &CapabilityMethod, reason: &str) -> ReflectError {
    ReflectError::MalformedSignature {
        declaration: format!("{}#{}", iface.name, method.name),
        reason: reason.to_string(),
    }
}

fn binding_for(
    iface: &CapabilityInterface,
    class: &ClassHandle,
    method: &CapabilityMethod,
) -> ReflectResult<TargetBinding> {
    let modifiers = declared_modifiers(method);
    let kind = if method.is_static() {
        BindingKind::Static
    } else {
        BindingKind::Instance
    };
    match method.marker {
        MemberMarker::Field => {
            let (access, field_type) = match method.parameters.as_slice() {
                [] => (Access::Getter, method.return_type.clone()),
                [ty] if method.return_type.is_void() => (Access::Setter, ty.clone()),
                _ => {
                    return Err(malformed(
                        iface,
                        method,
                        "field accessors take no parameter (getter) or one parameter returning void (setter)",
                    ))
                }
            };
            let handle = class
                .field_builder()
                .names(method.effective_targets())
                .modifiers(modifiers)
                .of_type(field_type)
                .build()?;
            Ok(TargetBinding {
                kind,
                access,
                target: Target::Field(handle),
            })
        }
        MemberMarker::Method => {
            let handle = class
                .method_builder()
                .names(method.effective_targets())
                .modifiers(modifiers)
                .returns(method.return_type.clone())
                .parameters(method.parameters.clone())
                .build()?;
            Ok(TargetBinding {
                kind,
                access: Access::Invoke,
                target: Target::Method(handle),
            })
        }
        MemberMarker::Constructor => {
            let handle = class
                .constructor_builder()
                .modifiers(modifiers.intersection(Modifiers::PRIVATE))
                .parameters(method.parameters.clone())
                .build()?;
            Ok(TargetBinding {
                kind: BindingKind::Constructor,
                access: Access::Construct,
                target: Target::Constructor(handle),
            })
        }
    }
}

/// Dispatch table of one capability interface
pub struct ProxyDescriptor {
    interface: String,
    class: ClassHandle,
    bindings: FxHashMap<(String, usize), TargetBinding>,
}

impl ProxyDescriptor {
    pub(crate) fn build(iface: &CapabilityInterface, class: ClassHandle) -> ReflectResult<Self> {
        let mut bindings = FxHashMap::default();
        for method in &iface.methods {
            let key = (method.name.clone(), method.parameters.len());
            if bindings.contains_key(&key) {
                return Err(malformed(iface, method, "duplicate method name and arity"));
            }
            bindings.insert(key, binding_for(iface, &class, method)?);
        }
        Ok(Self {
            interface: iface.name.clone(),
            class,
            bindings,
        })
    }

    /// Interface name
    pub fn interface_name(&self) -> &str {
        &self.interface
    }

    /// Target class handle
    pub fn class(&self) -> &ClassHandle {
        &self.class
    }

    /// Binding of `method` with `arity` parameters
    pub fn binding(&self, method: &str, arity: usize) -> Option<&TargetBinding> {
        self.bindings.get(&(method.to_string(), arity))
    }

    /// Number of bound interface methods
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the interface has no methods
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn lookup(&self, method: &str, arity: usize) -> ReflectResult<&TargetBinding> {
        self.binding(method, arity)
            .ok_or_else(|| ReflectError::UnknownProxyMethod {
                interface: self.interface.clone(),
                method: format!("{}/{}", method, arity),
            })
    }

    fn qualified(&self, method: &str) -> String {
        format!("{}#{}", self.interface, method)
    }

    /// Call on the unbound proxy: static members and constructors only
    pub fn call(&self, method: &str, args: &[Value]) -> ReflectResult<Value> {
        let binding = self.lookup(method, args.len())?;
        if binding.kind == BindingKind::Instance {
            return Err(ReflectError::UnsupportedProxyCall {
                method: self.qualified(method),
                reason: "instance member called without a bound receiver".to_string(),
            });
        }
        binding.dispatch(None, args)
    }

    /// Pair with a receiver of the target class
    pub fn bind(self: &Arc<Self>, receiver: ObjectRef) -> ReflectResult<BoundProxy> {
        let value = Value::Object(receiver.clone());
        if !self.class.is_instance(&value)? {
            return Err(ReflectError::TypeMismatch {
                expected: self.class.binary_name()?,
                got: receiver.class_name().to_string(),
            });
        }
        tracing::trace!(interface = %self.interface, receiver = %receiver.class_name(), "bound proxy");
        Ok(BoundProxy {
            descriptor: Arc::clone(self),
            receiver,
        })
    }
}

impl fmt::Debug for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<String> = self
            .bindings
            .keys()
            .map(|(name, arity)| format!("{}/{}", name, arity))
            .collect();
        methods.sort();
        f.debug_struct("ProxyDescriptor")
            .field("interface", &self.interface)
            .field("class", &self.class.expected_name())
            .field("methods", &methods)
            .finish()
    }
}

/// A descriptor paired with a receiver
#[derive(Debug, Clone)]
pub struct BoundProxy {
    descriptor: Arc<ProxyDescriptor>,
    receiver: ObjectRef,
}

impl BoundProxy {
    /// Shared descriptor
    pub fn descriptor(&self) -> &Arc<ProxyDescriptor> {
        &self.descriptor
    }

    /// Receiver
    pub fn receiver(&self) -> &ObjectRef {
        &self.receiver
    }

    /// Call an interface method against the receiver
    pub fn call(&self, method: &str, args: &[Value]) -> ReflectResult<Value> {
        let binding = self.descriptor.lookup(method, args.len())?;
        match binding.kind {
            BindingKind::Constructor => Err(ReflectError::UnsupportedProxyCall {
                method: self.descriptor.qualified(method),
                reason: "constructors are only available on the unbound proxy".to_string(),
            }),
            BindingKind::Static => binding.dispatch(None, args),
            BindingKind::Instance => binding.dispatch(Some(&self.receiver), args),
        }
    }
}
