//! Capability proxies
//!
//! A capability interface is turned into a [`ProxyDescriptor`] once per
//! reflector and interface name. The unbound descriptor reaches static
//! members and constructors; binding it to a receiver yields a
//! [`BoundProxy`] for instance members.

mod capability;
mod descriptor;

use std::marker::PhantomData;
use std::sync::Arc;

use strata_runtime::{FromValue, ObjectRef, RuntimeError, Value};

pub use capability::{CapabilityInterface, CapabilityMethod, MemberMarker};
pub use descriptor::{Access, BindingKind, BoundProxy, ProxyDescriptor, TargetBinding};

use crate::constraint::Declaration;
use crate::error::{ReflectError, ReflectResult};
use crate::handle::ClassHandle;
use crate::reflector::Reflector;

/// Builds and caches proxy descriptors
#[derive(Debug, Clone)]
pub struct ProxyFactory {
    reflector: Reflector,
}

impl ProxyFactory {
    pub(crate) fn new(reflector: Reflector) -> Self {
        Self { reflector }
    }

    /// Descriptor for `iface`, built on first request
    ///
    /// Descriptors are cached per interface definition, so two interfaces
    /// sharing a name but differing in targets or methods get their own.
    pub fn build(&self, iface: &CapabilityInterface) -> ReflectResult<Arc<ProxyDescriptor>> {
        if let Some(descriptor) = self.reflector.proxies().get(iface) {
            return Ok(descriptor.value().clone());
        }

        let class = ClassHandle::top_level(
            &self.reflector,
            iface.target_classes()?,
            Declaration::default(),
            self.reflector.imports(),
        );
        let descriptor = Arc::new(ProxyDescriptor::build(iface, class)?);
        tracing::debug!(
            interface = %iface.qualified_name(),
            methods = descriptor.len(),
            "built proxy descriptor"
        );
        Ok(self
            .reflector
            .proxies()
            .entry(iface.clone())
            .or_insert(descriptor)
            .value()
            .clone())
    }

    /// Build (or reuse) the descriptor and bind it to `receiver`
    pub fn bind(&self, iface: &CapabilityInterface, receiver: ObjectRef) -> ReflectResult<BoundProxy> {
        self.build(iface)?.bind(receiver)
    }
}

/// A Rust type that describes a capability interface
pub trait Capability {
    /// Metadata of the interface
    fn interface() -> CapabilityInterface;
}

fn convert<T: FromValue>(member: String, value: Value) -> ReflectResult<T> {
    T::from_value(value).map_err(|e| match e {
        RuntimeError::TypeMismatch { expected, got } => ReflectError::TypeMismatch { expected, got },
        other => ReflectError::invocation(member, other),
    })
}

/// Typed facade over a descriptor, optionally bound to a receiver
pub struct ReflectiveProxy<C> {
    descriptor: Arc<ProxyDescriptor>,
    receiver: Option<BoundProxy>,
    _capability: PhantomData<fn() -> C>,
}

impl<C: Capability> ReflectiveProxy<C> {
    /// Unbound facade
    pub fn new(factory: &ProxyFactory) -> ReflectResult<Self> {
        Ok(Self {
            descriptor: factory.build(&C::interface())?,
            receiver: None,
            _capability: PhantomData,
        })
    }

    /// Facade bound to `receiver`, sharing this facade's descriptor
    pub fn bind_to(&self, receiver: ObjectRef) -> ReflectResult<Self> {
        Ok(Self {
            descriptor: self.descriptor.clone(),
            receiver: Some(self.descriptor.bind(receiver)?),
            _capability: PhantomData,
        })
    }

    /// Call an interface method and convert its result
    pub fn call<T: FromValue>(&self, method: &str, args: &[Value]) -> ReflectResult<T> {
        let value = match &self.receiver {
            Some(bound) => bound.call(method, args)?,
            None => self.descriptor.call(method, args)?,
        };
        convert(format!("{}#{}", self.descriptor.interface_name(), method), value)
    }

    /// Call a constructor binding and wrap the new instance in a bound facade
    pub fn construct(&self, method: &str, args: &[Value]) -> ReflectResult<Self> {
        let instance: ObjectRef = convert(
            format!("{}#{}", self.descriptor.interface_name(), method),
            self.descriptor.call(method, args)?,
        )?;
        self.bind_to(instance)
    }

    /// Bound receiver
    pub fn receiver(&self) -> Option<&ObjectRef> {
        self.receiver.as_ref().map(BoundProxy::receiver)
    }

    /// Whether a receiver is bound
    pub fn is_bound(&self) -> bool {
        self.receiver.is_some()
    }

    /// Shared descriptor
    pub fn descriptor(&self) -> &Arc<ProxyDescriptor> {
        &self.descriptor
    }
}

impl<C> Clone for ReflectiveProxy<C> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            receiver: self.receiver.clone(),
            _capability: PhantomData,
        }
    }
}

impl<C> std::fmt::Debug for ReflectiveProxy<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReflectiveProxy")
            .field("descriptor", &self.descriptor)
            .field("receiver", &self.receiver.as_ref().map(BoundProxy::receiver))
            .finish()
    }
}
