//! Heap objects
//!
//! Instances are reference-counted and shared between threads. Field storage
//! is one slot per instance field, inherited fields first.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::class::ClassId;
use crate::types::TypeRef;
use crate::value::Value;

/// A class instance
pub struct Instance {
    class_id: ClassId,
    class_name: Arc<str>,
    slots: RwLock<Vec<Value>>,
}

/// Shared reference to an instance. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<Instance>);

impl ObjectRef {
    pub(crate) fn new(class_id: ClassId, class_name: Arc<str>, slots: Vec<Value>) -> Self {
        ObjectRef(Arc::new(Instance {
            class_id,
            class_name,
            slots: RwLock::new(slots),
        }))
    }

    /// Class of this object
    pub fn class_id(&self) -> ClassId {
        self.0.class_id
    }

    /// Binary name of this object's class
    pub fn class_name(&self) -> &str {
        &self.0.class_name
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn slot(&self, index: usize) -> Option<Value> {
        self.0.slots.read().get(index).cloned()
    }

    pub(crate) fn set_slot(&self, index: usize, value: Value) -> bool {
        match self.0.slots.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:p}", self.0.class_name, Arc::as_ptr(&self.0))
    }
}

/// Shared, mutable array with a fixed element type
#[derive(Clone)]
pub struct ArrayRef {
    element: Arc<TypeRef>,
    items: Arc<RwLock<Vec<Value>>>,
}

impl ArrayRef {
    /// Create an array holding `items`
    pub fn new(element: TypeRef, items: Vec<Value>) -> Self {
        Self {
            element: Arc::new(element),
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Element type
    pub fn element_type(&self) -> &TypeRef {
        &self.element
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the array is empty
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.read().get(index).cloned()
    }

    /// Copy of all elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.read().clone()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl PartialEq for ArrayRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", TypeRef::array((*self.element).clone()), self.items.read())
    }
}
