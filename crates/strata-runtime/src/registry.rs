//! The managed runtime: class table, member introspection and access
//!
//! `Runtime` owns every registered class. Introspection (`declared_*`) hands
//! out fresh member references and is counted in [`RuntimeStats`]; access
//! (`get_field`, `set_field`, `invoke`, `construct`) goes through those
//! references and enforces visibility and finality. The `load`/`store` family
//! is the unchecked path used by member bodies themselves.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::builder::{ClassBuilder, ConstructorDefinition, FieldDefinition, MethodDefinition};
use crate::class::{ClassDef, ClassId, ClassKind, ConstructorDef, FieldDef, MethodDef};
use crate::error::{RuntimeError, RuntimeResult};
use crate::member::{ConstructorRef, FieldRef, MethodRef};
use crate::modifiers::Modifiers;
use crate::object::{ArrayRef, ObjectRef};
use crate::types::{split_binary_name, PrimitiveType, TypeRef, ENUM_CLASS, OBJECT_CLASS, STRING_CLASS};
use crate::value::Value;

/// Counters describing runtime activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Number of registered classes
    pub classes: usize,
    /// Number of member introspection queries served
    pub member_lookups: u64,
}

#[derive(Default)]
struct ClassTable {
    classes: Vec<Arc<ClassDef>>,
    by_name: FxHashMap<String, ClassId>,
}

/// The managed runtime
pub struct Runtime {
    table: RwLock<ClassTable>,
    member_lookups: AtomicU64,
}

impl Runtime {
    /// Create a runtime with the core classes (`Object`, `String`, `Enum`) registered
    pub fn new() -> Self {
        let runtime = Self {
            table: RwLock::new(ClassTable::default()),
            member_lookups: AtomicU64::new(0),
        };
        runtime.bootstrap();
        runtime
    }

    fn bootstrap(&self) {
        let core = [
            ClassBuilder::class(OBJECT_CLASS)
                .constructor(ConstructorDefinition::empty().modifiers(Modifiers::PUBLIC)),
            ClassBuilder::class(STRING_CLASS).modifiers(Modifiers::PUBLIC | Modifiers::FINAL),
            ClassBuilder::class(ENUM_CLASS)
                .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
                .field(
                    FieldDefinition::new("name", TypeRef::string())
                        .modifiers(Modifiers::PRIVATE | Modifiers::FINAL),
                )
                .field(
                    FieldDefinition::new("ordinal", TypeRef::INT)
                        .modifiers(Modifiers::PRIVATE | Modifiers::FINAL),
                )
                .method(
                    MethodDefinition::new("name", |rt, this, _| rt.load(receiver(this)?, "name"))
                        .returns(TypeRef::string())
                        .modifiers(Modifiers::PUBLIC | Modifiers::FINAL),
                )
                .method(
                    MethodDefinition::new("ordinal", |rt, this, _| {
                        rt.load(receiver(this)?, "ordinal")
                    })
                    .returns(TypeRef::INT)
                    .modifiers(Modifiers::PUBLIC | Modifiers::FINAL),
                ),
        ];
        for class in core {
            let name = class.name.clone();
            if let Err(e) = self.define(class) {
                tracing::error!("failed to bootstrap core class {}: {}", name, e);
            }
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a class. Referenced classes must already be registered.
    pub fn define(&self, builder: ClassBuilder) -> RuntimeResult<ClassId> {
        let mut table = self.table.write();
        if table.by_name.contains_key(&builder.name) {
            return Err(RuntimeError::DuplicateClass(builder.name));
        }

        let superclass = match (&builder.superclass, builder.kind) {
            (Some(name), _) => Some(name.as_str()),
            (None, ClassKind::Interface) => None,
            (None, ClassKind::Enum) => Some(ENUM_CLASS),
            (None, ClassKind::Class) if builder.name == OBJECT_CLASS => None,
            (None, ClassKind::Class) => Some(OBJECT_CLASS),
        };
        let superclass = match superclass {
            Some(name) => {
                let id = table.lookup(name)?;
                if table.classes[id.0].is_interface() {
                    return Err(RuntimeError::TypeMismatch {
                        expected: "class".to_string(),
                        got: format!("interface {}", name),
                    });
                }
                Some(id)
            }
            None => None,
        };

        let mut interfaces = Vec::with_capacity(builder.interfaces.len());
        for name in &builder.interfaces {
            let id = table.lookup(name)?;
            if !table.classes[id.0].is_interface() {
                return Err(RuntimeError::TypeMismatch {
                    expected: "interface".to_string(),
                    got: format!("class {}", name),
                });
            }
            interfaces.push(id);
        }

        let id = ClassId(table.classes.len());
        let class_name: Arc<str> = Arc::from(builder.name.as_str());
        let (package, simple_name, enclosing_name) = split_binary_name(&builder.name);
        let enclosing = enclosing_name.and_then(|n| table.by_name.get(n).copied());

        let mut field_defs = builder.fields;
        let mut method_defs = builder.methods;
        let mut constructor_defs = builder.constructors;

        if builder.kind == ClassKind::Enum {
            for constant in &builder.enum_constants {
                field_defs.push(
                    FieldDefinition::new(constant.clone(), TypeRef::class(builder.name.clone()))
                        .modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL),
                );
            }
            method_defs.extend(enum_methods(&class_name));
            if constructor_defs.is_empty() {
                constructor_defs.push(ConstructorDefinition::empty().modifiers(Modifiers::PRIVATE));
            }
        } else if builder.kind == ClassKind::Class && constructor_defs.is_empty() {
            constructor_defs.push(
                ConstructorDefinition::empty()
                    .modifiers(builder.modifiers.intersection(Modifiers::VISIBILITY_MASK)),
            );
        }

        let mut instance_template = superclass
            .map(|s| table.classes[s.0].instance_template.clone())
            .unwrap_or_default();
        let mut statics = Vec::new();
        let mut fields = Vec::with_capacity(field_defs.len());
        for def in &field_defs {
            let initial = def.resolved_initial();
            let slot = if def.modifiers.is_static() {
                statics.push(initial.clone());
                statics.len() - 1
            } else {
                instance_template.push(initial.clone());
                instance_template.len() - 1
            };
            fields.push(Arc::new(FieldDef {
                name: def.name.clone(),
                ty: def.ty.clone(),
                modifiers: def.modifiers,
                slot,
                initial,
            }));
        }

        let methods = method_defs
            .into_iter()
            .map(|m| {
                Arc::new(MethodDef {
                    name: m.name,
                    return_type: m.return_type,
                    parameters: m.parameters,
                    modifiers: m.modifiers,
                    body: m.body,
                })
            })
            .collect();
        let constructors = constructor_defs
            .into_iter()
            .map(|c| {
                Arc::new(ConstructorDef {
                    parameters: c.parameters,
                    modifiers: c.modifiers,
                    body: c.body,
                })
            })
            .collect();

        let class = Arc::new(ClassDef {
            id,
            name: class_name.clone(),
            simple_name: simple_name.to_string(),
            package: package.to_string(),
            kind: builder.kind,
            modifiers: builder.modifiers,
            superclass,
            interfaces,
            enclosing,
            fields,
            methods,
            constructors,
            enum_constants: builder.enum_constants,
            instance_template,
            statics: RwLock::new(statics),
        });

        if class.kind == ClassKind::Enum {
            let name_slot = table.instance_field_slot(&class, "name");
            let ordinal_slot = table.instance_field_slot(&class, "ordinal");
            for (ordinal, constant) in class.enum_constants.iter().enumerate() {
                let instance =
                    ObjectRef::new(id, class_name.clone(), class.instance_template.clone());
                if let Some(slot) = name_slot {
                    instance.set_slot(slot, Value::string(constant));
                }
                if let Some(slot) = ordinal_slot {
                    instance.set_slot(slot, Value::Int(ordinal as i32));
                }
                if let Some(field) = class.declared_field(constant) {
                    class.set_static_value(field.slot, Value::Object(instance));
                }
            }
        }

        table.by_name.insert(builder.name, id);
        table.classes.push(class);
        tracing::debug!(class = %class_name, id = id.0, "defined class");
        Ok(id)
    }

    // ========================================================================
    // Class lookup
    // ========================================================================

    /// Class by ID
    pub fn class(&self, id: ClassId) -> Option<Arc<ClassDef>> {
        self.table.read().classes.get(id.0).cloned()
    }

    /// Class by binary name
    pub fn class_by_name(&self, name: &str) -> Option<Arc<ClassDef>> {
        let table = self.table.read();
        table
            .by_name
            .get(name)
            .and_then(|id| table.classes.get(id.0))
            .cloned()
    }

    /// Resolve a binary name to a class ID
    pub fn find_class(&self, name: &str) -> RuntimeResult<ClassId> {
        self.table.read().lookup(name)
    }

    fn class_or_err(&self, id: ClassId) -> RuntimeResult<Arc<ClassDef>> {
        self.class(id)
            .ok_or_else(|| RuntimeError::ClassNotFound(id.to_string()))
    }

    /// Direct superclass
    pub fn superclass(&self, id: ClassId) -> Option<ClassId> {
        self.class(id).and_then(|c| c.superclass)
    }

    /// Directly implemented interfaces
    pub fn interfaces(&self, id: ClassId) -> Vec<ClassId> {
        self.class(id).map(|c| c.interfaces.clone()).unwrap_or_default()
    }

    /// Enclosing class of a nested class
    pub fn enclosing(&self, id: ClassId) -> Option<ClassId> {
        self.class(id).and_then(|c| c.enclosing)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Fields declared directly by a class
    pub fn declared_fields(&self, id: ClassId) -> RuntimeResult<Vec<FieldRef>> {
        let class = self.class_or_err(id)?;
        self.member_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(class
            .fields
            .iter()
            .map(|f| FieldRef::new(id, class.name.clone(), f.clone()))
            .collect())
    }

    /// Methods declared directly by a class
    pub fn declared_methods(&self, id: ClassId) -> RuntimeResult<Vec<MethodRef>> {
        let class = self.class_or_err(id)?;
        self.member_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(class
            .methods
            .iter()
            .map(|m| MethodRef::new(id, class.name.clone(), m.clone()))
            .collect())
    }

    /// Constructors declared by a class
    pub fn declared_constructors(&self, id: ClassId) -> RuntimeResult<Vec<ConstructorRef>> {
        let class = self.class_or_err(id)?;
        self.member_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(class
            .constructors
            .iter()
            .map(|c| ConstructorRef::new(id, class.name.clone(), c.clone()))
            .collect())
    }

    /// Enum constants of an enum class, in ordinal order
    pub fn enum_constants(&self, id: ClassId) -> RuntimeResult<Vec<ObjectRef>> {
        let class = self.class_or_err(id)?;
        if class.kind != ClassKind::Enum {
            return Err(RuntimeError::TypeMismatch {
                expected: "enum".to_string(),
                got: format!("{} {}", class.kind, class.name),
            });
        }
        let mut constants = Vec::with_capacity(class.enum_constants.len());
        for name in &class.enum_constants {
            let value = class
                .declared_field(name)
                .and_then(|f| class.static_value(f.slot));
            if let Some(Value::Object(o)) = value {
                constants.push(o);
            }
        }
        Ok(constants)
    }

    /// Snapshot of the runtime counters
    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            classes: self.table.read().classes.len(),
            member_lookups: self.member_lookups.load(Ordering::Relaxed),
        }
    }

    // ========================================================================
    // Type relations
    // ========================================================================

    /// Whether `child` is `ancestor` or inherits from it through superclasses or interfaces
    pub fn is_subclass_of(&self, child: ClassId, ancestor: ClassId) -> bool {
        let table = self.table.read();
        let mut queue = VecDeque::from([child]);
        let mut seen = Vec::new();
        while let Some(id) = queue.pop_front() {
            if id == ancestor {
                return true;
            }
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Some(class) = table.classes.get(id.0) {
                queue.extend(class.superclass);
                queue.extend(class.interfaces.iter().copied());
            }
        }
        false
    }

    /// Whether a value of type `source` may be stored where `target` is expected
    pub fn is_assignable(&self, target: &TypeRef, source: &TypeRef) -> bool {
        match (target, source) {
            (TypeRef::Primitive(a), TypeRef::Primitive(b)) => a == b,
            (TypeRef::Class(t), _) if t == OBJECT_CLASS => source.is_reference(),
            (TypeRef::Class(t), TypeRef::Class(s)) => {
                if t == s {
                    return true;
                }
                match (self.find_class(t), self.find_class(s)) {
                    (Ok(t), Ok(s)) => self.is_subclass_of(s, t),
                    _ => false,
                }
            }
            (TypeRef::Array(t), TypeRef::Array(s)) => {
                if t.is_primitive() || s.is_primitive() {
                    t == s
                } else {
                    self.is_assignable(t, s)
                }
            }
            _ => false,
        }
    }

    /// Whether `value` may be stored where `ty` is expected
    pub fn conforms(&self, value: &Value, ty: &TypeRef) -> bool {
        use PrimitiveType as P;
        match (value, ty) {
            (Value::Null, t) => t.is_reference(),
            (Value::Bool(_), TypeRef::Primitive(P::Boolean)) => true,
            (Value::Char(_), TypeRef::Primitive(P::Char)) => true,
            (Value::Int(_), TypeRef::Primitive(P::Byte | P::Short | P::Int)) => true,
            (Value::Long(_), TypeRef::Primitive(P::Long)) => true,
            (Value::Double(_), TypeRef::Primitive(P::Float | P::Double)) => true,
            (Value::Str(_), t) if t.is_reference() => {
                self.is_assignable(t, &TypeRef::string())
            }
            (Value::Object(o), t) if t.is_reference() => {
                self.is_assignable(t, &TypeRef::class(o.class_name()))
            }
            (Value::Array(a), t) if t.is_reference() => {
                self.is_assignable(t, &TypeRef::array(a.element_type().clone()))
            }
            _ => false,
        }
    }

    /// Whether `value` is a non-null instance of `class` or one of its subclasses
    pub fn is_instance(&self, value: &Value, class: ClassId) -> bool {
        match value {
            Value::Object(o) => self.is_subclass_of(o.class_id(), class),
            Value::Str(_) => self
                .find_class(STRING_CLASS)
                .map(|s| self.is_subclass_of(s, class))
                .unwrap_or(false),
            _ => false,
        }
    }

    // ========================================================================
    // Checked access through member references
    // ========================================================================

    /// Allocate an instance with every field at its initial value, without running a constructor
    pub fn instantiate(&self, id: ClassId) -> RuntimeResult<ObjectRef> {
        let class = self.class_or_err(id)?;
        if class.kind != ClassKind::Class || class.modifiers.contains(Modifiers::ABSTRACT) {
            return Err(RuntimeError::NotInstantiable(class.name.to_string()));
        }
        Ok(ObjectRef::new(
            id,
            class.name.clone(),
            class.instance_template.clone(),
        ))
    }

    /// Read a field
    pub fn get_field(&self, field: &FieldRef, target: Option<&ObjectRef>) -> RuntimeResult<Value> {
        field.check_access()?;
        if field.modifiers().is_static() {
            let class = self.class_or_err(field.declaring)?;
            return class
                .static_value(field.def.slot)
                .ok_or_else(|| RuntimeError::NoSuchMember(field.to_string()));
        }
        let target = self.checked_receiver(field.declaring, target, || field.to_string())?;
        target
            .slot(field.def.slot)
            .ok_or_else(|| RuntimeError::NoSuchMember(field.to_string()))
    }

    /// Write a field
    pub fn set_field(
        &self,
        field: &FieldRef,
        target: Option<&ObjectRef>,
        value: Value,
    ) -> RuntimeResult<()> {
        field.check_access()?;
        let modifiers = field.modifiers();
        if modifiers.is_final() && (modifiers.is_static() || !field.is_accessible()) {
            return Err(RuntimeError::FinalField(field.to_string()));
        }
        if !self.conforms(&value, field.field_type()) {
            return Err(RuntimeError::TypeMismatch {
                expected: field.field_type().to_string(),
                got: value.type_name(),
            });
        }
        let written = if modifiers.is_static() {
            self.class_or_err(field.declaring)?
                .set_static_value(field.def.slot, value)
        } else {
            let target = self.checked_receiver(field.declaring, target, || field.to_string())?;
            target.set_slot(field.def.slot, value)
        };
        if written {
            Ok(())
        } else {
            Err(RuntimeError::NoSuchMember(field.to_string()))
        }
    }

    /// Invoke a method. Instance methods dispatch on the receiver's class.
    pub fn invoke(
        &self,
        method: &MethodRef,
        target: Option<&ObjectRef>,
        args: &[Value],
    ) -> RuntimeResult<Value> {
        method.check_access()?;
        self.check_arguments(&method.def.parameters, args, || method.to_string())?;
        if method.modifiers().is_static() {
            return (method.def.body)(self, None, args);
        }
        let target = self.checked_receiver(method.declaring, target, || method.to_string())?;
        let body = if method.modifiers().is_private() {
            method.def.clone()
        } else {
            self.dispatch(target.class_id(), &method.def)
        };
        (body.body)(self, Some(target), args)
    }

    /// Run a constructor on a fresh instance of its declaring class
    pub fn construct(&self, constructor: &ConstructorRef, args: &[Value]) -> RuntimeResult<ObjectRef> {
        constructor.check_access()?;
        self.check_arguments(&constructor.def.parameters, args, || constructor.to_string())?;
        let instance = self.instantiate(constructor.declaring)?;
        (constructor.def.body)(self, &instance, args)?;
        Ok(instance)
    }

    fn checked_receiver<'a>(
        &self,
        declaring: ClassId,
        target: Option<&'a ObjectRef>,
        describe: impl FnOnce() -> String,
    ) -> RuntimeResult<&'a ObjectRef> {
        let target = target.ok_or_else(|| RuntimeError::NullReceiver(describe()))?;
        if !self.is_subclass_of(target.class_id(), declaring) {
            let expected = self
                .class(declaring)
                .map(|c| c.name.to_string())
                .unwrap_or_else(|| declaring.to_string());
            return Err(RuntimeError::TypeMismatch {
                expected,
                got: target.class_name().to_string(),
            });
        }
        Ok(target)
    }

    fn check_arguments(
        &self,
        parameters: &[TypeRef],
        args: &[Value],
        describe: impl FnOnce() -> String,
    ) -> RuntimeResult<()> {
        if parameters.len() != args.len() {
            return Err(RuntimeError::ArgumentCount {
                member: describe(),
                expected: parameters.len(),
                got: args.len(),
            });
        }
        for (param, arg) in parameters.iter().zip(args) {
            if !self.conforms(arg, param) {
                return Err(RuntimeError::TypeMismatch {
                    expected: param.to_string(),
                    got: arg.type_name(),
                });
            }
        }
        Ok(())
    }

    /// Most-derived override of `method` along the superclass chain of `class`
    fn dispatch(&self, class: ClassId, method: &Arc<MethodDef>) -> Arc<MethodDef> {
        let mut current = Some(class);
        while let Some(id) = current {
            let Some(def) = self.class(id) else { break };
            let found = def.methods.iter().find(|m| {
                m.name == method.name
                    && m.parameters == method.parameters
                    && !m.modifiers.is_static()
                    && !m.modifiers.is_private()
            });
            if let Some(found) = found {
                return found.clone();
            }
            current = def.superclass;
        }
        method.clone()
    }

    // ========================================================================
    // Unchecked access for member bodies
    // ========================================================================

    /// Read an instance field by name, searching the object's class chain
    pub fn load(&self, object: &ObjectRef, field: &str) -> RuntimeResult<Value> {
        let def = self.instance_field(object.class_id(), field)?;
        object
            .slot(def.slot)
            .ok_or_else(|| RuntimeError::NoSuchMember(field.to_string()))
    }

    /// Write an instance field by name, searching the object's class chain
    pub fn store(&self, object: &ObjectRef, field: &str, value: Value) -> RuntimeResult<()> {
        let def = self.instance_field(object.class_id(), field)?;
        if object.set_slot(def.slot, value) {
            Ok(())
        } else {
            Err(RuntimeError::NoSuchMember(field.to_string()))
        }
    }

    /// Read a static field by class and field name
    pub fn load_static(&self, class: &str, field: &str) -> RuntimeResult<Value> {
        let (class, def) = self.static_field(class, field)?;
        class
            .static_value(def.slot)
            .ok_or_else(|| RuntimeError::NoSuchMember(field.to_string()))
    }

    /// Write a static field by class and field name
    pub fn store_static(&self, class: &str, field: &str, value: Value) -> RuntimeResult<()> {
        let (class, def) = self.static_field(class, field)?;
        if class.set_static_value(def.slot, value) {
            Ok(())
        } else {
            Err(RuntimeError::NoSuchMember(field.to_string()))
        }
    }

    /// Call an instance method by name, dispatching on the receiver's class
    pub fn call(&self, object: &ObjectRef, method: &str, args: &[Value]) -> RuntimeResult<Value> {
        let mut current = Some(object.class_id());
        while let Some(id) = current {
            let class = self.class_or_err(id)?;
            let found = class.methods.iter().find(|m| {
                m.name == method && m.parameters.len() == args.len() && !m.modifiers.is_static()
            });
            if let Some(found) = found {
                return (found.body)(self, Some(object), args);
            }
            current = class.superclass;
        }
        Err(RuntimeError::NoSuchMember(format!(
            "{}#{}",
            object.class_name(),
            method
        )))
    }

    fn instance_field(&self, class: ClassId, name: &str) -> RuntimeResult<Arc<FieldDef>> {
        let mut current = Some(class);
        while let Some(id) = current {
            let def = self.class_or_err(id)?;
            if let Some(f) = def
                .fields
                .iter()
                .find(|f| f.name == name && !f.modifiers.is_static())
            {
                return Ok(f.clone());
            }
            current = def.superclass;
        }
        Err(RuntimeError::NoSuchMember(name.to_string()))
    }

    fn static_field(&self, class: &str, name: &str) -> RuntimeResult<(Arc<ClassDef>, Arc<FieldDef>)> {
        let class = self
            .class_by_name(class)
            .ok_or_else(|| RuntimeError::ClassNotFound(class.to_string()))?;
        let field = class
            .fields
            .iter()
            .find(|f| f.name == name && f.modifiers.is_static())
            .cloned()
            .ok_or_else(|| RuntimeError::NoSuchMember(format!("{}#{}", class.name, name)))?;
        Ok((class, field))
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime").field("stats", &self.stats()).finish()
    }
}

impl ClassTable {
    fn lookup(&self, name: &str) -> RuntimeResult<ClassId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeError::ClassNotFound(name.to_string()))
    }

    /// Slot of an instance field on a class that is not yet in the table
    fn instance_field_slot(&self, class: &ClassDef, name: &str) -> Option<usize> {
        let mut current = Some(class);
        while let Some(def) = current {
            if let Some(f) = def
                .fields
                .iter()
                .find(|f| f.name == name && !f.modifiers.is_static())
            {
                return Some(f.slot);
            }
            current = def.superclass.and_then(|s| self.classes.get(s.0)).map(|c| c.as_ref());
        }
        None
    }
}

/// Receiver of an instance member body
pub fn receiver(this: Option<&ObjectRef>) -> RuntimeResult<&ObjectRef> {
    this.ok_or_else(|| RuntimeError::NullReceiver("this".to_string()))
}

fn enum_methods(class_name: &Arc<str>) -> [MethodDefinition; 2] {
    let values_class = class_name.clone();
    let value_of_class = class_name.clone();
    [
        MethodDefinition::new("values", move |rt, _, _| {
            let id = rt.find_class(&values_class)?;
            let items = rt
                .enum_constants(id)?
                .into_iter()
                .map(Value::Object)
                .collect();
            Ok(Value::Array(ArrayRef::new(
                TypeRef::class(values_class.to_string()),
                items,
            )))
        })
        .returns(TypeRef::array(TypeRef::class(class_name.to_string())))
        .modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
        MethodDefinition::new("valueOf", move |rt, _, args| {
            let name = args.first().and_then(Value::as_str).unwrap_or_default();
            rt.load_static(&value_of_class, name).map_err(|_| {
                RuntimeError::Thrown(format!("No enum constant {}.{}", value_of_class, name))
            })
        })
        .with_param(TypeRef::string())
        .returns(TypeRef::class(class_name.to_string()))
        .modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
    ]
}
