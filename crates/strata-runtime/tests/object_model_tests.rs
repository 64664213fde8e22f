//! Integration tests for the managed class model
//!
//! Covers registration, introspection counting, visibility enforcement,
//! virtual dispatch and enum bootstrap.

use strata_runtime::{
    receiver, ClassBuilder, ClassKind, ConstructorDefinition, FieldDefinition, MethodDefinition,
    Modifiers, Runtime, RuntimeError, TypeRef, Value,
};

fn define_hierarchy(rt: &Runtime) {
    rt.define(ClassBuilder::interface("com.example.Named").method(
        MethodDefinition::new("label", |_, _, _| Err("abstract".into()))
            .returns(TypeRef::string())
            .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT),
    ))
    .unwrap();

    rt.define(
        ClassBuilder::class("com.example.Animal")
            .implements("com.example.Named")
            .field(FieldDefinition::new("name", TypeRef::string()).modifiers(Modifiers::PRIVATE))
            .field(
                FieldDefinition::new("COUNT", TypeRef::INT)
                    .modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
            )
            .field(
                FieldDefinition::new("KINGDOM", TypeRef::string())
                    .modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL)
                    .initial_value("animalia"),
            )
            .constructor(
                ConstructorDefinition::new(|rt, this, args| rt.store(this, "name", args[0].clone()))
                    .with_param(TypeRef::string())
                    .modifiers(Modifiers::PUBLIC),
            )
            .method(
                MethodDefinition::new("label", |rt, this, _| rt.load(receiver(this)?, "name"))
                    .returns(TypeRef::string())
                    .modifiers(Modifiers::PUBLIC),
            )
            .method(
                MethodDefinition::new("secret", |_, _, _| Ok(Value::Int(42)))
                    .returns(TypeRef::INT)
                    .modifiers(Modifiers::PRIVATE),
            ),
    )
    .unwrap();

    rt.define(
        ClassBuilder::class("com.example.Dog")
            .extends("com.example.Animal")
            .constructor(
                ConstructorDefinition::new(|rt, this, _| rt.store(this, "name", "dog".into()))
                    .modifiers(Modifiers::PUBLIC),
            )
            .method(
                MethodDefinition::new("label", |_, _, _| Ok("woof".into()))
                    .returns(TypeRef::string())
                    .modifiers(Modifiers::PUBLIC),
            ),
    )
    .unwrap();
}

#[test]
fn test_bootstrap_core_classes() {
    let rt = Runtime::new();
    assert!(rt.class_by_name("java.lang.Object").is_some());
    assert!(rt.class_by_name("java.lang.String").is_some());
    assert!(rt.class_by_name("java.lang.Enum").is_some());
    assert_eq!(rt.stats().classes, 3);
    assert_eq!(rt.stats().member_lookups, 0);
}

#[test]
fn test_define_rejects_duplicates_and_unknown_parents() {
    let rt = Runtime::new();
    rt.define(ClassBuilder::class("a.B")).unwrap();
    assert_eq!(
        rt.define(ClassBuilder::class("a.B")),
        Err(RuntimeError::DuplicateClass("a.B".to_string()))
    );
    assert_eq!(
        rt.define(ClassBuilder::class("a.C").extends("a.Missing")),
        Err(RuntimeError::ClassNotFound("a.Missing".to_string()))
    );
}

#[test]
fn test_hierarchy_relations() {
    let rt = Runtime::new();
    define_hierarchy(&rt);
    let named = rt.find_class("com.example.Named").unwrap();
    let animal = rt.find_class("com.example.Animal").unwrap();
    let dog = rt.find_class("com.example.Dog").unwrap();

    assert_eq!(rt.superclass(dog), Some(animal));
    assert_eq!(rt.interfaces(animal), vec![named]);
    assert!(rt.is_subclass_of(dog, named));
    assert!(!rt.is_subclass_of(animal, dog));
    assert!(rt.is_assignable(&TypeRef::class("com.example.Named"), &TypeRef::class("com.example.Dog")));
    assert!(rt.is_assignable(&TypeRef::object(), &TypeRef::array(TypeRef::INT)));
    assert!(!rt.is_assignable(&TypeRef::INT, &TypeRef::LONG));
}

#[test]
fn test_introspection_is_counted() {
    let rt = Runtime::new();
    define_hierarchy(&rt);
    let animal = rt.find_class("com.example.Animal").unwrap();

    let fields = rt.declared_fields(animal).unwrap();
    assert_eq!(fields.len(), 3);
    rt.declared_methods(animal).unwrap();
    rt.declared_constructors(animal).unwrap();
    assert_eq!(rt.stats().member_lookups, 3);
}

#[test]
fn test_private_access_requires_accessible_reference() {
    let rt = Runtime::new();
    define_hierarchy(&rt);
    let animal = rt.find_class("com.example.Animal").unwrap();
    let ctor = rt.declared_constructors(animal).unwrap().remove(0);
    let cat = rt.construct(&ctor, &["cat".into()]).unwrap();

    let mut name = rt
        .declared_fields(animal)
        .unwrap()
        .into_iter()
        .find(|f| f.name() == "name")
        .unwrap();
    assert!(matches!(
        rt.get_field(&name, Some(&cat)),
        Err(RuntimeError::IllegalAccess { .. })
    ));

    name.set_accessible();
    assert_eq!(rt.get_field(&name, Some(&cat)).unwrap(), Value::from("cat"));
    rt.set_field(&name, Some(&cat), "lion".into()).unwrap();
    assert_eq!(rt.load(&cat, "name").unwrap(), Value::from("lion"));
}

#[test]
fn test_static_fields_and_finality() {
    let rt = Runtime::new();
    define_hierarchy(&rt);
    let animal = rt.find_class("com.example.Animal").unwrap();
    let fields = rt.declared_fields(animal).unwrap();
    let count = fields.iter().find(|f| f.name() == "COUNT").unwrap();
    let mut kingdom = fields.iter().find(|f| f.name() == "KINGDOM").unwrap().clone();

    assert_eq!(rt.get_field(count, None).unwrap(), Value::Int(0));
    rt.set_field(count, None, Value::Int(5)).unwrap();
    assert_eq!(rt.load_static("com.example.Animal", "COUNT").unwrap(), Value::Int(5));

    kingdom.set_accessible();
    assert_eq!(rt.get_field(&kingdom, None).unwrap(), Value::from("animalia"));
    assert!(matches!(
        rt.set_field(&kingdom, None, "plantae".into()),
        Err(RuntimeError::FinalField(_))
    ));
}

#[test]
fn test_set_field_checks_type() {
    let rt = Runtime::new();
    define_hierarchy(&rt);
    let animal = rt.find_class("com.example.Animal").unwrap();
    let count = rt
        .declared_fields(animal)
        .unwrap()
        .into_iter()
        .find(|f| f.name() == "COUNT")
        .unwrap();
    assert!(matches!(
        rt.set_field(&count, None, "five".into()),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

#[test]
fn test_invoke_dispatches_virtually() {
    let rt = Runtime::new();
    define_hierarchy(&rt);
    let animal = rt.find_class("com.example.Animal").unwrap();
    let dog = rt.find_class("com.example.Dog").unwrap();

    let label = rt
        .declared_methods(animal)
        .unwrap()
        .into_iter()
        .find(|m| m.name() == "label")
        .unwrap();
    let dog_ctor = rt.declared_constructors(dog).unwrap().remove(0);
    let rex = rt.construct(&dog_ctor, &[]).unwrap();

    assert_eq!(rt.invoke(&label, Some(&rex), &[]).unwrap(), Value::from("woof"));
    assert_eq!(rt.load(&rex, "name").unwrap(), Value::from("dog"));
}

#[test]
fn test_invoke_checks_arguments_and_receiver() {
    let rt = Runtime::new();
    define_hierarchy(&rt);
    let animal = rt.find_class("com.example.Animal").unwrap();
    let label = rt
        .declared_methods(animal)
        .unwrap()
        .into_iter()
        .find(|m| m.name() == "label")
        .unwrap();

    assert!(matches!(
        rt.invoke(&label, None, &[]),
        Err(RuntimeError::NullReceiver(_))
    ));
    let obj = rt.instantiate(rt.find_class("java.lang.Object").unwrap()).unwrap();
    assert!(matches!(
        rt.invoke(&label, Some(&obj), &[]),
        Err(RuntimeError::TypeMismatch { .. })
    ));

    let ctor = rt.declared_constructors(animal).unwrap().remove(0);
    assert!(matches!(
        rt.construct(&ctor, &[]),
        Err(RuntimeError::ArgumentCount { expected: 1, got: 0, .. })
    ));
}

#[test]
fn test_private_method_requires_accessible_reference() {
    let rt = Runtime::new();
    define_hierarchy(&rt);
    let animal = rt.find_class("com.example.Animal").unwrap();
    let ctor = rt.declared_constructors(animal).unwrap().remove(0);
    let cat = rt.construct(&ctor, &["cat".into()]).unwrap();
    let mut secret = rt
        .declared_methods(animal)
        .unwrap()
        .into_iter()
        .find(|m| m.name() == "secret")
        .unwrap();

    assert!(matches!(
        rt.invoke(&secret, Some(&cat), &[]),
        Err(RuntimeError::IllegalAccess { .. })
    ));
    secret.set_accessible();
    assert_eq!(rt.invoke(&secret, Some(&cat), &[]).unwrap(), Value::Int(42));
}

#[test]
fn test_interfaces_are_not_instantiable() {
    let rt = Runtime::new();
    define_hierarchy(&rt);
    let named = rt.find_class("com.example.Named").unwrap();
    assert!(matches!(
        rt.instantiate(named),
        Err(RuntimeError::NotInstantiable(_))
    ));
}

#[test]
fn test_enum_constants() {
    let rt = Runtime::new();
    let id = rt
        .define(
            ClassBuilder::enumeration("com.example.Color")
                .enum_constant("RED")
                .enum_constant("GREEN"),
        )
        .unwrap();
    let class = rt.class(id).unwrap();
    assert_eq!(class.kind, ClassKind::Enum);

    let constants = rt.enum_constants(id).unwrap();
    assert_eq!(constants.len(), 2);
    assert_eq!(rt.call(&constants[1], "name", &[]).unwrap(), Value::from("GREEN"));
    assert_eq!(rt.call(&constants[1], "ordinal", &[]).unwrap(), Value::Int(1));

    let red = rt.load_static("com.example.Color", "RED").unwrap();
    assert_eq!(red, Value::Object(constants[0].clone()));

    let values = rt
        .declared_methods(id)
        .unwrap()
        .into_iter()
        .find(|m| m.name() == "values")
        .unwrap();
    let array = rt.invoke(&values, None, &[]).unwrap();
    assert_eq!(array.as_array().map(|a| a.len()), Some(2));
}

#[test]
fn test_nested_class_enclosing() {
    let rt = Runtime::new();
    let outer = rt.define(ClassBuilder::class("com.example.Outer")).unwrap();
    let inner = rt.define(ClassBuilder::class("com.example.Outer$Inner")).unwrap();
    assert_eq!(rt.enclosing(inner), Some(outer));
    let class = rt.class(inner).unwrap();
    assert_eq!(class.simple_name, "Inner");
    assert_eq!(class.package, "com.example");
}
