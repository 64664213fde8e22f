//! Integration tests for class and member handles
//!
//! Covers declaration-based lookup, nested classes, enum constants,
//! memoisation, constraint failures, renames and aggregate handles.

mod common;

use common::*;
use strata_reflect::{
    AnyOf, HandleState, PlatformVersion, ReflectError, Reflector, RenameTable, SymbolCategory,
    VersionError, VersionInformation,
};
use strata_runtime::{
    ClassBuilder, FieldDefinition, Modifiers, ObjectRef, Runtime, RuntimeError, TypeRef, Value,
};

fn new_tests_instance(reflector: &Reflector) -> ObjectRef {
    reflector
        .class(REFLECTION_TESTS)
        .constructor("public ReflectionTests();")
        .unwrap()
        .new_instance(&[])
        .unwrap()
}

// ============================================================================
// Fields
// ============================================================================

#[test]
fn test_private_instance_field() {
    let reflector = reflector();
    let instance = new_tests_instance(&reflector);
    let field = reflector
        .class(REFLECTION_TESTS)
        .field("private final String test;")
        .unwrap();
    assert_eq!(field.get(&instance).unwrap(), Value::from("A"));
}

#[test]
fn test_private_static_field() {
    let reflector = reflector();
    let field = reflector
        .class(REFLECTION_TESTS)
        .field("private static final String STATIC_TEST;")
        .unwrap();
    assert_eq!(field.get_static().unwrap(), Value::from("B"));
}

#[test]
fn test_final_field_writes() {
    let reflector = reflector();
    let class = reflector.class(REFLECTION_TESTS);
    let instance = new_tests_instance(&reflector);

    let test = class.field("private final String test;").unwrap();
    test.set(&instance, "Z").unwrap();
    assert_eq!(test.get(&instance).unwrap(), Value::from("Z"));

    let static_test = class.field("private static final String STATIC_TEST;").unwrap();
    match static_test.set_static("C") {
        Err(ReflectError::InvocationError { source, .. }) => {
            assert!(matches!(source, RuntimeError::FinalField(_)));
        }
        other => panic!("expected a final field error, got {:?}", other),
    }
}

#[test]
fn test_field_receiver_mismatch() {
    let reflector = reflector();
    let other = reflector
        .class(ATOMIC_INTEGER)
        .constructor("public AtomicInteger();")
        .unwrap()
        .new_instance(&[])
        .unwrap();
    let field = reflector
        .class(REFLECTION_TESTS)
        .field("private final String test;")
        .unwrap();
    match field.get(&other) {
        Err(ReflectError::InvocationError { source, .. }) => {
            assert!(matches!(source, RuntimeError::TypeMismatch { .. }));
        }
        other => panic!("expected a receiver mismatch, got {:?}", other),
    }
}

// ============================================================================
// Constructors and methods
// ============================================================================

#[test]
fn test_constructor_with_arguments() {
    let reflector = reflector();
    let class = reflector.class(REFLECTION_TESTS);
    let instance = class
        .constructor("public ReflectionTests(String test, int other);")
        .unwrap()
        .new_instance(&["X".into(), 1.into()])
        .unwrap();
    let field = class.field("private final String test;").unwrap();
    assert_eq!(field.get(&instance).unwrap(), Value::from("X"));
}

#[test]
fn test_constructor_keyword_must_match_owner() {
    let reflector = reflector();
    let result = reflector
        .class(REFLECTION_TESTS)
        .constructor("public Other(String test, int other);");
    assert!(matches!(result, Err(ReflectError::MalformedSignature { .. })));
}

#[test]
fn test_private_method_invoke() {
    let reflector = reflector();
    let instance = new_tests_instance(&reflector);
    let split = reflector
        .class(REFLECTION_TESTS)
        .method("private String[] split(char ch, int limit, boolean withDelimiters);")
        .unwrap();
    let result = split
        .invoke(&instance, &[','.into(), 2.into(), true.into()])
        .unwrap();
    let items = result.as_array().unwrap().to_vec();
    assert_eq!(
        items,
        vec![Value::from("lim2"), Value::from(",a"), Value::from("withDeltrue")]
    );
}

#[test]
fn test_static_method_invoke() {
    let reflector = reflector();
    let twice = reflector
        .class(REFLECTION_TESTS)
        .method("public static int twice(int value);")
        .unwrap();
    assert_eq!(twice.invoke_static(&[21.into()]).unwrap(), Value::Int(42));
}

#[test]
fn test_invocation_argument_errors_are_wrapped() {
    let reflector = reflector();
    let twice = reflector
        .class(REFLECTION_TESTS)
        .method("public static int twice(int value);")
        .unwrap();
    match twice.invoke_static(&["nope".into()]) {
        Err(ReflectError::InvocationError { member, source }) => {
            assert!(member.contains("twice"));
            assert!(matches!(source, RuntimeError::TypeMismatch { .. }));
        }
        other => panic!("expected an invocation error, got {:?}", other),
    }
}

#[test]
fn test_inherited_enum_method() {
    let reflector = reflector();
    let enum_test = reflector
        .class(REFLECTION_TESTS)
        .inner("public enum EnumTest {}")
        .unwrap();
    let constant = enum_test.enum_constant("B").unwrap();
    let name = enum_test.method("public final String name();").unwrap();
    let receiver = constant.as_object().unwrap();
    assert_eq!(name.invoke(receiver, &[]).unwrap(), Value::from("B"));
}

// ============================================================================
// Nested classes and enums
// ============================================================================

#[test]
fn test_nested_class_chain() {
    let reflector = reflector();
    let id = reflector.runtime().find_class(REFLECTION_TESTS).unwrap();
    let c = reflector
        .namespaced()
        .imports(ATOMIC_INTEGER)
        .of(id)
        .unwrap()
        .inner("private static final class A<T> {}")
        .unwrap()
        .inner("private static final class B {}")
        .unwrap()
        .inner("private static final class C {}")
        .unwrap();
    assert_eq!(
        c.binary_name().unwrap(),
        format!("{}$A$B$C", REFLECTION_TESTS)
    );

    let atomic_field = c.field("public final AtomicInteger atomicField;").unwrap();
    let instance = c.constructor("C();").unwrap().new_instance(&[]).unwrap();
    let value = atomic_field.get(&instance).unwrap();
    assert!(reflector.class(ATOMIC_INTEGER).is_instance(&value).unwrap());

    let increment = reflector
        .class(ATOMIC_INTEGER)
        .method("public int incrementAndGet();")
        .unwrap();
    let atomic = value.as_object().unwrap();
    assert_eq!(increment.invoke(atomic, &[]).unwrap(), Value::Int(1));
}

#[test]
fn test_nested_interface_method() {
    let reflector = reflector();
    let profile = reflector
        .class(REFLECTION_TESTS)
        .inner("public interface GameProfile {}")
        .unwrap();
    let setter = profile.method("void field_setter_test(String test);").unwrap();
    assert!(setter.resolve().is_ok());

    let constant = profile.field("public static final String test;").unwrap();
    assert_eq!(constant.get_static().unwrap(), Value::from("1"));
}

#[test]
fn test_class_kind_constraint() {
    let reflector = reflector();
    let wrong = reflector
        .class(REFLECTION_TESTS)
        .inner("public enum GameProfile {}")
        .unwrap();
    match wrong.resolve() {
        Err(ReflectError::ConstraintViolation { constraint, .. }) => {
            assert_eq!(constraint, "class/kind");
        }
        other => panic!("expected a kind violation, got {:?}", other),
    }
}

#[test]
fn test_enum_constants() {
    let reflector = reflector();
    let enum_test = reflector
        .class(REFLECTION_TESTS)
        .inner("public enum EnumTest {}")
        .unwrap();
    let id = enum_test.resolve().unwrap();
    let constants = reflector.runtime().enum_constants(id).unwrap();

    let a = enum_test.enum_constant("A").unwrap();
    assert_eq!(a, Value::Object(constants[0].clone()));

    let d = enum_test
        .field("public static final int D;")
        .unwrap()
        .get_static()
        .unwrap();
    assert_eq!(d, Value::Int(9934343));

    assert!(matches!(
        enum_test.enum_constant("Z"),
        Err(ReflectError::MemberNotFound { .. })
    ));
    assert!(matches!(
        reflector.class(REFLECTION_TESTS).enum_constant("A"),
        Err(ReflectError::TypeMismatch { .. })
    ));
}

// ============================================================================
// Class handles
// ============================================================================

#[test]
fn test_class_declaration() {
    let reflector = reflector();
    let id = reflector.runtime().find_class(REFLECTION_TESTS).unwrap();
    let class = reflector
        .class_declaration("package com.example.reflection; public final class ReflectionTests {}")
        .unwrap();
    assert_eq!(class.resolve().unwrap(), id);
    assert_eq!(class.constraint_results().unwrap().len(), 3);

    let private = reflector
        .class_declaration("package com.example.reflection; private final class ReflectionTests {}")
        .unwrap();
    match private.resolve() {
        Err(ReflectError::ConstraintViolation { constraint, .. }) => {
            assert_eq!(constraint, "visibility/modifiers");
        }
        other => panic!("expected a visibility violation, got {:?}", other),
    }
}

#[test]
fn test_class_not_found() {
    let reflector = reflector();
    match reflector.class_any(["a.Missing", "b.Missing"]).resolve() {
        Err(ReflectError::ClassNotFound { names }) => {
            assert_eq!(names, vec!["a.Missing", "b.Missing"]);
        }
        other => panic!("expected class not found, got {:?}", other),
    }
}

#[test]
fn test_array_type() {
    let reflector = reflector();
    let class = reflector.class(REFLECTION_TESTS);
    assert_eq!(
        class.as_array_type().unwrap(),
        TypeRef::array(TypeRef::class(REFLECTION_TESTS))
    );
}

// ============================================================================
// Resolution semantics
// ============================================================================

#[test]
fn test_resolution_is_memoised() {
    let reflector = reflector();
    let class = reflector.class(REFLECTION_TESTS);
    let field = class.field("private final String test;").unwrap();
    assert_eq!(field.state(), HandleState::Unresolved);

    field.resolve().unwrap();
    assert_eq!(field.state(), HandleState::Resolved);
    let lookups = reflector.runtime().stats().member_lookups;

    field.resolve().unwrap();
    let again = class.field("private final String test;").unwrap();
    assert_eq!(again.id(), field.id());
    again.resolve().unwrap();
    assert_eq!(reflector.runtime().stats().member_lookups, lookups);
    assert!(class.children().contains(&field.id()));
}

#[test]
fn test_failed_handle_keeps_its_error() {
    let reflector = reflector();
    let missing = reflector
        .class(REFLECTION_TESTS)
        .field("private int missing;")
        .unwrap();
    let first = missing.resolve().unwrap_err();
    assert!(matches!(first, ReflectError::MemberNotFound { .. }));
    assert_eq!(missing.state(), HandleState::Failed(first.clone()));

    let lookups = reflector.runtime().stats().member_lookups;
    assert_eq!(missing.resolve().unwrap_err(), first);
    assert_eq!(reflector.runtime().stats().member_lookups, lookups);
}

#[test]
fn test_member_constraints() {
    let reflector = reflector();
    let class = reflector.class(REFLECTION_TESTS);

    let wrong_type = class.field("private final int test;").unwrap();
    match wrong_type.resolve() {
        Err(ReflectError::ConstraintViolation { constraint, .. }) => {
            assert_eq!(constraint, "type/declared-type");
        }
        other => panic!("expected a type violation, got {:?}", other),
    }

    let wrong_visibility = class.field("public final String test;").unwrap();
    match wrong_visibility.resolve() {
        Err(ReflectError::ConstraintViolation { constraint, .. }) => {
            assert_eq!(constraint, "visibility/modifiers");
        }
        other => panic!("expected a visibility violation, got {:?}", other),
    }

    let undeclared = class.field("final String test;").unwrap();
    assert!(undeclared.resolve().is_ok());
}

#[test]
fn test_static_modifier_filters_candidates() {
    let reflector = reflector();
    let as_instance = reflector
        .class(REFLECTION_TESTS)
        .field("private final String STATIC_TEST;")
        .unwrap();
    assert!(matches!(
        as_instance.resolve(),
        Err(ReflectError::MemberNotFound { .. })
    ));
}

#[test]
fn test_unresolved_and_malformed_declarations() {
    let reflector = reflector();
    let class = reflector.class(REFLECTION_TESTS);
    assert!(matches!(
        class.field("private Missing value;"),
        Err(ReflectError::UnresolvedType { .. })
    ));
    assert!(matches!(
        class.field("void run();"),
        Err(ReflectError::MalformedSignature { .. })
    ));
    assert!(matches!(
        class.method("private final String test;"),
        Err(ReflectError::MalformedSignature { .. })
    ));
}

#[test]
fn test_hidden_field_matches_declared_type() {
    let rt = Runtime::new();
    rt.define(
        ClassBuilder::class("t.Base").field(
            FieldDefinition::new("test", TypeRef::string())
                .modifiers(Modifiers::PRIVATE)
                .initial_value("base"),
        ),
    )
    .unwrap();
    rt.define(
        ClassBuilder::class("t.Derived").extends("t.Base").field(
            FieldDefinition::new("test", TypeRef::INT)
                .modifiers(Modifiers::PRIVATE)
                .initial_value(7),
        ),
    )
    .unwrap();
    let derived = rt.instantiate(rt.find_class("t.Derived").unwrap()).unwrap();

    let reflector = Reflector::new(std::sync::Arc::new(rt), running_version());
    let class = reflector.class("t.Derived");

    let inherited = class.field("private String test;").unwrap();
    let field = inherited.resolve().unwrap();
    assert_eq!(field.declaring_class_name(), "t.Base");
    assert_eq!(inherited.get(&derived).unwrap(), Value::from("base"));

    let own = class.field("private int test;").unwrap();
    assert_eq!(own.resolve().unwrap().declaring_class_name(), "t.Derived");
    assert_eq!(own.get(&derived).unwrap(), Value::Int(7));

    // Nothing fits: the type constraint explains the mismatch
    let none = class.field("private boolean test;").unwrap();
    match none.resolve() {
        Err(ReflectError::ConstraintViolation { member, constraint, .. }) => {
            assert_eq!(member, "t.Derived#test");
            assert_eq!(constraint, "type/declared-type");
        }
        other => panic!("expected a type violation, got {:?}", other),
    }
}

#[test]
fn test_ambiguous_member() {
    let rt = Runtime::new();
    let constant = || {
        FieldDefinition::new("X", TypeRef::INT)
            .modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL)
    };
    rt.define(ClassBuilder::interface("t.Left").field(constant())).unwrap();
    rt.define(ClassBuilder::interface("t.Right").field(constant())).unwrap();
    rt.define(ClassBuilder::class("t.Both").implements("t.Left").implements("t.Right"))
        .unwrap();

    let reflector = Reflector::new(std::sync::Arc::new(rt), running_version());
    let field = reflector.class("t.Both").field("static int X;").unwrap();
    match field.resolve() {
        Err(ReflectError::AmbiguousMember { candidates, .. }) => {
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected an ambiguity, got {:?}", other),
    }

    let declared = reflector
        .class("t.Left")
        .field("static int X;")
        .unwrap();
    assert!(declared.resolve().is_ok());
}

#[test]
fn test_concurrent_resolution() {
    let reflector = reflector();
    let field = reflector
        .class(REFLECTION_TESTS)
        .field("private final String test;")
        .unwrap();
    let before = reflector.runtime().stats().member_lookups;

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let field = field.clone();
            scope.spawn(move || {
                field.resolve().unwrap();
            });
        }
    });

    // ReflectionTests and java.lang.Object, once each
    assert_eq!(reflector.runtime().stats().member_lookups - before, 2);
}

// ============================================================================
// Builders and aggregates
// ============================================================================

#[test]
fn test_builder_alternative_names() {
    let reflector = reflector();
    let instance = new_tests_instance(&reflector);
    let field = reflector
        .class(REFLECTION_TESTS)
        .field_builder()
        .names(["missing", "test"])
        .modifiers(Modifiers::PRIVATE | Modifiers::FINAL)
        .of_type(TypeRef::string())
        .build()
        .unwrap();
    assert_eq!(field.get(&instance).unwrap(), Value::from("A"));

    let twice = reflector
        .class(REFLECTION_TESTS)
        .method_builder()
        .named("twice")
        .as_static()
        .declared_only()
        .with_param(TypeRef::INT)
        .returns(TypeRef::INT)
        .build()
        .unwrap();
    assert_eq!(twice.invoke_static(&[4.into()]).unwrap(), Value::Int(8));

    let constructor = reflector
        .class(REFLECTION_TESTS)
        .constructor_builder()
        .with_param(TypeRef::string())
        .with_param(TypeRef::INT)
        .build()
        .unwrap();
    assert!(constructor.resolve().is_ok());

    assert!(matches!(
        reflector.class(REFLECTION_TESTS).field_builder().build(),
        Err(ReflectError::MalformedSignature { .. })
    ));
}

#[test]
fn test_declared_only_skips_inherited_members() {
    let reflector = reflector();
    let enum_test = reflector
        .class(REFLECTION_TESTS)
        .inner("public enum EnumTest {}")
        .unwrap();
    let name = enum_test
        .method_builder()
        .named("name")
        .declared_only()
        .build()
        .unwrap();
    assert!(matches!(
        name.resolve(),
        Err(ReflectError::MemberNotFound { .. })
    ));
}

#[test]
fn test_any_of() {
    let reflector = reflector();
    let handle = AnyOf::new()
        .or(reflector.class("com.example.Missing"))
        .or(reflector.class(REFLECTION_TESTS))
        .resolve()
        .unwrap();
    assert_eq!(handle.binary_name().unwrap(), REFLECTION_TESTS);

    let none = AnyOf::new()
        .or(reflector.class("a.Missing"))
        .or(reflector.class("b.Missing"))
        .resolve();
    match none {
        Err(ReflectError::NoAlternative(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected no alternative, got {:?}", other),
    }
}

// ============================================================================
// Renames and versions
// ============================================================================

fn with_renames(version: PlatformVersion, renames: RenameTable) -> Reflector {
    Reflector::builder(runtime())
        .version(version)
        .renames(renames)
        .build()
        .unwrap()
}

#[test]
fn test_renamed_field() {
    let mut renames = RenameTable::new();
    renames
        .rename(SymbolCategory::Field, "OLD", "test", PlatformVersion::minor(13))
        .unwrap();

    let reflector = with_renames(PlatformVersion::minor(14), renames.clone());
    let instance = new_tests_instance(&reflector);
    let old = reflector
        .class(REFLECTION_TESTS)
        .field("private final String OLD;")
        .unwrap();
    assert_eq!(old.get(&instance).unwrap(), Value::from("A"));

    let before = with_renames(PlatformVersion::minor(12), renames);
    let old = before
        .class(REFLECTION_TESTS)
        .field("private final String OLD;")
        .unwrap();
    assert!(matches!(old.resolve(), Err(ReflectError::MemberNotFound { .. })));
}

#[test]
fn test_renamed_class() {
    const LEGACY: &str = "com.example.reflection.LegacyTests";
    let mut renames = RenameTable::new();
    renames
        .rename(
            SymbolCategory::Class,
            LEGACY,
            REFLECTION_TESTS,
            PlatformVersion::minor(17),
        )
        .unwrap();

    let after = with_renames(PlatformVersion::minor(18), renames.clone());
    assert_eq!(after.class(LEGACY).binary_name().unwrap(), REFLECTION_TESTS);

    // The newest name maps back to the old one on older versions
    let before = with_renames(PlatformVersion::minor(16), renames);
    match before.class(REFLECTION_TESTS).resolve() {
        Err(ReflectError::ClassNotFound { names }) => assert_eq!(names, vec![LEGACY]),
        other => panic!("expected the legacy name to be looked up, got {:?}", other),
    }
}

#[test]
fn test_version_gating() {
    let reflector = reflector();
    assert!(reflector.supports(20));
    assert!(!reflector.supports(21));
    assert!(reflector.supports_patch(20, 4));
    assert!(!reflector.supports_patch(20, 5));
}

#[test]
fn test_install_global_reflector() {
    let installed = strata_reflect::install(reflector()).unwrap();
    assert_eq!(installed.version(), running_version());
    assert!(strata_reflect::global().is_some());
    assert_eq!(VersionInformation::current(), Some(running_version()));
    assert!(VersionInformation::supports(20));

    match strata_reflect::install(reflector()) {
        Err(ReflectError::Version(VersionError::AlreadyInitialized { current })) => {
            assert_eq!(current, running_version());
        }
        other => panic!("expected a second install to fail, got {:?}", other),
    }
}

// ============================================================================
// Caches
// ============================================================================

#[test]
fn test_clear_caches_keeps_live_handles() {
    let reflector = reflector();
    let field = reflector
        .class(REFLECTION_TESTS)
        .field("private static final String STATIC_TEST;")
        .unwrap();
    assert!(reflector.handle_count() >= 2);

    reflector.clear_caches();
    assert_eq!(reflector.handle_count(), 0);
    assert_eq!(field.get_static().unwrap(), Value::from("B"));

    let fresh = reflector
        .class(REFLECTION_TESTS)
        .field("private static final String STATIC_TEST;")
        .unwrap();
    assert_ne!(fresh.id(), field.id());
}
