//! Shared fixtures for the reflective access tests
//!
//! `ReflectionTests` mirrors a class with private state, nested classes, an
//! interface and an enum; `ProxyTestClass` is the target of the capability
//! proxy tests.

#![allow(dead_code)]

use std::sync::Arc;

use strata_reflect::{
    Capability, CapabilityInterface, CapabilityMethod, PlatformVersion, Reflector,
};
use strata_runtime::{
    receiver, ArrayRef, ClassBuilder, ConstructorDefinition, FieldDefinition, MethodDefinition,
    Modifiers, Runtime, TypeRef, Value,
};

pub const PACKAGE: &str = "com.example.reflection";
pub const REFLECTION_TESTS: &str = "com.example.reflection.ReflectionTests";
pub const ATOMIC_INTEGER: &str = "java.util.concurrent.atomic.AtomicInteger";
pub const PROXY_PACKAGE: &str = "com.example.reflection.proxy";
pub const PROXY_TEST_CLASS: &str = "com.example.reflection.proxy.ProxyTestClass";

const NESTED: Modifiers = Modifiers::PRIVATE
    .union(Modifiers::STATIC)
    .union(Modifiers::FINAL);

pub fn running_version() -> PlatformVersion {
    PlatformVersion::new(1, 20, 4)
}

fn define_atomic_integer(rt: &Runtime) {
    rt.define(
        ClassBuilder::class(ATOMIC_INTEGER)
            .field(FieldDefinition::new("value", TypeRef::INT).modifiers(Modifiers::PRIVATE))
            .constructor(ConstructorDefinition::empty().modifiers(Modifiers::PUBLIC))
            .method(
                MethodDefinition::new("get", |rt, this, _| rt.load(receiver(this)?, "value"))
                    .returns(TypeRef::INT)
                    .modifiers(Modifiers::PUBLIC),
            )
            .method(
                MethodDefinition::new("incrementAndGet", |rt, this, _| {
                    let this = receiver(this)?;
                    let next = rt.load(this, "value")?.as_i32().unwrap_or_default() + 1;
                    rt.store(this, "value", Value::Int(next))?;
                    Ok(Value::Int(next))
                })
                .returns(TypeRef::INT)
                .modifiers(Modifiers::PUBLIC),
            ),
    )
    .unwrap();
}

fn define_reflection_tests(rt: &Runtime) {
    let tests = REFLECTION_TESTS;
    rt.define(
        ClassBuilder::class(tests)
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .field(
                FieldDefinition::new("test", TypeRef::string())
                    .modifiers(Modifiers::PRIVATE | Modifiers::FINAL)
                    .initial_value("A"),
            )
            .field(
                FieldDefinition::new("STATIC_TEST", TypeRef::string())
                    .modifiers(Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL)
                    .initial_value("B"),
            )
            .constructor(ConstructorDefinition::empty().modifiers(Modifiers::PUBLIC))
            .constructor(
                ConstructorDefinition::new(|rt, this, args| rt.store(this, "test", args[0].clone()))
                    .with_param(TypeRef::string())
                    .with_param(TypeRef::INT)
                    .modifiers(Modifiers::PUBLIC),
            )
            .method(
                MethodDefinition::new("split", |_, _, args| {
                    let ch = args[0].as_char().unwrap_or_default();
                    let limit = args[1].as_i32().unwrap_or_default();
                    let with_delimiters = args[2].as_bool().unwrap_or_default();
                    let items = vec![
                        Value::string(format!("lim{}", limit)),
                        Value::string(format!("{}a", ch)),
                        Value::string(format!("withDel{}", with_delimiters)),
                    ];
                    Ok(Value::Array(ArrayRef::new(TypeRef::string(), items)))
                })
                .with_param(TypeRef::CHAR)
                .with_param(TypeRef::INT)
                .with_param(TypeRef::BOOLEAN)
                .returns(TypeRef::array(TypeRef::string()))
                .modifiers(Modifiers::PRIVATE),
            )
            .method(
                MethodDefinition::new("twice", |_, _, args| {
                    Ok(Value::Int(args[0].as_i32().unwrap_or_default() * 2))
                })
                .with_param(TypeRef::INT)
                .returns(TypeRef::INT)
                .modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
            ),
    )
    .unwrap();

    let a = format!("{}$A", tests);
    let b = format!("{}$B", a);
    let c = format!("{}$C", b);
    rt.define(ClassBuilder::class(a.as_str()).modifiers(NESTED)).unwrap();
    rt.define(ClassBuilder::class(b.as_str()).modifiers(NESTED)).unwrap();
    rt.define(
        ClassBuilder::class(c.as_str())
            .modifiers(NESTED)
            .field(
                FieldDefinition::new("atomicField", TypeRef::class(ATOMIC_INTEGER))
                    .modifiers(Modifiers::PUBLIC | Modifiers::FINAL),
            )
            .constructor(ConstructorDefinition::new(|rt, this, _| {
                let atomic = rt.instantiate(rt.find_class(ATOMIC_INTEGER)?)?;
                rt.store(this, "atomicField", Value::Object(atomic))
            })),
    )
    .unwrap();

    rt.define(
        ClassBuilder::interface(format!("{}$GameProfile", tests))
            .field(
                FieldDefinition::new("test", TypeRef::string())
                    .modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL)
                    .initial_value("1"),
            )
            .method(
                MethodDefinition::new("field_setter_test", |_, _, _| Err("abstract".into()))
                    .with_param(TypeRef::string())
                    .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT),
            )
            .method(
                MethodDefinition::new("field_getter_test", |_, _, _| Err("abstract".into()))
                    .returns(TypeRef::string())
                    .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT),
            ),
    )
    .unwrap();

    rt.define(
        ClassBuilder::enumeration(format!("{}$EnumTest", tests))
            .enum_constant("A")
            .enum_constant("B")
            .enum_constant("C")
            .field(
                FieldDefinition::new("D", TypeRef::INT)
                    .modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL)
                    .initial_value(9934343),
            ),
    )
    .unwrap();
}

fn define_proxy_test_class(rt: &Runtime) {
    rt.define(
        ClassBuilder::class(PROXY_TEST_CLASS)
            .field(
                FieldDefinition::new("finalId", TypeRef::INT)
                    .modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL)
                    .initial_value(555),
            )
            .field(
                FieldDefinition::new("id", TypeRef::INT)
                    .as_static()
                    .initial_value(123),
            )
            .field(FieldDefinition::new("date", TypeRef::INT))
            .field(
                FieldDefinition::new("operationField", TypeRef::string())
                    .modifiers(Modifiers::PRIVATE),
            )
            .constructor(
                ConstructorDefinition::new(|rt, this, args| {
                    rt.store(this, "operationField", args[0].clone())?;
                    rt.store(this, "date", args[1].clone())
                })
                .with_param(TypeRef::string())
                .with_param(TypeRef::INT)
                .modifiers(Modifiers::PUBLIC),
            )
            .method(
                MethodDefinition::new("doStaticThings", |_, _, args| {
                    let times = args[0].as_i32().unwrap_or_default().max(0) as usize;
                    Ok(Value::string("static".repeat(times)))
                })
                .with_param(TypeRef::INT)
                .returns(TypeRef::string())
                .modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
            )
            .method(
                MethodDefinition::new("doSomething", |rt, this, args| {
                    let this = receiver(this)?;
                    let current = rt.load(this, "operationField")?;
                    let next = format!(
                        "{}doSomething{}{}",
                        current.as_str().unwrap_or_default(),
                        args[0].as_str().unwrap_or_default(),
                        args[1].as_bool().unwrap_or_default()
                    );
                    rt.store(this, "operationField", Value::string(next))?;
                    Ok(Value::Null)
                })
                .with_param(TypeRef::string())
                .with_param(TypeRef::BOOLEAN)
                .modifiers(Modifiers::PUBLIC),
            )
            .method(
                MethodDefinition::new("getSomething", |rt, this, args| {
                    let current = rt.load(receiver(this)?, "operationField")?;
                    Ok(Value::string(format!(
                        "{}{}{}",
                        current.as_str().unwrap_or_default(),
                        args[0].as_str().unwrap_or_default(),
                        args[1].as_bool().unwrap_or_default()
                    )))
                })
                .with_param(TypeRef::string())
                .with_param(TypeRef::BOOLEAN)
                .returns(TypeRef::string())
                .modifiers(Modifiers::PUBLIC),
            ),
    )
    .unwrap();
}

/// Runtime with every fixture class registered
pub fn runtime() -> Arc<Runtime> {
    let rt = Runtime::new();
    define_atomic_integer(&rt);
    define_reflection_tests(&rt);
    define_proxy_test_class(&rt);
    Arc::new(rt)
}

/// Route handle logs to the test output; `RUST_LOG` picks the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Reflector over a fresh fixture runtime
pub fn reflector() -> Reflector {
    init_tracing();
    Reflector::new(runtime(), running_version())
}

/// Capability interface over `ProxyTestClass`
pub struct ProxyTestProxified;

impl Capability for ProxyTestProxified {
    fn interface() -> CapabilityInterface {
        CapabilityInterface::new("ProxyTestProxified")
            .package(PROXY_PACKAGE)
            .target_name("ProxyTestClass")
            .ignore_current_name()
            .method(
                CapabilityMethod::field("finalId")
                    .as_static()
                    .as_final()
                    .returns(TypeRef::INT),
            )
            .method(CapabilityMethod::field("id").as_static().returns(TypeRef::INT))
            .method(CapabilityMethod::field("id").as_static().with_param(TypeRef::INT))
            .method(CapabilityMethod::field("date").returns(TypeRef::INT))
            .method(CapabilityMethod::field("date").with_param(TypeRef::INT))
            .method(
                CapabilityMethod::field("operationField")
                    .as_private()
                    .returns(TypeRef::string()),
            )
            .method(
                CapabilityMethod::method("doStaticThings")
                    .as_static()
                    .returns(TypeRef::string())
                    .with_param(TypeRef::INT),
            )
            .method(
                CapabilityMethod::constructor("ProxyTestProxified")
                    .returns(TypeRef::class(PROXY_TEST_CLASS))
                    .with_param(TypeRef::string())
                    .with_param(TypeRef::INT),
            )
            .method(
                CapabilityMethod::method("doSomething")
                    .with_param(TypeRef::string())
                    .with_param(TypeRef::BOOLEAN),
            )
            .method(
                CapabilityMethod::method("getSomething")
                    .returns(TypeRef::string())
                    .with_param(TypeRef::string())
                    .with_param(TypeRef::BOOLEAN),
            )
    }
}
