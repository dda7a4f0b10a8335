use crate::error::BridgeResult;
use crate::identity::ClassIdentifier;
use crate::registry::ClassIdentityRegistry;
use crossload_model::{BuiltinType, InterpClass, Value};
use crossload_runtime::{stdlib, ClassHandle};
use std::sync::Arc;

/// Compiles and registers a class that a resolution needed but found missing.
pub trait ClassCompiler {
    fn compile_class(&self, class: &Arc<InterpClass>) -> BridgeResult<ClassHandle>;
}

/// Maps an interpreted value or type object to a managed class.
///
/// Resolution is total. The first matching rule wins:
///
/// 1. a managed class object is returned as is;
/// 2. the `int`, `str` and `bool` type objects map to the boxed standard
///    classes, whatever the registry holds;
/// 3. a class or function (or an instance of a class) with recorded
///    provenance returns that class;
/// 4. a user class is looked up by identifier, and compiled on demand when a
///    compiler is attached;
/// 5. native values map to the opaque reference class;
/// 6. anything else is `java.lang.Object`.
pub struct TypeResolver<'a> {
    registry: &'a ClassIdentityRegistry,
    compiler: Option<&'a dyn ClassCompiler>,
}

impl<'a> TypeResolver<'a> {
    /// A resolver that only consults the registry.
    pub fn new(registry: &'a ClassIdentityRegistry) -> Self {
        TypeResolver { registry, compiler: None }
    }

    pub fn with_compiler(mut self, compiler: &'a dyn ClassCompiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn resolve(&self, value: &Value) -> ClassHandle {
        match value {
            Value::HostClass(class) => return class.clone(),
            Value::Builtin(BuiltinType::Int) => return stdlib::integer(),
            Value::Builtin(BuiltinType::Str) => return stdlib::string(),
            Value::Builtin(BuiltinType::Bool) => return stdlib::boolean(),
            _ => {}
        }

        if let Some(definition) = value.as_definition() {
            if let Some(class) = self.registry.provenance(&definition) {
                return class;
            }
        }
        if let Value::Instance(instance) = value {
            if let Some(class) = self.registry.provenance(&instance.class().clone().into()) {
                return class;
            }
        }

        match value {
            Value::Class(class) => self.resolve_class(class),
            Value::Native(_) => stdlib::opaque_reference(),
            _ => stdlib::object(),
        }
    }

    /// The type descriptor of whatever [`resolve`](Self::resolve) returns.
    pub fn resolve_descriptor(&self, value: &Value) -> String {
        self.resolve(value).descriptor()
    }

    fn resolve_class(&self, class: &Arc<InterpClass>) -> ClassHandle {
        let identifier = ClassIdentifier::of_class(class);
        if let Some(handle) = self.registry.lookup(&identifier) {
            return handle;
        }
        let Some(compiler) = self.compiler else {
            log::debug!("{} is not compiled yet; resolving to {}", identifier, stdlib::OBJECT);
            return stdlib::object();
        };
        match compiler.compile_class(class) {
            Ok(handle) => handle,
            Err(err) => {
                log::warn!("Could not compile {} on demand ({}); resolving to {}", identifier, err, stdlib::OBJECT);
                stdlib::object()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crossload_model::{Instance, InterpFunction, NativeObject};
    use crossload_runtime::{ClassDefinition, Runtime, RuntimeConfig};
    use std::cell::Cell;

    fn started() -> Runtime {
        let runtime = Runtime::new(RuntimeConfig::default());
        runtime.start().unwrap();
        runtime
    }

    struct CountingCompiler<'r> {
        runtime: &'r Runtime,
        registry: &'r ClassIdentityRegistry,
        calls: Cell<usize>,
    }

    impl ClassCompiler for CountingCompiler<'_> {
        fn compile_class(&self, class: &Arc<InterpClass>) -> BridgeResult<ClassHandle> {
            self.calls.set(self.calls.get() + 1);
            let identifier = ClassIdentifier::of_class(class);
            let handle = self
                .runtime
                .define_class(ClassDefinition::generated(format!("ns.{identifier}"), Vec::new()))?;
            Ok(self.registry.register(identifier, handle))
        }
    }

    struct FailingCompiler;

    impl ClassCompiler for FailingCompiler {
        fn compile_class(&self, _class: &Arc<InterpClass>) -> BridgeResult<ClassHandle> {
            Err(BridgeError::NotStarted)
        }
    }

    #[test]
    fn primitives_are_never_shadowed() {
        let runtime = started();
        let registry = ClassIdentityRegistry::new();
        let fake = runtime
            .define_class(ClassDefinition::generated("ns.Integer", Vec::new()))
            .unwrap();
        registry.register("Integer".into(), fake.clone());
        registry.register("int".into(), fake);

        let resolver = TypeResolver::new(&registry);
        assert_eq!(resolver.resolve(&Value::Builtin(BuiltinType::Int)), stdlib::integer());
        assert_eq!(resolver.resolve(&Value::Builtin(BuiltinType::Str)), stdlib::string());
        assert_eq!(resolver.resolve(&Value::Builtin(BuiltinType::Bool)), stdlib::boolean());
    }

    #[test]
    fn host_classes_pass_through() {
        let registry = ClassIdentityRegistry::new();
        let resolver = TypeResolver::new(&registry);
        let string = stdlib::string();
        assert_eq!(resolver.resolve(&Value::HostClass(string.clone())), string);
    }

    #[test]
    fn provenance_wins_over_the_registry() {
        let runtime = started();
        let registry = ClassIdentityRegistry::new();
        let class = InterpClass::builder("Foo").module("pkg").build();
        let original = runtime
            .define_class(ClassDefinition::generated("ns.pkg.Foo", Vec::new()))
            .unwrap();
        let newer = runtime
            .define_class(ClassDefinition::generated("ns.pkg.Foo$$2", Vec::new()))
            .unwrap();
        registry.register_definition(class.clone().into(), original.clone());
        registry.register("pkg.Foo".into(), newer);

        let resolver = TypeResolver::new(&registry);
        assert_eq!(resolver.resolve(&Value::Class(class.clone())), original);

        let instance = Instance::new(class, Vec::new());
        assert_eq!(resolver.resolve(&Value::Instance(instance)), original);
    }

    #[test]
    fn missing_classes_compile_on_demand_once() {
        let runtime = started();
        let registry = ClassIdentityRegistry::new();
        let compiler = CountingCompiler { runtime: &runtime, registry: &registry, calls: Cell::new(0) };
        let resolver = TypeResolver::new(&registry).with_compiler(&compiler);
        let class = InterpClass::builder("Timeslot").module("school").build();

        let first = resolver.resolve(&Value::Class(class.clone()));
        let second = resolver.resolve(&Value::Class(class));
        assert_eq!(first.binary_name(), "ns.school.Timeslot");
        assert_eq!(first, second);
        assert_eq!(compiler.calls.get(), 1);
    }

    #[test]
    fn failed_on_demand_compile_degrades_to_object() {
        let registry = ClassIdentityRegistry::new();
        let resolver = TypeResolver::new(&registry).with_compiler(&FailingCompiler);
        let class = InterpClass::builder("Broken").build();
        assert_eq!(resolver.resolve(&Value::Class(class)), stdlib::object());
    }

    #[test]
    fn natives_and_everything_else() {
        let registry = ClassIdentityRegistry::new();
        let resolver = TypeResolver::new(&registry).with_compiler(&FailingCompiler);

        let native = Value::Native(NativeObject::new("ffi.Buffer", 3_u8));
        assert_eq!(resolver.resolve(&native), stdlib::opaque_reference());
        assert_eq!(
            resolver.resolve_descriptor(&native),
            "Lorg/crossload/types/OpaqueReference;"
        );

        assert_eq!(resolver.resolve(&Value::Int(5)), stdlib::object());
        assert_eq!(resolver.resolve(&Value::None), stdlib::object());
        assert_eq!(resolver.resolve(&Value::Builtin(BuiltinType::Float)), stdlib::object());
        let function = InterpFunction::new(None, "helper", |_| Ok(Value::None));
        assert_eq!(resolver.resolve(&Value::Function(function)), stdlib::object());
        assert_eq!(resolver.resolve_descriptor(&Value::None), "Ljava/lang/Object;");
    }
}
