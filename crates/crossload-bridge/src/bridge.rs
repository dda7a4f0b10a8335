use crate::callable::CallableWrapper;
use crate::config::BridgeConfig;
use crate::error::BridgeResult;
use crate::identity::ClassIdentifier;
use crate::loader_scope::ClassLoaderOverride;
use crate::naming::{ClassNameAllocator, DEFAULT_NAMESPACE};
use crate::queue::{CompilationQueue, CompilationTask};
use crate::registry::ClassIdentityRegistry;
use crate::resolver::{ClassCompiler, TypeResolver};
use crate::runs::{RunId, SolverRunRegistry};
use crate::translator::{TranslationRequest, Translator};
use crossload_model::{Definition, InterpClass, InterpFunction, Value};
use crossload_runtime::{ClassHandle, ClassLoaderHandle, Runtime};
use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

/// Entry point tying the registries to one managed runtime and translator.
///
/// Every operation checks that the runtime is started and fails with
/// [`BridgeError::NotStarted`](crate::BridgeError::NotStarted) otherwise.
pub struct Bridge {
    runtime: Arc<Runtime>,
    translator: Arc<dyn Translator>,
    names: ClassNameAllocator,
    registry: ClassIdentityRegistry,
    queue: CompilationQueue,
    runs: SolverRunRegistry,
}

impl Bridge {
    pub fn new(runtime: Arc<Runtime>, translator: Arc<dyn Translator>) -> Self {
        Self::with_namespace(runtime, translator, DEFAULT_NAMESPACE)
    }

    /// A bridge over a fresh, stopped runtime built from `config`.
    pub fn from_config(config: &BridgeConfig, translator: Arc<dyn Translator>) -> Self {
        let runtime = Arc::new(Runtime::new(config.runtime.clone()));
        Self::with_namespace(runtime, translator, config.bridge.namespace.clone())
    }

    /// Names are drawn from the runtime's shared counter table, so bridges
    /// over the same runtime never mint the same class name.
    pub fn with_namespace(
        runtime: Arc<Runtime>,
        translator: Arc<dyn Translator>,
        namespace: impl Into<String>,
    ) -> Self {
        let names = ClassNameAllocator::for_runtime(namespace, &runtime);
        Bridge {
            runtime,
            translator,
            names,
            registry: ClassIdentityRegistry::new(),
            queue: CompilationQueue::new(),
            runs: SolverRunRegistry::new(),
        }
    }

    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    pub fn names(&self) -> &ClassNameAllocator {
        &self.names
    }

    pub fn registry(&self) -> &ClassIdentityRegistry {
        &self.registry
    }

    pub fn queue(&self) -> &CompilationQueue {
        &self.queue
    }

    pub fn runs(&self) -> &SolverRunRegistry {
        &self.runs
    }

    fn require_started(&self) -> BridgeResult<()> {
        Ok(self.runtime.require_started()?)
    }

    pub fn identifier_for(&self, definition: &Definition) -> ClassIdentifier {
        ClassIdentityRegistry::identifier_for(definition)
    }

    pub fn lookup(&self, identifier: &ClassIdentifier) -> BridgeResult<Option<ClassHandle>> {
        self.require_started()?;
        Ok(self.registry.lookup(identifier))
    }

    /// Translates `class` under a freshly allocated name and registers it.
    ///
    /// A translation failure leaves the registry untouched.
    pub fn compile_class(&self, class: &Arc<InterpClass>) -> BridgeResult<ClassHandle> {
        self.require_started()?;
        let identifier = ClassIdentifier::of_class(class);
        let binary_name = self.names.allocate(&identifier)?;
        log::debug!("Compiling {} as {}", identifier, binary_name);

        let request = TranslationRequest {
            class,
            identifier: &identifier,
            binary_name: &binary_name,
            runtime: &self.runtime,
            registry: &self.registry,
        };
        let compiled = self.translator.translate(&request)?;
        self.materialize(&compiled);
        log::info!("Compiled {} -> {}", identifier, compiled);
        Ok(self.registry.register(identifier, compiled))
    }

    /// Registers `class` for `definition` and records it as the definition's
    /// provenance. Returns the definition.
    pub fn register_definition(
        &self,
        definition: Definition,
        class: ClassHandle,
    ) -> BridgeResult<Definition> {
        self.require_started()?;
        Ok(self.registry.register_definition(definition, class))
    }

    /// Queues a class for the next [`process_compilation_queue`](Self::process_compilation_queue).
    pub fn enqueue(&self, task: impl Into<CompilationTask>) -> BridgeResult<()> {
        self.require_started()?;
        self.queue.enqueue(task);
        Ok(())
    }

    pub fn process_compilation_queue(&self) -> BridgeResult<usize> {
        self.require_started()?;
        self.queue.drain(|class| self.compile_class(&class))
    }

    /// A resolver that compiles missing classes through this bridge.
    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(&self.registry).with_compiler(self)
    }

    pub fn resolve(&self, value: &Value) -> BridgeResult<ClassHandle> {
        self.require_started()?;
        Ok(self.resolver().resolve(value))
    }

    pub fn resolve_descriptor(&self, value: &Value) -> BridgeResult<String> {
        self.require_started()?;
        Ok(self.resolver().resolve_descriptor(value))
    }

    /// Installs a context loader answering every identifier registered so far.
    pub fn class_loader_override(&self) -> BridgeResult<ClassLoaderOverride> {
        self.require_started()?;
        Ok(ClassLoaderOverride::enter(
            &self.registry,
            self.runtime.generated_loader().clone(),
        ))
    }

    pub fn with_class_loader_override<R>(
        &self,
        body: impl FnOnce(&ClassLoaderHandle) -> R,
    ) -> BridgeResult<R> {
        let scope = self.class_loader_override()?;
        Ok(body(scope.loader()))
    }

    /// Generates a single-method class implementing `interface` for `function`
    /// and registers it under the function's identifier.
    pub fn define_functional_class<F>(
        &self,
        function: &Arc<InterpFunction>,
        interface: &ClassHandle,
        adapter: F,
    ) -> BridgeResult<ClassHandle>
    where
        F: Any + Send + Sync,
    {
        self.require_started()?;
        let identifier = ClassIdentifier::of(&Definition::Function(function.clone()));
        let binary_name = self.names.allocate(&identifier)?;
        let class =
            self.runtime
                .define_functional_class(&binary_name, interface.clone(), Arc::new(adapter))?;
        log::info!("Generated {} implementing {} for {}", class, interface, identifier);
        Ok(self.registry.register(identifier, class))
    }

    /// [`define_functional_class`](Self::define_functional_class) with a
    /// [`CallableWrapper`] producing arrays of `component`.
    pub fn wrap_function(
        &self,
        function: &Arc<InterpFunction>,
        interface: &ClassHandle,
        component: ClassHandle,
    ) -> BridgeResult<ClassHandle> {
        let wrapper = CallableWrapper::from_function(function.clone(), component);
        self.define_functional_class(function, interface, wrapper)
    }

    pub fn begin_run(&self, run_id: impl Into<RunId>, referenced: Vec<Value>) -> BridgeResult<()> {
        self.require_started()?;
        self.runs.begin(run_id, referenced);
        Ok(())
    }

    pub fn end_run(&self, run_id: impl Into<RunId>) -> BridgeResult<()> {
        self.require_started()?;
        self.runs.end(run_id)
    }

    pub fn set_class_output_directory(&self, path: impl Into<PathBuf>) -> BridgeResult<()> {
        Ok(self.runtime.set_class_output_directory(path)?)
    }

    fn materialize(&self, class: &ClassHandle) {
        let Some(output) = self.runtime.class_output() else {
            return;
        };
        if let Err(err) = output.write(class) {
            log::warn!("Could not write {}: {}", class, err);
        }
    }
}

impl ClassCompiler for Bridge {
    fn compile_class(&self, class: &Arc<InterpClass>) -> BridgeResult<ClassHandle> {
        Bridge::compile_class(self, class)
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("started", &self.runtime.is_started())
            .field("namespace", &self.names.namespace())
            .field("registered", &self.registry.len())
            .field("queued", &self.queue.len())
            .field("active_runs", &self.runs.active_runs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::translator::ShapeTranslator;
    use crossload_model::BuiltinType;

    fn stopped() -> Bridge {
        Bridge::from_config(&BridgeConfig::default(), Arc::new(ShapeTranslator))
    }

    #[test]
    fn everything_fails_before_start() {
        let bridge = stopped();
        let class = InterpClass::builder("Foo").module("pkg").build();

        assert!(matches!(bridge.compile_class(&class), Err(BridgeError::NotStarted)));
        assert!(matches!(
            bridge.resolve(&Value::Builtin(BuiltinType::Int)),
            Err(BridgeError::NotStarted)
        ));
        assert!(matches!(bridge.enqueue(class.clone()), Err(BridgeError::NotStarted)));
        assert!(bridge.queue().is_empty());
        assert!(matches!(bridge.process_compilation_queue(), Err(BridgeError::NotStarted)));
        assert!(matches!(bridge.class_loader_override(), Err(BridgeError::NotStarted)));
        assert!(matches!(bridge.begin_run("r", Vec::new()), Err(BridgeError::NotStarted)));
        assert!(matches!(bridge.end_run("r"), Err(BridgeError::NotStarted)));
        assert!(matches!(
            bridge.set_class_output_directory("out"),
            Err(BridgeError::NotStarted)
        ));
        assert!(matches!(bridge.lookup(&"pkg.Foo".into()), Err(BridgeError::NotStarted)));
        assert_eq!(bridge.names().allocation_count("org.crossload.user.pkg.Foo"), 0);
    }

    #[test]
    fn compile_registers_under_the_identifier() {
        let bridge = stopped();
        bridge.runtime().start().unwrap();
        let class = InterpClass::builder("Foo").module("pkg").build();

        let first = bridge.compile_class(&class).unwrap();
        let second = bridge.compile_class(&class).unwrap();
        assert_eq!(first.binary_name(), "org.crossload.user.pkg.Foo");
        assert_eq!(second.binary_name(), "org.crossload.user.pkg.Foo$$2");
        assert_eq!(bridge.lookup(&"pkg.Foo".into()).unwrap(), Some(second));
    }
}
