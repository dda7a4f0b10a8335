use crate::class::ClassHandle;
use crate::error::{RuntimeError, RuntimeResult};
use crate::loader::{self, ClassDefinition, ClassLoader, ClassLoaderHandle};
use crate::names::NameCounts;
use crate::output::ClassOutput;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Log level forwarded to the managed runtime's own logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(RuntimeError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Bootstrap settings for the managed runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Dependency archives put on the runtime's classpath.
    pub classpath: Vec<PathBuf>,

    /// Extra runtime arguments.
    pub args: Vec<String>,

    pub log_level: LogLevel,

    /// Where compiled classes are materialized, if anywhere.
    pub class_output_dir: Option<PathBuf>,
}

impl RuntimeConfig {
    /// The runtime arguments, with the log level appended as a system property.
    pub fn effective_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(format!("-Dlogback.level.crossload={}", self.log_level));
        args
    }
}

/// The managed runtime as seen from this side of the boundary.
///
/// A runtime is created stopped. Anything that needs loaded classes calls
/// [`Runtime::require_started`] first and fails with [`RuntimeError::NotStarted`]
/// otherwise.
pub struct Runtime {
    config: RuntimeConfig,
    started: AtomicBool,
    /// Loader that owns every class generated through the bridge.
    generated: ClassLoaderHandle,
    class_output: RwLock<Option<ClassOutput>>,
    name_counts: Arc<NameCounts>,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Runtime {
            config,
            started: AtomicBool::new(false),
            generated: ClassLoader::new("generated", None),
            class_output: RwLock::new(None),
            name_counts: Arc::new(NameCounts::new()),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Starts the runtime. Starting twice is an error.
    pub fn start(&self) -> RuntimeResult<()> {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RuntimeError::AlreadyStarted);
        }
        *self.class_output.write() = self.config.class_output_dir.clone().map(ClassOutput::new);
        log::info!(
            "Managed runtime started (classpath entries: {}, args: {:?})",
            self.config.classpath.len(),
            self.config.effective_args()
        );
        Ok(())
    }

    /// Starts the runtime unless it is already running.
    pub fn ensure_started(&self) {
        if !self.is_started() {
            // Losing a start race to another thread leaves the runtime started, which is all we need.
            let _ = self.start();
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn require_started(&self) -> RuntimeResult<()> {
        if self.is_started() {
            Ok(())
        } else {
            Err(RuntimeError::NotStarted)
        }
    }

    pub fn generated_loader(&self) -> &ClassLoaderHandle {
        &self.generated
    }

    /// Name allocation counts for classes defined into the generated loader.
    pub fn name_counts(&self) -> &Arc<NameCounts> {
        &self.name_counts
    }

    pub fn class_output(&self) -> Option<ClassOutput> {
        self.class_output.read().clone()
    }

    pub fn set_class_output_directory(&self, path: impl Into<PathBuf>) -> RuntimeResult<()> {
        self.require_started()?;
        let output = ClassOutput::new(path);
        log::info!("Class output directory set to {}", output.root().display());
        *self.class_output.write() = Some(output);
        Ok(())
    }

    /// Loads `name` through the calling thread's context loader when one is
    /// installed, otherwise through the generated-class loader.
    pub fn load_class(&self, name: &str) -> RuntimeResult<ClassHandle> {
        self.require_started()?;
        match loader::context_class_loader() {
            Some(context) => context.load_class(name),
            None => self.generated.load_class(name),
        }
    }

    pub fn define_class(&self, definition: ClassDefinition) -> RuntimeResult<ClassHandle> {
        self.require_started()?;
        self.generated.define_class(definition)
    }

    /// Defines a single-method adapter class bound to `binding`.
    ///
    /// A name that was already generated returns the existing class untouched.
    pub fn define_functional_class(
        &self,
        binary_name: &str,
        interface: ClassHandle,
        binding: Arc<dyn Any + Send + Sync>,
    ) -> RuntimeResult<ClassHandle> {
        self.require_started()?;
        if self.generated.defines(binary_name) {
            return self.generated.load_class(binary_name);
        }
        self.generated
            .define_class(ClassDefinition::functional(binary_name, interface, binding))
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("started", &self.is_started())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib;

    #[test]
    fn operations_fail_before_start() {
        let runtime = Runtime::new(RuntimeConfig::default());
        assert!(!runtime.is_started());
        assert!(matches!(runtime.load_class(stdlib::OBJECT), Err(RuntimeError::NotStarted)));
        assert!(matches!(
            runtime.set_class_output_directory("out"),
            Err(RuntimeError::NotStarted)
        ));
    }

    #[test]
    fn start_is_one_shot() {
        let runtime = Runtime::new(RuntimeConfig::default());
        runtime.start().unwrap();
        assert!(matches!(runtime.start(), Err(RuntimeError::AlreadyStarted)));
        runtime.ensure_started();
        assert!(runtime.is_started());
    }

    #[test]
    fn log_level_parses_and_lands_in_args() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("LOUD".parse::<LogLevel>().is_err());

        let config = RuntimeConfig {
            args: vec!["-Xmx1g".to_string()],
            log_level: LogLevel::Debug,
            ..RuntimeConfig::default()
        };
        assert_eq!(
            config.effective_args(),
            vec!["-Xmx1g".to_string(), "-Dlogback.level.crossload=DEBUG".to_string()]
        );
    }

    #[test]
    fn functional_class_names_are_reused() {
        let runtime = Runtime::new(RuntimeConfig::default());
        runtime.start().unwrap();
        let first = runtime
            .define_functional_class("gen.Provider", stdlib::object(), Arc::new(1u8))
            .unwrap();
        let second = runtime
            .define_functional_class("gen.Provider", stdlib::object(), Arc::new(2u8))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(second.binding::<u8>().as_deref(), Some(&1));
    }
}
