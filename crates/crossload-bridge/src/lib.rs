//! Bridge between interpreted classes and the managed runtime.
//!
//! The bridge names compiled classes, remembers which compiled class belongs
//! to which interpreted definition, orders compilation of classes that refer
//! to each other, swaps the thread's context class loader while host code
//! runs, and maps interpreted values to managed types.

pub mod bridge;
pub mod callable;
pub mod config;
pub mod error;
pub mod identity;
pub mod loader_scope;
pub mod naming;
pub mod queue;
pub mod registry;
pub mod resolver;
pub mod runs;
pub mod translator;

pub use bridge::Bridge;
pub use callable::{to_host_array, CallableWrapper, HostFunction};
pub use config::{BridgeConfig, BridgeSettings};
pub use error::{BridgeError, BridgeResult};
pub use identity::ClassIdentifier;
pub use loader_scope::ClassLoaderOverride;
pub use naming::{sanitize_class_name, ClassNameAllocator, DEFAULT_NAMESPACE};
pub use queue::{ClassProducer, CompilationQueue, CompilationTask};
pub use registry::{ClassIdentityRegistry, ProvenanceTable};
pub use resolver::{ClassCompiler, TypeResolver};
pub use runs::{RunId, SolverRunRegistry};
pub use translator::{ShapeTranslator, TranslationFailure, TranslationRequest, Translator};
