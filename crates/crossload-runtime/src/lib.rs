//! The managed-runtime side of the crossload bridge.
//!
//! Compiled classes live here as [`ClassHandle`]s, defined into and resolved
//! through [`ClassLoader`]s. Each thread carries a context loader that the
//! bridge swaps while it runs code that needs freshly compiled classes.

pub mod array;
pub mod class;
pub mod error;
pub mod loader;
pub mod names;
pub mod output;
pub mod runtime;
pub mod stdlib;

pub use array::HostArray;
pub use class::{ClassHandle, ClassId, ClassKind};
pub use error::{RuntimeError, RuntimeResult};
pub use loader::{
    context_class_loader, set_context_class_loader, ClassDefinition, ClassLoader, ClassLoaderHandle,
};
pub use names::NameCounts;
pub use output::ClassOutput;
pub use runtime::{LogLevel, Runtime, RuntimeConfig};
