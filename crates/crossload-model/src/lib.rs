//! The interpreted object model as the bridge sees it.
//!
//! Only what the bridge needs is modelled: classes and functions (which own
//! identifiers), plain values, instances, and native objects that belong to
//! neither side.

pub mod class;
pub mod definition;
pub mod error;
pub mod function;
pub mod value;

pub use class::{ClassBuilder, InterpClass, ENTRY_MODULE};
pub use definition::{Definition, ObjectKey, WeakDefinition};
pub use error::InterpError;
pub use function::{FunctionBody, InterpFunction};
pub use value::{BuiltinType, Instance, NativeObject, Value};
