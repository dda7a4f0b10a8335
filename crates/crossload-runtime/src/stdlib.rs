//! Fixed classes of the runtime's standard library.
//!
//! These handles exist once per process and never change, whatever user code
//! registers later.

use crate::class::{ClassHandle, ClassKind};
use once_cell::sync::Lazy;

pub const OBJECT: &str = "java.lang.Object";
pub const INTEGER: &str = "java.lang.Integer";
pub const STRING: &str = "java.lang.String";
pub const BOOLEAN: &str = "java.lang.Boolean";
pub const OPAQUE_REFERENCE: &str = "org.crossload.types.OpaqueReference";

static OBJECT_CLASS: Lazy<ClassHandle> =
    Lazy::new(|| ClassHandle::new(OBJECT, ClassKind::Standard, None, None, None));

static INTEGER_CLASS: Lazy<ClassHandle> = Lazy::new(|| standard(INTEGER));
static STRING_CLASS: Lazy<ClassHandle> = Lazy::new(|| standard(STRING));
static BOOLEAN_CLASS: Lazy<ClassHandle> = Lazy::new(|| standard(BOOLEAN));

static OPAQUE_REFERENCE_CLASS: Lazy<ClassHandle> = Lazy::new(|| {
    ClassHandle::new(OPAQUE_REFERENCE, ClassKind::Sentinel, Some(object()), None, None)
});

fn standard(name: &str) -> ClassHandle {
    ClassHandle::new(name, ClassKind::Standard, Some(object()), None, None)
}

/// The top-level object class.
pub fn object() -> ClassHandle {
    OBJECT_CLASS.clone()
}

/// Boxed integer.
pub fn integer() -> ClassHandle {
    INTEGER_CLASS.clone()
}

pub fn string() -> ClassHandle {
    STRING_CLASS.clone()
}

/// Boxed boolean.
pub fn boolean() -> ClassHandle {
    BOOLEAN_CLASS.clone()
}

/// Sentinel type for native values that have no compiled counterpart.
pub fn opaque_reference() -> ClassHandle {
    OPAQUE_REFERENCE_CLASS.clone()
}

/// Every standard class, in a stable order.
pub fn all() -> [ClassHandle; 5] {
    [object(), integer(), string(), boolean(), opaque_reference()]
}
