use crossload_model::{Definition, InterpClass, ENTRY_MODULE};
use std::fmt;

/// The string that names a class or function across the bridge.
///
/// Derived purely from the defining module and qualified name: the qualified
/// name alone for definitions made in the entry module, `module.qualname`
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassIdentifier(String);

impl ClassIdentifier {
    pub fn new(identifier: impl Into<String>) -> Self {
        ClassIdentifier(identifier.into())
    }

    pub fn from_parts(module: &str, qualname: &str) -> Self {
        if module == ENTRY_MODULE {
            ClassIdentifier(qualname.to_string())
        } else {
            ClassIdentifier(format!("{module}.{qualname}"))
        }
    }

    pub fn of(definition: &Definition) -> Self {
        Self::from_parts(definition.module(), definition.qualname())
    }

    pub fn of_class(class: &InterpClass) -> Self {
        Self::from_parts(class.module(), class.qualname())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassIdentifier {
    fn from(identifier: &str) -> Self {
        ClassIdentifier::new(identifier)
    }
}

impl From<String> for ClassIdentifier {
    fn from(identifier: String) -> Self {
        ClassIdentifier(identifier)
    }
}
