use crate::value::Value;
use std::sync::Arc;

/// Module name of the program entry point.
pub const ENTRY_MODULE: &str = "__main__";

/// A user-defined class of the interpreted language.
///
/// Class identity is the `Arc` allocation: two classes with the same module and
/// qualified name are still distinct objects (the redefinition case).
#[derive(Debug)]
pub struct InterpClass {
    module: Option<String>,
    qualname: String,
    bases: Vec<Arc<InterpClass>>,
    /// Declared fields with their annotated types, in declaration order.
    fields: Vec<(String, Value)>,
    /// Names defined directly in the class namespace.
    methods: Vec<String>,
}

impl InterpClass {
    pub fn builder(qualname: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            class: InterpClass {
                module: None,
                qualname: qualname.into(),
                bases: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
            },
        }
    }

    /// The defining module; classes without one belong to the entry point.
    pub fn module(&self) -> &str {
        self.module.as_deref().unwrap_or(ENTRY_MODULE)
    }

    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    pub fn bases(&self) -> &[Arc<InterpClass>] {
        &self.bases
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn defines(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }

    /// Whether the class's own namespace overrides equality or hashing.
    pub fn defines_eq_or_hash(&self) -> bool {
        self.defines("__eq__") || self.defines("__hash__")
    }
}

pub struct ClassBuilder {
    class: InterpClass,
}

impl ClassBuilder {
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.class.module = Some(module.into());
        self
    }

    pub fn base(mut self, base: Arc<InterpClass>) -> Self {
        self.class.bases.push(base);
        self
    }

    pub fn field(mut self, name: impl Into<String>, annotation: Value) -> Self {
        self.class.fields.push((name.into(), annotation));
        self
    }

    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.class.methods.push(name.into());
        self
    }

    pub fn build(self) -> Arc<InterpClass> {
        Arc::new(self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_module_means_entry_point() {
        let class = InterpClass::builder("Foo").build();
        assert_eq!(class.module(), ENTRY_MODULE);
        let class = InterpClass::builder("Foo").module("pkg").build();
        assert_eq!(class.module(), "pkg");
    }

    #[test]
    fn eq_or_hash_only_counts_own_namespace() {
        let base = InterpClass::builder("Base").method("__eq__").build();
        let child = InterpClass::builder("Child").base(base.clone()).method("score").build();
        assert!(base.defines_eq_or_hash());
        assert!(!child.defines_eq_or_hash());
        assert!(InterpClass::builder("H").method("__hash__").build().defines_eq_or_hash());
    }
}
