use crate::error::{BridgeError, BridgeResult};
use crate::identity::ClassIdentifier;
use crossload_runtime::{NameCounts, Runtime};
use std::sync::Arc;

/// Namespace every compiled class lives under unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "org.crossload.user";

/// Separator between a base name and its disambiguation counter.
pub const DISAMBIGUATION_SEPARATOR: &str = "$$";

const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// Rewrites a dotted name into a legal binary class name.
///
/// Each dot-separated segment is sanitized on its own: characters outside the
/// identifier grammar become `_`, a leading digit gets a `_` prefix, reserved
/// words get a `_` suffix and empty segments become `_`. `$` is replaced too,
/// since `$$n` suffixes are reserved for disambiguation.
pub fn sanitize_class_name(name: &str) -> String {
    name.split('.').map(sanitize_segment).collect::<Vec<_>>().join(".")
}

fn sanitize_segment(segment: &str) -> String {
    if segment.is_empty() {
        return "_".to_string();
    }
    let mut out: String = segment
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Hands out unique binary names for compiled classes.
///
/// Counters are keyed by the sanitized base name, so two identifiers that
/// sanitize to the same base share one counter. Counts never decrease.
/// Allocators built with [`for_runtime`](Self::for_runtime) share the
/// runtime's counter table, so every bridge over that runtime draws from the
/// same sequence.
#[derive(Debug)]
pub struct ClassNameAllocator {
    namespace: String,
    counts: Arc<NameCounts>,
}

impl ClassNameAllocator {
    /// An allocator with a private counter table.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self::with_counts(namespace, Arc::new(NameCounts::new()))
    }

    pub fn for_runtime(namespace: impl Into<String>, runtime: &Runtime) -> Self {
        Self::with_counts(namespace, runtime.name_counts().clone())
    }

    fn with_counts(namespace: impl Into<String>, counts: Arc<NameCounts>) -> Self {
        ClassNameAllocator {
            namespace: namespace.into(),
            counts,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The name the first allocation for `identifier` returns.
    pub fn base_name(&self, identifier: &ClassIdentifier) -> String {
        sanitize_class_name(&format!("{}.{}", self.namespace, identifier))
    }

    /// Allocates the next unique name for `identifier`.
    ///
    /// The first allocation for a base name returns it unchanged; the n-th
    /// returns `base$$n`.
    pub fn allocate(&self, identifier: &ClassIdentifier) -> BridgeResult<String> {
        let base = self.base_name(identifier);
        let count = self
            .counts
            .increment(&base)
            .ok_or_else(|| BridgeError::NameCounterOverflow(base.clone()))?;
        let name = if count == 1 {
            base
        } else {
            format!("{base}{DISAMBIGUATION_SEPARATOR}{count}")
        };
        log::debug!("Allocated class name {} for {}", name, identifier);
        Ok(name)
    }

    /// How many names have been handed out for `base`.
    pub fn allocation_count(&self, base: &str) -> u32 {
        self.counts.get(base)
    }
}

impl Default for ClassNameAllocator {
    fn default() -> Self {
        ClassNameAllocator::new(DEFAULT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_each_segment() {
        assert_eq!(sanitize_class_name("pkg.Foo"), "pkg.Foo");
        assert_eq!(sanitize_class_name("pkg.make.<locals>.Point"), "pkg.make._locals_.Point");
        assert_eq!(sanitize_class_name("my-app.2d.Vec"), "my_app._2d.Vec");
        assert_eq!(sanitize_class_name("lib.class.new"), "lib.class_.new_");
        assert_eq!(sanitize_class_name("a..b"), "a._.b");
    }

    #[test]
    fn first_allocation_is_the_base_name() {
        let names = ClassNameAllocator::default();
        let id = ClassIdentifier::from("pkg.Foo");
        assert_eq!(names.allocate(&id).unwrap(), "org.crossload.user.pkg.Foo");
        assert_eq!(names.allocate(&id).unwrap(), "org.crossload.user.pkg.Foo$$2");
        assert_eq!(names.allocation_count("org.crossload.user.pkg.Foo"), 2);
    }

    #[test]
    fn identifiers_with_the_same_sanitized_form_share_a_counter() {
        let names = ClassNameAllocator::new("ns");
        assert_eq!(names.allocate(&"a-b".into()).unwrap(), "ns.a_b");
        assert_eq!(names.allocate(&"a b".into()).unwrap(), "ns.a_b$$2");
        assert_eq!(names.allocate(&"a_b".into()).unwrap(), "ns.a_b$$3");
    }

    #[test]
    fn user_dollar_signs_cannot_forge_a_suffix() {
        assert_eq!(sanitize_class_name("pkg.Foo$$2"), "pkg.Foo__2");

        let names = ClassNameAllocator::new("ns");
        assert_eq!(names.allocate(&"Foo$$2".into()).unwrap(), "ns.Foo__2");
        assert_eq!(names.allocate(&"Foo".into()).unwrap(), "ns.Foo");
        assert_eq!(names.allocate(&"Foo".into()).unwrap(), "ns.Foo$$2");
    }

    #[test]
    fn allocators_over_one_runtime_share_counts() {
        let runtime = Runtime::new(Default::default());
        let a = ClassNameAllocator::for_runtime("ns", &runtime);
        let b = ClassNameAllocator::for_runtime("ns", &runtime);
        assert_eq!(a.allocate(&"Foo".into()).unwrap(), "ns.Foo");
        assert_eq!(b.allocate(&"Foo".into()).unwrap(), "ns.Foo$$2");
        assert_eq!(runtime.name_counts().get("ns.Foo"), 2);
    }
}
