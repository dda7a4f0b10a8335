use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-unique id of a loaded class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u64);

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

impl ClassId {
    fn fresh() -> Self {
        ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How a loaded class came to exist.
#[derive(Debug, Clone)]
pub enum ClassKind {
    /// A class shipped with the runtime's standard library.
    Standard,
    /// A class emitted by a translator from an interpreted class.
    Generated,
    /// A single-method adapter class implementing `interface`.
    Functional { interface: ClassHandle },
    /// The opaque wrapper standing in for foreign values.
    Sentinel,
}

pub(crate) struct ClassInfo {
    id: ClassId,
    binary_name: String,
    kind: ClassKind,
    superclass: Option<ClassHandle>,
    bytecode: Option<Arc<[u8]>>,
    /// The adapter object of a functional class.
    binding: Option<Arc<dyn Any + Send + Sync>>,
}

/// A reference to a class loaded in the managed runtime.
///
/// Handles compare by identity: two handles are equal only when they point at
/// the same loaded class, even if the binary names match.
#[derive(Clone)]
pub struct ClassHandle(Arc<ClassInfo>);

impl ClassHandle {
    pub(crate) fn new(
        binary_name: impl Into<String>,
        kind: ClassKind,
        superclass: Option<ClassHandle>,
        bytecode: Option<Arc<[u8]>>,
        binding: Option<Arc<dyn Any + Send + Sync>>,
    ) -> Self {
        ClassHandle(Arc::new(ClassInfo {
            id: ClassId::fresh(),
            binary_name: binary_name.into(),
            kind,
            superclass,
            bytecode,
            binding,
        }))
    }

    pub fn id(&self) -> ClassId {
        self.0.id
    }

    /// Dotted binary name, e.g. `java.lang.Integer`.
    pub fn binary_name(&self) -> &str {
        &self.0.binary_name
    }

    /// Slash-separated internal name, e.g. `java/lang/Integer`.
    pub fn internal_name(&self) -> String {
        self.0.binary_name.replace('.', "/")
    }

    /// Field descriptor, e.g. `Ljava/lang/Integer;`.
    pub fn descriptor(&self) -> String {
        format!("L{};", self.internal_name())
    }

    /// Descriptor of a one-dimensional array of this class.
    pub fn array_descriptor(&self) -> String {
        format!("[{}", self.descriptor())
    }

    pub fn kind(&self) -> &ClassKind {
        &self.0.kind
    }

    pub fn superclass(&self) -> Option<&ClassHandle> {
        self.0.superclass.as_ref()
    }

    pub fn bytecode(&self) -> Option<&[u8]> {
        self.0.bytecode.as_deref()
    }

    /// The adapter bound to a functional class, if it has the requested type.
    pub fn binding<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let binding = self.0.binding.clone()?;
        binding.downcast::<T>().ok()
    }

    /// True when `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &ClassHandle) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.superclass();
        }
        false
    }
}

impl PartialEq for ClassHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ClassHandle {}

impl Hash for ClassHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for ClassHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassHandle")
            .field("id", &self.0.id.0)
            .field("binary_name", &self.0.binary_name)
            .field("kind", &self.0.kind)
            .finish()
    }
}

impl fmt::Display for ClassHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.binary_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_identity() {
        let a = ClassHandle::new("pkg.Foo", ClassKind::Generated, None, None, None);
        let b = ClassHandle::new("pkg.Foo", ClassKind::Generated, None, None, None);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn names_and_descriptors() {
        let class = ClassHandle::new("org.crossload.user.pkg.Foo", ClassKind::Generated, None, None, None);
        assert_eq!(class.internal_name(), "org/crossload/user/pkg/Foo");
        assert_eq!(class.descriptor(), "Lorg/crossload/user/pkg/Foo;");
        assert_eq!(class.array_descriptor(), "[Lorg/crossload/user/pkg/Foo;");
    }

    #[test]
    fn binding_downcasts_to_the_bound_type() {
        let binding: Arc<dyn Any + Send + Sync> = Arc::new(42usize);
        let class = ClassHandle::new("pkg.Adapter", ClassKind::Generated, None, None, Some(binding));
        assert_eq!(class.binding::<usize>().as_deref(), Some(&42));
        assert!(class.binding::<String>().is_none());
    }

    #[test]
    fn subclass_walks_the_superclass_chain() {
        let base = ClassHandle::new("pkg.Base", ClassKind::Generated, None, None, None);
        let mid = ClassHandle::new("pkg.Mid", ClassKind::Generated, Some(base.clone()), None, None);
        let leaf = ClassHandle::new("pkg.Leaf", ClassKind::Generated, Some(mid.clone()), None, None);
        assert!(leaf.is_subclass_of(&base));
        assert!(leaf.is_subclass_of(&leaf));
        assert!(!base.is_subclass_of(&mid));
    }
}
