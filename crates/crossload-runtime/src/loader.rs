use crate::class::{ClassHandle, ClassKind};
use crate::error::{RuntimeError, RuntimeResult};
use crate::stdlib;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

pub type ClassLoaderHandle = Arc<ClassLoader>;

/// Everything needed to define a class in a loader.
pub struct ClassDefinition {
    pub binary_name: String,
    pub kind: ClassKind,
    pub superclass: Option<ClassHandle>,
    pub bytecode: Option<Vec<u8>>,
    pub binding: Option<Arc<dyn Any + Send + Sync>>,
}

impl ClassDefinition {
    /// A translator-emitted class extending the top-level object class.
    pub fn generated(binary_name: impl Into<String>, bytecode: Vec<u8>) -> Self {
        ClassDefinition {
            binary_name: binary_name.into(),
            kind: ClassKind::Generated,
            superclass: Some(stdlib::object()),
            bytecode: Some(bytecode),
            binding: None,
        }
    }

    /// A single-method adapter class whose implementation is `binding`.
    pub fn functional(
        binary_name: impl Into<String>,
        interface: ClassHandle,
        binding: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        ClassDefinition {
            binary_name: binary_name.into(),
            kind: ClassKind::Functional { interface },
            superclass: Some(stdlib::object()),
            bytecode: None,
            binding: Some(binding),
        }
    }

    pub fn with_superclass(mut self, superclass: ClassHandle) -> Self {
        self.superclass = Some(superclass);
        self
    }
}

/// A class-resolution context.
///
/// Lookup order is: alias map, classes defined by this loader, then the parent.
/// Aliases are fixed when the loader is built; definitions can be added later.
pub struct ClassLoader {
    name: String,
    parent: Option<ClassLoaderHandle>,
    aliases: FxHashMap<String, ClassHandle>,
    defined: RwLock<FxHashMap<String, ClassHandle>>,
}

static SYSTEM_LOADER: Lazy<ClassLoaderHandle> = Lazy::new(|| {
    let defined = stdlib::all()
        .into_iter()
        .map(|class| (class.binary_name().to_string(), class))
        .collect();
    Arc::new(ClassLoader {
        name: "system".to_string(),
        parent: None,
        aliases: FxHashMap::default(),
        defined: RwLock::new(defined),
    })
});

impl ClassLoader {
    /// The root loader that knows the standard library.
    pub fn system() -> ClassLoaderHandle {
        SYSTEM_LOADER.clone()
    }

    /// A loader with no aliases. Without an explicit parent it delegates to the system loader.
    pub fn new(name: impl Into<String>, parent: Option<ClassLoaderHandle>) -> ClassLoaderHandle {
        Self::with_aliases(name, FxHashMap::default(), parent)
    }

    /// A loader that answers alias names (interpreted class identifiers) with the
    /// mapped handles before delegating to `parent`.
    pub fn for_alias_map(
        aliases: FxHashMap<String, ClassHandle>,
        parent: ClassLoaderHandle,
    ) -> ClassLoaderHandle {
        Self::with_aliases("alias-map", aliases, Some(parent))
    }

    fn with_aliases(
        name: impl Into<String>,
        aliases: FxHashMap<String, ClassHandle>,
        parent: Option<ClassLoaderHandle>,
    ) -> ClassLoaderHandle {
        Arc::new(ClassLoader {
            name: name.into(),
            parent: Some(parent.unwrap_or_else(Self::system)),
            aliases,
            defined: RwLock::new(FxHashMap::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&ClassLoaderHandle> {
        self.parent.as_ref()
    }

    pub fn aliases(&self) -> &FxHashMap<String, ClassHandle> {
        &self.aliases
    }

    /// Looks `name` up without raising.
    pub fn find_class(&self, name: &str) -> Option<ClassHandle> {
        if let Some(class) = self.aliases.get(name) {
            return Some(class.clone());
        }
        if let Some(class) = self.defined.read().get(name) {
            return Some(class.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.find_class(name))
    }

    pub fn load_class(&self, name: &str) -> RuntimeResult<ClassHandle> {
        self.find_class(name).ok_or_else(|| RuntimeError::ClassNotFound {
            name: name.to_string(),
            loader: self.name.clone(),
        })
    }

    /// True when this loader itself (not a parent) defines `name`.
    pub fn defines(&self, name: &str) -> bool {
        self.defined.read().contains_key(name)
    }

    pub fn define_class(&self, definition: ClassDefinition) -> RuntimeResult<ClassHandle> {
        let mut defined = self.defined.write();
        if defined.contains_key(&definition.binary_name) {
            return Err(RuntimeError::DuplicateClass {
                name: definition.binary_name,
                loader: self.name.clone(),
            });
        }
        let class = ClassHandle::new(
            definition.binary_name.clone(),
            definition.kind,
            definition.superclass,
            definition.bytecode.map(Arc::from),
            definition.binding,
        );
        defined.insert(definition.binary_name, class.clone());
        log::debug!("Loader '{}' defined class {}", self.name, class);
        Ok(class)
    }
}

impl fmt::Debug for ClassLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassLoader")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.clone()))
            .field("aliases", &self.aliases.len())
            .field("defined", &self.defined.read().len())
            .finish()
    }
}

thread_local! {
    static CONTEXT_CLASS_LOADER: RefCell<Option<ClassLoaderHandle>> = const { RefCell::new(None) };
}

/// The calling thread's context class loader.
pub fn context_class_loader() -> Option<ClassLoaderHandle> {
    CONTEXT_CLASS_LOADER.with(|cell| cell.borrow().clone())
}

/// Installs `loader` as the calling thread's context class loader and returns
/// the loader it replaced.
pub fn set_context_class_loader(loader: Option<ClassLoaderHandle>) -> Option<ClassLoaderHandle> {
    CONTEXT_CLASS_LOADER.with(|cell| cell.replace(loader))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_loader_knows_the_standard_library() {
        let system = ClassLoader::system();
        assert_eq!(system.load_class(stdlib::INTEGER).unwrap(), stdlib::integer());
        assert_eq!(system.load_class(stdlib::OPAQUE_REFERENCE).unwrap(), stdlib::opaque_reference());
        assert!(system.parent().is_none());
    }

    #[test]
    fn duplicate_definitions_are_rejected() {
        let loader = ClassLoader::new("test", None);
        loader.define_class(ClassDefinition::generated("pkg.Foo", vec![])).unwrap();
        let err = loader.define_class(ClassDefinition::generated("pkg.Foo", vec![])).unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateClass { .. }));
    }

    #[test]
    fn aliases_shadow_definitions_and_parents() {
        let parent = ClassLoader::new("parent", None);
        let defined = parent.define_class(ClassDefinition::generated("pkg.Foo", vec![])).unwrap();

        let mut aliases = FxHashMap::default();
        aliases.insert("pkg.Foo".to_string(), stdlib::string());
        let alias_loader = ClassLoader::for_alias_map(aliases, parent.clone());

        assert_eq!(alias_loader.load_class("pkg.Foo").unwrap(), stdlib::string());
        assert_eq!(parent.load_class("pkg.Foo").unwrap(), defined);
        assert!(matches!(
            alias_loader.load_class("pkg.Missing"),
            Err(RuntimeError::ClassNotFound { .. })
        ));
    }

    #[test]
    fn context_loader_is_per_thread() {
        let loader = ClassLoader::new("ctx", None);
        let previous = set_context_class_loader(Some(loader.clone()));
        assert!(previous.is_none());

        let seen_elsewhere = std::thread::spawn(|| context_class_loader().is_some())
            .join()
            .unwrap();
        assert!(!seen_elsewhere);

        let restored = set_context_class_loader(previous);
        assert!(restored.is_some_and(|l| Arc::ptr_eq(&l, &loader)));
        assert!(context_class_loader().is_none());
    }
}
