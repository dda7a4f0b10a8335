use crate::registry::ClassIdentityRegistry;
use crossload_runtime::{
    context_class_loader, set_context_class_loader, ClassLoader, ClassLoaderHandle,
};
use std::marker::PhantomData;
use std::sync::Arc;

/// Installs an alias-map class loader as the thread's context loader until dropped.
///
/// The installed loader answers every identifier registered at the time of
/// [`enter`](Self::enter); later registrations are not visible through it.
/// Dropping the guard, including during unwinding, reinstates whatever
/// context loader was active before entry. Guards are bound to the thread
/// that created them and must be dropped in reverse order of entry; debug
/// builds panic when an outer guard is dropped while an inner one is live.
#[must_use = "the previous class loader is restored as soon as the guard is dropped"]
pub struct ClassLoaderOverride {
    installed: ClassLoaderHandle,
    previous: Option<ClassLoaderHandle>,
    _not_send: PhantomData<*const ()>,
}

impl ClassLoaderOverride {
    pub fn enter(registry: &ClassIdentityRegistry, parent: ClassLoaderHandle) -> Self {
        let aliases = registry.alias_map();
        let alias_count = aliases.len();
        let installed = ClassLoader::for_alias_map(aliases, parent);
        let previous = set_context_class_loader(Some(installed.clone()));
        log::debug!(
            "Entered class loader override ({} aliases, previous: {})",
            alias_count,
            previous.as_ref().map_or("none", |loader| loader.name())
        );
        ClassLoaderOverride {
            installed,
            previous,
            _not_send: PhantomData,
        }
    }

    pub fn loader(&self) -> &ClassLoaderHandle {
        &self.installed
    }

    /// The loader that will be reinstated on drop.
    pub fn previous(&self) -> Option<&ClassLoaderHandle> {
        self.previous.as_ref()
    }
}

impl Drop for ClassLoaderOverride {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            debug_assert!(
                context_class_loader().is_some_and(|current| Arc::ptr_eq(&current, &self.installed)),
                "class loader overrides dropped out of order"
            );
        }
        set_context_class_loader(self.previous.take());
        log::debug!("Left class loader override");
    }
}
