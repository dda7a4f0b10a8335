//! Identifier to compiled-class mapping, plus the provenance side-table.

use crate::identity::ClassIdentifier;
use crossload_model::{Definition, ObjectKey, WeakDefinition};
use crossload_runtime::ClassHandle;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

/// The authoritative identifier to compiled-class mapping.
///
/// Registration is last-write-wins. Lookups never fail; a miss is `None` and
/// the caller picks its own fallback.
#[derive(Debug, Default)]
pub struct ClassIdentityRegistry {
    classes: RwLock<FxHashMap<ClassIdentifier, ClassHandle>>,
    provenance: ProvenanceTable,
}

impl ClassIdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier_for(definition: &Definition) -> ClassIdentifier {
        ClassIdentifier::of(definition)
    }

    /// Maps `identifier` to `class`, replacing any earlier mapping.
    pub fn register(&self, identifier: ClassIdentifier, class: ClassHandle) -> ClassHandle {
        log::debug!("Registering {} as {}", identifier, class);
        if let Some(previous) = self.classes.write().insert(identifier.clone(), class.clone()) {
            if previous != class {
                log::debug!("{} replaced {} for {}", class, previous, identifier);
            }
        }
        class
    }

    /// Registers `class` under the definition's identifier and remembers it as
    /// the definition's provenance. Returns the definition unchanged.
    pub fn register_definition(&self, definition: Definition, class: ClassHandle) -> Definition {
        self.provenance.attach(&definition, class.clone());
        self.register(ClassIdentifier::of(&definition), class);
        definition
    }

    pub fn lookup(&self, identifier: &ClassIdentifier) -> Option<ClassHandle> {
        self.classes.read().get(identifier).cloned()
    }

    /// The class recorded for this exact object, if any.
    pub fn provenance(&self, definition: &Definition) -> Option<ClassHandle> {
        self.provenance.get(definition)
    }

    pub fn contains(&self, identifier: &ClassIdentifier) -> bool {
        self.classes.read().contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    /// A point-in-time copy of the mapping keyed by identifier string.
    pub fn alias_map(&self) -> FxHashMap<String, ClassHandle> {
        self.classes
            .read()
            .iter()
            .map(|(identifier, class)| (identifier.as_str().to_string(), class.clone()))
            .collect()
    }

    pub fn identifiers(&self) -> Vec<ClassIdentifier> {
        let mut identifiers: Vec<_> = self.classes.read().keys().cloned().collect();
        identifiers.sort();
        identifiers
    }
}

struct ProvenanceEntry {
    owner: WeakDefinition,
    class: ClassHandle,
}

/// Compiled class per source object, keyed by object identity.
///
/// Entries hold the source object weakly. A key is only trusted while its
/// owner is alive, since addresses are reused once the object is freed.
#[derive(Default)]
pub struct ProvenanceTable {
    entries: Mutex<FxHashMap<ObjectKey, ProvenanceEntry>>,
}

impl ProvenanceTable {
    pub fn attach(&self, definition: &Definition, class: ClassHandle) {
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| entry.owner.is_alive());
        entries.insert(
            definition.object_key(),
            ProvenanceEntry {
                owner: definition.downgrade(),
                class,
            },
        );
    }

    pub fn get(&self, definition: &Definition) -> Option<ClassHandle> {
        let entries = self.entries.lock();
        let entry = entries.get(&definition.object_key())?;
        let owner = entry.owner.upgrade()?;
        owner.ptr_eq(definition).then(|| entry.class.clone())
    }

    /// Number of entries whose owner is still alive.
    pub fn live_entries(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.owner.is_alive())
            .count()
    }
}

impl std::fmt::Debug for ProvenanceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvenanceTable")
            .field("live_entries", &self.live_entries())
            .finish()
    }
}
