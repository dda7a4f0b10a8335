use crate::class::InterpClass;
use crate::function::InterpFunction;
use std::sync::{Arc, Weak};

/// Identity of a heap object, stable while the object (or a weak reference to it) is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectKey(usize);

/// A class or function: anything that is compiled as a unit and named by an identifier.
#[derive(Debug, Clone)]
pub enum Definition {
    Class(Arc<InterpClass>),
    Function(Arc<InterpFunction>),
}

impl Definition {
    pub fn module(&self) -> &str {
        match self {
            Definition::Class(class) => class.module(),
            Definition::Function(function) => function.module(),
        }
    }

    pub fn qualname(&self) -> &str {
        match self {
            Definition::Class(class) => class.qualname(),
            Definition::Function(function) => function.qualname(),
        }
    }

    pub fn object_key(&self) -> ObjectKey {
        match self {
            Definition::Class(class) => ObjectKey(Arc::as_ptr(class) as *const () as usize),
            Definition::Function(function) => ObjectKey(Arc::as_ptr(function) as *const () as usize),
        }
    }

    pub fn downgrade(&self) -> WeakDefinition {
        match self {
            Definition::Class(class) => WeakDefinition::Class(Arc::downgrade(class)),
            Definition::Function(function) => WeakDefinition::Function(Arc::downgrade(function)),
        }
    }

    /// Same object, not merely the same name.
    pub fn ptr_eq(&self, other: &Definition) -> bool {
        self.object_key() == other.object_key()
    }
}

impl From<Arc<InterpClass>> for Definition {
    fn from(class: Arc<InterpClass>) -> Self {
        Definition::Class(class)
    }
}

impl From<Arc<InterpFunction>> for Definition {
    fn from(function: Arc<InterpFunction>) -> Self {
        Definition::Function(function)
    }
}

/// A [`Definition`] that does not keep its object alive.
#[derive(Debug, Clone)]
pub enum WeakDefinition {
    Class(Weak<InterpClass>),
    Function(Weak<InterpFunction>),
}

impl WeakDefinition {
    pub fn upgrade(&self) -> Option<Definition> {
        match self {
            WeakDefinition::Class(class) => class.upgrade().map(Definition::Class),
            WeakDefinition::Function(function) => function.upgrade().map(Definition::Function),
        }
    }

    pub fn is_alive(&self) -> bool {
        match self {
            WeakDefinition::Class(class) => class.strong_count() > 0,
            WeakDefinition::Function(function) => function.strong_count() > 0,
        }
    }
}
