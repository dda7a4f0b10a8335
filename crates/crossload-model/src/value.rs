use crate::class::InterpClass;
use crate::definition::Definition;
use crate::function::InterpFunction;
use crossload_runtime::ClassHandle;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Built-in type objects of the interpreted language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Int,
    Float,
    Str,
    Bool,
    List,
    NoneType,
}

impl BuiltinType {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Int => "int",
            BuiltinType::Float => "float",
            BuiltinType::Str => "str",
            BuiltinType::Bool => "bool",
            BuiltinType::List => "list",
            BuiltinType::NoneType => "NoneType",
        }
    }
}

/// An instance of a user-defined class.
#[derive(Debug)]
pub struct Instance {
    class: Arc<InterpClass>,
    attributes: Vec<(String, Value)>,
}

impl Instance {
    pub fn new(class: Arc<InterpClass>, attributes: Vec<(String, Value)>) -> Arc<Self> {
        Arc::new(Instance { class, attributes })
    }

    pub fn class(&self) -> &Arc<InterpClass> {
        &self.class
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find_map(|(attr, value)| (attr == name).then_some(value))
    }
}

/// A value owned by native code rather than by the interpreter.
#[derive(Clone)]
pub struct NativeObject {
    type_name: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl NativeObject {
    pub fn new<T: Any + Send + Sync>(type_name: &str, payload: T) -> Self {
        NativeObject {
            type_name: Arc::from(type_name),
            payload: Arc::new(payload),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native {}>", self.type_name)
    }
}

/// Any interpreted value, including type objects.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Bool(bool),
    List(Vec<Value>),
    Builtin(BuiltinType),
    Class(Arc<InterpClass>),
    Function(Arc<InterpFunction>),
    Instance(Arc<Instance>),
    Native(NativeObject),
    /// A class object of the managed runtime held on the interpreter side.
    HostClass(ClassHandle),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Builtin(_) | Value::Class(_) => "type",
            Value::Function(_) => "function",
            Value::Instance(instance) => instance.class().qualname(),
            Value::Native(native) => native.type_name(),
            Value::HostClass(_) => "JClass",
        }
    }

    /// The class or function this value denotes, if it can own an identifier.
    pub fn as_definition(&self) -> Option<Definition> {
        match self {
            Value::Class(class) => Some(Definition::Class(class.clone())),
            Value::Function(function) => Some(Definition::Function(function.clone())),
            _ => None,
        }
    }

    /// Whether the value lives outside the interpreter's object model.
    pub fn is_native(&self) -> bool {
        matches!(self, Value::Native(_))
    }
}
