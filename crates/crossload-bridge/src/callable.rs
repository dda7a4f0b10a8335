//! Host-invokable adapters around interpreted callables.

use crossload_model::{InterpError, InterpFunction, Value};
use crossload_runtime::{ClassHandle, HostArray};
use std::sync::Arc;

/// A single-method adapter the host side can invoke.
pub trait HostFunction<A>: Send + Sync {
    type Output;

    fn apply(&self, argument: A) -> Result<Self::Output, InterpError>;
}

/// Copies `sequence` into an array of exactly its length, order preserved.
pub fn to_host_array<T>(component: &ClassHandle, sequence: Vec<T>) -> HostArray<T> {
    HostArray::from_vec(component.clone(), sequence)
}

type Producer<A, T> = dyn Fn(A) -> Result<Vec<T>, InterpError> + Send + Sync;
type Converter<T> = dyn Fn(Vec<T>) -> HostArray<T> + Send + Sync;

/// Wraps a callable returning a sequence so the host receives a fixed array.
///
/// Errors raised by the wrapped callable reach the host unchanged.
pub struct CallableWrapper<A, T> {
    callable: Arc<Producer<A, T>>,
    convert: Arc<Converter<T>>,
}

impl<A, T> CallableWrapper<A, T> {
    pub fn new<F, C>(callable: F, convert: C) -> Self
    where
        F: Fn(A) -> Result<Vec<T>, InterpError> + Send + Sync + 'static,
        C: Fn(Vec<T>) -> HostArray<T> + Send + Sync + 'static,
    {
        CallableWrapper {
            callable: Arc::new(callable),
            convert: Arc::new(convert),
        }
    }

    /// Converts with [`to_host_array`] into arrays of `component`.
    pub fn with_component<F>(component: ClassHandle, callable: F) -> Self
    where
        F: Fn(A) -> Result<Vec<T>, InterpError> + Send + Sync + 'static,
    {
        Self::new(callable, move |sequence| to_host_array(&component, sequence))
    }
}

impl CallableWrapper<Value, Value> {
    /// Adapts an interpreted function of one argument that returns a list.
    pub fn from_function(function: Arc<InterpFunction>, component: ClassHandle) -> Self {
        Self::with_component(component, move |argument| {
            match function.call(&[argument])? {
                Value::List(items) => Ok(items),
                other => Err(InterpError::type_error(format!(
                    "{}() must return a list, not '{}'",
                    function.qualname(),
                    other.type_name()
                ))),
            }
        })
    }
}

impl<A, T> Clone for CallableWrapper<A, T> {
    fn clone(&self) -> Self {
        CallableWrapper {
            callable: self.callable.clone(),
            convert: self.convert.clone(),
        }
    }
}

impl<A, T> HostFunction<A> for CallableWrapper<A, T> {
    type Output = HostArray<T>;

    fn apply(&self, argument: A) -> Result<HostArray<T>, InterpError> {
        let sequence = (self.callable)(argument)?;
        Ok((self.convert)(sequence))
    }
}
