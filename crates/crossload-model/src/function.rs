use crate::class::ENTRY_MODULE;
use crate::error::InterpError;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

pub type FunctionBody = dyn Fn(&[Value]) -> Result<Value, InterpError> + Send + Sync;

/// An interpreted callable.
pub struct InterpFunction {
    module: Option<String>,
    qualname: String,
    body: Arc<FunctionBody>,
}

impl InterpFunction {
    pub fn new<F>(module: Option<&str>, qualname: impl Into<String>, body: F) -> Arc<Self>
    where
        F: Fn(&[Value]) -> Result<Value, InterpError> + Send + Sync + 'static,
    {
        Arc::new(InterpFunction {
            module: module.map(str::to_string),
            qualname: qualname.into(),
            body: Arc::new(body),
        })
    }

    pub fn module(&self) -> &str {
        self.module.as_deref().unwrap_or(ENTRY_MODULE)
    }

    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, InterpError> {
        (self.body)(args)
    }
}

impl fmt::Debug for InterpFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}.{}>", self.module(), self.qualname)
    }
}
