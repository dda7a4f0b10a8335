use miette::Diagnostic;
use thiserror::Error;

/// An exception raised by interpreted code.
///
/// It crosses the bridge untouched: whoever invoked the interpreted callable
/// receives the same exception type and message.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("{exception}: {message}")]
#[diagnostic(code("INTERP-001"))]
pub struct InterpError {
    pub exception: String,
    pub message: String,
}

impl InterpError {
    pub fn new(exception: impl Into<String>, message: impl Into<String>) -> Self {
        InterpError {
            exception: exception.into(),
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new("TypeError", message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new("ValueError", message)
    }
}
