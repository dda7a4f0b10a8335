use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the managed runtime boundary.
#[derive(Error, Diagnostic, Debug)]
pub enum RuntimeError {
    #[error("The managed runtime has not been started.")]
    #[diagnostic(
        code("RT-001"),
        help("Call `Runtime::start` (or `ensure_started`) before compiling or resolving classes")
    )]
    NotStarted,

    #[error("The managed runtime is already started.")]
    #[diagnostic(code("RT-002"))]
    AlreadyStarted,

    #[error("Class '{name}' not found by loader '{loader}'.")]
    #[diagnostic(code("RT-003"))]
    ClassNotFound { name: String, loader: String },

    #[error("Class '{name}' is already defined by loader '{loader}'.")]
    #[diagnostic(code("RT-004"), help("Allocate a fresh binary name for every definition"))]
    DuplicateClass { name: String, loader: String },

    #[error("Invalid log level '{0}'.")]
    #[diagnostic(code("RT-005"), help("Must be one of TRACE, DEBUG, INFO, WARN, ERROR"))]
    InvalidLogLevel(String),

    #[error("Failed to write class file {path}: {source}")]
    #[diagnostic(code("RT-006"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
