use crate::runs::RunId;
use crate::translator::TranslationFailure;
use crossload_model::InterpError;
use crossload_runtime::RuntimeError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the bridge to its immediate caller.
#[derive(Error, Diagnostic, Debug)]
pub enum BridgeError {
    #[error("The managed runtime has not been started.")]
    #[diagnostic(
        code("BRIDGE-001"),
        help("Start the runtime before compiling, resolving or registering classes")
    )]
    NotStarted,

    #[error("Translation failed: {0}")]
    #[diagnostic(code("BRIDGE-002"))]
    Translation(#[from] TranslationFailure),

    #[error("No solver run is registered under id '{0}'.")]
    #[diagnostic(code("BRIDGE-003"))]
    RunNotFound(RunId),

    #[error("Disambiguation counter exhausted for class name '{0}'.")]
    #[diagnostic(code("BRIDGE-004"))]
    NameCounterOverflow(String),

    #[error("{0}")]
    #[diagnostic(code("BRIDGE-005"))]
    Interp(#[from] InterpError),

    #[error("Runtime error: {0}")]
    #[diagnostic(code("BRIDGE-006"))]
    Runtime(RuntimeError),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code("BRIDGE-007"))]
    Config(String),
}

impl From<RuntimeError> for BridgeError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::NotStarted => BridgeError::NotStarted,
            other => BridgeError::Runtime(other),
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
