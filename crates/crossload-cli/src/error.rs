use std::path::PathBuf;

use crossload_bridge::BridgeError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Failed to read file {path}")]
    #[diagnostic(code(crossload::cli::io_error))]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {message}")]
    #[diagnostic(code(crossload::cli::manifest_error))]
    Manifest { path: PathBuf, message: String },

    #[error("Class '{class}' refers to '{name}', which is neither a builtin type nor declared earlier in the manifest")]
    #[diagnostic(
        code(crossload::cli::unknown_reference),
        help("Declare referenced classes before the classes that use them")
    )]
    UnknownReference { class: String, name: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Bridge(#[from] BridgeError),
}

pub fn convert_io_error(error: std::io::Error, path: PathBuf) -> CliError {
    CliError::IoError {
        path,
        source: error,
    }
}
