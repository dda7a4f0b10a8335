use crate::class::ClassHandle;
use crate::error::{RuntimeError, RuntimeResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory where compiled classes are written for caching and inspection.
///
/// Nothing reads these files back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassOutput {
    root: PathBuf,
}

impl ClassOutput {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ClassOutput { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a class would be written to: `<root>/<internal name>.class`.
    pub fn path_for(&self, class: &ClassHandle) -> PathBuf {
        self.root.join(format!("{}.class", class.internal_name()))
    }

    /// Writes the class's bytecode. Classes without bytecode are skipped and yield `None`.
    pub fn write(&self, class: &ClassHandle) -> RuntimeResult<Option<PathBuf>> {
        let Some(bytecode) = class.bytecode() else {
            return Ok(None);
        };
        let path = self.path_for(class);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| RuntimeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, bytecode).map_err(|source| RuntimeError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("Wrote {} to {}", class, path.display());
        Ok(Some(path))
    }
}
