use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossload_bridge::{
    Bridge, BridgeConfig, BridgeError, ClassIdentifier, CompilationTask, ShapeTranslator,
};

use crate::error::CliError;
use crate::manifest::Manifest;

/// One compiled manifest class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledEntry {
    pub identifier: ClassIdentifier,
    pub binary_name: String,
}

pub fn handle_compile(
    manifest_path: &Path,
    config_path: Option<&Path>,
    out_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut config = match config_path {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };
    if out_dir.is_some() {
        config.runtime.class_output_dir = out_dir;
    }
    let manifest = Manifest::load(manifest_path)?;

    for entry in compile_manifest(&manifest, &config)? {
        println!("{} -> {}", entry.identifier, entry.binary_name);
    }
    Ok(())
}

/// Enqueues every manifest class, drains the queue and reports what each
/// identifier was compiled to, in manifest order.
pub fn compile_manifest(
    manifest: &Manifest,
    config: &BridgeConfig,
) -> Result<Vec<CompiledEntry>, CliError> {
    let declared = manifest.declare()?;
    let bridge = Bridge::from_config(config, Arc::new(ShapeTranslator));
    bridge.runtime().start().map_err(BridgeError::from)?;

    for class in &declared {
        if class.deferred {
            let produced = class.class.clone();
            bridge.enqueue(CompilationTask::deferred(move || Ok(produced)))?;
        } else {
            bridge.enqueue(class.class.clone())?;
        }
    }
    let processed = bridge.process_compilation_queue()?;
    log::info!("Compiled {} classes", processed);

    let mut compiled = Vec::with_capacity(declared.len());
    for class in declared {
        if let Some(handle) = bridge.lookup(&class.identifier)? {
            compiled.push(CompiledEntry {
                binary_name: handle.binary_name().to_string(),
                identifier: class.identifier,
            });
        }
    }
    Ok(compiled)
}
