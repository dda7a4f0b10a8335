//! The boundary to whatever turns an interpreted class into a managed one.

use crate::identity::ClassIdentifier;
use crate::registry::ClassIdentityRegistry;
use crate::resolver::TypeResolver;
use crossload_model::InterpClass;
use crossload_runtime::{stdlib, ClassDefinition, ClassHandle, Runtime, RuntimeError};
use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;

/// Why a translator could not produce a class.
#[derive(Error, Diagnostic, Debug)]
pub enum TranslationFailure {
    #[error("Cannot translate '{class}': '{dependency}' has not been compiled yet.")]
    #[diagnostic(
        code("TR-001"),
        help("Enqueue '{dependency}' before '{class}', or compile it first")
    )]
    UnresolvedDependency {
        class: ClassIdentifier,
        dependency: ClassIdentifier,
    },

    #[error("Translator rejected '{class}': {reason}")]
    #[diagnostic(code("TR-002"))]
    Rejected { class: ClassIdentifier, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Everything a translator is given for one class.
pub struct TranslationRequest<'a> {
    pub class: &'a Arc<InterpClass>,
    pub identifier: &'a ClassIdentifier,
    /// The unique name allocated for this compile.
    pub binary_name: &'a str,
    pub runtime: &'a Runtime,
    pub registry: &'a ClassIdentityRegistry,
}

pub trait Translator: Send + Sync {
    fn translate(&self, request: &TranslationRequest<'_>) -> Result<ClassHandle, TranslationFailure>;
}

/// Emits a textual class shell and defines it in the generated loader.
///
/// The first base becomes the superclass, later bases are listed as
/// interfaces. All bases must already be registered. Field annotations are
/// resolved against the registry only; nothing is compiled on demand from here.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeTranslator;

impl ShapeTranslator {
    pub fn render(&self, request: &TranslationRequest<'_>) -> Result<String, TranslationFailure> {
        self.shape(request).map(|(shell, _)| shell)
    }

    fn shape(
        &self,
        request: &TranslationRequest<'_>,
    ) -> Result<(String, ClassHandle), TranslationFailure> {
        let class = request.class;
        let mut bases = Vec::with_capacity(class.bases().len());
        for base in class.bases() {
            let dependency = ClassIdentifier::of_class(base);
            let handle = request.registry.lookup(&dependency).ok_or_else(|| {
                TranslationFailure::UnresolvedDependency {
                    class: request.identifier.clone(),
                    dependency,
                }
            })?;
            bases.push(handle);
        }

        let superclass = bases.first().cloned().unwrap_or_else(stdlib::object);
        let resolver = TypeResolver::new(request.registry);

        let mut shell = format!("class {} extends {}\n", request.binary_name, superclass.binary_name());
        for interface in bases.iter().skip(1) {
            shell.push_str(&format!("  implements {}\n", interface.binary_name()));
        }
        shell.push_str(&format!("  source {}\n", request.identifier));
        for (name, annotation) in class.fields() {
            shell.push_str(&format!("  field {} {}\n", name, resolver.resolve_descriptor(annotation)));
        }
        for method in class.methods() {
            shell.push_str(&format!("  method {}\n", method));
        }
        if class.defines_eq_or_hash() {
            shell.push_str("  equality value\n");
        }
        Ok((shell, superclass))
    }
}

impl Translator for ShapeTranslator {
    fn translate(&self, request: &TranslationRequest<'_>) -> Result<ClassHandle, TranslationFailure> {
        let (shell, superclass) = self.shape(request)?;
        let definition =
            ClassDefinition::generated(request.binary_name, shell.into_bytes()).with_superclass(superclass);
        Ok(request.runtime.define_class(definition)?)
    }
}
