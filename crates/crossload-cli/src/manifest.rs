//! The TOML description of interpreted classes that `crossload compile` reads.
//!
//! ```toml
//! [[class]]
//! module = "school"
//! qualname = "Room"
//!
//! [[class]]
//! module = "school"
//! qualname = "Lesson"
//! deferred = true
//! methods = ["__eq__"]
//!
//! [[class.field]]
//! name = "room"
//! type = "school.Room"
//! ```

use std::path::Path;
use std::sync::Arc;

use crossload_bridge::ClassIdentifier;
use crossload_model::{BuiltinType, InterpClass, NativeObject, Value};
use serde::Deserialize;

use crate::error::CliError;
use crate::io::read_file;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassEntry {
    /// Defining module; the entry module when omitted
    #[serde(default)]
    pub module: Option<String>,

    pub qualname: String,

    /// Identifiers of base classes, in order
    #[serde(default)]
    pub bases: Vec<String>,

    #[serde(default, rename = "field")]
    pub fields: Vec<FieldEntry>,

    #[serde(default)]
    pub methods: Vec<String>,

    /// Enqueue a producer instead of the class itself
    #[serde(default)]
    pub deferred: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A manifest class turned into the interpreted model.
#[derive(Debug, Clone)]
pub struct DeclaredClass {
    pub identifier: ClassIdentifier,
    pub class: Arc<InterpClass>,
    pub deferred: bool,
}

impl Manifest {
    pub fn parse(source: &str, path: &Path) -> Result<Self, CliError> {
        toml::from_str(source).map_err(|e| CliError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        Self::parse(&read_file(path)?, path)
    }

    /// Builds the declared classes in manifest order.
    ///
    /// Bases and field types may only name builtins, `native:<type>`, or
    /// classes declared earlier.
    pub fn declare(&self) -> Result<Vec<DeclaredClass>, CliError> {
        let mut declared: Vec<DeclaredClass> = Vec::with_capacity(self.classes.len());
        for entry in &self.classes {
            let identifier = match &entry.module {
                Some(module) => ClassIdentifier::from_parts(module, &entry.qualname),
                None => ClassIdentifier::new(entry.qualname.clone()),
            };
            let earlier = |name: &str| {
                declared
                    .iter()
                    .find(|d| d.identifier.as_str() == name)
                    .map(|d| d.class.clone())
                    .ok_or_else(|| CliError::UnknownReference {
                        class: identifier.to_string(),
                        name: name.to_string(),
                    })
            };

            let mut builder = InterpClass::builder(entry.qualname.clone());
            if let Some(module) = &entry.module {
                builder = builder.module(module.clone());
            }
            for base in &entry.bases {
                builder = builder.base(earlier(base)?);
            }
            for field in &entry.fields {
                let annotation = match builtin_annotation(&field.type_name) {
                    Some(value) => value,
                    None => Value::Class(earlier(&field.type_name)?),
                };
                builder = builder.field(field.name.clone(), annotation);
            }
            for method in &entry.methods {
                builder = builder.method(method.clone());
            }

            let class = builder.build();
            declared.push(DeclaredClass {
                identifier,
                class,
                deferred: entry.deferred,
            });
        }
        Ok(declared)
    }
}

fn builtin_annotation(type_name: &str) -> Option<Value> {
    let builtin = match type_name {
        "int" => BuiltinType::Int,
        "str" => BuiltinType::Str,
        "bool" => BuiltinType::Bool,
        "float" => BuiltinType::Float,
        "list" => BuiltinType::List,
        "None" => BuiltinType::NoneType,
        other => {
            return other
                .strip_prefix("native:")
                .map(|native| Value::Native(NativeObject::new(native, ())));
        }
    };
    Some(Value::Builtin(builtin))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHOOL: &str = r#"
        [[class]]
        module = "school"
        qualname = "Room"

        [[class]]
        qualname = "Lesson"
        bases = ["school.Room"]
        deferred = true

        [[class.field]]
        name = "room"
        type = "school.Room"

        [[class.field]]
        name = "weight"
        type = "native:ffi.Buffer"
    "#;

    #[test]
    fn declares_classes_in_order() {
        let manifest = Manifest::parse(SCHOOL, Path::new("school.toml")).unwrap();
        let declared = manifest.declare().unwrap();
        assert_eq!(declared.len(), 2);
        assert_eq!(declared[0].identifier.as_str(), "school.Room");
        assert_eq!(declared[1].identifier.as_str(), "Lesson");
        assert!(declared[1].deferred);

        let lesson = &declared[1].class;
        assert!(Arc::ptr_eq(&lesson.bases()[0], &declared[0].class));
        assert!(matches!(lesson.fields()[0].1, Value::Class(_)));
        assert!(lesson.fields()[1].1.is_native());
    }

    #[test]
    fn references_must_be_declared_first() {
        let manifest = Manifest::parse(
            r#"
            [[class]]
            qualname = "Lesson"
            [[class.field]]
            name = "room"
            type = "Room"
            "#,
            Path::new("m.toml"),
        )
        .unwrap();
        let err = manifest.declare().unwrap_err();
        assert!(matches!(err, CliError::UnknownReference { ref name, .. } if name == "Room"));
    }

    #[test]
    fn malformed_manifest_is_reported_with_its_path() {
        let err = Manifest::parse("[[class]]\nmodule = 3", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, CliError::Manifest { ref path, .. } if path == Path::new("bad.toml")));
    }
}
