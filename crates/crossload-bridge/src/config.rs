use crate::error::{BridgeError, BridgeResult};
use crate::naming::DEFAULT_NAMESPACE;
use crossload_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings read from a `crossload.toml`-style file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub bridge: BridgeSettings,

    /// Managed runtime bootstrap settings
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Namespace prefix of every compiled class name
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

impl BridgeConfig {
    pub fn from_toml_str(source: &str) -> BridgeResult<Self> {
        toml::from_str(source).map_err(|e| BridgeError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> BridgeResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossload_runtime::LogLevel;
    use std::path::PathBuf;

    #[test]
    fn empty_file_uses_defaults() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.bridge.namespace, "org.crossload.user");
        assert_eq!(config.runtime.log_level, LogLevel::Info);
        assert!(config.runtime.class_output_dir.is_none());
    }

    #[test]
    fn reads_both_sections() {
        let config = BridgeConfig::from_toml_str(
            r#"
            [bridge]
            namespace = "com.example.generated"

            [runtime]
            classpath = ["lib/solver.jar"]
            args = ["-Xmx2g"]
            log_level = "DEBUG"
            class_output_dir = "target/classes"
            "#,
        )
        .unwrap();
        assert_eq!(config.bridge.namespace, "com.example.generated");
        assert_eq!(config.runtime.classpath, vec![PathBuf::from("lib/solver.jar")]);
        assert_eq!(config.runtime.log_level, LogLevel::Debug);
        assert_eq!(
            config.runtime.effective_args(),
            vec!["-Xmx2g".to_string(), "-Dlogback.level.crossload=DEBUG".to_string()]
        );
        assert_eq!(config.runtime.class_output_dir, Some(PathBuf::from("target/classes")));
    }

    #[test]
    fn bad_values_are_config_errors() {
        let err = BridgeConfig::from_toml_str("[runtime]\nlog_level = \"LOUD\"").unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));

        let err = BridgeConfig::load(Path::new("/nonexistent/crossload.toml")).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.contains("crossload.toml")));
    }
}
