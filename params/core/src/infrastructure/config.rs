// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Allowlist Configuration - deployment-time registry extensions
//
// A Kubernetes-style manifest listing extra fields to permit per allowlist
// kind. Applied once at startup through `AllowlistRegistry::register`, so an
// unknown kind aborts startup instead of creating an orphan allowlist.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::registry::{AllowlistRegistry, RegistryError};

pub const API_VERSION: &str = "permitted-params/v1";
pub const KIND: &str = "AllowlistConfig";
pub const CONFIG_PATH_ENV: &str = "PERMITTED_PARAMS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "./permitted-params.yaml";

/// Top-level allowlist configuration manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowlistConfigManifest {
    /// API version (must be "permitted-params/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "AllowlistConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: AllowlistConfigSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowlistConfigSpec {
    /// Allowlist kind -> extra fields to permit
    #[serde(default)]
    pub permit: BTreeMap<String, Vec<String>>,
}

impl Default for AllowlistConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "default".to_string(),
                version: None,
            },
            spec: AllowlistConfigSpec::default(),
        }
    }
}

impl AllowlistConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. PERMITTED_PARAMS_CONFIG environment variable
    /// 2. ./permitted-params.yaml (working directory)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            tracing::warn!("{} points at a missing file: {:?}", CONFIG_PATH_ENV, path);
        }

        let cwd = PathBuf::from(DEFAULT_CONFIG_FILE);
        if cwd.exists() {
            return Some(cwd);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading allowlist configuration from explicit path: {:?}", path);
            return Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e));
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading allowlist configuration from discovered path: {:?}", config_path);
            Self::from_yaml_file(config_path)
        } else {
            tracing::debug!("No allowlist configuration found. Using built-in allowlists only.");
            Ok(Self::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        for (kind, fields) in &self.spec.permit {
            if kind.trim().is_empty() {
                anyhow::bail!("spec.permit contains an empty kind");
            }
            if fields.iter().any(|f| f.trim().is_empty()) {
                anyhow::bail!("spec.permit.{} contains an empty field name", kind);
            }
        }

        Ok(())
    }

    /// Register every configured field. Stops at the first unknown kind.
    ///
    /// Returns the number of fields newly permitted.
    pub fn apply_to(&self, registry: &AllowlistRegistry) -> Result<usize, RegistryError> {
        let mut added = 0;
        for (kind, fields) in &self.spec.permit {
            added += registry.register_all(kind, fields.iter().map(String::as_str))?;
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
apiVersion: permitted-params/v1
kind: AllowlistConfig
metadata:
  name: local
spec:
  permit:
    project_type: [blubs1]
    member: [user_id, role_ids]
"#;

    #[test]
    fn test_parse_sample() {
        let config = AllowlistConfigManifest::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.metadata.name, "local");
        assert_eq!(config.spec.permit["project_type"], vec!["blubs1"]);
        config.validate().unwrap();
    }

    #[test]
    fn test_spec_is_optional() {
        let yaml = "apiVersion: permitted-params/v1\nkind: AllowlistConfig\nmetadata:\n  name: x\n";
        let config = AllowlistConfigManifest::from_yaml_str(yaml).unwrap();
        assert!(config.spec.permit.is_empty());
    }

    #[test]
    fn test_validate_rejects_wrong_kind() {
        let mut config = AllowlistConfigManifest::default();
        config.kind = "NodeConfig".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_field() {
        let mut config = AllowlistConfigManifest::default();
        config.spec.permit.insert("color".to_string(), vec![" ".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_registers_fields() {
        let registry = AllowlistRegistry::with_builtin();
        let config = AllowlistConfigManifest::from_yaml_str(SAMPLE).unwrap();

        // role_ids is already built in
        assert_eq!(config.apply_to(&registry), Ok(2));
        assert!(registry.fields_for("project_type").contains("blubs1"));
        assert!(registry.fields_for("member").contains("user_id"));
    }

    #[test]
    fn test_apply_unknown_kind_is_configuration_error() {
        let registry = AllowlistRegistry::with_builtin();
        let mut config = AllowlistConfigManifest::default();
        config
            .spec
            .permit
            .insert("totally_bogus_kind".to_string(), vec!["x".to_string()]);

        assert_eq!(
            config.apply_to(&registry),
            Err(RegistryError::UnknownKind("totally_bogus_kind".to_string()))
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = AllowlistConfigManifest::load_or_default(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.metadata.name, "local");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(AllowlistConfigManifest::load_or_default(Some(missing)).is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = AllowlistConfigManifest::from_yaml_str(SAMPLE).unwrap();
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(AllowlistConfigManifest::from_yaml_str(&yaml).unwrap(), config);
    }
}
