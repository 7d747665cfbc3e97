//! Stack configuration files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VpcError, VpcResult};
use crate::models::NetworkSpec;

fn default_region() -> String {
    "us-east-1".to_string()
}

/// One network inside a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDeclaration {
    /// Construct id; prefixes the logical ids of every resource.
    pub id: String,
    #[serde(flatten)]
    pub spec: NetworkSpec,
}

impl NetworkDeclaration {
    /// The id as it survives in generated names: alphanumerics only, lowercased.
    ///
    /// Logical ids drop separators and Terraform names drop case, so two
    /// declarations with the same key would collide.
    pub fn construct_key(&self) -> String {
        self.id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }
}

/// A stack of networks synthesized together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    pub name: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub networks: Vec<NetworkDeclaration>,
}

impl StackConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: default_region(),
            networks: Vec::new(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_network(mut self, id: impl Into<String>, spec: NetworkSpec) -> Self {
        self.networks.push(NetworkDeclaration { id: id.into(), spec });
        self
    }

    /// Load a stack from a YAML, JSON or TOML file, chosen by extension.
    pub fn from_file(path: &Path) -> VpcResult<Self> {
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("yaml")
            .to_lowercase();

        debug!("Loading stack config from {:?}", path);

        let config = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            other => return Err(VpcError::UnsupportedFormat(other.to_string())),
        };
        Ok(config)
    }

    /// Save the stack as YAML.
    pub fn to_file(&self, path: &Path) -> VpcResult<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Network ids whose construct key was already taken by an earlier
    /// network, in declaration order.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for network in &self.networks {
            let id = network.id.as_str();
            if !seen.insert(network.construct_key()) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }
}
