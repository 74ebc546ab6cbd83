//! Reader for the AgentCore deployment manifest (`.bedrock_agentcore.yaml`).
//!
//! Only the fields needed to locate a deployed runtime are read. Everything
//! else in the file is ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Manifest file looked up in the working directory when none is named.
pub const DEFAULT_MANIFEST: &str = ".bedrock_agentcore.yaml";

/// Parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Agent selected when none is named.
    #[serde(default)]
    pub default_agent: Option<String>,
    /// Agents by name.
    #[serde(default)]
    pub agents: BTreeMap<String, AgentEntry>,
}

/// One agent block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgentEntry {
    /// AWS placement.
    #[serde(default)]
    pub aws: AwsBlock,
    /// Deployment identifiers.
    #[serde(default)]
    pub bedrock_agentcore: AgentCoreBlock,
}

/// `aws:` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AwsBlock {
    /// Region.
    #[serde(default)]
    pub region: Option<String>,
    /// Account id. Quoted or bare numbers are both accepted.
    #[serde(default, deserialize_with = "string_or_number")]
    pub account: Option<String>,
}

/// `bedrock_agentcore:` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgentCoreBlock {
    /// Runtime id.
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Runtime ARN.
    #[serde(default)]
    pub agent_arn: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_yaml::Value::String(s)) => Some(s),
        Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl Manifest {
    /// Parses manifest YAML.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Manifest`] when the YAML does not parse.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|e| ConfigError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Reads and parses `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Manifest`] when the file is unreadable or invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Loads the named manifest, or the default one if it exists.
    ///
    /// A missing default manifest is not an error; a missing explicit one is.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        match explicit {
            Some(path) => Self::load(path).map(Some),
            None => {
                let path = PathBuf::from(DEFAULT_MANIFEST);
                if path.is_file() {
                    Self::load(&path).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// The default agent, or the only agent when there is exactly one.
    pub fn selected_agent(&self) -> Option<&AgentEntry> {
        match &self.default_agent {
            Some(name) => self.agents.get(name),
            None if self.agents.len() == 1 => self.agents.values().next(),
            None => None,
        }
    }
}
