//! Agent configuration

use nars_core::{NarsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Goals and gates for an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Goal re-asserted on every update
    pub main_goal: Option<String>,
    /// Goal whose negation is re-asserted on every update
    pub negative_goal: Option<String>,
    /// Forward sensor perceptions to the backend
    pub senses_enabled: bool,
    /// Accept operations reported by the backend
    pub operations_enabled: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            main_goal: None,
            negative_goal: None,
            senses_enabled: true,
            operations_enabled: true,
        }
    }
}

impl AgentConfig {
    /// Config with a main goal
    pub fn with_goal(goal: impl Into<String>) -> Self {
        Self {
            main_goal: Some(goal.into()),
            ..Default::default()
        }
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| NarsError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }
}
