//! Backend launch configuration

use nars_core::{BackendType, LaunchCommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which backend to launch and from where
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend family
    pub backend: BackendType,
    /// Directory holding the backend executable
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,
    /// Executable (or jar) path, overriding `root_path` + the family default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
    /// Inference cadence, overriding the family default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_cadence: Option<u32>,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(BackendType::OpenNars, ".")
    }
}

impl BackendConfig {
    pub fn new(backend: BackendType, root_path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            root_path: root_path.into(),
            executable: None,
            inference_cadence: None,
        }
    }

    /// Resolved path of the executable (or jar)
    pub fn executable_path(&self) -> PathBuf {
        self.executable
            .clone()
            .unwrap_or_else(|| self.root_path.join(self.backend.default_executable()))
    }

    pub fn launch_command(&self) -> LaunchCommand {
        self.backend.launch_command(&self.executable_path())
    }

    pub fn inference_cadence(&self) -> u32 {
        self.inference_cadence
            .unwrap_or_else(|| self.backend.default_inference_cadence())
    }
}
