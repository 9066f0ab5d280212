//! Supported backend families and how to launch them

use crate::dialect::Dialect;
use crate::error::NarsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported reasoning backend families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum BackendType {
    /// OpenNARS, run through the JVM
    #[serde(rename = "opennars")]
    OpenNars,
    /// OpenNARS for Applications
    Ona,
    /// Older ONA build, same protocol
    OnaOld,
    /// NARS-Python
    Python,
}

impl BackendType {
    pub const ALL: [BackendType; 4] = [
        BackendType::OpenNars,
        BackendType::Ona,
        BackendType::OnaOld,
        BackendType::Python,
    ];

    /// Tag used in configuration and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            BackendType::OpenNars => "opennars",
            BackendType::Ona => "ona",
            BackendType::OnaOld => "ona_old",
            BackendType::Python => "python",
        }
    }

    /// Protocol descriptor for this family
    pub fn dialect(self) -> Dialect {
        match self {
            BackendType::OpenNars => Dialect::opennars(),
            BackendType::Ona | BackendType::OnaOld => Dialect::ona(),
            BackendType::Python => Dialect::python(),
        }
    }

    /// File name of the backend under the root path
    pub fn default_executable(self) -> &'static str {
        match self {
            BackendType::OpenNars => "opennars.jar",
            BackendType::Ona => "NAR.exe",
            BackendType::OnaOld => "NAR_old.exe",
            BackendType::Python => "main.exe",
        }
    }

    /// Inference steps pushed per update; 0 means the backend paces itself
    pub fn default_inference_cadence(self) -> u32 {
        match self {
            BackendType::OpenNars => 5,
            BackendType::Ona | BackendType::OnaOld | BackendType::Python => 0,
        }
    }

    /// Command line for the backend whose executable lives at `executable`
    pub fn launch_command(self, executable: &Path) -> LaunchCommand {
        match self {
            BackendType::OpenNars => LaunchCommand::new("java")
                .arg("-Xmx1024m")
                .arg("-jar")
                .arg(executable.to_string_lossy()),
            BackendType::Ona | BackendType::OnaOld => {
                LaunchCommand::new(executable).arg("shell")
            }
            BackendType::Python => LaunchCommand::new(executable),
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendType {
    type Err = NarsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "opennars" => Ok(BackendType::OpenNars),
            "ona" => Ok(BackendType::Ona),
            "ona_old" => Ok(BackendType::OnaOld),
            "python" => Ok(BackendType::Python),
            _ => Err(NarsError::UnknownBackend(s.to_string())),
        }
    }
}

impl TryFrom<String> for BackendType {
    type Error = NarsError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

/// Program and arguments used to start a backend process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
