use anyhow::{Context, Result};
use linkage_core::{JointPose, MachineGeometry, SegmenterConfig};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Machine definition loaded at start-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Kinematic topology and its geometry
    pub machine: MachineGeometry,

    /// Path segmentation settings
    #[serde(default)]
    pub segmenter: SegmenterConfig,

    /// Number of machine axes, including pass-through axes
    #[serde(default = "default_axes")]
    pub axes: usize,

    /// Joint pose the machine starts from until it is homed
    #[serde(default)]
    pub home: Option<JointPose>,
}

fn default_axes() -> usize {
    3
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        parse_by_extension("config", path, &content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.machine.validate().context("invalid [machine] section")?;
        self.segmenter
            .validate()
            .context("invalid [segmenter] section")?;

        let required = match self.machine {
            MachineGeometry::Scara(_) => 2,
            MachineGeometry::Delta(_) | MachineGeometry::Cartesian => 3,
        };
        if self.axes < required {
            anyhow::bail!("axes must be at least {required} for this machine, got {}", self.axes);
        }

        if let Some(home) = &self.home {
            if home.axis_count() != self.axes {
                anyhow::bail!(
                    "home has {} coordinates but the machine has {} axes",
                    home.axis_count(),
                    self.axes
                );
            }
        }

        Ok(())
    }

    /// Joint pose continuity starts from.
    pub fn initial_joints(&self) -> JointPose {
        self.home
            .clone()
            .unwrap_or_else(|| JointPose::zeros(self.axes))
    }
}

/// TOML or JSON by extension; TOML first when the extension says neither.
///
/// `what` names the file in errors, e.g. "config" or "move file".
pub(crate) fn parse_by_extension<T>(what: &str, path: &Path, content: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let as_toml = || {
        toml::from_str(content)
            .with_context(|| format!("failed to parse {what} {} as TOML", path.display()))
    };
    let as_json = || {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse {what} {} as JSON", path.display()))
    };
    match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => as_toml(),
        Some("json") => as_json(),
        _ => as_toml().or_else(|_| as_json()),
    }
}
