// ABOUTME: Configuration types and parsing for stager.yml.
// ABOUTME: Handles YAML parsing, manifest list validation, and CLI override merging.

use crate::context::{Context, Operation};
use crate::error::{Error, Result};
use crate::types::{DeploymentName, ManifestId};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "stager.yml";
pub const CONFIG_FILENAME_ALT: &str = "stager.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_name")]
    pub name: DeploymentName,

    pub image: String,

    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_templates")]
    pub templates: PathBuf,

    #[serde(deserialize_with = "deserialize_manifests")]
    pub manifests: NonEmpty<ManifestId>,

    #[serde(default = "default_stop_timeout", with = "humantime_serde")]
    pub stop_timeout: Duration,

    #[serde(default)]
    pub vars: HashMap<String, String>,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("deploy")
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

fn default_stop_timeout() -> Duration {
    Duration::from_secs(30)
}

/// CLI-level overrides applied on top of the config file when building the
/// context for one invocation.
#[derive(Debug, Default)]
pub struct Overrides {
    pub work_dir: Option<PathBuf>,
    pub data_dir: Option<String>,
    pub templates: Option<PathBuf>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [dir.join(CONFIG_FILENAME), dir.join(CONFIG_FILENAME_ALT)];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Resolve this config plus overrides into the immutable context for one
    /// invocation.
    pub fn into_context(self, operation: Operation, overrides: Overrides) -> Context {
        Context {
            name: self.name,
            work_dir: overrides.work_dir.unwrap_or(self.work_dir),
            data_dir: overrides.data_dir.unwrap_or(self.data_dir),
            template_source: overrides.templates.unwrap_or(self.templates),
            manifests: self.manifests,
            operation,
            image: self.image,
            stop_timeout: self.stop_timeout,
            vars: self.vars,
        }
    }
}

/// Write a stager.yml scaffold into `dir`.
pub fn init_config(dir: &Path, name: Option<&str>, image: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let name = match name {
        Some(n) => DeploymentName::new(n).map_err(|e| Error::InvalidConfig(e.to_string()))?,
        None => DeploymentName::new("my-app").map_err(|e| Error::InvalidConfig(e.to_string()))?,
    };
    let image = image.unwrap_or("my-registry/my-app:latest");

    let yaml = format!(
        r#"name: {name}
image: {image}
work_dir: deploy
data_dir: data
templates: templates
manifests:
  - app.conf
stop_timeout: 30s
"#
    );
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

// Custom deserializers

fn deserialize_name<'de, D>(deserializer: D) -> std::result::Result<DeploymentName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DeploymentName::new(&s).map_err(serde::de::Error::custom)
}

fn deserialize_manifests<'de, D>(
    deserializer: D,
) -> std::result::Result<NonEmpty<ManifestId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;

    let mut manifests = Vec::with_capacity(values.len());
    for value in values {
        let id = ManifestId::new(&value).map_err(serde::de::Error::custom)?;
        if manifests.contains(&id) {
            return Err(serde::de::Error::custom(format!(
                "duplicate manifest id '{id}'"
            )));
        }
        manifests.push(id);
    }

    NonEmpty::from_vec(manifests)
        .ok_or_else(|| serde::de::Error::custom("at least one manifest is required"))
}
