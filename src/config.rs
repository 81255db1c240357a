//! Pipeline configuration.
//!
//! Only the `data` section is interpreted here. Everything else in a pipeline configuration file is
//! accepted and ignored, so the same file that drives the rest of a pipeline can be loaded as is.

use std::{fmt, path::Path, str::FromStr};

use serde_derive::Deserialize;
use thiserror::Error;

/// The dataset name in the configuration is not one of the known datasets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct UnknownDatasetError {
    /// The offending value, `None` when the configuration did not name a dataset at all.
    pub name: Option<String>,
}

impl fmt::Display for UnknownDatasetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Unknown dataset: {name:?}"),
            None => write!(f, "Unknown dataset: no dataset name was given"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    UnknownDataset(#[from] UnknownDatasetError),
    #[error("Invalid configuration: {0}")]
    InvalidParameter(String),
}

/// The datasets with a reader in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    ScanNet200,
    ScanNetPP,
    Replica,
    S3dis,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::ScanNet200,
        DatasetKind::ScanNetPP,
        DatasetKind::Replica,
        DatasetKind::S3dis,
    ];

    /// The name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::ScanNet200 => "scannet200",
            DatasetKind::ScanNetPP => "scannetpp",
            DatasetKind::Replica => "replica",
            DatasetKind::S3dis => "s3dis",
        }
    }
}

impl FromStr for DatasetKind {
    type Err = UnknownDatasetError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| UnknownDatasetError {
                name: Some(name.to_string()),
            })
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings of the `data` section.
#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub dataset_name: DatasetKind,
    /// Raw depth units per meter. The reader's default is used when `None`.
    pub depth_scale: Option<f64>,
    /// Color images are resized to `(width, height)` when set.
    pub img_dim: Option<(usize, usize)>,
    /// Keep every n-th frame.
    pub frame_stride: usize,
    /// Scene point cloud, relative to the scene directory.
    pub pointcloud_file: Option<String>,
}

impl DataConfig {
    pub fn new(dataset_name: DatasetKind) -> Self {
        Self {
            dataset_name,
            depth_scale: None,
            img_dim: None,
            frame_stride: 1,
            pointcloud_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data: DataConfig,
}

impl Config {
    pub fn new(dataset_name: DatasetKind) -> Self {
        Self {
            data: DataConfig::new(dataset_name),
        }
    }

    /// Loads the configuration, choosing YAML or JSON by the file extension.
    pub fn from_file<P: AsRef<Path>>(filepath: P) -> Result<Self, ConfigError> {
        let filepath = filepath.as_ref();
        let contents = std::fs::read_to_string(filepath)?;
        match filepath.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(ConfigError::InvalidParameter(format!(
                "unsupported configuration file: {}",
                filepath.display()
            ))),
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(contents)?;
        Self::try_from(raw)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(contents)?;
        Self::try_from(raw)
    }
}

#[derive(Deserialize, Debug, Default)]
struct RawDataConfig {
    /// Any value is accepted here so that a non-string name is reported as an unknown dataset.
    dataset_name: Option<serde_json::Value>,
    depth_scale: Option<f64>,
    img_dim: Option<(usize, usize)>,
    frame_stride: Option<usize>,
    pointcloud_file: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawConfig {
    #[serde(default)]
    data: RawDataConfig,
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let data = raw.data;
        let dataset_name = match data.dataset_name {
            Some(serde_json::Value::String(name)) => name.parse::<DatasetKind>()?,
            Some(other) => {
                return Err(UnknownDatasetError {
                    name: Some(other.to_string()),
                }
                .into())
            }
            None => return Err(UnknownDatasetError { name: None }.into()),
        };

        if let Some(depth_scale) = data.depth_scale {
            if !(depth_scale.is_finite() && depth_scale > 0.0) {
                return Err(ConfigError::InvalidParameter(format!(
                    "data.depth_scale must be positive, got {depth_scale}"
                )));
            }
        }

        if let Some((width, height)) = data.img_dim {
            if width == 0 || height == 0 {
                return Err(ConfigError::InvalidParameter(
                    "data.img_dim must not have zero sizes".to_string(),
                ));
            }
        }

        let frame_stride = data.frame_stride.unwrap_or(1);
        if frame_stride == 0 {
            return Err(ConfigError::InvalidParameter(
                "data.frame_stride must be at least 1".to_string(),
            ));
        }

        Ok(Config {
            data: DataConfig {
                dataset_name,
                depth_scale: data.depth_scale,
                img_dim: data.img_dim,
                frame_stride,
                pointcloud_file: data.pointcloud_file,
            },
        })
    }
}
