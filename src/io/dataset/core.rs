use std::path::{Path, PathBuf};

use image::ImageError;
use thiserror::Error;

use crate::{
    config::Config,
    error::Error,
    image::RgbdFrame,
    io::{read_ply, LoadError},
    pointcloud::PointCloud,
    trajectory::Trajectory,
};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parser error: {0}")]
    Parser(String),
    #[error("Image error: {0}")]
    Image(#[from] ImageError),
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    #[error("Frame index {index} is out of range for a dataset of {len} frames")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Frame {0} has no camera pose")]
    MissingPose(String),
}

impl From<glob::PatternError> for DatasetError {
    fn from(err: glob::PatternError) -> Self {
        DatasetError::Parser(err.to_string())
    }
}

impl From<glob::GlobError> for DatasetError {
    fn from(err: glob::GlobError) -> Self {
        DatasetError::Io(err.into())
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        DatasetError::Parser(err.to_string())
    }
}

/// The reader implementation behind a [`DatasetReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderFormat {
    ScanNet,
    Replica,
    S3dis,
}

/// Common interface of the scene readers.
pub trait DatasetReader: Send + Sync {
    /// Number of frames.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads the frame at `index`.
    fn get(&self, index: usize) -> Result<RgbdFrame, DatasetError>;

    /// Camera poses of all frames, in frame order.
    fn trajectory(&self) -> Option<Trajectory>;

    /// Id of the frame at `index`, as in its file names.
    fn frame_id(&self, index: usize) -> Option<&str>;

    /// The scene directory the reader was created with.
    fn root_path(&self) -> &Path;

    /// The configuration the reader was created with.
    fn config(&self) -> &Config;

    fn format(&self) -> ReaderFormat;

    /// Location of the scene point cloud.
    fn pointcloud_path(&self) -> Option<PathBuf>;

    /// Loads the scene point cloud. Returns `None` if the scene has none.
    fn read_pointcloud(&self) -> Result<Option<PointCloud>, DatasetError> {
        match self.pointcloud_path() {
            Some(path) if path.is_file() => Ok(Some(read_ply(path)?)),
            _ => Ok(None),
        }
    }
}

/// Exposes only a selection of the frames of another reader.
pub struct SubsetDataset {
    dataset: Box<dyn DatasetReader>,
    indices: Vec<usize>,
}

impl SubsetDataset {
    pub fn new(dataset: Box<dyn DatasetReader>, indices: Vec<usize>) -> Result<Self, Error> {
        if let Some(index) = indices.iter().find(|index| **index >= dataset.len()) {
            return Err(Error::invalid_parameter(format!(
                "Subset index {index} is out of range for a dataset of {} frames",
                dataset.len()
            )));
        }
        Ok(Self { dataset, indices })
    }
}

impl DatasetReader for SubsetDataset {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn get(&self, index: usize) -> Result<RgbdFrame, DatasetError> {
        let inner_index = self
            .indices
            .get(index)
            .ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;
        self.dataset.get(*inner_index)
    }

    fn trajectory(&self) -> Option<Trajectory> {
        let orig_trajectory = self.dataset.trajectory()?;
        Some(
            self.indices
                .iter()
                .map(|index| {
                    (
                        orig_trajectory.camera_to_world[*index].clone(),
                        orig_trajectory.frame_ids[*index].clone(),
                    )
                })
                .collect(),
        )
    }

    fn frame_id(&self, index: usize) -> Option<&str> {
        self.dataset.frame_id(*self.indices.get(index)?)
    }

    fn root_path(&self) -> &Path {
        self.dataset.root_path()
    }

    fn config(&self) -> &Config {
        self.dataset.config()
    }

    fn format(&self) -> ReaderFormat {
        self.dataset.format()
    }

    fn pointcloud_path(&self) -> Option<PathBuf> {
        self.dataset.pointcloud_path()
    }
}
