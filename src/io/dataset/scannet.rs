use std::path::{Path, PathBuf};

use crate::{
    camera::CameraIntrinsics,
    config::{Config, DatasetKind},
    image::RgbdFrame,
    trajectory::Trajectory,
};

use super::{
    core::{DatasetError, DatasetReader, ReaderFormat},
    frames::{depth_units, load_frame, read_intrinsics_file, read_text_poses, FrameFiles, SceneLayout},
};

/// ScanNet depth images are in millimeters.
pub const SCANNET_DEPTH_SCALE: f64 = 1000.0;

const LAYOUT: SceneLayout = SceneLayout {
    color: ("color", ".jpg"),
    depth: ("depth", ".png"),
    pose: ("pose", ".txt"),
};

const INTRINSIC_FILES: [&str; 2] = ["intrinsic.txt", "intrinsic/intrinsic_depth.txt"];

/// Reader for exported ScanNet scenes, used for both ScanNet200 and ScanNet++.
///
/// The scene directory contains `color/<id>.jpg`, `depth/<id>.png`, `pose/<id>.txt` and the
/// depth camera intrinsics in `intrinsic.txt` (or `intrinsic/intrinsic_depth.txt`).
/// Frames with an invalid pose are left out.
pub struct ScanNetReader {
    root_path: PathBuf,
    config: Config,
    frames: Vec<FrameFiles>,
    trajectory: Trajectory,
    intrinsics: CameraIntrinsics,
}

impl ScanNetReader {
    pub fn new<P: AsRef<Path>>(root_path: P, cfg: &Config) -> Result<Self, DatasetError> {
        let root_path = root_path.as_ref().to_path_buf();

        let intrinsic_path = INTRINSIC_FILES
            .iter()
            .map(|name| root_path.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                DatasetError::Parser(format!(
                    "no camera intrinsics found in {}",
                    root_path.display()
                ))
            })?;
        let intrinsics = read_intrinsics_file(&intrinsic_path)?;

        let frames = LAYOUT.discover(&root_path, cfg.data.frame_stride)?;
        let (frames, trajectory) = read_text_poses(frames)?;

        log::debug!(
            "Loaded {} scene {} with {} frames",
            cfg.data.dataset_name,
            root_path.display(),
            frames.len()
        );

        Ok(Self {
            root_path,
            config: cfg.clone(),
            frames,
            trajectory,
            intrinsics,
        })
    }

    /// Whether the scene was opened as ScanNet200 or ScanNet++.
    pub fn kind(&self) -> DatasetKind {
        self.config.data.dataset_name
    }

    /// Depth camera intrinsics as stored in the scene.
    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    fn scene_name(&self) -> Option<&str> {
        self.root_path.file_name()?.to_str()
    }
}

impl DatasetReader for ScanNetReader {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn get(&self, index: usize) -> Result<RgbdFrame, DatasetError> {
        let files = self.frames.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        load_frame(
            files,
            &self.intrinsics,
            Some(self.trajectory[index].clone()),
            &self.config,
            depth_units(&self.config, SCANNET_DEPTH_SCALE),
            None,
        )
    }

    fn trajectory(&self) -> Option<Trajectory> {
        Some(self.trajectory.clone())
    }

    fn frame_id(&self, index: usize) -> Option<&str> {
        self.frames.get(index).map(|frame| frame.frame_id.as_str())
    }

    fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn format(&self) -> ReaderFormat {
        ReaderFormat::ScanNet
    }

    fn pointcloud_path(&self) -> Option<PathBuf> {
        match &self.config.data.pointcloud_file {
            Some(file) => Some(self.root_path.join(file)),
            None => Some(
                self.root_path
                    .join(format!("{}_vh_clean_2.ply", self.scene_name()?)),
            ),
        }
    }
}
