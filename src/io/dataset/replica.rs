use std::path::{Path, PathBuf};

use crate::{camera::CameraIntrinsics, config::Config, image::RgbdFrame, trajectory::Trajectory};

use super::{
    core::{DatasetError, DatasetReader, ReaderFormat},
    frames::{depth_units, load_frame, read_intrinsics_file, read_text_poses, FrameFiles, SceneLayout},
};

/// Replica renderings store depth as `meters * 6553.5`.
pub const REPLICA_DEPTH_SCALE: f64 = 6553.5;

const LAYOUT: SceneLayout = SceneLayout {
    color: ("color", ".jpg"),
    depth: ("depth", ".png"),
    pose: ("pose", ".txt"),
};

/// Intrinsics of the 1200x680 Replica renderings, used when the scene has no `intrinsics.txt`.
pub fn replica_default_intrinsics() -> CameraIntrinsics {
    let mut intrinsics = CameraIntrinsics::from_simple_intrinsic(600.0, 600.0, 599.5, 339.5);
    intrinsics.size(1200, 680);
    intrinsics
}

/// Reader for Replica scenes: `color/<id>.jpg`, `depth/<id>.png`, `pose/<id>.txt` and an
/// optional `intrinsics.txt`.
pub struct ReplicaReader {
    root_path: PathBuf,
    config: Config,
    frames: Vec<FrameFiles>,
    trajectory: Trajectory,
    intrinsics: CameraIntrinsics,
}

impl ReplicaReader {
    pub fn new<P: AsRef<Path>>(root_path: P, cfg: &Config) -> Result<Self, DatasetError> {
        let root_path = root_path.as_ref().to_path_buf();

        let intrinsic_path = root_path.join("intrinsics.txt");
        let intrinsics = if intrinsic_path.is_file() {
            read_intrinsics_file(&intrinsic_path)?
        } else {
            log::debug!(
                "{} has no intrinsics.txt, using the default Replica camera",
                root_path.display()
            );
            replica_default_intrinsics()
        };

        let frames = LAYOUT.discover(&root_path, cfg.data.frame_stride)?;
        let (frames, trajectory) = read_text_poses(frames)?;

        log::debug!(
            "Loaded replica scene {} with {} frames",
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

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }
}

impl DatasetReader for ReplicaReader {
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
            depth_units(&self.config, REPLICA_DEPTH_SCALE),
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
        ReaderFormat::Replica
    }

    fn pointcloud_path(&self) -> Option<PathBuf> {
        match &self.config.data.pointcloud_file {
            Some(file) => Some(self.root_path.join(file)),
            None => {
                let scene_name = self.root_path.file_name()?.to_str()?;
                Some(self.root_path.join(format!("{scene_name}_mesh.ply")))
            }
        }
    }
}
