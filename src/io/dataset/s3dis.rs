use std::path::{Path, PathBuf};

use serde_derive::Deserialize;

use crate::{
    camera::CameraIntrinsics, config::Config, image::RgbdFrame, trajectory::Trajectory,
    transform::Transform,
};

use super::{
    core::{DatasetError, DatasetReader, ReaderFormat},
    frames::{depth_units, load_frame, FrameFiles, SceneLayout},
};

/// S3DIS depth images are in 1/512 meters.
pub const S3DIS_DEPTH_SCALE: f64 = 512.0;
/// Depth value of pixels without a measurement.
pub const S3DIS_MISSING_DEPTH: u16 = u16::MAX;

const LAYOUT: SceneLayout = SceneLayout {
    color: ("rgb", "_rgb.png"),
    depth: ("depth", "_depth.png"),
    pose: ("pose", "_pose.json"),
};

#[derive(Deserialize, Debug)]
struct PoseDocument {
    camera_k_matrix: Vec<Vec<f64>>,
    camera_rt_matrix: Vec<Vec<f64>>,
}

struct S3disPose {
    intrinsics: CameraIntrinsics,
    camera_to_world: Transform,
}

fn read_pose_json(path: &Path) -> Result<S3disPose, DatasetError> {
    let buffer = std::io::BufReader::new(std::fs::File::open(path)?);
    let doc: PoseDocument = serde_json::from_reader(buffer)?;

    let intrinsics = CameraIntrinsics::from_matrix(&doc.camera_k_matrix).ok_or_else(|| {
        DatasetError::Parser(format!("invalid camera_k_matrix in {}", path.display()))
    })?;

    let rt = &doc.camera_rt_matrix;
    let valid_rows = rt.iter().all(|row| row.len() == 4);
    if !(valid_rows && (rt.len() == 3 || rt.len() == 4)) {
        return Err(DatasetError::Parser(format!(
            "camera_rt_matrix in {} is not 3x4 or 4x4",
            path.display()
        )));
    }

    let rows = [0, 1, 2].map(|r| [0, 1, 2, 3].map(|c| rt[r][c] as f32));
    Ok(S3disPose {
        intrinsics,
        // The file stores world to camera.
        camera_to_world: Transform::from_rt_rows(&rows).inverse(),
    })
}

/// Reader for the 2D-3D-S release of S3DIS: `rgb/<id>_rgb.png`, `depth/<id>_depth.png` and
/// `pose/<id>_pose.json` holding the per frame intrinsics and world to camera transform.
pub struct S3disReader {
    root_path: PathBuf,
    config: Config,
    frames: Vec<FrameFiles>,
    intrinsics: Vec<CameraIntrinsics>,
    trajectory: Trajectory,
}

impl S3disReader {
    pub fn new<P: AsRef<Path>>(root_path: P, cfg: &Config) -> Result<Self, DatasetError> {
        let root_path = root_path.as_ref().to_path_buf();

        let mut frames = Vec::new();
        let mut intrinsics = Vec::new();
        let mut trajectory = Trajectory::default();
        for frame in LAYOUT.discover(&root_path, cfg.data.frame_stride)? {
            let pose = read_pose_json(&frame.pose)?;
            trajectory.push(pose.camera_to_world, frame.frame_id.clone());
            intrinsics.push(pose.intrinsics);
            frames.push(frame);
        }

        log::debug!(
            "Loaded s3dis scene {} with {} frames",
            root_path.display(),
            frames.len()
        );

        Ok(Self {
            root_path,
            config: cfg.clone(),
            frames,
            intrinsics,
            trajectory,
        })
    }
}

impl DatasetReader for S3disReader {
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
            &self.intrinsics[index],
            Some(self.trajectory[index].clone()),
            &self.config,
            depth_units(&self.config, S3DIS_DEPTH_SCALE),
            Some(S3DIS_MISSING_DEPTH),
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
        ReaderFormat::S3dis
    }

    fn pointcloud_path(&self) -> Option<PathBuf> {
        self.config
            .data
            .pointcloud_file
            .as_ref()
            .map(|file| self.root_path.join(file))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;
    use rstest::rstest;

    use super::*;
    use crate::{
        config::DatasetKind,
        unit_test::{sample_s3dis_scene, SampleScene},
    };

    #[rstest]
    fn should_load_frames(sample_s3dis_scene: SampleScene) {
        let reader =
            S3disReader::new(&sample_s3dis_scene.root, &Config::new(DatasetKind::S3dis)).unwrap();
        assert_eq!(reader.len(), 2);
        assert_eq!(
            reader.frame_id(0),
            Some("camera_0d600f92_office_1_frame_0_domain")
        );

        let frame = reader.get(1).unwrap();
        assert_eq!(frame.intrinsics.fx, 20.0);
        assert_eq!(frame.intrinsics.cx, 8.0);
        assert_eq!(frame.image.depth_meters(1, 1), Some(2.0));
        // Missing measurements are cleared.
        assert_eq!(frame.image.depth[[0, 0]], 0);

        // World to camera translates by -1 in x, so the camera sits at x = 1.
        assert_abs_diff_eq!(
            frame.camera_to_world.unwrap().translation(),
            Vector3::new(1.0, 0.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn should_only_use_configured_pointcloud(sample_s3dis_scene: SampleScene) {
        let reader =
            S3disReader::new(&sample_s3dis_scene.root, &Config::new(DatasetKind::S3dis)).unwrap();
        assert!(reader.pointcloud_path().is_none());

        let mut cfg = Config::new(DatasetKind::S3dis);
        cfg.data.pointcloud_file = Some("office_1.ply".to_string());
        let reader = S3disReader::new(&sample_s3dis_scene.root, &cfg).unwrap();
        assert_eq!(
            reader.pointcloud_path(),
            Some(sample_s3dis_scene.root.join("office_1.ply"))
        );
    }

    #[rstest]
    #[case("[[1, 0, 0]]")]
    #[case("[[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1]]")]
    #[case("[[1, 0, 0, 0, 5], [0, 1, 0, 0, 5], [0, 0, 1, 0, 5]]")]
    #[case("[[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1], [0, 0, 0, 1]]")]
    fn should_reject_malformed_pose(#[case] rt_matrix: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x_pose.json");
        std::fs::write(
            &path,
            format!(
                r#"{{"camera_k_matrix": [[1, 0, 0], [0, 1, 0], [0, 0, 1]], "camera_rt_matrix": {rt_matrix}}}"#
            ),
        )
        .unwrap();
        assert!(matches!(
            read_pose_json(&path),
            Err(DatasetError::Parser(_))
        ));
    }

    #[test]
    fn should_accept_homogeneous_pose() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x_pose.json");
        std::fs::write(
            &path,
            r#"{"camera_k_matrix": [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
                "camera_rt_matrix": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, -2], [0, 0, 0, 1]]}"#,
        )
        .unwrap();
        let pose = read_pose_json(&path).unwrap();
        assert_abs_diff_eq!(
            pose.camera_to_world.translation(),
            Vector3::new(0.0, 0.0, 2.0),
            epsilon = 1e-6
        );
    }
}
