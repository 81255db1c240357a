//! File discovery and frame loading shared by the scene readers.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use itertools::Itertools;
use ndarray::{Array2, Array3};
use nshare::ToNdarray2;

use super::DatasetError;
use crate::{
    camera::CameraIntrinsics,
    config::Config,
    image::{IntoArray3, RgbdFrame, RgbdImage},
    io::{read_matrix_file, rows_to_matrix4},
    trajectory::Trajectory,
    transform::Transform,
};

/// Paths of one frame.
#[derive(Clone, Debug)]
pub(super) struct FrameFiles {
    pub frame_id: String,
    pub color: PathBuf,
    pub depth: PathBuf,
    pub pose: PathBuf,
}

/// Where a scene keeps its per-frame files. Every file is `<dir>/<frame_id><suffix>`.
pub(super) struct SceneLayout {
    pub color: (&'static str, &'static str),
    pub depth: (&'static str, &'static str),
    pub pose: (&'static str, &'static str),
}

impl SceneLayout {
    /// Lists the frames by their color images, sorted by id and decimated by `stride`.
    /// Each color image must have its depth image and pose file.
    pub fn discover(
        &self,
        root_path: &Path,
        stride: usize,
    ) -> Result<Vec<FrameFiles>, DatasetError> {
        let (color_dir, color_suffix) = self.color;
        let color_files = list_files(&root_path.join(color_dir), color_suffix)?;

        color_files
            .into_iter()
            .step_by(stride.max(1))
            .map(|(frame_id, color)| -> Result<FrameFiles, DatasetError> {
                let depth = require_file(root_path, self.depth, &frame_id)?;
                let pose = require_file(root_path, self.pose, &frame_id)?;
                Ok(FrameFiles {
                    frame_id,
                    color,
                    depth,
                    pose,
                })
            })
            .collect()
    }
}

fn require_file(
    root_path: &Path,
    (dir, suffix): (&str, &str),
    frame_id: &str,
) -> Result<PathBuf, DatasetError> {
    let path = root_path.join(dir).join(format!("{frame_id}{suffix}"));
    if path.is_file() {
        Ok(path)
    } else {
        Err(DatasetError::Parser(format!(
            "frame {frame_id} is missing {}",
            path.display()
        )))
    }
}

/// Lists `<dir>/*<suffix>` as `(id, path)`, the id being the file name without the suffix.
/// Ids are sorted numerically when all of them are integers.
pub(super) fn list_files(
    dir: &Path,
    suffix: &str,
) -> Result<Vec<(String, PathBuf)>, DatasetError> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| DatasetError::Parser(format!("non UTF-8 path: {}", dir.display())))?;
    let pattern = format!("{}/*{suffix}", glob::Pattern::escape(dir_str));

    let mut files = Vec::new();
    for path in glob::glob(&pattern)? {
        let path = path?;
        let frame_id = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(suffix))
            .map(str::to_string);
        if let Some(frame_id) = frame_id {
            files.push((frame_id, path));
        }
    }

    let numeric_ids = files
        .iter()
        .map(|(frame_id, _)| frame_id.parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>();

    Ok(match numeric_ids {
        Some(ids) => ids
            .into_iter()
            .zip(files)
            .sorted_by_key(|(id, _)| *id)
            .map(|(_, file)| file)
            .collect(),
        None => files
            .into_iter()
            .sorted_by(|lhs, rhs| lhs.0.cmp(&rhs.0))
            .collect(),
    })
}

/// Reads a 4x4 camera-to-world pose. Returns `None` for poses with non-finite values, which
/// scanners write when tracking was lost.
pub(super) fn read_pose_file(path: &Path) -> Result<Option<Transform>, DatasetError> {
    let rows = read_matrix_file(path)?;
    if rows.iter().flatten().any(|value| !value.is_finite()) {
        return Ok(None);
    }

    let matrix = rows_to_matrix4(&rows).ok_or_else(|| {
        DatasetError::Parser(format!("{} is not a 4x4 matrix", path.display()))
    })?;
    Ok(Some(Transform::from_matrix4(&matrix.cast::<f32>())))
}

pub(super) fn read_intrinsics_file(path: &Path) -> Result<CameraIntrinsics, DatasetError> {
    let rows = read_matrix_file(path)?;
    CameraIntrinsics::from_matrix(&rows).ok_or_else(|| {
        DatasetError::Parser(format!("{} is not an intrinsic matrix", path.display()))
    })
}

/// Reads the poses of the frames, dropping the frames without a valid pose.
pub(super) fn read_text_poses(
    frames: Vec<FrameFiles>,
) -> Result<(Vec<FrameFiles>, Trajectory), DatasetError> {
    let mut kept = Vec::with_capacity(frames.len());
    let mut trajectory = Trajectory::default();
    for frame in frames {
        match read_pose_file(&frame.pose)? {
            Some(pose) => {
                trajectory.push(pose, frame.frame_id.clone());
                kept.push(frame);
            }
            None => log::warn!(
                "Skipping frame {}: invalid pose in {}",
                frame.frame_id,
                frame.pose.display()
            ),
        }
    }
    Ok((kept, trajectory))
}

pub(super) fn read_color(
    path: &Path,
    img_dim: Option<(usize, usize)>,
) -> Result<Array3<u8>, DatasetError> {
    let mut color = image::open(path)?.into_rgb8();
    if let Some((width, height)) = img_dim {
        if (color.width() as usize, color.height() as usize) != (width, height) {
            color = image::imageops::resize(
                &color,
                width as u32,
                height as u32,
                FilterType::Triangle,
            );
        }
    }
    Ok(color.into_array3())
}

/// Reads a 16 bits depth image. Pixels equal to `missing_value` are set to 0.
pub(super) fn read_depth(
    path: &Path,
    missing_value: Option<u16>,
) -> Result<Array2<u16>, DatasetError> {
    let mut depth = image::open(path)?.into_luma16().into_ndarray2();
    if let Some(missing_value) = missing_value {
        depth.mapv_inplace(|value| if value == missing_value { 0 } else { value });
    }
    Ok(depth)
}

/// Raw depth units per meter, from the configuration or the reader's default.
pub(super) fn depth_units(cfg: &Config, default: f64) -> f64 {
    cfg.data.depth_scale.unwrap_or(default)
}

/// Loads the images of a frame and assembles it. `intrinsics` are adapted to the size of the
/// depth image.
pub(super) fn load_frame(
    files: &FrameFiles,
    intrinsics: &CameraIntrinsics,
    camera_to_world: Option<Transform>,
    cfg: &Config,
    units_per_meter: f64,
    missing_depth: Option<u16>,
) -> Result<RgbdFrame, DatasetError> {
    let color = read_color(&files.color, cfg.data.img_dim)?;
    let depth = read_depth(&files.depth, missing_depth)?;
    let (depth_height, depth_width) = depth.dim();

    let same_size =
        intrinsics.width == Some(depth_width) && intrinsics.height == Some(depth_height);
    let intrinsics = if same_size {
        intrinsics.clone()
    } else {
        intrinsics.resize(depth_width, depth_height)
    };

    Ok(RgbdFrame {
        frame_id: files.frame_id.clone(),
        intrinsics,
        image: RgbdImage::with_depth_scale(color, depth, 1.0 / units_per_meter),
        camera_to_world,
        color_path: files.color.clone(),
        depth_path: files.depth.clone(),
    })
}
