use std::path::PathBuf;

use ndarray::{Array2, Array3};

use crate::{
    camera::{CameraIntrinsics, PinholeCamera},
    transform::Transform,
};

/// A convinence struct that holds a color image, a depth image and its depth scale.
///
/// The color and depth images do not need to have the same resolution; ScanNet, for example,
/// stores 1296x968 color images and 640x480 depth images.
#[derive(Clone, Debug)]
pub struct RgbdImage {
    /// Shape is [height, width, 3].
    pub color: Array3<u8>,
    /// Raw depth values, 0 means no depth. Shape is [height, width].
    pub depth: Array2<u16>,
    /// Meters per raw depth unit.
    pub depth_scale: Option<f64>,
}

impl RgbdImage {
    pub fn with_depth_scale(color: Array3<u8>, depth: Array2<u16>, depth_scale: f64) -> Self {
        Self {
            color,
            depth,
            depth_scale: Some(depth_scale),
        }
    }

    pub fn width(&self) -> usize {
        self.color.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.color.shape()[0]
    }

    pub fn depth_width(&self) -> usize {
        self.depth.shape()[1]
    }

    pub fn depth_height(&self) -> usize {
        self.depth.shape()[0]
    }

    /// Depth in meters at the pixel, `None` for empty pixels or out of bounds.
    pub fn depth_meters(&self, row: usize, col: usize) -> Option<f32> {
        let raw = *self.depth.get((row, col))?;
        if raw == 0 {
            return None;
        }
        Some((raw as f64 * self.depth_scale.unwrap_or(1.0)) as f32)
    }
}

/// One frame of a scene.
#[derive(Clone, Debug)]
pub struct RgbdFrame {
    pub frame_id: String,
    /// Intrinsics of the depth image, with its size set.
    pub intrinsics: CameraIntrinsics,
    pub image: RgbdImage,
    pub camera_to_world: Option<Transform>,
    pub color_path: PathBuf,
    pub depth_path: PathBuf,
}

impl RgbdFrame {
    /// Intrinsics rescaled to the resolution of the color image.
    pub fn color_intrinsics(&self) -> CameraIntrinsics {
        let mut intrinsics = self.intrinsics.clone();
        if intrinsics.width.is_none() || intrinsics.height.is_none() {
            intrinsics.size(self.image.depth_width(), self.image.depth_height());
        }
        intrinsics.resize(self.image.width(), self.image.height())
    }

    /// The depth camera placed at the frame pose, `None` if the pose is unknown.
    pub fn pinhole_camera(&self) -> Option<PinholeCamera> {
        let camera_to_world = self.camera_to_world.clone()?;
        Some(PinholeCamera::new(
            self.intrinsics.clone(),
            camera_to_world,
            self.image.depth_width(),
            self.image.depth_height(),
        ))
    }
}
