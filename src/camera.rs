use nalgebra::Vector3;

use super::transform::Transform;

/// Camera intrinsic parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length and pixel scale in the X-axis.
    pub fx: f64,
    /// Focal length and pixel scale in the Y-axis.
    pub fy: f64,
    /// Camera X-center.
    pub cx: f64,
    /// Camera Y-center.
    pub cy: f64,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

impl CameraIntrinsics {
    pub fn from_simple_intrinsic(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            width: None,
            height: None,
        }
    }

    /// Reads the parameters from the top-left 3x3 block of a K matrix. ScanNet stores it padded
    /// into a 4x4 matrix.
    ///
    /// Returns `None` if the matrix is smaller than 3x3.
    pub fn from_matrix(rows: &[Vec<f64>]) -> Option<Self> {
        if rows.len() < 3 || rows.iter().take(3).any(|row| row.len() < 3) {
            return None;
        }

        Some(Self::from_simple_intrinsic(
            rows[0][0], rows[1][1], rows[0][2], rows[1][2],
        ))
    }

    /// Project a 3D point into image space.
    ///
    /// # Arguments
    ///
    /// * point: The 3D point.
    ///
    /// # Returns
    ///
    /// * (x and y) coordinates.
    pub fn project(&self, point: &Vector3<f32>) -> (f32, f32) {
        (
            point[0] * self.fx as f32 / point[2] + self.cx as f32,
            point[1] * self.fy as f32 / point[2] + self.cy as f32,
        )
    }

    pub fn backproject(&self, x: f32, y: f32, z: f32) -> Vector3<f32> {
        Vector3::new(
            (x - self.cx as f32) * z / self.fx as f32,
            (y - self.cy as f32) * z / self.fy as f32,
            z,
        )
    }

    /// Rescale the parameters to another image resolution.
    ///
    /// The source resolution is `self.width` and `self.height`; if they are unknown, the
    /// parameters are returned unchanged with the new size.
    pub fn resize(&self, width: usize, height: usize) -> Self {
        let (sx, sy) = match (self.width, self.height) {
            (Some(src_width), Some(src_height)) if src_width > 0 && src_height > 0 => (
                width as f64 / src_width as f64,
                height as f64 / src_height as f64,
            ),
            _ => (1.0, 1.0),
        };

        Self {
            fx: self.fx * sx,
            fy: self.fy * sy,
            cx: self.cx * sx,
            cy: self.cy * sy,
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn size(&mut self, width: usize, height: usize) {
        self.width = Some(width);
        self.height = Some(height);
    }
}

/// Intrinsics with a pose and an image size.
#[derive(Clone, Debug)]
pub struct PinholeCamera {
    pub intrinsics: CameraIntrinsics,
    pub camera_to_world: Transform,
    world_to_camera: Transform,
    pub width: usize,
    pub height: usize,
}

impl PinholeCamera {
    pub fn new(
        intrinsics: CameraIntrinsics,
        camera_to_world: Transform,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            intrinsics,
            world_to_camera: camera_to_world.inverse(),
            camera_to_world,
            width,
            height,
        }
    }

    /// Project a world point into image space.
    ///
    /// # Returns
    ///
    /// * (x, y, z), where z is the depth of the point in camera space.
    pub fn project(&self, point: &Vector3<f32>) -> (f32, f32, f32) {
        let camera_point = self.world_to_camera.transform_point(point);
        let (x, y) = self.intrinsics.project(&camera_point);
        (x, y, camera_point[2])
    }

    /// Projects the point and returns the nearest pixel as `(column, row, depth)`, if the point
    /// is in front of the camera and inside the image.
    pub fn project_if_visible(&self, point: &Vector3<f32>) -> Option<(usize, usize, f32)> {
        let (x, y, z) = self.project(point);
        let (col, row) = (x.round(), y.round());

        if z > 0.0
            && col >= 0.0
            && col < self.width as f32
            && row >= 0.0
            && row < self.height as f32
        {
            Some((col as usize, row as usize, z))
        } else {
            None
        }
    }
}
