//! Moving between the depth images of a frame and 3D points.
//!
//! Lifting 2D results to a scene point cloud needs to know which points a frame actually sees.
//! [`visibility_mask`] answers that by projecting the points into the depth image and comparing
//! each point depth with the measured one.

use nalgebra::Vector3;
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::{camera::PinholeCamera, image::RgbdFrame, io::dataset::DatasetError};

/// Back-projects all pixels with depth into 3D. Shape is (Nx3), row-major pixel order.
///
/// Points are in world coordinates when the frame has a pose, camera coordinates otherwise.
pub fn backproject_depth(frame: &RgbdFrame) -> Array2<f32> {
    let image = &frame.image;
    let mut points = Vec::new();
    for ((row, col), _) in image.depth.indexed_iter() {
        if let Some(z) = image.depth_meters(row, col) {
            let point = frame.intrinsics.backproject(col as f32, row as f32, z);
            points.extend_from_slice(&[point[0], point[1], point[2]]);
        }
    }

    let len = points.len() / 3;
    let points = Array2::from_shape_vec((len, 3), points).expect("three values per point");
    match &frame.camera_to_world {
        Some(camera_to_world) => camera_to_world.transform(points),
        None => points,
    }
}

/// Projects world points into the camera. Returns (Nx3) rows of `(x, y, depth)`.
pub fn project_points(points: &ArrayView2<f32>, camera: &PinholeCamera) -> Array2<f32> {
    let mut projected = Array2::zeros((points.nrows(), 3));
    for (point, mut out) in points.outer_iter().zip(projected.outer_iter_mut()) {
        let (x, y, z) = camera.project(&Vector3::new(point[0], point[1], point[2]));
        out[0] = x;
        out[1] = y;
        out[2] = z;
    }
    projected
}

/// Marks the world points seen by the frame.
///
/// A point is visible when it projects in front of the camera onto a pixel with depth and the
/// measured depth is within `depth_tolerance` meters of the point depth.
///
/// # Errors
///
/// * [`DatasetError::MissingPose`] if the frame has no pose.
pub fn visibility_mask(
    points: &ArrayView2<f32>,
    frame: &RgbdFrame,
    depth_tolerance: f32,
) -> Result<Vec<bool>, DatasetError> {
    let camera = frame
        .pinhole_camera()
        .ok_or_else(|| DatasetError::MissingPose(frame.frame_id.clone()))?;

    Ok((0..points.nrows())
        .into_par_iter()
        .map(|i| {
            let point = points.row(i);
            camera
                .project_if_visible(&Vector3::new(point[0], point[1], point[2]))
                .and_then(|(col, row, z)| {
                    frame
                        .image
                        .depth_meters(row, col)
                        .map(|depth| (depth - z).abs() <= depth_tolerance)
                })
                .unwrap_or(false)
        })
        .collect())
}
