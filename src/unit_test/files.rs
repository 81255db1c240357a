use std::path::Path;

use image::{ImageBuffer, Luma, Rgb, RgbImage};
use nalgebra::Matrix4;

use crate::transform::Transform;

fn create_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
}

/// Writes a gradient color image, format by extension.
pub fn write_color(path: &Path, width: u32, height: u32) {
    create_parent(path);
    RgbImage::from_fn(width, height, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128]))
        .save(path)
        .unwrap();
}

/// Writes a 16 bits PNG depth image with the same value on all pixels.
pub fn write_depth(path: &Path, width: u32, height: u32, value: u16) {
    create_parent(path);
    ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(width, height, Luma([value]))
        .save(path)
        .unwrap();
}

pub fn write_matrix(path: &Path, rows: &[&[f64]]) {
    create_parent(path);
    let contents = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    std::fs::write(path, contents).unwrap();
}

pub fn write_pose(path: &Path, camera_to_world: &Transform) {
    let matrix: Matrix4<f32> = camera_to_world.into();
    let rows = (0..4)
        .map(|r| (0..4).map(|c| matrix[(r, c)] as f64).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    write_matrix(
        path,
        &rows.iter().map(|row| row.as_slice()).collect::<Vec<_>>(),
    );
}
