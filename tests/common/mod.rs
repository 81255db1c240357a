use std::path::{Path, PathBuf};

use image::{ImageBuffer, Luma, Rgb, RgbImage};
use tempfile::TempDir;

/// Minimal scenes: one frame with an identity pose.
pub struct Scenes {
    _dir: TempDir,
    pub scannet: PathBuf,
    pub replica: PathBuf,
    pub s3dis: PathBuf,
}

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn write_images(color: &Path, depth: &Path) {
    std::fs::create_dir_all(color.parent().unwrap()).unwrap();
    std::fs::create_dir_all(depth.parent().unwrap()).unwrap();
    RgbImage::from_pixel(8, 6, Rgb([10, 20, 30])).save(color).unwrap();
    ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(8, 6, Luma([1000]))
        .save(depth)
        .unwrap();
}

const IDENTITY: &str = "1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1\n";

pub fn sample_scenes() -> Scenes {
    let dir = tempfile::tempdir().unwrap();

    let scannet = dir.path().join("scene0000_00");
    write_images(&scannet.join("color/0.jpg"), &scannet.join("depth/0.png"));
    write(&scannet.join("pose/0.txt"), IDENTITY);
    write(
        &scannet.join("intrinsic/intrinsic_depth.txt"),
        "10 0 3.5 0\n0 10 2.5 0\n0 0 1 0\n0 0 0 1\n",
    );

    let replica = dir.path().join("office0");
    write_images(&replica.join("color/0.jpg"), &replica.join("depth/0.png"));
    write(&replica.join("pose/0.txt"), IDENTITY);

    let s3dis = dir.path().join("area_3");
    write_images(
        &s3dis.join("rgb/camera_a_lounge_1_frame_0_domain_rgb.png"),
        &s3dis.join("depth/camera_a_lounge_1_frame_0_domain_depth.png"),
    );
    write(
        &s3dis.join("pose/camera_a_lounge_1_frame_0_domain_pose.json"),
        r#"{"camera_k_matrix": [[10, 0, 4], [0, 10, 3], [0, 0, 1]],
            "camera_rt_matrix": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0]]}"#,
    );

    Scenes {
        _dir: dir,
        scannet,
        replica,
        s3dis,
    }
}
