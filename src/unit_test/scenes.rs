use std::path::PathBuf;

use image::{ImageBuffer, Luma};
use nalgebra::{UnitQuaternion, Vector3};
use rstest::fixture;
use tempfile::TempDir;

use super::{write_color, write_depth, write_matrix, write_pose};
use crate::transform::Transform;

/// A synthetic scene inside a temporary directory, removed on drop.
pub struct SampleScene {
    _dir: TempDir,
    pub root: PathBuf,
}

impl SampleScene {
    fn new(scene_name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(scene_name);
        std::fs::create_dir_all(&root).unwrap();
        Self { _dir: dir, root }
    }
}

fn translation(x: f32) -> Transform {
    Transform::new(&Vector3::new(x, 0.0, 0.0), &UnitQuaternion::identity())
}

/// ScanNet scene with frames 0, 20, 40 and 100, frame 40 having a lost pose.
/// Color is 32x24, depth 16x12 at 1.5 meters.
#[fixture]
pub fn sample_scannet_scene() -> SampleScene {
    let scene = SampleScene::new("scene0011_00");
    let root = &scene.root;

    write_matrix(
        &root.join("intrinsic.txt"),
        &[
            &[20.0, 0.0, 7.5, 0.0],
            &[0.0, 20.0, 5.5, 0.0],
            &[0.0, 0.0, 1.0, 0.0],
            &[0.0, 0.0, 0.0, 1.0],
        ],
    );

    for (frame_id, x) in [(0, 0.0), (20, 1.0), (40, f32::NAN), (100, 2.0)] {
        write_color(&root.join(format!("color/{frame_id}.jpg")), 32, 24);
        write_depth(&root.join(format!("depth/{frame_id}.png")), 16, 12, 1500);
        let pose_path = root.join(format!("pose/{frame_id}.txt"));
        if x.is_nan() {
            std::fs::write(
                &pose_path,
                "-inf -inf -inf -inf\n-inf -inf -inf -inf\n-inf -inf -inf -inf\n-inf -inf -inf -inf\n",
            )
            .unwrap();
        } else {
            write_pose(&pose_path, &translation(x));
        }
    }

    std::fs::write(
        root.join("scene0011_00_vh_clean_2.ply"),
        "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
end_header
0 0 0 255 0 0
1 0 0 0 255 0
0 1 0 0 0 255
",
    )
    .unwrap();

    scene
}

/// Replica scene with frames 0, 1 and 2, no intrinsics file. Depth is 60x34 at 2 meters.
#[fixture]
pub fn sample_replica_scene() -> SampleScene {
    let scene = SampleScene::new("room0");
    let root = &scene.root;

    for frame_id in 0..3 {
        write_color(&root.join(format!("color/{frame_id}.jpg")), 60, 34);
        write_depth(&root.join(format!("depth/{frame_id}.png")), 60, 34, 13107);
        write_pose(
            &root.join(format!("pose/{frame_id}.txt")),
            &translation(frame_id as f32 * 0.1),
        );
    }

    scene
}

/// S3DIS area with two frames of 16x12. Depth is 2 meters except the missing top-left pixel.
#[fixture]
pub fn sample_s3dis_scene() -> SampleScene {
    let scene = SampleScene::new("area_1");
    let root = &scene.root;

    std::fs::create_dir_all(root.join("depth")).unwrap();
    std::fs::create_dir_all(root.join("pose")).unwrap();

    for frame in 0..2 {
        let frame_id = format!("camera_0d600f92_office_1_frame_{frame}_domain");
        write_color(&root.join(format!("rgb/{frame_id}_rgb.png")), 16, 12);
        ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(16, 12, |x, y| {
            if x == 0 && y == 0 {
                Luma([u16::MAX])
            } else {
                Luma([1024])
            }
        })
        .save(root.join(format!("depth/{frame_id}_depth.png")))
        .unwrap();
        std::fs::write(
            root.join(format!("pose/{frame_id}_pose.json")),
            r#"{
  "camera_k_matrix": [[20.0, 0.0, 8.0], [0.0, 20.0, 6.0], [0.0, 0.0, 1.0]],
  "camera_rt_matrix": [[1.0, 0.0, 0.0, -1.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
  "camera_location": [1.0, 0.0, 0.0]
}"#,
        )
        .unwrap();
    }

    scene
}
