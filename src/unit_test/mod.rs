mod files;
pub(crate) use files::{write_color, write_depth, write_matrix, write_pose};
mod scenes;
pub(crate) use scenes::{sample_replica_scene, sample_s3dis_scene, sample_scannet_scene, SampleScene};
