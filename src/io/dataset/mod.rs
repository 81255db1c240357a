mod core;
pub use self::core::{DatasetError, DatasetReader, ReaderFormat, SubsetDataset};

mod frames;

mod factory;
pub use factory::build_dataset;

mod replica;
pub use replica::{replica_default_intrinsics, ReplicaReader, REPLICA_DEPTH_SCALE};

mod s3dis;
pub use s3dis::{S3disReader, S3DIS_DEPTH_SCALE, S3DIS_MISSING_DEPTH};

mod scannet;
pub use scannet::{ScanNetReader, SCANNET_DEPTH_SCALE};
