pub mod camera;
pub mod config;
pub mod error;
pub mod image;
pub mod io;
pub mod pointcloud;
pub mod projection;
pub mod trajectory;
pub mod transform;

pub use config::{Config, DatasetKind, UnknownDatasetError};
pub use io::dataset::{build_dataset, DatasetReader};

#[cfg(test)]
mod unit_test;
