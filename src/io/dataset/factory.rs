use std::path::Path;

use crate::config::{Config, DatasetKind};

use super::{DatasetError, DatasetReader, ReplicaReader, S3disReader, ScanNetReader};

/// Creates the reader of the dataset named in `cfg.data.dataset_name` for the scene at
/// `root_path`.
///
/// Dataset names are checked when the configuration is parsed, so an unknown name is reported as
/// [`crate::config::UnknownDatasetError`] before any reader gets constructed.
pub fn build_dataset<P: AsRef<Path>>(
    root_path: P,
    cfg: &Config,
) -> Result<Box<dyn DatasetReader>, DatasetError> {
    let root_path = root_path.as_ref();
    log::debug!(
        "Building {} reader for {}",
        cfg.data.dataset_name,
        root_path.display()
    );

    let reader: Box<dyn DatasetReader> = match cfg.data.dataset_name {
        DatasetKind::ScanNet200 | DatasetKind::ScanNetPP => {
            Box::new(ScanNetReader::new(root_path, cfg)?)
        }
        DatasetKind::Replica => Box::new(ReplicaReader::new(root_path, cfg)?),
        DatasetKind::S3dis => Box::new(S3disReader::new(root_path, cfg)?),
    };
    Ok(reader)
}
