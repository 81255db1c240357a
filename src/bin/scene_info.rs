use std::path::PathBuf;

use clap::Parser;
use indoor_scenes::{
    build_dataset, error::Error, io::dataset::SubsetDataset, Config, DatasetReader,
};
use itertools::Itertools;
use kdam::tqdm;

#[derive(Parser)]
struct Args {
    /// Pipeline configuration, YAML or JSON, naming the dataset in `data.dataset_name`
    config: PathBuf,
    /// Path to the scene directory
    scene: PathBuf,
    /// Number of frames to describe
    #[clap(short, long, default_value = "5")]
    frames: usize,
    /// Also loads the scene point cloud
    #[clap(long, short, action)]
    pointcloud: bool,
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();

    let cfg = Config::from_file(&args.config)?;
    let dataset = build_dataset(&args.scene, &cfg)?;

    println!(
        "Dataset: {} ({:?} reader)",
        cfg.data.dataset_name,
        dataset.format()
    );
    println!("Scene: {}", dataset.root_path().display());
    println!("Frames: {}", dataset.len());

    if let Some(trajectory) = dataset.trajectory() {
        let path_length: f32 = trajectory
            .iter()
            .tuple_windows()
            .map(|((prev, _), (next, _))| (next.translation() - prev.translation()).norm())
            .sum();
        println!(
            "Trajectory: {} poses over {:.3} m, frames {} .. {}",
            trajectory.len(),
            path_length,
            trajectory.frame_ids.first().map_or("-", String::as_str),
            trajectory.frame_ids.last().map_or("-", String::as_str)
        );
    }

    if args.pointcloud {
        match dataset.read_pointcloud()? {
            Some(pcl) => println!("Point cloud: {} points", pcl.len()),
            None => println!("Point cloud: not found"),
        }
    }

    let num_frames = args.frames.min(dataset.len());
    let dataset = SubsetDataset::new(dataset, (0..num_frames).collect())?;

    for i in tqdm!(0..dataset.len(), total = dataset.len(), desc = "Reading frames") {
        let frame = dataset.get(i)?;
        let position = frame
            .camera_to_world
            .as_ref()
            .map(|pose| {
                let t = pose.translation();
                format!("[{:.3}, {:.3}, {:.3}]", t[0], t[1], t[2])
            })
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{}: color {}x{}, depth {}x{}, camera at {}",
            frame.frame_id,
            frame.image.width(),
            frame.image.height(),
            frame.image.depth_width(),
            frame.image.depth_height(),
            position
        );
    }

    Ok(())
}
