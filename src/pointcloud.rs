use ndarray::{Array2, Axis};

/// Scene point cloud.
#[derive(Clone, Debug)]
pub struct PointCloud {
    /// The 3D points. Shape is (Nx3).
    pub points: Array2<f32>,
    /// Per point normals. Shape is (Nx3).
    pub normals: Option<Array2<f32>>,
    /// The RGB colors. Shape is (Nx3).
    pub colors: Option<Array2<u8>>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.points.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
