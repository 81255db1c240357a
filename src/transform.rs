use nalgebra::{
    Isometry3, Matrix3, Matrix4, Point3, Rotation3, Translation3, UnitQuaternion, Vector3,
};
use ndarray::{Array2, Axis};

/// Rigid transformation. Poses in this crate map points from camera to world.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform(Isometry3<f32>);

impl Transform {
    pub fn eye() -> Self {
        Self(Isometry3::identity())
    }

    pub fn new(translation: &Vector3<f32>, rotation: &UnitQuaternion<f32>) -> Self {
        Self(Isometry3::from_parts(
            Translation3::from(*translation),
            *rotation,
        ))
    }

    /// Creates from a homogeneous matrix. Only the top 3x4 block is read; the rotation block is
    /// re-orthonormalized.
    pub fn from_matrix4(matrix: &Matrix4<f32>) -> Self {
        let translation = Translation3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        Self::from_rotation_translation(
            &matrix.fixed_slice::<3, 3>(0, 0).into_owned(),
            translation,
        )
    }

    /// Creates from the rows of a 3x4 `[R | t]` matrix.
    pub fn from_rt_rows(rows: &[[f32; 4]; 3]) -> Self {
        let rotation = Matrix3::from_fn(|r, c| rows[r][c]);
        let translation = Translation3::new(rows[0][3], rows[1][3], rows[2][3]);
        Self::from_rotation_translation(&rotation, translation)
    }

    fn from_rotation_translation(rotation: &Matrix3<f32>, translation: Translation3<f32>) -> Self {
        let so3 = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(rotation));
        Self(Isometry3::from_parts(translation, so3))
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    pub fn translation(&self) -> Vector3<f32> {
        self.0.translation.vector
    }

    /// Transforms a point (rotation and translation).
    pub fn transform_point(&self, point: &Vector3<f32>) -> Vector3<f32> {
        self.0.transform_point(&Point3::from(*point)).coords
    }

    /// Transforms a Nx3 array of points.
    pub fn transform(&self, mut points: Array2<f32>) -> Array2<f32> {
        for mut point in points.axis_iter_mut(Axis(0)) {
            let v = self.transform_point(&Vector3::new(point[0], point[1], point[2]));
            point[0] = v[0];
            point[1] = v[1];
            point[2] = v[2];
        }

        points
    }
}

impl From<&Transform> for Matrix4<f32> {
    fn from(transform: &Transform) -> Self {
        transform.0.to_homogeneous()
    }
}
