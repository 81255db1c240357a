use std::ops::Index;

use crate::transform::Transform;

/// Camera poses of a scene, in frame order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    /// Camera poses, transforms points from camera to world.
    pub camera_to_world: Vec<Transform>,
    /// Id of the frame each pose belongs to.
    pub frame_ids: Vec<String>,
}

impl Trajectory {
    /// Adds a new pose to the trajectory.
    ///
    /// # Arguments
    ///
    /// * `camera_to_world` - Transform from camera to world.
    /// * `frame_id` - Frame of the pose.
    pub fn push(&mut self, camera_to_world: Transform, frame_id: String) {
        self.camera_to_world.push(camera_to_world);
        self.frame_ids.push(frame_id);
    }

    /// Returns the number of poses in the trajectory.
    pub fn len(&self) -> usize {
        self.camera_to_world.len()
    }

    /// Returns true if the trajectory is empty.
    pub fn is_empty(&self) -> bool {
        self.camera_to_world.is_empty()
    }

    /// Returns the iterator over poses and frame ids.
    pub fn iter(&self) -> impl Iterator<Item = (&Transform, &str)> + '_ {
        self.camera_to_world
            .iter()
            .zip(self.frame_ids.iter().map(String::as_str))
    }
}

impl FromIterator<(Transform, String)> for Trajectory {
    /// Use with the `collect::<Trajectory>` method.
    fn from_iter<T: IntoIterator<Item = (Transform, String)>>(iter: T) -> Self {
        let mut trajectory = Trajectory::default();
        for (transform, frame_id) in iter {
            trajectory.push(transform, frame_id);
        }
        trajectory
    }
}

impl Index<usize> for Trajectory {
    type Output = Transform;
    /// Returns the pose at the given index.
    fn index(&self, index: usize) -> &Self::Output {
        &self.camera_to_world[index]
    }
}
