use std::path::Path;

use ndarray::Array2;
use ply_rs::{parser, ply};

use super::LoadError;
use crate::pointcloud::PointCloud;

#[derive(Debug)]
struct Vertex {
    point: [f32; 3],
    normal: [f32; 3],
    color: [u8; 3],
}

// Meshes store vertices as either float or double, colors as uchar.
impl ply::PropertyAccess for Vertex {
    fn new() -> Self {
        Vertex {
            point: [0f32; 3],
            normal: [0f32; 3],
            color: [0u8; 3],
        }
    }

    fn set_property(&mut self, key: String, property: ply::Property) {
        let value = match property {
            ply::Property::Float(v) => v,
            ply::Property::Double(v) => v as f32,
            ply::Property::UChar(v) => {
                match key.as_ref() {
                    "red" => self.color[0] = v,
                    "green" => self.color[1] = v,
                    "blue" => self.color[2] = v,
                    _ => (),
                }
                return;
            }
            _ => return,
        };

        match key.as_ref() {
            "x" => self.point[0] = value,
            "y" => self.point[1] = value,
            "z" => self.point[2] = value,
            "nx" => self.normal[0] = value,
            "ny" => self.normal[1] = value,
            "nz" => self.normal[2] = value,
            _ => (),
        }
    }
}

/// Reads the vertices of a PLY file (point cloud or mesh). Faces are ignored.
pub fn read_ply<P>(filepath: P) -> Result<PointCloud, LoadError>
where
    P: AsRef<Path>,
{
    let fptr = std::fs::File::open(filepath)?;
    let mut f = std::io::BufReader::new(fptr);

    let vertex_parser = parser::Parser::<Vertex>::new();
    let header = vertex_parser.read_header(&mut f)?;

    for (_, element) in &header.elements {
        if element.name != "vertex" {
            // Elements are stored in header order, so the ones before the vertices
            // still need to be consumed.
            parser::Parser::<ply::DefaultElement>::new()
                .read_payload_for_element(&mut f, element, &header)?;
            continue;
        }

        let vertex_vec = vertex_parser.read_payload_for_element(&mut f, element, &header)?;

        let has_properties = |keys: [&str; 3]| {
            keys.iter()
                .all(|key| element.properties.contains_key(*key))
        };

        if !has_properties(["x", "y", "z"]) {
            return Err(LoadError::Parser(
                "vertex element without x, y, z properties".to_string(),
            ));
        }

        let points = Array2::<f32>::from_shape_fn((vertex_vec.len(), 3), |(i, c)| {
            vertex_vec[i].point[c]
        });

        let normals = has_properties(["nx", "ny", "nz"]).then(|| {
            Array2::<f32>::from_shape_fn((vertex_vec.len(), 3), |(i, c)| vertex_vec[i].normal[c])
        });

        let colors = has_properties(["red", "green", "blue"]).then(|| {
            Array2::<u8>::from_shape_fn((vertex_vec.len(), 3), |(i, c)| vertex_vec[i].color[c])
        });

        return Ok(PointCloud {
            points,
            normals,
            colors,
        });
    }

    Err(LoadError::Parser("no vertex element found".to_string()))
}

#[cfg(test)]
mod test {
    use super::read_ply;

    const MESH_PLY: &str = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
property uchar alpha
element face 1
property list uchar int vertex_indices
end_header
0 0 0 255 0 0 255
1 0 0 0 255 0 255
0 1 0.5 0 0 255 255
3 0 1 2
";

    #[test]
    fn should_read_mesh_vertices() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("scene0000_00_vh_clean_2.ply");
        std::fs::write(&filepath, MESH_PLY).unwrap();

        let pcl = read_ply(&filepath).unwrap();
        assert_eq!(pcl.len(), 3);
        assert_eq!(pcl.points[[2, 2]], 0.5);
        assert!(pcl.normals.is_none());
        let colors = pcl.colors.unwrap();
        assert_eq!(colors[[1, 1]], 255);
        assert_eq!(colors[[1, 0]], 0);
    }

    #[test]
    fn should_fail_without_vertices() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("empty.ply");
        std::fs::write(
            &filepath,
            "ply\nformat ascii 1.0\nelement face 0\nproperty list uchar int vertex_indices\nend_header\n",
        )
        .unwrap();

        assert!(read_ply(&filepath).is_err());
    }
}
