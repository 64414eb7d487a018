use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Normal3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UV {
    pub u: f32,
    pub v: f32,
}

impl Vertex3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn sub(&self, other: &Vertex3) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    pub fn cross(&self, other: &Vertex3) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn normalize(&self) -> Normal3 {
        let length = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if length > 0.0001 {
            Normal3 {
                x: self.x / length,
                y: self.y / length,
                z: self.z / length,
            }
        } else {
            Normal3 {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            }
        }
    }
}

/// Indexed triangle mesh with per-vertex normals and UVs.
///
/// Coordinate convention throughout the crate: x is lateral, y is the forward
/// travel axis, z is up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vertex3>,
    pub indices: Vec<u32>,
    pub normals: Vec<Normal3>,
    pub uvs: Vec<UV>,
}

impl MeshData {
    pub fn empty() -> Self {
        Self {
            vertices: vec![],
            indices: vec![],
            normals: vec![],
            uvs: vec![],
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recompute per-vertex normals by accumulating area-weighted face
    /// normals over all triangles, then renormalizing.
    pub fn compute_smooth_normals(&mut self) {
        let mut accumulators: Vec<(f32, f32, f32)> = vec![(0.0, 0.0, 0.0); self.vertices.len()];

        for triangle_idx in (0..self.indices.len()).step_by(3) {
            let i0 = self.indices[triangle_idx] as usize;
            let i1 = self.indices[triangle_idx + 1] as usize;
            let i2 = self.indices[triangle_idx + 2] as usize;

            let v0 = &self.vertices[i0];
            let v1 = &self.vertices[i1];
            let v2 = &self.vertices[i2];

            let edge1 = v1.sub(v0);
            let edge2 = v2.sub(v0);
            let face_normal = edge1.cross(&edge2).normalize();

            for idx in [i0, i1, i2] {
                accumulators[idx].0 += face_normal.x;
                accumulators[idx].1 += face_normal.y;
                accumulators[idx].2 += face_normal.z;
            }
        }

        self.normals = accumulators
            .iter()
            .map(|acc| Vertex3::new(acc.0, acc.1, acc.2).normalize())
            .collect();
    }

    pub fn bounds(&self) -> (Vertex3, Vertex3) {
        let mut min = Vertex3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vertex3::new(f32::MIN, f32::MIN, f32::MIN);

        for v in &self.vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        (min, max)
    }

    /// Export as Wavefront OBJ text, for eyeballing generated geometry in an
    /// external viewer.
    pub fn export_obj(&self, object_name: &str) -> String {
        let mut obj = String::new();

        obj.push_str(&format!("o {}\n", object_name));

        for vertex in &self.vertices {
            obj.push_str(&format!("v {} {} {}\n", vertex.x, vertex.y, vertex.z));
        }

        for uv in &self.uvs {
            obj.push_str(&format!("vt {} {}\n", uv.u, uv.v));
        }

        for normal in &self.normals {
            obj.push_str(&format!("vn {} {} {}\n", normal.x, normal.y, normal.z));
        }

        for triangle_idx in (0..self.indices.len()).step_by(3) {
            let i0 = self.indices[triangle_idx] + 1;
            let i1 = self.indices[triangle_idx + 1] + 1;
            let i2 = self.indices[triangle_idx + 2] + 1;

            obj.push_str(&format!(
                "f {}/{}/{} {}/{}/{} {}/{}/{}\n",
                i0, i0, i0, i1, i1, i1, i2, i2, i2
            ));
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> MeshData {
        MeshData {
            vertices: vec![
                Vertex3::new(0.0, 0.0, 0.0),
                Vertex3::new(1.0, 0.0, 0.0),
                Vertex3::new(0.0, 1.0, 0.0),
                Vertex3::new(1.0, 1.0, 0.0),
            ],
            indices: vec![0, 1, 2, 2, 1, 3],
            normals: vec![],
            uvs: vec![
                UV { u: 0.0, v: 0.0 },
                UV { u: 1.0, v: 0.0 },
                UV { u: 0.0, v: 1.0 },
                UV { u: 1.0, v: 1.0 },
            ],
        }
    }

    #[test]
    fn smooth_normals_point_up_for_flat_quad() {
        let mut mesh = unit_quad();
        mesh.compute_smooth_normals();

        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert!(n.x.abs() < 1e-5);
            assert!(n.y.abs() < 1e-5);
            assert!((n.z - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn normalize_degenerate_vector_falls_back_to_up() {
        let n = Vertex3::zero().normalize();
        assert_eq!((n.x, n.y, n.z), (0.0, 0.0, 1.0));
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = unit_quad();
        let (min, max) = mesh.bounds();
        assert_eq!((min.x, min.y), (0.0, 0.0));
        assert_eq!((max.x, max.y), (1.0, 1.0));
    }

    #[test]
    fn obj_export_contains_all_record_types() {
        let mut mesh = unit_quad();
        mesh.compute_smooth_normals();
        let obj = mesh.export_obj("quad");

        assert!(obj.contains("o quad"));
        assert!(obj.contains("v "));
        assert!(obj.contains("vt "));
        assert!(obj.contains("vn "));
        assert!(obj.contains("f "));
    }
}
