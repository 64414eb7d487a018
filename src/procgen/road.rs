//! Road path generation and surface sweep.
//!
//! The path is a pure function of point index: constant spacing along the
//! forward axis, sinusoidal lateral offset. Generated once per world and
//! immutable afterwards; environment rebuilds can never move the road.

use serde::{Deserialize, Serialize};

use crate::mesh::{MeshData, Vertex3, UV};

/// One control point of the road centerline, with derived path properties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoadPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub distance_from_start: f32,
    pub heading_rad: f32,
}

/// Ordered, immutable road centerline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadCurve {
    pub points: Vec<RoadPoint>,
}

impl RoadCurve {
    pub fn total_length(&self) -> f32 {
        self.points
            .last()
            .map(|p| p.distance_from_start)
            .unwrap_or(0.0)
    }
}

pub(crate) const ROAD_POINT_COUNT: usize = 160;
pub(crate) const ROAD_POINT_SPACING: f32 = 25.0;
const ROAD_LATERAL_AMPLITUDE: f32 = 60.0;
const ROAD_LATERAL_FREQUENCY: f32 = 0.35;
pub(crate) const ROAD_HALF_WIDTH: f32 = 9.0;
// Road surface floats just above the ground plane to avoid z-fighting.
const ROAD_SURFACE_LIFT: f32 = 0.2;

/// Generate the road centerline: `ROAD_POINT_COUNT` points at constant
/// forward spacing, lateral offset swinging sinusoidally with the index.
pub fn generate_road_curve() -> RoadCurve {
    let mut points: Vec<RoadPoint> = (0..ROAD_POINT_COUNT)
        .map(|i| RoadPoint {
            x: ROAD_LATERAL_AMPLITUDE * (i as f32 * ROAD_LATERAL_FREQUENCY).sin(),
            y: i as f32 * ROAD_POINT_SPACING,
            z: 0.0,
            distance_from_start: 0.0,
            heading_rad: 0.0,
        })
        .collect();

    compute_derived_properties(&mut points);

    RoadCurve { points }
}

/// Fill in cumulative distance and heading for each point. The last point
/// inherits its predecessor's heading so the sweep does not pinch.
fn compute_derived_properties(points: &mut [RoadPoint]) {
    if points.is_empty() {
        return;
    }

    let mut cumulative_distance = 0.0;
    points[0].distance_from_start = 0.0;

    for i in 1..points.len() {
        let dx = points[i].x - points[i - 1].x;
        let dy = points[i].y - points[i - 1].y;
        let dz = points[i].z - points[i - 1].z;
        let segment_length = (dx * dx + dy * dy + dz * dz).sqrt();
        cumulative_distance += segment_length;
        points[i].distance_from_start = cumulative_distance;
    }

    for i in 0..points.len() {
        if i + 1 < points.len() {
            let dx = points[i + 1].x - points[i].x;
            let dy = points[i + 1].y - points[i].y;
            points[i].heading_rad = dy.atan2(dx);
        } else if i > 0 {
            points[i].heading_rad = points[i - 1].heading_rad;
        }
    }
}

/// Sweep the fixed road cross-section along the curve: one left/right vertex
/// pair per point, two triangles per segment, longitudinal UVs, smooth
/// normals.
pub fn sweep_road_mesh(curve: &RoadCurve) -> MeshData {
    let mut mesh = MeshData::empty();
    if curve.points.is_empty() {
        return mesh;
    }

    let total_length = curve.total_length();

    for (i, point) in curve.points.iter().enumerate() {
        let cos_heading = point.heading_rad.cos();
        let sin_heading = point.heading_rad.sin();

        let perpendicular_x = -sin_heading;
        let perpendicular_y = cos_heading;

        mesh.vertices.push(Vertex3::new(
            point.x + perpendicular_x * ROAD_HALF_WIDTH,
            point.y + perpendicular_y * ROAD_HALF_WIDTH,
            point.z + ROAD_SURFACE_LIFT,
        ));
        mesh.vertices.push(Vertex3::new(
            point.x - perpendicular_x * ROAD_HALF_WIDTH,
            point.y - perpendicular_y * ROAD_HALF_WIDTH,
            point.z + ROAD_SURFACE_LIFT,
        ));

        let u = if total_length > 0.0 {
            point.distance_from_start / total_length
        } else {
            i as f32 / curve.points.len() as f32
        };
        mesh.uvs.push(UV { u, v: 0.0 });
        mesh.uvs.push(UV { u, v: 1.0 });
    }

    for i in 0..curve.points.len().saturating_sub(1) {
        let v0 = (i * 2) as u32;
        let v1 = (i * 2 + 1) as u32;
        let v2 = (i * 2 + 2) as u32;
        let v3 = (i * 2 + 3) as u32;

        mesh.indices.extend_from_slice(&[v0, v1, v2, v2, v1, v3]);
    }

    mesh.compute_smooth_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_has_constant_forward_spacing() {
        let curve = generate_road_curve();
        assert_eq!(curve.points.len(), ROAD_POINT_COUNT);

        for pair in curve.points.windows(2) {
            assert!((pair[1].y - pair[0].y - ROAD_POINT_SPACING).abs() < 1e-4);
        }
    }

    #[test]
    fn curve_is_deterministic() {
        let a = generate_road_curve();
        let b = generate_road_curve();
        for (pa, pb) in a.points.iter().zip(b.points.iter()) {
            assert_eq!((pa.x, pa.y, pa.z), (pb.x, pb.y, pb.z));
        }
    }

    #[test]
    fn lateral_offset_stays_within_amplitude() {
        let curve = generate_road_curve();
        for p in &curve.points {
            assert!(p.x.abs() <= ROAD_LATERAL_AMPLITUDE + 1e-4);
        }
        // The offset actually swings; it is not a straight line.
        assert!(curve.points.iter().any(|p| p.x > 10.0));
        assert!(curve.points.iter().any(|p| p.x < -10.0));
    }

    #[test]
    fn distances_are_cumulative_and_increasing() {
        let curve = generate_road_curve();
        for pair in curve.points.windows(2) {
            assert!(pair[1].distance_from_start > pair[0].distance_from_start);
        }
        // Lateral swing makes the path strictly longer than the forward run.
        let forward_run = (ROAD_POINT_COUNT - 1) as f32 * ROAD_POINT_SPACING;
        assert!(curve.total_length() > forward_run);
    }

    #[test]
    fn sweep_emits_vertex_pair_per_point() {
        let curve = generate_road_curve();
        let mesh = sweep_road_mesh(&curve);

        assert_eq!(mesh.vertices.len(), curve.points.len() * 2);
        assert_eq!(mesh.indices.len(), (curve.points.len() - 1) * 6);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        assert_eq!(mesh.uvs.len(), mesh.vertices.len());
    }

    #[test]
    fn swept_surface_keeps_road_width() {
        let curve = generate_road_curve();
        let mesh = sweep_road_mesh(&curve);

        for i in 0..curve.points.len() {
            let left = &mesh.vertices[i * 2];
            let right = &mesh.vertices[i * 2 + 1];
            let width = left.sub(right);
            let w = (width.x * width.x + width.y * width.y).sqrt();
            assert!((w - 2.0 * ROAD_HALF_WIDTH).abs() < 1e-3);
        }
    }

    #[test]
    fn sweep_of_empty_curve_is_empty() {
        let mesh = sweep_road_mesh(&RoadCurve { points: vec![] });
        assert!(mesh.vertices.is_empty());
        assert!(mesh.indices.is_empty());
    }
}
