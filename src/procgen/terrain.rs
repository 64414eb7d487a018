//! Rough terrain patch generation.
//!
//! A fixed-extent grid with independent per-vertex height jitter, built once
//! per world. The geometry never changes afterwards; the world update slides
//! the node holding it along the forward axis to keep it under the player.

use rand::Rng;

use crate::mesh::{MeshData, Vertex3, UV};

/// Side length of the terrain patch in world units.
pub const TERRAIN_EXTENT: f32 = 3000.0;
pub(crate) const TERRAIN_CELLS: u32 = 64;
const TERRAIN_JITTER_HEIGHT: f32 = 14.0;

/// Generate the rough terrain grid: `TERRAIN_CELLS` quads per side over
/// `TERRAIN_EXTENT`, each vertex lifted by an independent random height in
/// `[0, TERRAIN_JITTER_HEIGHT)`. Normals are computed once, after jitter.
pub fn generate_terrain(rng: &mut impl Rng) -> MeshData {
    let side = TERRAIN_CELLS + 1;
    let step = TERRAIN_EXTENT / TERRAIN_CELLS as f32;
    let half = TERRAIN_EXTENT / 2.0;

    let mut mesh = MeshData::empty();
    mesh.vertices.reserve((side * side) as usize);

    for row in 0..side {
        for col in 0..side {
            mesh.vertices.push(Vertex3::new(
                -half + col as f32 * step,
                -half + row as f32 * step,
                rng.gen_range(0.0..TERRAIN_JITTER_HEIGHT),
            ));
            mesh.uvs.push(UV {
                u: col as f32 / TERRAIN_CELLS as f32,
                v: row as f32 / TERRAIN_CELLS as f32,
            });
        }
    }

    for row in 0..TERRAIN_CELLS {
        for col in 0..TERRAIN_CELLS {
            let v0 = row * side + col;
            let v1 = v0 + 1;
            let v2 = v0 + side;
            let v3 = v2 + 1;

            mesh.indices.extend_from_slice(&[v0, v1, v2, v2, v1, v3]);
        }
    }

    mesh.compute_smooth_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn grid_dimensions_match_cell_count() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mesh = generate_terrain(&mut rng);

        let side = (TERRAIN_CELLS + 1) as usize;
        assert_eq!(mesh.vertices.len(), side * side);
        assert_eq!(mesh.triangle_count(), (TERRAIN_CELLS * TERRAIN_CELLS * 2) as usize);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
    }

    #[test]
    fn heights_stay_inside_jitter_range() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mesh = generate_terrain(&mut rng);

        for v in &mesh.vertices {
            assert!(v.z >= 0.0 && v.z < TERRAIN_JITTER_HEIGHT);
        }
        // Jitter is actually applied, not flat.
        let (min, max) = mesh.bounds();
        assert!(max.z - min.z > 1.0);
    }

    #[test]
    fn same_seed_reproduces_same_terrain() {
        let mesh_a = generate_terrain(&mut SmallRng::seed_from_u64(42));
        let mesh_b = generate_terrain(&mut SmallRng::seed_from_u64(42));

        assert_eq!(mesh_a.vertices, mesh_b.vertices);
    }

    #[test]
    fn different_seeds_diverge() {
        let mesh_a = generate_terrain(&mut SmallRng::seed_from_u64(1));
        let mesh_b = generate_terrain(&mut SmallRng::seed_from_u64(2));

        assert!(mesh_a
            .vertices
            .iter()
            .zip(mesh_b.vertices.iter())
            .any(|(a, b)| a.z != b.z));
    }
}
