use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::materials::{Material, MaterialKey, PointsMaterial};
use crate::mesh::{MeshData, Vertex3};

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Exponential-squared distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Color,
    pub density: f32,
}

/// Opaque identity of a scene node. Fresh per inserted node, so callers can
/// tell "same object, moved" apart from "rebuilt object" without inspecting
/// buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(Uuid);

impl NodeHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// One repeated copy of an instanced mesh: planar position, yaw around the
/// up axis, uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstanceTransform {
    pub position: Vertex3,
    pub yaw: f32,
    pub scale: f32,
}

/// How a mesh node refers to its material.
///
/// Shared materials live in the material cache and survive any number of
/// node removals; owned materials are released together with their node.
#[derive(Debug, Clone)]
pub enum MaterialRef {
    Shared(MaterialKey),
    Owned(Material),
}

/// Drawable payload of a scene node.
///
/// Point nodes always own their material, so releasing the node releases
/// the material too.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Mesh {
        geometry: MeshData,
        material: MaterialRef,
    },
    Instanced {
        geometry: MeshData,
        material: MaterialRef,
        instances: Vec<InstanceTransform>,
    },
    Points {
        positions: Vec<Vertex3>,
        material: PointsMaterial,
    },
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub handle: NodeHandle,
    /// Node-level translation applied on top of the geometry. Terrain
    /// re-centering mutates only this.
    pub position: Vertex3,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn instance_count(&self) -> usize {
        match &self.kind {
            NodeKind::Instanced { instances, .. } => instances.len(),
            _ => 0,
        }
    }

    pub fn particle_count(&self) -> usize {
        match &self.kind {
            NodeKind::Points { positions, .. } => positions.len(),
            _ => 0,
        }
    }
}

/// Buffer/material lifetime counters.
///
/// Stand-in for the GPU allocator: inserting a node allocates its buffers,
/// removing it releases them. Shared cache materials are not counted here at
/// all; only node-owned point materials are.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    pub live_geometries: usize,
    pub released_geometries: usize,
    pub live_point_materials: usize,
    pub released_point_materials: usize,
}

/// The scene container the core dresses.
///
/// Owned by the render shell, not by this crate: world and environment code
/// insert, look up, and remove children by stable name, and set background
/// and fog. Nothing here survives a process restart.
#[derive(Debug, Default)]
pub struct Scene {
    children: HashMap<String, SceneNode>,
    pub background: Option<Color>,
    pub fog: Option<Fog>,
    stats: SceneStats,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `name`, replacing (and releasing) any node that
    /// already held the name. Returns the new node's handle.
    pub fn insert_named(&mut self, name: &str, position: Vertex3, kind: NodeKind) -> NodeHandle {
        self.remove_named(name);

        let node = SceneNode {
            handle: NodeHandle::new(),
            position,
            kind,
        };
        let handle = node.handle;

        self.stats.live_geometries += 1;
        if matches!(node.kind, NodeKind::Points { .. }) {
            self.stats.live_point_materials += 1;
        }

        self.children.insert(name.to_string(), node);
        handle
    }

    pub fn get_named(&self, name: &str) -> Option<&SceneNode> {
        self.children.get(name)
    }

    pub fn get_named_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.children.get_mut(name)
    }

    /// Remove the node under `name`, releasing its geometry and, for point
    /// nodes, its material. Removing an absent name is a no-op.
    pub fn remove_named(&mut self, name: &str) -> Option<SceneNode> {
        let node = self.children.remove(name)?;

        self.stats.live_geometries -= 1;
        self.stats.released_geometries += 1;
        if matches!(node.kind, NodeKind::Points { .. }) {
            self.stats.live_point_materials -= 1;
            self.stats.released_point_materials += 1;
        }

        Some(node)
    }

    pub fn child_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.children.keys().map(String::as_str)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshData;

    fn mesh_kind() -> NodeKind {
        NodeKind::Mesh {
            geometry: MeshData::empty(),
            material: MaterialRef::Shared(MaterialKey::GroundNatural),
        }
    }

    fn points_kind() -> NodeKind {
        NodeKind::Points {
            positions: vec![Vertex3::zero()],
            material: PointsMaterial {
                color: Color::rgb(1.0, 1.0, 1.0),
                size: 2.0,
            },
        }
    }

    #[test]
    fn removing_absent_name_is_noop() {
        let mut scene = Scene::new();
        assert!(scene.remove_named("ground").is_none());
        assert_eq!(scene.stats(), SceneStats::default());
    }

    #[test]
    fn insert_replaces_and_releases_previous_holder() {
        let mut scene = Scene::new();
        let first = scene.insert_named("ground", Vertex3::zero(), mesh_kind());
        let second = scene.insert_named("ground", Vertex3::zero(), mesh_kind());

        assert_ne!(first, second);
        assert_eq!(scene.child_count(), 1);
        assert_eq!(scene.stats().live_geometries, 1);
        assert_eq!(scene.stats().released_geometries, 1);
    }

    #[test]
    fn point_node_release_counts_its_material() {
        let mut scene = Scene::new();
        scene.insert_named("weather", Vertex3::zero(), points_kind());
        assert_eq!(scene.stats().live_point_materials, 1);

        scene.remove_named("weather");
        assert_eq!(scene.stats().live_point_materials, 0);
        assert_eq!(scene.stats().released_point_materials, 1);
    }
}
