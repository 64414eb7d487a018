//! Environment dressing: ground, foliage, weather, fog.
//!
//! `EnvironmentBuilder::apply` is the single entry point. It always tears
//! down what it previously built before building again, so calling it
//! repeatedly with any combination of mode and options never duplicates or
//! leaks scene objects.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::TAU;
use tracing::{debug, warn};

use crate::materials::{MaterialCache, MaterialKey, PointsMaterial};
use crate::mesh::{MeshData, Normal3, Vertex3, UV};
use crate::scene::{Color, Fog, InstanceTransform, MaterialRef, NodeHandle, NodeKind, Scene};

/// Environment theme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Natural,
    Winter,
}

/// Time-of-day selector for ambient color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayNight {
    Day,
    Night,
}

/// Tuning options consumed by `apply`.
///
/// Out-of-range values are clamped silently: `detail` to at least 0.3,
/// `tree_density` to at least 0.0. Nothing here is ever rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentOptions {
    pub detail: f32,
    pub tree_density: f32,
    pub day_night: DayNight,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self {
            detail: 1.0,
            tree_density: 1.0,
            day_night: DayNight::Day,
        }
    }
}

impl EnvironmentOptions {
    pub const MIN_DETAIL: f32 = 0.3;

    fn clamped(&self) -> Self {
        Self {
            detail: self.detail.max(Self::MIN_DETAIL),
            tree_density: self.tree_density.max(0.0),
            day_night: self.day_night,
        }
    }
}

/// Logical role of an environment-owned scene node. Each role maps to one
/// stable child name under the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Ground,
    Foliage,
    Weather,
}

impl NodeRole {
    pub const ALL: [NodeRole; 3] = [NodeRole::Ground, NodeRole::Foliage, NodeRole::Weather];

    pub fn node_name(self) -> &'static str {
        match self {
            NodeRole::Ground => "ground",
            NodeRole::Foliage => "foliage",
            NodeRole::Weather => "weather",
        }
    }
}

// Sizing and placement constants. Instance and particle counts scale with
// the option values; everything else is fixed.
const GROUND_SPREAD: f32 = 4000.0;
const GROUND_BASE_SEGMENTS: f32 = 64.0;
const GROUND_MIN_SEGMENTS: u32 = 16;

const FOLIAGE_BASE_DENSITY: f32 = 250.0;
const FOLIAGE_MAX_INSTANCES: usize = 1200;
const FOLIAGE_BASE_SPREAD: f32 = 500.0;
const FOLIAGE_SCALE_MIN: f32 = 0.8;
const FOLIAGE_SCALE_MAX: f32 = 1.4;

const FOG_BASE_DENSITY: f32 = 0.0012;

const WEATHER_BASE_COUNT: f32 = 600.0;
const WEATHER_SPREAD: f32 = 1000.0;
const WEATHER_COLUMN_TOP: f32 = 440.0;
const WEATHER_PARTICLE_SIZE: f32 = 2.5;

/// Number of foliage instances for the given (already clamped) options.
fn foliage_instance_count(detail: f32, tree_density: f32) -> usize {
    let raw = (FOLIAGE_BASE_DENSITY * tree_density * detail).floor() as usize;
    raw.min(FOLIAGE_MAX_INSTANCES)
}

/// Number of weather particles for the given (already clamped) detail.
fn weather_particle_count(detail: f32) -> usize {
    (WEATHER_BASE_COUNT * detail).floor() as usize
}

fn ambient_color(mode: Mode, day_night: DayNight) -> Color {
    match (mode, day_night) {
        (Mode::Natural, DayNight::Day) => Color::rgb(0.53, 0.81, 0.92),
        (Mode::Natural, DayNight::Night) => Color::rgb(0.05, 0.07, 0.12),
        (Mode::Winter, DayNight::Day) => Color::rgb(0.82, 0.86, 0.90),
        (Mode::Winter, DayNight::Night) => Color::rgb(0.10, 0.12, 0.16),
    }
}

/// Builds and rebuilds the environment dressing of one scene.
///
/// Owns the shared material cache and the role→handle record of what it
/// built last. The scene itself is borrowed per call and never owned.
#[derive(Debug, Default)]
pub struct EnvironmentBuilder {
    materials: MaterialCache,
    nodes: HashMap<NodeRole, NodeHandle>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn materials(&self) -> &MaterialCache {
        &self.materials
    }

    /// Handle of the environment node currently filling `role`, if any.
    pub fn node_handle(&self, role: NodeRole) -> Option<NodeHandle> {
        self.nodes.get(&role).copied()
    }

    /// Tear down any previously built environment objects and build ground,
    /// foliage, and (in winter) weather for the given mode and options.
    ///
    /// A missing scene makes this a logged no-op; a real-time session keeps
    /// running without its environment rather than aborting.
    pub fn apply(
        &mut self,
        scene: Option<&mut Scene>,
        mode: Mode,
        options: &EnvironmentOptions,
        rng: &mut impl Rng,
    ) {
        let Some(scene) = scene else {
            warn!("environment apply skipped: no scene attached");
            return;
        };

        self.materials.ensure();

        let options = options.clamped();

        for role in NodeRole::ALL {
            scene.remove_named(role.node_name());
        }
        self.nodes.clear();

        let color = ambient_color(mode, options.day_night);
        // Higher detail lowers fog density so the perceived draw distance
        // stays put while geometry gets finer.
        scene.background = Some(color);
        scene.fog = Some(Fog {
            color,
            density: FOG_BASE_DENSITY / options.detail,
        });

        self.build_ground(scene, mode, &options);
        self.build_foliage(scene, mode, &options, rng);
        if mode == Mode::Winter {
            self.build_weather(scene, &options, rng);
        }

        debug!(
            "environment applied: mode={:?} detail={} trees={} children={}",
            mode,
            options.detail,
            options.tree_density,
            scene.child_count()
        );
    }

    fn build_ground(&mut self, scene: &mut Scene, mode: Mode, options: &EnvironmentOptions) {
        let segments =
            ((GROUND_BASE_SEGMENTS * options.detail).floor() as u32).max(GROUND_MIN_SEGMENTS);
        let geometry = ground_plane(GROUND_SPREAD, segments);
        let material = match mode {
            Mode::Natural => MaterialKey::GroundNatural,
            Mode::Winter => MaterialKey::GroundSnow,
        };

        let handle = scene.insert_named(
            NodeRole::Ground.node_name(),
            Vertex3::zero(),
            NodeKind::Mesh {
                geometry,
                material: MaterialRef::Shared(material),
            },
        );
        self.nodes.insert(NodeRole::Ground, handle);
    }

    fn build_foliage(
        &mut self,
        scene: &mut Scene,
        mode: Mode,
        options: &EnvironmentOptions,
        rng: &mut impl Rng,
    ) {
        let count = foliage_instance_count(options.detail, options.tree_density);
        let spread = FOLIAGE_BASE_SPREAD * options.detail;

        let mut instances = Vec::with_capacity(count);
        for _ in 0..count {
            instances.push(InstanceTransform {
                position: Vertex3::new(
                    rng.gen_range(-spread..spread),
                    rng.gen_range(-spread..spread),
                    0.0,
                ),
                yaw: rng.gen_range(0.0..TAU),
                scale: rng.gen_range(FOLIAGE_SCALE_MIN..FOLIAGE_SCALE_MAX),
            });
        }

        let material = match mode {
            Mode::Natural => MaterialKey::FoliageNatural,
            Mode::Winter => MaterialKey::FoliageWinter,
        };

        let handle = scene.insert_named(
            NodeRole::Foliage.node_name(),
            Vertex3::zero(),
            NodeKind::Instanced {
                geometry: foliage_cone(),
                material: MaterialRef::Shared(material),
                instances,
            },
        );
        self.nodes.insert(NodeRole::Foliage, handle);
    }

    fn build_weather(
        &mut self,
        scene: &mut Scene,
        options: &EnvironmentOptions,
        rng: &mut impl Rng,
    ) {
        let count = weather_particle_count(options.detail);

        let mut positions = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(Vertex3::new(
                rng.gen_range(-WEATHER_SPREAD..WEATHER_SPREAD),
                rng.gen_range(-WEATHER_SPREAD..WEATHER_SPREAD),
                // Fill the whole fall column so the first winter frame is
                // already snowing at every height.
                rng.gen_range(0.0..WEATHER_COLUMN_TOP),
            ));
        }

        let handle = scene.insert_named(
            NodeRole::Weather.node_name(),
            Vertex3::zero(),
            NodeKind::Points {
                positions,
                material: PointsMaterial {
                    color: Color::rgb(1.0, 1.0, 1.0),
                    size: WEATHER_PARTICLE_SIZE,
                },
            },
        );
        self.nodes.insert(NodeRole::Weather, handle);
    }
}

/// Flat square plane centered on the origin, `segments` quads per side,
/// normals straight up.
fn ground_plane(spread: f32, segments: u32) -> MeshData {
    let side = segments + 1;
    let step = spread / segments as f32;
    let half = spread / 2.0;

    let mut mesh = MeshData::empty();
    mesh.vertices.reserve((side * side) as usize);

    for row in 0..side {
        for col in 0..side {
            mesh.vertices.push(Vertex3::new(
                -half + col as f32 * step,
                -half + row as f32 * step,
                0.0,
            ));
            mesh.normals.push(Normal3 {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            });
            mesh.uvs.push(UV {
                u: col as f32 / segments as f32,
                v: row as f32 / segments as f32,
            });
        }
    }

    for row in 0..segments {
        for col in 0..segments {
            let v0 = row * side + col;
            let v1 = v0 + 1;
            let v2 = v0 + side;
            let v3 = v2 + 1;

            mesh.indices.extend_from_slice(&[v0, v1, v2, v2, v1, v3]);
        }
    }

    mesh
}

/// Low-poly cone standing in for a tree; one geometry shared by every
/// instance in the batch.
fn foliage_cone() -> MeshData {
    const RADIAL_SEGMENTS: u32 = 6;
    const RADIUS: f32 = 4.0;
    const HEIGHT: f32 = 12.0;

    let mut mesh = MeshData::empty();

    // Apex, base center, then the base ring.
    mesh.vertices.push(Vertex3::new(0.0, 0.0, HEIGHT));
    mesh.uvs.push(UV { u: 0.5, v: 1.0 });
    mesh.vertices.push(Vertex3::new(0.0, 0.0, 0.0));
    mesh.uvs.push(UV { u: 0.5, v: 0.0 });

    for i in 0..RADIAL_SEGMENTS {
        let angle = i as f32 / RADIAL_SEGMENTS as f32 * TAU;
        mesh.vertices
            .push(Vertex3::new(RADIUS * angle.cos(), RADIUS * angle.sin(), 0.0));
        mesh.uvs.push(UV {
            u: i as f32 / RADIAL_SEGMENTS as f32,
            v: 0.0,
        });
    }

    for i in 0..RADIAL_SEGMENTS {
        let ring_a = 2 + i;
        let ring_b = 2 + (i + 1) % RADIAL_SEGMENTS;

        // Side face, then base face.
        mesh.indices.extend_from_slice(&[0, ring_a, ring_b]);
        mesh.indices.extend_from_slice(&[1, ring_b, ring_a]);
    }

    mesh.compute_smooth_normals();
    mesh
}
