//! World construction and per-frame tracking.
//!
//! A `WorldGenerator` is built once per session. Construction produces the
//! immutable road curve, the swept road surface, and the rough terrain
//! patch, then delegates one environment apply for the dressing. After that
//! the only per-frame work is sliding the terrain node under the player and
//! advancing the weather buffer — generation never runs again.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::environment::{DayNight, EnvironmentBuilder, EnvironmentOptions, Mode};
use crate::materials::{Material, MaterialKey};
use crate::mesh::Vertex3;
use crate::presets::Preset;
use crate::procgen::{generate_road_curve, generate_terrain, sweep_road_mesh, RoadCurve};
use crate::scene::{Color, MaterialRef, NodeHandle, NodeKind, Scene};
use crate::weather::WeatherSimulator;

pub const TERRAIN_NODE: &str = "terrain";
pub const ROAD_NODE: &str = "road";

fn road_material() -> Material {
    Material {
        color: Color::rgb(0.16, 0.16, 0.18),
        roughness: 0.7,
        flat_shading: false,
    }
}

/// Owns the static world geometry and the environment/weather subsystems.
#[derive(Debug)]
pub struct WorldGenerator {
    environment: EnvironmentBuilder,
    weather: WeatherSimulator,
    road: RoadCurve,
    terrain_handle: Option<NodeHandle>,
    road_handle: Option<NodeHandle>,
    rng: SmallRng,
}

impl WorldGenerator {
    /// Build the world into `scene` using the given preset and mode.
    ///
    /// `seed` fixes every random decision (terrain jitter, instance
    /// transforms, particle placement) for reproducible output; `None` seeds
    /// from entropy, which is the normal session behavior.
    ///
    /// A missing scene degrades the same way the environment does: the road
    /// curve and generator state still come up (so a scene attached later
    /// can be dressed), but nothing is inserted and a warning is logged.
    pub fn generate(
        mut scene: Option<&mut Scene>,
        preset: &Preset,
        mode: Mode,
        options: &EnvironmentOptions,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let road = generate_road_curve();

        let (terrain_handle, road_handle) = match scene.as_deref_mut() {
            Some(scene) => {
                let terrain = generate_terrain(&mut rng);
                let terrain_material = match mode {
                    Mode::Natural => MaterialKey::GroundNatural,
                    Mode::Winter => MaterialKey::GroundSnow,
                };
                let terrain_handle = scene.insert_named(
                    TERRAIN_NODE,
                    Vertex3::zero(),
                    NodeKind::Mesh {
                        geometry: terrain,
                        material: MaterialRef::Shared(terrain_material),
                    },
                );

                let road_mesh = sweep_road_mesh(&road);
                let road_handle = scene.insert_named(
                    ROAD_NODE,
                    Vertex3::zero(),
                    NodeKind::Mesh {
                        geometry: road_mesh,
                        material: MaterialRef::Owned(road_material()),
                    },
                );

                (Some(terrain_handle), Some(road_handle))
            }
            None => {
                warn!("world generation ran without a scene; geometry not inserted");
                (None, None)
            }
        };

        let mut environment = EnvironmentBuilder::new();
        environment.apply(scene.as_deref_mut(), mode, options, &mut rng);

        info!(
            "world generated: preset '{}', mode {:?}, road length {:.1}",
            preset.name,
            mode,
            road.total_length()
        );

        Self {
            environment,
            weather: WeatherSimulator::new(),
            road,
            terrain_handle,
            road_handle,
            rng,
        }
    }

    /// Convenience constructor deriving the environment options from the
    /// preset itself.
    pub fn generate_from_preset(
        scene: Option<&mut Scene>,
        preset: &Preset,
        mode: Mode,
        day_night: DayNight,
        seed: Option<u64>,
    ) -> Self {
        let options = EnvironmentOptions {
            detail: preset.detail_scale,
            tree_density: preset.tree_density,
            day_night,
        };
        Self::generate(scene, preset, mode, &options, seed)
    }

    /// Rebuild the environment dressing for a new mode or options, e.g.
    /// after a preset switch. Full teardown-then-build; the road and terrain
    /// stay untouched.
    pub fn apply_environment(
        &mut self,
        scene: Option<&mut Scene>,
        mode: Mode,
        options: &EnvironmentOptions,
    ) {
        self.environment.apply(scene, mode, options, &mut self.rng);
    }

    /// Per-frame update: re-center the terrain patch under the player and
    /// advance the weather. Never regenerates geometry.
    pub fn update(&mut self, scene: Option<&mut Scene>, player_pos: Vertex3, dt: f32) {
        let Some(scene) = scene else {
            warn!("world update skipped: no scene attached");
            return;
        };

        if let Some(terrain) = scene.get_named_mut(TERRAIN_NODE) {
            terrain.position.y = player_pos.y;
        }

        self.weather.advance(Some(scene), &mut self.rng, dt);
    }

    pub fn road(&self) -> &RoadCurve {
        &self.road
    }

    pub fn environment(&self) -> &EnvironmentBuilder {
        &self.environment
    }

    pub fn weather(&self) -> &WeatherSimulator {
        &self.weather
    }

    pub fn terrain_handle(&self) -> Option<NodeHandle> {
        self.terrain_handle
    }

    pub fn road_handle(&self) -> Option<NodeHandle> {
        self.road_handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medium() -> Preset {
        Preset::get("medium").unwrap()
    }

    #[test]
    fn generate_inserts_terrain_road_and_dressing() {
        let mut scene = Scene::new();
        let world = WorldGenerator::generate_from_preset(
            Some(&mut scene),
            &medium(),
            Mode::Natural,
            DayNight::Day,
            Some(5),
        );

        assert!(scene.get_named(TERRAIN_NODE).is_some());
        assert!(scene.get_named(ROAD_NODE).is_some());
        assert!(scene.get_named("ground").is_some());
        assert!(scene.get_named("foliage").is_some());
        assert!(world.road().points.len() > 2);
    }

    #[test]
    fn update_tracks_player_without_regenerating() {
        let mut scene = Scene::new();
        let mut world = WorldGenerator::generate_from_preset(
            Some(&mut scene),
            &medium(),
            Mode::Winter,
            DayNight::Day,
            Some(5),
        );

        let terrain_before = world.terrain_handle().unwrap();
        let road_before = world.road_handle().unwrap();

        let mut y = 0.0;
        for frame in 0..60 {
            y = frame as f32 * 3.0;
            world.update(Some(&mut scene), Vertex3::new(0.0, y, 0.0), 1.0 / 60.0);
        }

        let terrain = scene.get_named(TERRAIN_NODE).unwrap();
        assert_eq!(terrain.position.y, y);
        assert_eq!(terrain.handle, terrain_before);
        assert_eq!(scene.get_named(ROAD_NODE).unwrap().handle, road_before);
    }

    #[test]
    fn environment_rebuild_leaves_world_geometry_alone() {
        let mut scene = Scene::new();
        let mut world = WorldGenerator::generate_from_preset(
            Some(&mut scene),
            &medium(),
            Mode::Natural,
            DayNight::Day,
            Some(5),
        );

        let terrain_handle = scene.get_named(TERRAIN_NODE).unwrap().handle;
        let foliage_handle = scene.get_named("foliage").unwrap().handle;

        world.apply_environment(
            Some(&mut scene),
            Mode::Winter,
            &EnvironmentOptions::default(),
        );

        // Environment nodes are rebuilt wholesale, world geometry is not.
        assert_eq!(scene.get_named(TERRAIN_NODE).unwrap().handle, terrain_handle);
        assert_ne!(scene.get_named("foliage").unwrap().handle, foliage_handle);
        assert!(scene.get_named("weather").is_some());
    }

    #[test]
    fn generate_without_scene_degrades_quietly() {
        let world = WorldGenerator::generate_from_preset(
            None,
            &medium(),
            Mode::Natural,
            DayNight::Day,
            Some(5),
        );

        assert!(world.terrain_handle().is_none());
        assert!(world.road_handle().is_none());
        // The road data still exists for a later attach.
        assert!(world.road().total_length() > 0.0);
    }

    #[test]
    fn seeded_worlds_are_reproducible() {
        let mut scene_a = Scene::new();
        let mut scene_b = Scene::new();

        WorldGenerator::generate_from_preset(
            Some(&mut scene_a),
            &medium(),
            Mode::Natural,
            DayNight::Day,
            Some(99),
        );
        WorldGenerator::generate_from_preset(
            Some(&mut scene_b),
            &medium(),
            Mode::Natural,
            DayNight::Day,
            Some(99),
        );

        let NodeKind::Instanced { instances: a, .. } =
            &scene_a.get_named("foliage").unwrap().kind
        else {
            panic!("foliage node is not instanced");
        };
        let NodeKind::Instanced { instances: b, .. } =
            &scene_b.get_named("foliage").unwrap().kind
        else {
            panic!("foliage node is not instanced");
        };
        assert_eq!(a, b);
    }
}
