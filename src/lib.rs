//! Procedural world and environment core for the OpenRoad driving scene.
//!
//! Builds terrain, a road path, vegetation, and weather particles for a
//! real-time 3D scene; tunes their density from named quality presets; and
//! keeps the scene consistent as the player advances and as presets or
//! environment modes change at runtime. The render shell owns the scene and
//! the frame loop — this crate owns what goes into the scene and how it
//! evolves per frame.

pub mod config;
pub mod environment;
pub mod error;
pub mod materials;
pub mod mesh;
pub mod presets;
pub mod procgen;
pub mod scene;
pub mod weather;
pub mod world;

pub use config::WorldConfig;
pub use environment::{DayNight, EnvironmentBuilder, EnvironmentOptions, Mode, NodeRole};
pub use error::WorldError;
pub use materials::{Material, MaterialCache, MaterialKey, PointsMaterial};
pub use mesh::{MeshData, Vertex3};
pub use presets::{Preset, DEFAULT_PRESET_NAME};
pub use scene::{Color, Fog, InstanceTransform, MaterialRef, NodeHandle, NodeKind, Scene, SceneNode, SceneStats};
pub use weather::WeatherSimulator;
pub use world::{WorldGenerator, ROAD_NODE, TERRAIN_NODE};
