/// Procedural geometry for the world: the road path with its swept surface,
/// and the rough terrain patch that tracks the player.
pub mod road;
pub mod terrain;

pub use road::{generate_road_curve, sweep_road_mesh, RoadCurve, RoadPoint};
pub use terrain::{generate_terrain, TERRAIN_EXTENT};
