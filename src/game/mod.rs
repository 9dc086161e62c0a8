//! Game Logic Module
//!
//! The spatial model, the world that owns it, and the per-tick simulation.
//!
//! ## Module Structure
//!
//! - `ids`: Arena handles for sectors, rooms and doors
//! - `entity`: Physical bodies and the player
//! - `wall` / `door` / `sector` / `room`: Static map topology
//! - `world`: Arenas, load-time connectivity, room activation
//! - `controller`: Player movement through the sector graph
//! - `map`: Map text format and loader
//! - `input`: Key state, recording and replay
//! - `events`: World events
//! - `tick`: One simulation step

pub mod ids;
pub mod entity;
pub mod wall;
pub mod door;
pub mod sector;
pub mod room;
pub mod world;
pub mod controller;
pub mod map;
pub mod input;
pub mod events;
pub mod tick;

// Re-export key types
pub use ids::{DoorId, RoomId, SectorId};
pub use entity::{Entity, Player};
pub use wall::Wall;
pub use door::Door;
pub use sector::{Edge, Sector};
pub use room::Room;
pub use world::{ConnectivityIssue, PlayerSpawn, World, WorldBuilder};
pub use map::{load_world, load_world_file, MapConfig, MapError};
pub use input::{InputFrame, InputRecording, Key, KeyState};
pub use events::{WorldEvent, WorldEventData};
pub use tick::{tick, TickConfig, TickResult};
