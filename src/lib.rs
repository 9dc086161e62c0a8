//! # Sectorcast
//!
//! Sector-based pseudo-3D world model and projection core, in the style of
//! early raycasting engines.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SECTORCAST                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Stateless primitives                      │
//! │  ├── vec2.rs     - 2D point/vector                           │
//! │  ├── geometry.rs - Rotate, intersect, distances              │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - World model (deterministic)               │
//! │  ├── sector.rs   - Rectangular cells, collision              │
//! │  ├── door.rs     - Proximity doors between rooms             │
//! │  ├── world.rs    - Arenas, connectivity, room activation     │
//! │  ├── controller.rs - Player movement                         │
//! │  ├── map.rs      - Map text format                           │
//! │  └── tick.rs     - One simulation step, replay               │
//! │                                                              │
//! │  render/         - Projection pipeline                       │
//! │  ├── projection.rs - Camera space, clip, perspective         │
//! │  └── frame.rs    - First-person and top-down draw lists      │
//! │                                                              │
//! │  snapshot.rs     - Serializable per-frame view               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! The simulation is single-threaded and frame-stepped. Drop placement
//! comes from a seeded PRNG, so the same map, seed and input recording
//! always reach the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod render;
pub mod snapshot;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::rng::DeterministicRng;
pub use game::world::World;
pub use game::map::{load_world, load_world_file, MapConfig, MapError};
pub use game::input::{InputFrame, InputRecording, Key};
pub use game::tick::{tick, TickConfig};
pub use render::projection::Viewport;
pub use snapshot::FrameSnapshot;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
