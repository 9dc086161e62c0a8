//! Core primitives.
//!
//! Stateless geometry plus the deterministic helpers (RNG, state hash)
//! the simulation is built on.

pub mod vec2;
pub mod geometry;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec2::Vec2;
pub use geometry::{Segment, manhattan_distance, near, rotate, translate, line_intersect};
pub use rng::DeterministicRng;
pub use hash::{StateHash, StateHasher, compute_state_hash};
