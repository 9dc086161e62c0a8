//! Rendering Module
//!
//! The projection pipeline and the draw lists built on it. Nothing here
//! touches a screen: output is a list of primitives in pixel coordinates
//! for whatever presentation layer consumes it.
//!
//! ## Module Structure
//!
//! - `projection`: World to camera space, near-plane clip, perspective divide
//! - `model`: Drake line model for drop entities
//! - `frame`: First-person and top-down draw lists

pub mod projection;
pub mod model;
pub mod frame;

// Re-export key types
pub use projection::{Camera, ScreenPoint, Viewport, world_to_view, clip_near_plane, view_to_screen, view_to_screen_simple};
pub use model::{Color, Material};
pub use frame::{DrawCommand, Frame, first_person, top_down};
