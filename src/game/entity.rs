//! Entities and the Player
//!
//! `Player` embeds an `Entity` rather than inheriting from it. The
//! entity carries the geometric body; the player adds heading, speed and
//! its current occupancy.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::ids::{RoomId, SectorId};

/// Player base elevation.
pub const PLAYER_Z: f64 = 0.0;
/// Player height; the camera sits at the top of it.
pub const PLAYER_HEIGHT: f64 = 30.0;
/// Player collision radius.
pub const PLAYER_SIZE: f64 = 12.0;
/// Default distance moved per tick.
pub const PLAYER_SPEED: f64 = 2.0;

/// Drop entity height.
pub const DROP_HEIGHT: f64 = 40.0;
/// Drop entity draw radius.
pub const DROP_SIZE: f64 = 12.0;

/// A positioned body with fixed height and size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    position: Vec2,
    z: f64,
    height: f64,
    size: f64,
}

impl Entity {
    /// Create an entity.
    pub fn new(position: Vec2, z: f64, height: f64, size: f64) -> Self {
        Self { position, z, height, size }
    }

    /// A drop spawned inside a sector at load time.
    pub fn drop_at(position: Vec2) -> Self {
        Self::new(position, 0.0, DROP_HEIGHT, DROP_SIZE)
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move to a new position.
    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Base elevation.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.z
    }

    /// Elevation of the top.
    #[inline]
    pub fn top(&self) -> f64 {
        self.z + self.height
    }

    /// Height above the base.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Collision / draw radius.
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }
}

/// The single player of a world.
///
/// `room` and `sector` are arena handles into the owning `World`. The
/// controller keeps them consistent: `sector` always belongs to `room`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Physical body
    pub body: Entity,
    /// Heading in degrees, [0, 360)
    pub direction: f64,
    /// Nominal speed reported to renderers; ticks walk `TickConfig::move_step`
    pub speed: f64,
    /// Room the player is in
    pub room: RoomId,
    /// Sector the player is in
    pub sector: SectorId,
}

impl Player {
    /// Create a player at `position`.
    pub fn new(position: Vec2, direction: f64, room: RoomId, sector: SectorId) -> Self {
        Self {
            body: Entity::new(position, PLAYER_Z, PLAYER_HEIGHT, PLAYER_SIZE),
            direction: direction.rem_euclid(360.0),
            speed: PLAYER_SPEED,
            room,
            sector,
        }
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    /// Camera elevation.
    #[inline]
    pub fn eye_z(&self) -> f64 {
        self.body.top()
    }

    /// Add `amount` degrees to the heading, wrapping into [0, 360).
    pub fn spin(&mut self, amount: f64) {
        self.direction = (self.direction + amount).rem_euclid(360.0);
    }

    /// Displacement of moving `amount` along the heading.
    ///
    /// Heading 0 faces +x; 90 faces −y (north).
    pub fn heading_step(&self, amount: f64) -> Vec2 {
        let (sin, cos) = self.direction.to_radians().sin_cos();
        Vec2::new(amount * cos, -amount * sin)
    }
}
