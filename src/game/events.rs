//! World Events
//!
//! Events generated during a tick, collected by the world and handed out
//! with the tick result.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::ids::{DoorId, RoomId, SectorId};

/// World event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorldEventData {
    /// A door opened and activated both adjoining rooms
    DoorOpened {
        door: DoorId,
        rooms: [RoomId; 2],
    },

    /// A door closed and deactivated the room behind it
    DoorClosed {
        door: DoorId,
        deactivated: RoomId,
    },

    /// The player moved into another sector
    SectorChanged {
        from: SectorId,
        to: SectorId,
    },

    /// The player moved into another room
    RoomChanged {
        from: RoomId,
        to: RoomId,
    },

    /// The player stepped through a door edge with no sector link
    DoorCrossed {
        door: DoorId,
        room: RoomId,
    },

    /// A move left the sector where no neighbor or door could take it; the
    /// move was undone. `position` is the rejected target.
    PlayerStranded {
        sector: SectorId,
        position: Vec2,
    },
}

/// A world event with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: WorldEventData,
}

impl WorldEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: WorldEventData) -> Self {
        Self { tick, data }
    }
}
