//! Rooms
//!
//! A room groups sectors and doors that are activated and simulated as a
//! unit. Per-tick door updates for a room are driven by
//! `World::update_room`, which owns the door and room arenas.

use serde::{Serialize, Deserialize};

use crate::game::ids::{DoorId, SectorId};

/// A named group of sectors and doors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Declaration tag (e.g. `r1`)
    pub tag: String,
    /// Sectors owned by this room
    pub sectors: Vec<SectorId>,
    /// Doors touching this room
    pub doors: Vec<DoorId>,
    /// Simulated and rendered this frame
    pub active: bool,
}

impl Room {
    /// Create an empty, inactive room.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            sectors: Vec::new(),
            doors: Vec::new(),
            active: false,
        }
    }

    /// Add a sector (ignored if already present).
    pub fn add_sector(&mut self, sector: SectorId) {
        if !self.sectors.contains(&sector) {
            self.sectors.push(sector);
        }
    }

    /// Add a door (ignored if already present).
    pub fn add_door(&mut self, door: DoorId) {
        if !self.doors.contains(&door) {
            self.doors.push(door);
        }
    }

    /// Mark active.
    #[inline]
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Mark inactive.
    #[inline]
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
