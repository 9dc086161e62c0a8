//! Doors
//!
//! A door is a double-sided wall with the door capability attached: two
//! adjoining rooms and an open/closed state driven by player proximity.
//!
//! ## Room sides
//!
//! The door's axis picks the discriminating coordinate. A horizontal door
//! compares y, a vertical one compares x. Points below `pos_a` on that
//! coordinate belong to `room_lu` ("left/up"), the rest to `room_rd`
//! ("right/down").

use serde::{Serialize, Deserialize};

use crate::core::geometry::{manhattan_distance, near};
use crate::core::vec2::Vec2;
use crate::game::ids::RoomId;
use crate::game::room::Room;
use crate::game::wall::{Axis, Wall};

/// Manhattan radius around a door's midpoint that opens it.
pub const DOOR_TRIGGER_RADIUS: f64 = 32.0;

/// State change produced by [`Door::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorChange {
    /// The door opened; both adjoining rooms are now active.
    Opened,
    /// The door closed and deactivated the given room.
    Closed {
        /// Room on the far side of the player
        deactivated: RoomId,
    },
}

/// A door between two rooms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Door {
    /// Declaration tag
    pub tag: String,
    /// Renderable segment (always backface visible)
    pub wall: Wall,
    /// Room on the low (left/up) side
    pub room_lu: RoomId,
    /// Room on the high (right/down) side
    pub room_rd: RoomId,
    /// Current state
    pub is_open: bool,
    /// Midpoint of the endpoints
    pub mid: Vec2,
}

impl Door {
    /// Create a closed door from A to B.
    pub fn new(tag: impl Into<String>, pos_a: Vec2, pos_b: Vec2, room_lu: RoomId, room_rd: RoomId) -> Self {
        Self {
            tag: tag.into(),
            wall: Wall::new(pos_a, pos_b, true),
            room_lu,
            room_rd,
            is_open: false,
            mid: pos_a.midpoint(pos_b),
        }
    }

    /// First endpoint.
    #[inline]
    pub fn pos_a(&self) -> Vec2 {
        self.wall.pos_a
    }

    /// Second endpoint.
    #[inline]
    pub fn pos_b(&self) -> Vec2 {
        self.wall.pos_b
    }

    /// True if `pos` is on the low side of the door's discriminating axis.
    fn on_low_side(&self, pos: Vec2) -> bool {
        match self.wall.axis() {
            Axis::Horizontal => pos.y < self.wall.pos_a.y,
            Axis::Vertical => pos.x < self.wall.pos_a.x,
        }
    }

    /// Room the point `pos` belongs to.
    pub fn get_room(&self, pos: Vec2) -> RoomId {
        if self.on_low_side(pos) {
            self.room_lu
        } else {
            self.room_rd
        }
    }

    /// Open the door, activating both adjoining rooms.
    pub fn open(&mut self, rooms: &mut [Room]) {
        rooms[self.room_lu.index()].activate();
        rooms[self.room_rd.index()].activate();
        self.is_open = true;
    }

    /// Close the door, deactivating the room the player is not in.
    ///
    /// Returns the deactivated room.
    pub fn close(&mut self, player_pos: Vec2, rooms: &mut [Room]) -> RoomId {
        self.is_open = false;
        let far_side = if self.on_low_side(player_pos) {
            self.room_rd
        } else {
            self.room_lu
        };
        rooms[far_side.index()].deactivate();
        far_side
    }

    /// Whether the player is inside the trigger diamond.
    #[inline]
    pub fn in_range(&self, player_pos: Vec2, radius: f64) -> bool {
        manhattan_distance(self.mid, player_pos) <= radius
    }

    /// Single-threshold open/close state machine.
    ///
    /// No hysteresis: a player hovering on the boundary can toggle the
    /// door every tick.
    pub fn update(&mut self, player_pos: Vec2, radius: f64, rooms: &mut [Room]) -> Option<DoorChange> {
        if self.in_range(player_pos, radius) {
            if !self.is_open {
                self.open(rooms);
                return Some(DoorChange::Opened);
            }
        } else if self.is_open {
            let deactivated = self.close(player_pos, rooms);
            return Some(DoorChange::Closed { deactivated });
        }
        None
    }

    /// Whether this door lies along the axis-aligned edge from `a` to `b`
    /// and overlaps it.
    pub fn covers_edge(&self, a: Vec2, b: Vec2) -> bool {
        let (da, db) = (self.wall.pos_a, self.wall.pos_b);
        if near(a.x, b.x) {
            // Vertical edge
            near(da.x, a.x) && near(db.x, a.x) && overlaps(da.y, db.y, a.y, b.y)
        } else if near(a.y, b.y) {
            near(da.y, a.y) && near(db.y, a.y) && overlaps(da.x, db.x, a.x, b.x)
        } else {
            false
        }
    }
}

/// Intervals `[p0, p1]` and `[q0, q1]` share more than a point.
fn overlaps(p0: f64, p1: f64, q0: f64, q1: f64) -> bool {
    let (p_lo, p_hi) = (p0.min(p1), p0.max(p1));
    let (q_lo, q_hi) = (q0.min(q1), q0.max(q1));
    p_lo.max(q_lo) < p_hi.min(q_hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rooms() -> Vec<Room> {
        vec![Room::new("r1"), Room::new("r2")]
    }

    fn vertical_door() -> Door {
        Door::new("d1", Vec2::new(0.0, 0.0), Vec2::new(0.0, 32.0), RoomId(0), RoomId(1))
    }

    #[test]
    fn test_door_is_double_sided() {
        let door = vertical_door();
        assert!(door.wall.backface_visible);
        assert_eq!(door.mid, Vec2::new(0.0, 16.0));
        assert!(!door.is_open);
    }

    #[test]
    fn test_get_room_vertical_door() {
        let door = vertical_door();
        assert_eq!(door.get_room(Vec2::new(-5.0, 16.0)), RoomId(0));
        assert_eq!(door.get_room(Vec2::new(5.0, 16.0)), RoomId(1));
    }

    #[test]
    fn test_get_room_horizontal_door() {
        let door = Door::new("d2", Vec2::new(64.0, 1408.0), Vec2::new(128.0, 1408.0), RoomId(0), RoomId(1));
        assert_eq!(door.wall.axis(), Axis::Horizontal);
        assert_eq!(door.get_room(Vec2::new(90.0, 1400.0)), RoomId(0));
        assert_eq!(door.get_room(Vec2::new(90.0, 1420.0)), RoomId(1));
    }

    #[test]
    fn test_open_activates_both_rooms() {
        let mut rooms = two_rooms();
        let mut door = vertical_door();
        door.open(&mut rooms);
        assert!(door.is_open);
        assert!(rooms[0].active && rooms[1].active);
    }

    #[test]
    fn test_close_deactivates_far_room() {
        let mut rooms = two_rooms();
        let mut door = vertical_door();

        door.open(&mut rooms);
        let gone = door.close(Vec2::new(-40.0, 16.0), &mut rooms);
        assert_eq!(gone, RoomId(1));
        assert!(rooms[0].active);
        assert!(!rooms[1].active);

        door.open(&mut rooms);
        let gone = door.close(Vec2::new(40.0, 16.0), &mut rooms);
        assert_eq!(gone, RoomId(0));
        assert!(!rooms[0].active);
        assert!(rooms[1].active);
    }

    #[test]
    fn test_update_threshold() {
        let mut rooms = two_rooms();
        let mut door = vertical_door();

        // Exactly on the diamond boundary counts as inside
        let edge = Vec2::new(-32.0, 16.0);
        assert_eq!(door.update(edge, DOOR_TRIGGER_RADIUS, &mut rooms), Some(DoorChange::Opened));
        assert_eq!(door.update(edge, DOOR_TRIGGER_RADIUS, &mut rooms), None);

        // Diagonal (20, 20) is ~28 Euclidean but 40 Manhattan: outside
        let diagonal = Vec2::new(-20.0, 36.0);
        assert_eq!(
            door.update(diagonal, DOOR_TRIGGER_RADIUS, &mut rooms),
            Some(DoorChange::Closed { deactivated: RoomId(1) })
        );
        assert!(!door.is_open);
        assert_eq!(door.update(diagonal, DOOR_TRIGGER_RADIUS, &mut rooms), None);
    }

    #[test]
    fn test_covers_edge() {
        let door = vertical_door();
        assert!(door.covers_edge(Vec2::new(0.0, 0.0), Vec2::new(0.0, 64.0)));
        assert!(door.covers_edge(Vec2::new(0.0, 64.0), Vec2::new(0.0, -64.0)));
        // Parallel but offset
        assert!(!door.covers_edge(Vec2::new(32.0, 0.0), Vec2::new(32.0, 64.0)));
        // Touching only at an endpoint
        assert!(!door.covers_edge(Vec2::new(0.0, 32.0), Vec2::new(0.0, 96.0)));
        // Perpendicular edge
        assert!(!door.covers_edge(Vec2::new(0.0, 0.0), Vec2::new(64.0, 0.0)));
    }
}
