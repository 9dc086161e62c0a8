//! Frame Snapshot
//!
//! Read-only view of everything a presentation layer needs for one
//! frame: the active rooms with their geometry and entities, plus the
//! player. Serializable so external renderers can consume it as JSON.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::entity::Entity;
use crate::game::wall::Wall;
use crate::game::world::World;

/// The player as seen by a renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// World position
    pub position: Vec2,
    /// Heading in degrees
    pub direction: f64,
    /// Nominal speed
    pub speed: f64,
    /// Camera elevation
    pub eye_z: f64,
    /// Current sector tag
    pub sector: String,
    /// Current room tag
    pub room: String,
}

/// A door's renderable state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoorSnapshot {
    /// Declaration tag
    pub tag: String,
    /// Renderable segment
    pub wall: Wall,
    /// Open state
    pub is_open: bool,
}

/// A sector's geometry and entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorSnapshot {
    /// Declaration tag
    pub tag: String,
    /// Corners A, B, C, D
    pub corners: [Vec2; 4],
    /// Solid walls
    pub walls: Vec<Wall>,
    /// Drop entities
    pub entities: Vec<Entity>,
}

/// An active room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// Declaration tag
    pub tag: String,
    /// Owned sectors
    pub sectors: Vec<SectorSnapshot>,
    /// Touching doors
    pub doors: Vec<DoorSnapshot>,
}

/// Everything drawn in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Tick the snapshot was taken after
    pub tick: u32,
    /// The player
    pub player: PlayerSnapshot,
    /// Rooms in the active set, in order
    pub active_rooms: Vec<RoomSnapshot>,
}

impl FrameSnapshot {
    /// Capture the current state of `world`.
    pub fn capture(world: &World) -> Self {
        let player = &world.player;

        let active_rooms = world
            .active_rooms()
            .iter()
            .map(|&id| {
                let room = world.room(id);
                RoomSnapshot {
                    tag: room.tag.clone(),
                    sectors: room
                        .sectors
                        .iter()
                        .map(|&s| {
                            let sector = world.sector(s);
                            SectorSnapshot {
                                tag: sector.tag.clone(),
                                corners: sector.corners(),
                                walls: sector.walls.clone(),
                                entities: sector.drops.clone(),
                            }
                        })
                        .collect(),
                    doors: room
                        .doors
                        .iter()
                        .map(|&d| {
                            let door = world.door(d);
                            DoorSnapshot {
                                tag: door.tag.clone(),
                                wall: door.wall.clone(),
                                is_open: door.is_open,
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            tick: world.tick(),
            player: PlayerSnapshot {
                position: player.position(),
                direction: player.direction,
                speed: player.speed,
                eye_z: player.eye_z(),
                sector: world.sector(player.sector).tag.clone(),
                room: world.room(player.room).tag.clone(),
            },
            active_rooms,
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl World {
    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::map::{load_world, MapConfig};

    const DEMO: &str = include_str!("../maps/demo.map");

    #[test]
    fn test_snapshot_of_demo() {
        let world = load_world(DEMO, &MapConfig::default()).unwrap();
        let snap = world.snapshot();

        assert_eq!(snap.tick, 0);
        assert_eq!(snap.player.sector, "s_h1");
        assert_eq!(snap.player.room, "r_hall");
        assert_eq!(snap.player.eye_z, 30.0);
        assert_eq!(snap.player.speed, 2.0);

        assert_eq!(snap.active_rooms.len(), 1);
        let hall = &snap.active_rooms[0];
        assert_eq!(hall.tag, "r_hall");
        assert_eq!(hall.sectors.len(), 3);
        assert_eq!(hall.doors.len(), 2);
        assert!(hall.doors.iter().all(|d| !d.is_open && d.wall.backface_visible));
        assert_eq!(hall.sectors[0].corners[0], Vec2::new(0.0, 1280.0));
        assert_eq!(hall.sectors[0].walls.len(), 3);
        assert_eq!(hall.sectors[0].entities.len(), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        // No drops: every coordinate is exactly representable in JSON
        let config = MapConfig { drop_spawn_rate: 0.0, ..MapConfig::default() };
        let world = load_world(DEMO, &config).unwrap();
        let snap = world.snapshot();
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"r_hall\""));
        assert_eq!(FrameSnapshot::from_json(&json).unwrap(), snap);
    }
}
