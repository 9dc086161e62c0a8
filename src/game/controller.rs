//! Player Movement
//!
//! Moves the player through the sector graph. Collision is resolved one
//! axis at a time against the current sector's solid sides, then the
//! player's sector (and room) is re-derived from the new position.
//!
//! ## Leaving a sector
//!
//! Crossing an edge with a linked neighbor simply follows the link. An
//! open edge with no neighbor is expected to sit under a door; the door in
//! range decides the room on the far side and the sector is found by scan.
//! If no door claims the crossing the move is undone, so the player stays
//! inside its old sector, and a `PlayerStranded` event is raised.

use tracing::warn;

use crate::core::vec2::Vec2;
use crate::game::events::WorldEventData;
use crate::game::ids::{RoomId, SectorId};
use crate::game::world::World;

/// Move the player by `(dx, dy)`, sliding along solid walls.
///
/// Returns the displacement actually applied. A step off an open edge
/// that no neighbor or door resolves applies nothing.
pub fn move_player(world: &mut World, dx: f64, dy: f64, door_radius: f64) -> Vec2 {
    let sector = world.sector(world.player.sector);
    let size = world.player.body.size();
    let start = world.player.position();
    let mut pos = start;

    // X axis first, then Y from the updated X
    let step_x = Vec2::new(pos.x + dx, pos.y);
    if !sector.hit_wall(step_x, size, Vec2::new(dx, 0.0)) {
        pos = step_x;
    }
    let step_y = Vec2::new(pos.x, pos.y + dy);
    if !sector.hit_wall(step_y, size, Vec2::new(0.0, dy)) {
        pos = step_y;
    }

    let next = sector.new_sector(pos);
    world.player.body.set_position(pos);

    match next {
        Some(next) => enter_sector(world, next),
        None => {
            if !cross_door(world, door_radius) {
                world.player.body.set_position(start);
                return Vec2::ZERO;
            }
        }
    }

    pos - start
}

/// Walk `amount` along the current heading.
pub fn walk(world: &mut World, amount: f64, door_radius: f64) -> Vec2 {
    let step = world.player.heading_step(amount);
    move_player(world, step.x, step.y, door_radius)
}

/// Turn the player by `amount` degrees.
#[inline]
pub fn spin_player(world: &mut World, amount: f64) {
    world.player.spin(amount);
}

/// Force the player's room.
pub fn set_room(world: &mut World, room: RoomId) {
    let from = world.player.room;
    if from != room {
        world.player.room = room;
        world.push_event(WorldEventData::RoomChanged { from, to: room });
    }
}

/// Point the player at `next`, following it into its owning room.
fn enter_sector(world: &mut World, next: SectorId) {
    let from = world.player.sector;
    if next == from {
        return;
    }

    world.player.sector = next;
    world.push_event(WorldEventData::SectorChanged { from, to: next });

    let room = world.sector(next).room;
    set_room(world, room);
}

/// Resolve a step through an open, unlinked edge via a door in range.
///
/// Returns false when no door claims the crossing.
fn cross_door(world: &mut World, door_radius: f64) -> bool {
    let pos = world.player.position();
    let current = world.player.room;

    let crossing = world
        .room(current)
        .doors
        .iter()
        .copied()
        .filter(|&door| world.door(door).in_range(pos, door_radius))
        .find_map(|door| {
            let room = world.door(door).get_room(pos);
            world.locate_sector(room, pos).map(|sector| (door, room, sector))
        });

    match crossing {
        Some((door, room, sector)) => {
            world.push_event(WorldEventData::DoorCrossed { door, room });
            set_room(world, room);
            enter_sector(world, sector);
            true
        }
        None => {
            let sector = world.player.sector;
            warn!(
                "player left {} at ({:.1}, {:.1}) with no neighbor or door",
                world.sector(sector).tag,
                pos.x,
                pos.y
            );
            world.push_event(WorldEventData::PlayerStranded { sector, position: pos });
            false
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::door::DOOR_TRIGGER_RADIUS;
    use crate::game::map::MapConfig;
    use crate::game::world::{PlayerSpawn, WorldBuilder};

    fn config() -> MapConfig {
        MapConfig {
            drop_spawn_rate: 0.0,
            ..MapConfig::default()
        }
    }

    /// A (0,0) open east, B (32,0) open west, both 32x32, one room.
    fn corridor() -> World {
        let mut builder = WorldBuilder::new(&config());
        let room = builder.add_room("r1");
        builder.add_sector("sA", room, Vec2::ZERO, Vec2::new(32.0, 32.0), [true, false, true, true]);
        builder.add_sector("sB", room, Vec2::new(32.0, 0.0), Vec2::new(32.0, 32.0), [true, true, true, false]);
        builder
            .finish(PlayerSpawn { position: Vec2::new(16.0, 16.0), direction: 0.0, room })
            .unwrap()
    }

    #[test]
    fn test_walk_into_neighbor() {
        let mut world = corridor();
        let b = world.find_sector("sB").unwrap();

        while world.player.position().x <= 32.0 {
            move_player(&mut world, 5.0, 0.0, DOOR_TRIGGER_RADIUS);
        }
        assert_eq!(world.player.sector, b);

        let events = world.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e.data, WorldEventData::SectorChanged { to, .. } if to == b)));
        // Same room: no room change
        assert!(!events.iter().any(|e| matches!(e.data, WorldEventData::RoomChanged { .. })));
    }

    #[test]
    fn test_solid_wall_blocks() {
        let mut world = corridor();
        // Pressing into the north wall: pos.y - size would go below 0
        let applied = move_player(&mut world, 0.0, -5.0, DOOR_TRIGGER_RADIUS);
        assert_eq!(applied, Vec2::ZERO);
        assert_eq!(world.player.position(), Vec2::new(16.0, 16.0));
    }

    #[test]
    fn test_diagonal_slides_along_wall() {
        let mut world = corridor();
        let applied = move_player(&mut world, 3.0, -5.0, DOOR_TRIGGER_RADIUS);
        assert_eq!(applied, Vec2::new(3.0, 0.0));
        assert_eq!(world.player.position(), Vec2::new(19.0, 16.0));
    }

    #[test]
    fn test_walk_follows_heading() {
        let mut world = corridor();
        world.player.direction = 0.0;
        walk(&mut world, 2.0, DOOR_TRIGGER_RADIUS);
        assert_eq!(world.player.position(), Vec2::new(18.0, 16.0));

        // Facing west moves toward -x
        spin_player(&mut world, 180.0);
        walk(&mut world, 2.0, DOOR_TRIGGER_RADIUS);
        let pos = world.player.position();
        assert!((pos.x - 16.0).abs() < 1e-9);
        assert!((pos.y - 16.0).abs() < 1e-9);
    }

    /// r1 sector at (0,0) 32x32 opens east onto a door; r2's sector is
    /// taller so the corners never match.
    fn door_world() -> World {
        let mut builder = WorldBuilder::new(&config());
        let r1 = builder.add_room("r1");
        let r2 = builder.add_room("r2");
        builder.add_sector("sA", r1, Vec2::ZERO, Vec2::new(32.0, 32.0), [true, false, true, true]);
        builder.add_sector("sB", r2, Vec2::new(32.0, -32.0), Vec2::new(64.0, 96.0), [true, true, true, false]);
        builder.add_door("d1", Vec2::new(32.0, 0.0), Vec2::new(32.0, 32.0), r1, r2);
        builder
            .finish(PlayerSpawn { position: Vec2::new(20.0, 16.0), direction: 0.0, room: r1 })
            .unwrap()
    }

    #[test]
    fn test_cross_door_switches_room() {
        let mut world = door_world();
        let r2 = world.find_room("r2").unwrap();
        let sb = world.find_sector("sB").unwrap();

        for _ in 0..5 {
            move_player(&mut world, 4.0, 0.0, DOOR_TRIGGER_RADIUS);
        }
        assert!(world.player.position().x > 32.0);
        assert_eq!(world.player.room, r2);
        assert_eq!(world.player.sector, sb);

        let events = world.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e.data, WorldEventData::DoorCrossed { room, .. } if room == r2)));
        assert!(events
            .iter()
            .any(|e| matches!(e.data, WorldEventData::RoomChanged { to, .. } if to == r2)));
    }

    #[test]
    fn test_stranded_without_door() {
        let mut builder = WorldBuilder::new(&config());
        let room = builder.add_room("r1");
        let a = builder.add_sector("sA", room, Vec2::ZERO, Vec2::new(32.0, 32.0), [true, false, true, true]);
        let mut world = builder
            .finish(PlayerSpawn { position: Vec2::new(28.0, 16.0), direction: 0.0, room })
            .unwrap();

        let applied = move_player(&mut world, 8.0, 0.0, DOOR_TRIGGER_RADIUS);
        assert_eq!(applied, Vec2::ZERO);
        assert_eq!(world.player.sector, a);
        assert_eq!(world.player.position(), Vec2::new(28.0, 16.0));
        let events = world.take_events();
        assert!(matches!(
            events[0].data,
            WorldEventData::PlayerStranded { sector, position } if sector == a && position == Vec2::new(36.0, 16.0)
        ));
    }

    #[test]
    fn test_stranded_player_stays_in_sector() {
        let mut builder = WorldBuilder::new(&config());
        let room = builder.add_room("r1");
        builder.add_sector("sA", room, Vec2::ZERO, Vec2::new(32.0, 32.0), [true, false, true, true]);
        let mut world = builder
            .finish(PlayerSpawn { position: Vec2::new(28.0, 16.0), direction: 0.0, room })
            .unwrap();

        for _ in 0..50 {
            move_player(&mut world, 8.0, 0.0, DOOR_TRIGGER_RADIUS);
            let pos = world.player.position();
            assert!(world.sector(world.player.sector).contains(pos), "left sector at {}", pos);
        }
        // Small steps still reach the edge
        move_player(&mut world, 3.0, 0.0, DOOR_TRIGGER_RADIUS);
        assert_eq!(world.player.position(), Vec2::new(31.0, 16.0));
    }

    #[test]
    fn test_set_room_only_emits_on_change() {
        let mut world = corridor();
        let room = world.player.room;
        set_room(&mut world, room);
        assert!(world.take_events().is_empty());
    }
}
