//! Simulation Tick
//!
//! One tick is a strict sequence: read input, turn and move the player
//! with collision, update doors of the rooms active at the end of the
//! previous tick, then recompute the active-room set. Everything is
//! single-threaded and deterministic, so a recorded input stream replays
//! to the same state hash.

#[cfg(feature = "debug-tracing")]
use tracing::debug;

use crate::game::controller::{spin_player, walk};
use crate::game::door::DOOR_TRIGGER_RADIUS;
use crate::game::events::WorldEvent;
use crate::game::input::{InputFrame, InputRecording, Key};
use crate::game::world::World;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<WorldEvent>,
}

/// Configuration for the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct TickConfig {
    /// Degrees turned per tick of turn input
    pub turn_speed: f64,
    /// Distance walked per tick of forward or backward input
    pub move_step: f64,
    /// Manhattan radius that opens a door
    pub door_radius: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            turn_speed: 1.0,
            move_step: 1.0,
            door_radius: DOOR_TRIGGER_RADIUS,
        }
    }
}

/// Run one simulation tick.
pub fn tick(world: &mut World, input: InputFrame, config: &TickConfig) -> TickResult {
    // 0. Advance tick counter
    world.advance_tick();

    // 1. Turn, then walk, in key order
    if input.is_down(Key::TurnLeft) {
        spin_player(world, config.turn_speed);
    }
    if input.is_down(Key::TurnRight) {
        spin_player(world, -config.turn_speed);
    }
    if input.is_down(Key::Forward) {
        walk(world, config.move_step, config.door_radius);
    }
    if input.is_down(Key::Backward) {
        walk(world, -config.move_step, config.door_radius);
    }

    // 2. Doors of last tick's active rooms, then the new active set
    world.update(config.door_radius);

    #[cfg(feature = "debug-tracing")]
    debug!(
        "tick {} player ({:.2}, {:.2}) dir {:.1} active {:?}",
        world.tick(),
        world.player.position().x,
        world.player.position().y,
        world.player.direction,
        world.active_rooms()
    );

    TickResult {
        events: world.take_events(),
    }
}

/// Replay a recording against a freshly loaded world.
///
/// Returns the final world and every event in order.
pub fn replay(
    initial: World,
    recording: &InputRecording,
    config: &TickConfig,
) -> (World, Vec<WorldEvent>) {
    let mut world = initial;
    let mut all_events = Vec::new();

    for (_, frame) in recording.replay_iter() {
        let result = tick(&mut world, frame, config);
        all_events.extend(result.events);
    }

    (world, all_events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::events::WorldEventData;
    use crate::game::map::{load_world, MapConfig};

    const DEMO: &str = include_str!("../../maps/demo.map");

    fn demo() -> World {
        load_world(DEMO, &MapConfig::default()).unwrap()
    }

    fn scripted(t: u32) -> InputFrame {
        match t % 120 {
            0..=79 => InputFrame::with_keys(&[Key::Forward]),
            80..=99 => InputFrame::with_keys(&[Key::TurnRight, Key::Forward]),
            _ => InputFrame::with_keys(&[Key::TurnLeft]),
        }
    }

    #[test]
    fn test_idle_tick_only_advances_counter() {
        let mut world = demo();
        let before = world.player.clone();
        let result = tick(&mut world, InputFrame::new(), &TickConfig::default());
        assert_eq!(world.tick(), 1);
        assert_eq!(world.player, before);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_turn_keys() {
        let mut world = demo();
        let config = TickConfig::default();
        tick(&mut world, InputFrame::with_keys(&[Key::TurnLeft]), &config);
        assert_eq!(world.player.direction, 1.0);
        tick(&mut world, InputFrame::with_keys(&[Key::TurnRight]), &config);
        tick(&mut world, InputFrame::with_keys(&[Key::TurnRight]), &config);
        assert_eq!(world.player.direction, 359.0);
        // Both cancel out
        tick(&mut world, InputFrame::with_keys(&[Key::TurnLeft, Key::TurnRight]), &config);
        assert_eq!(world.player.direction, 359.0);
    }

    #[test]
    fn test_forward_and_backward() {
        let mut world = demo();
        let config = TickConfig::default();
        let start = world.player.position();

        tick(&mut world, InputFrame::with_keys(&[Key::Forward]), &config);
        assert_eq!(world.player.position(), start + Vec2::new(1.0, 0.0));

        tick(&mut world, InputFrame::with_keys(&[Key::Backward]), &config);
        assert_eq!(world.player.position(), start);
    }

    #[test]
    fn test_walk_east_opens_vault() {
        let mut world = demo();
        let config = TickConfig::default();
        let vault = world.find_room("r_vault").unwrap();
        let forward = InputFrame::with_keys(&[Key::Forward]);

        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(tick(&mut world, forward, &config).events);
        }

        // Blocked by the vault's east wall at x = 192
        assert_eq!(world.player.position().x, 180.0);
        assert_eq!(world.player.room, vault);
        assert_eq!(world.player.sector, world.find_sector("s_v1").unwrap());
        assert!(world.active_rooms().contains(&vault));
        assert!(events.iter().any(|e| matches!(e.data, WorldEventData::DoorOpened { .. })));
        assert!(events.iter().any(|e| matches!(e.data, WorldEventData::RoomChanged { to, .. } if to == vault)));
    }

    #[test]
    fn test_newly_opened_room_renders_before_update() {
        let mut world = demo();
        let config = TickConfig::default();
        let hall = world.find_room("r_hall").unwrap();
        let vault = world.find_room("r_vault").unwrap();

        // d1 midpoint is (128, 1312); 32 Manhattan away is x = 96
        world.player.body.set_position(Vec2::new(95.0, 1312.0));
        world.player.sector = world.find_sector("s_h2").unwrap();
        let result = tick(&mut world, InputFrame::with_keys(&[Key::Forward]), &config);

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].tick, 1);
        assert_eq!(world.active_rooms(), &[hall, vault]);
    }

    #[test]
    fn test_replay_matches_live_run() {
        let config = TickConfig::default();
        let mut live = demo();
        let mut recording = InputRecording::new(MapConfig::default().drop_seed, live.tick());
        let mut live_events = Vec::new();

        for t in 0..600 {
            let frame = scripted(t);
            recording.record(live.tick(), frame);
            live_events.extend(tick(&mut live, frame, &config).events);
        }

        let (replayed, events) = replay(demo(), &recording, &config);
        assert_eq!(replayed.tick(), 600);
        assert_eq!(replayed.compute_hash(), live.compute_hash());
        assert_eq!(events, live_events);
    }

    #[test]
    fn test_different_inputs_diverge() {
        let config = TickConfig::default();
        let mut a = demo();
        let mut b = demo();
        for t in 0..60 {
            tick(&mut a, scripted(t), &config);
            tick(&mut b, InputFrame::new(), &config);
        }
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_move_step_sets_walk_distance() {
        let mut world = demo();
        let start = world.player.position();
        let config = TickConfig { move_step: 3.0, ..TickConfig::default() };
        tick(&mut world, InputFrame::with_keys(&[Key::Forward]), &config);
        assert_eq!(world.player.position(), start + Vec2::new(3.0, 0.0));

        // The player's nominal speed does not drive the tick
        world.player.speed = 10.0;
        tick(&mut world, InputFrame::with_keys(&[Key::Backward]), &TickConfig::default());
        assert_eq!(world.player.position(), start + Vec2::new(2.0, 0.0));
    }
}
