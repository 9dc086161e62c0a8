//! World State
//!
//! The world owns every room, sector and door in flat arenas, plus the
//! single player and the active-room working set.
//!
//! ## Connectivity
//!
//! Sectors carry no explicit neighbor data in the map. As each sector is
//! added, [`WorldBuilder`] matches its corners against every sector that
//! still has open, unlinked edges. Two shared corners identify a shared
//! edge, and the pair is linked symmetrically when both sides leave that
//! edge open. Because matching is purely geometric, the final adjacency
//! graph does not depend on declaration order.

use tracing::{debug, info, warn};

use crate::core::geometry::near_point;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::door::{Door, DoorChange};
use crate::game::entity::Player;
use crate::game::events::{WorldEvent, WorldEventData};
use crate::game::ids::{DoorId, RoomId, SectorId};
use crate::game::map::{MapConfig, MapError};
use crate::game::room::Room;
use crate::game::sector::{Edge, Sector};

// =============================================================================
// INTEGRITY
// =============================================================================

/// A sector left with open edges that lead nowhere.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectivityIssue {
    /// Offending sector
    pub sector: SectorId,
    /// Its tag
    pub tag: String,
    /// Edges with no wall, neighbor or door
    pub edges: Vec<Edge>,
}

/// Where and how the player enters the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSpawn {
    /// World position
    pub position: Vec2,
    /// Heading in degrees
    pub direction: f64,
    /// Starting room
    pub room: RoomId,
}

// =============================================================================
// BUILDER
// =============================================================================

/// Incremental world construction used by the map loader.
pub struct WorldBuilder {
    rooms: Vec<Room>,
    sectors: Vec<Sector>,
    doors: Vec<Door>,
    unconnected: Vec<SectorId>,
    rng: DeterministicRng,
    spawn_rate: f64,
    strict: bool,
}

impl WorldBuilder {
    /// Start an empty world.
    pub fn new(config: &MapConfig) -> Self {
        Self {
            rooms: Vec::new(),
            sectors: Vec::new(),
            doors: Vec::new(),
            unconnected: Vec::new(),
            rng: DeterministicRng::new(config.drop_seed),
            spawn_rate: config.drop_spawn_rate,
            strict: config.strict_connectivity,
        }
    }

    /// Declare a room.
    pub fn add_room(&mut self, tag: &str) -> RoomId {
        let id = RoomId::from_index(self.rooms.len());
        self.rooms.push(Room::new(tag));
        id
    }

    /// Look up a room by tag.
    pub fn find_room(&self, tag: &str) -> Option<RoomId> {
        self.rooms
            .iter()
            .position(|room| room.tag == tag)
            .map(RoomId::from_index)
    }

    /// Add a sector, spawn its drops and link it to its neighbors.
    pub fn add_sector(
        &mut self,
        tag: &str,
        room: RoomId,
        position: Vec2,
        size: Vec2,
        sides: [bool; 4],
    ) -> SectorId {
        let id = SectorId::from_index(self.sectors.len());
        let mut sector = Sector::new(id, tag, room, position, size, sides);
        sector.spawn_drops(&mut self.rng, self.spawn_rate);

        self.sectors.push(sector);
        self.rooms[room.index()].add_sector(id);
        self.unconnected.push(id);
        self.connect_sector(id);
        id
    }

    /// Add a door between two rooms and register it with both.
    pub fn add_door(&mut self, tag: &str, pos_a: Vec2, pos_b: Vec2, room_lu: RoomId, room_rd: RoomId) -> DoorId {
        let id = DoorId::from_index(self.doors.len());
        self.doors.push(Door::new(tag, pos_a, pos_b, room_lu, room_rd));
        self.rooms[room_lu.index()].add_door(id);
        self.rooms[room_rd.index()].add_door(id);
        id
    }

    /// Sectors that still have an open, unlinked edge.
    pub fn unconnected(&self) -> &[SectorId] {
        &self.unconnected
    }

    /// Match the new sector's corners against every unconnected sector.
    fn connect_sector(&mut self, id: SectorId) {
        let [a, b, c, d] = self.sectors[id.index()].corners();

        for i in 0..self.unconnected.len() {
            let other = self.unconnected[i];
            if other == id {
                continue;
            }

            let mut has = [false; 4];
            for corner in self.sectors[other.index()].corners() {
                if near_point(a, corner) {
                    has[0] = true;
                } else if near_point(b, corner) {
                    has[1] = true;
                } else if near_point(c, corner) {
                    has[2] = true;
                } else if near_point(d, corner) {
                    has[3] = true;
                }
            }

            let edge = match has {
                [true, true, _, _] => Edge::West,
                [_, true, true, _] => Edge::South,
                [_, _, true, true] => Edge::East,
                [true, _, _, true] => Edge::North,
                _ => continue,
            };

            let open_here = !self.sectors[id.index()].has_wall(edge);
            let open_there = !self.sectors[other.index()].has_wall(edge.opposite());
            if open_here && open_there {
                self.sectors[id.index()].link(edge, other);
                self.sectors[other.index()].link(edge.opposite(), id);
            } else if open_here != open_there {
                debug!(
                    "shared edge between {} and {} is walled on one side only",
                    self.sectors[id.index()].tag,
                    self.sectors[other.index()].tag,
                );
            }
        }

        let sectors = &self.sectors;
        self.unconnected.retain(|s| !sectors[s.index()].is_connected());
    }

    /// Resolve leftover open edges against doors, place the player and
    /// produce the world.
    pub fn finish(mut self, spawn: PlayerSpawn) -> Result<World, MapError> {
        for &id in &self.unconnected {
            let sector = &mut self.sectors[id.index()];
            for edge in sector.unresolved_edges() {
                let (a, b) = sector.edge_endpoints(edge);
                if let Some(door) = self.doors.iter().position(|door| door.covers_edge(a, b)) {
                    sector.attach_door(edge, DoorId::from_index(door));
                }
            }
        }

        let issues: Vec<ConnectivityIssue> = self
            .unconnected
            .iter()
            .map(|&id| &self.sectors[id.index()])
            .filter_map(|sector| {
                let edges = sector.unresolved_edges();
                (!edges.is_empty()).then(|| ConnectivityIssue {
                    sector: sector.id,
                    tag: sector.tag.clone(),
                    edges,
                })
            })
            .collect();

        for issue in &issues {
            warn!("sector {} has open edges leading nowhere: {:?}", issue.tag, issue.edges);
        }
        if self.strict && !issues.is_empty() {
            return Err(MapError::UnconnectedSectors {
                tags: issues.iter().map(|issue| issue.tag.clone()).collect(),
            });
        }

        let room = &self.rooms[spawn.room.index()];
        let sector = room
            .sectors
            .iter()
            .copied()
            .find(|s| self.sectors[s.index()].contains(spawn.position))
            .ok_or_else(|| MapError::PlayerOutsideRoom {
                room: room.tag.clone(),
                x: spawn.position.x,
                y: spawn.position.y,
            })?;

        let player = Player::new(spawn.position, spawn.direction, spawn.room, sector);
        self.rooms[spawn.room.index()].activate();

        info!(
            "world loaded: {} rooms, {} sectors, {} doors",
            self.rooms.len(),
            self.sectors.len(),
            self.doors.len()
        );

        let mut world = World {
            rooms: self.rooms,
            sectors: self.sectors,
            doors: self.doors,
            player,
            active_rooms: Vec::new(),
            tick: 0,
            events: Vec::new(),
            issues,
        };
        world.refresh_active_rooms();
        Ok(world)
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// The root of the simulation.
#[derive(Clone, Debug)]
pub struct World {
    /// All rooms, in declaration order
    pub rooms: Vec<Room>,
    /// All sectors, in declaration order
    pub sectors: Vec<Sector>,
    /// All doors, in declaration order
    pub doors: Vec<Door>,
    /// The player
    pub player: Player,
    active_rooms: Vec<RoomId>,
    tick: u32,
    events: Vec<WorldEvent>,
    issues: Vec<ConnectivityIssue>,
}

impl World {
    /// Current tick number.
    #[inline]
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Advance the tick counter.
    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Rooms simulated and rendered this frame.
    #[inline]
    pub fn active_rooms(&self) -> &[RoomId] {
        &self.active_rooms
    }

    /// Integrity problems found at load.
    #[inline]
    pub fn issues(&self) -> &[ConnectivityIssue] {
        &self.issues
    }

    /// Sector by handle.
    #[inline]
    pub fn sector(&self, id: SectorId) -> &Sector {
        &self.sectors[id.index()]
    }

    /// Room by handle.
    #[inline]
    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.index()]
    }

    /// Door by handle.
    #[inline]
    pub fn door(&self, id: DoorId) -> &Door {
        &self.doors[id.index()]
    }

    /// Look up a room by tag.
    pub fn find_room(&self, tag: &str) -> Option<RoomId> {
        self.rooms
            .iter()
            .position(|room| room.tag == tag)
            .map(RoomId::from_index)
    }

    /// Look up a sector by tag.
    pub fn find_sector(&self, tag: &str) -> Option<SectorId> {
        self.sectors
            .iter()
            .position(|sector| sector.tag == tag)
            .map(SectorId::from_index)
    }

    /// First sector of `room` containing `pos`, by linear scan.
    pub fn locate_sector(&self, room: RoomId, pos: Vec2) -> Option<SectorId> {
        self.room(room)
            .sectors
            .iter()
            .copied()
            .find(|&id| self.sector(id).contains(pos))
    }

    /// Run every door of `room` against the player's position.
    pub fn update_room(&mut self, room: RoomId, door_radius: f64) {
        let player_pos = self.player.position();

        for i in 0..self.rooms[room.index()].doors.len() {
            let door_id = self.rooms[room.index()].doors[i];
            let door = &mut self.doors[door_id.index()];

            match door.update(player_pos, door_radius, &mut self.rooms) {
                Some(DoorChange::Opened) => {
                    debug!("door {} opened", door.tag);
                    let rooms = [door.room_lu, door.room_rd];
                    self.push_event(WorldEventData::DoorOpened { door: door_id, rooms });
                }
                Some(DoorChange::Closed { deactivated }) => {
                    debug!("door {} closed", door.tag);
                    self.push_event(WorldEventData::DoorClosed { door: door_id, deactivated });
                }
                None => {}
            }
        }
    }

    /// Advance door and room state, then rebuild the active-room set.
    ///
    /// Only rooms active at the end of the previous tick are updated. A
    /// room activated by a door this tick shows up in the new set (and is
    /// rendered this frame) but first receives updates next tick.
    pub fn update(&mut self, door_radius: f64) {
        for i in 0..self.active_rooms.len() {
            let room = self.active_rooms[i];
            self.update_room(room, door_radius);
        }
        self.refresh_active_rooms();
    }

    /// Recompute the active set as exactly the rooms flagged active.
    pub fn refresh_active_rooms(&mut self) {
        self.active_rooms = self
            .rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| room.active)
            .map(|(i, _)| RoomId::from_index(i))
            .collect();
    }

    /// Record an event for the current tick.
    pub fn push_event(&mut self, data: WorldEventData) {
        self.events.push(WorldEvent::new(self.tick, data));
    }

    /// Drain the events recorded so far.
    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hash of the mutable state: tick, player, door and room flags.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            hasher.update_vec2(self.player.position());
            hasher.update_f64(self.player.direction);
            hasher.update_u32(self.player.room.0);
            hasher.update_u32(self.player.sector.0);
            for door in &self.doors {
                hasher.update_bool(door.is_open);
            }
            for room in &self.rooms {
                hasher.update_bool(room.active);
            }
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
