//! Sectors
//!
//! A sector is an axis-aligned rectangle, the atomic unit of collision and
//! occupancy. Corners are named clockwise on screen from the top-left:
//!
//! ```text
//!   A = position ──────── D = position + (w, 0)
//!   │        north        │
//!   │ west           east │
//!   │        south        │
//!   B = position + (0, h) ─ C = position + (w, h)
//! ```
//!
//! Edge AB is west, BC south, CD east and DA north. World y grows
//! southward, so A has the smallest coordinates.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::entity::Entity;
use crate::game::ids::{DoorId, RoomId, SectorId};
use crate::game::wall::Wall;

// =============================================================================
// EDGES
// =============================================================================

/// One of the four sides of a sector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Edge {
    /// DA, smallest y
    North = 0,
    /// CD, largest x
    East = 1,
    /// BC, largest y
    South = 2,
    /// AB, smallest x
    West = 3,
}

impl Edge {
    /// All edges in `sides` order.
    pub const ALL: [Edge; 4] = [Edge::North, Edge::East, Edge::South, Edge::West];

    /// Index into `sides` and the link tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The edge a neighbor shares with us.
    #[inline]
    pub const fn opposite(self) -> Edge {
        match self {
            Edge::North => Edge::South,
            Edge::East => Edge::West,
            Edge::South => Edge::North,
            Edge::West => Edge::East,
        }
    }
}

// =============================================================================
// SECTOR
// =============================================================================

/// An axis-aligned rectangular map cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Arena handle
    pub id: SectorId,
    /// Declaration tag
    pub tag: String,
    /// Owning room
    pub room: RoomId,
    /// Corner A (top-left)
    pub position: Vec2,
    /// Width and height, both positive
    pub size: Vec2,
    /// Solid wall flags: north, east, south, west
    pub sides: [bool; 4],
    /// One wall per solid side
    pub walls: Vec<Wall>,
    /// Drop entities spawned at load
    pub drops: Vec<Entity>,
    links: [Option<SectorId>; 4],
    doors: [Option<DoorId>; 4],
}

impl Sector {
    /// Create an unlinked sector and build its walls.
    ///
    /// Walls wind so their normals point into the sector.
    pub fn new(
        id: SectorId,
        tag: impl Into<String>,
        room: RoomId,
        position: Vec2,
        size: Vec2,
        sides: [bool; 4],
    ) -> Self {
        let mut sector = Self {
            id,
            tag: tag.into(),
            room,
            position,
            size,
            sides,
            walls: Vec::new(),
            drops: Vec::new(),
            links: [None; 4],
            doors: [None; 4],
        };

        for edge in Edge::ALL {
            if sector.has_wall(edge) {
                let (a, b) = sector.edge_endpoints(edge);
                sector.walls.push(Wall::new(a, b, false));
            }
        }

        sector
    }

    /// Corner A.
    #[inline]
    pub fn pos_a(&self) -> Vec2 {
        self.position
    }

    /// Corner B.
    #[inline]
    pub fn pos_b(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y + self.size.y)
    }

    /// Corner C.
    #[inline]
    pub fn pos_c(&self) -> Vec2 {
        self.position + self.size
    }

    /// Corner D.
    #[inline]
    pub fn pos_d(&self) -> Vec2 {
        Vec2::new(self.position.x + self.size.x, self.position.y)
    }

    /// Corners in A, B, C, D order.
    pub fn corners(&self) -> [Vec2; 4] {
        [self.pos_a(), self.pos_b(), self.pos_c(), self.pos_d()]
    }

    /// Endpoints of an edge, wound so the wall normal faces inward.
    pub fn edge_endpoints(&self, edge: Edge) -> (Vec2, Vec2) {
        match edge {
            Edge::North => (self.pos_d(), self.pos_a()),
            Edge::East => (self.pos_c(), self.pos_d()),
            Edge::South => (self.pos_b(), self.pos_c()),
            Edge::West => (self.pos_a(), self.pos_b()),
        }
    }

    /// Whether a solid wall stands on `edge`.
    #[inline]
    pub fn has_wall(&self, edge: Edge) -> bool {
        self.sides[edge.index()]
    }

    /// Neighbor across `edge`, if linked.
    #[inline]
    pub fn neighbor(&self, edge: Edge) -> Option<SectorId> {
        self.links[edge.index()]
    }

    /// West neighbor (edge AB).
    #[inline]
    pub fn connects_ab(&self) -> Option<SectorId> {
        self.neighbor(Edge::West)
    }

    /// South neighbor (edge BC).
    #[inline]
    pub fn connects_bc(&self) -> Option<SectorId> {
        self.neighbor(Edge::South)
    }

    /// East neighbor (edge CD).
    #[inline]
    pub fn connects_cd(&self) -> Option<SectorId> {
        self.neighbor(Edge::East)
    }

    /// North neighbor (edge DA).
    #[inline]
    pub fn connects_da(&self) -> Option<SectorId> {
        self.neighbor(Edge::North)
    }

    /// Door covering an otherwise open, unlinked `edge`.
    #[inline]
    pub fn door_on(&self, edge: Edge) -> Option<DoorId> {
        self.doors[edge.index()]
    }

    pub(crate) fn link(&mut self, edge: Edge, other: SectorId) {
        self.links[edge.index()] = Some(other);
    }

    pub(crate) fn attach_door(&mut self, edge: Edge, door: DoorId) {
        self.doors[edge.index()] = Some(door);
    }

    /// Every edge has either a wall or a neighbor.
    pub fn is_connected(&self) -> bool {
        Edge::ALL
            .iter()
            .all(|&edge| self.has_wall(edge) || self.neighbor(edge).is_some())
    }

    /// Open edges with neither a neighbor nor a covering door.
    pub fn unresolved_edges(&self) -> Vec<Edge> {
        Edge::ALL
            .into_iter()
            .filter(|&edge| {
                !self.has_wall(edge) && self.neighbor(edge).is_none() && self.door_on(edge).is_none()
            })
            .collect()
    }

    /// Inclusive point-in-rectangle test.
    pub fn contains(&self, pos: Vec2) -> bool {
        let (a, c) = (self.pos_a(), self.pos_c());
        pos.x >= a.x && pos.x <= c.x && pos.y >= a.y && pos.y <= c.y
    }

    /// Sector occupying `pos` after a move from inside this one.
    ///
    /// Bounds are checked west, east, north, south; the first exceeded
    /// one decides. Returns `Some(self.id)` if still inside, and `None` when
    /// leaving across an edge with no linked neighbor.
    pub fn new_sector(&self, pos: Vec2) -> Option<SectorId> {
        let (a, c) = (self.pos_a(), self.pos_c());
        if pos.x < a.x {
            return self.neighbor(Edge::West);
        }
        if pos.x > c.x {
            return self.neighbor(Edge::East);
        }
        if pos.y < a.y {
            return self.neighbor(Edge::North);
        }
        if pos.y > c.y {
            return self.neighbor(Edge::South);
        }
        Some(self.id)
    }

    /// Axis-separated collision test for a body of radius `size` at the
    /// candidate position `pos`.
    ///
    /// Only the sign of each velocity component matters: the leading
    /// extent on that axis must cross the sector boundary and the
    /// boundary must be solid. Callers test one axis at a time so
    /// diagonal motion slides along walls.
    pub fn hit_wall(&self, pos: Vec2, size: f64, velocity: Vec2) -> bool {
        let (a, c) = (self.pos_a(), self.pos_c());

        if velocity.x < 0.0 {
            if pos.x - size < a.x && self.has_wall(Edge::West) {
                return true;
            }
        } else if velocity.x > 0.0 && pos.x + size > c.x && self.has_wall(Edge::East) {
            return true;
        }

        if velocity.y < 0.0 {
            if pos.y - size < a.y && self.has_wall(Edge::North) {
                return true;
            }
        } else if velocity.y > 0.0 && pos.y + size > c.y && self.has_wall(Edge::South) {
            return true;
        }

        false
    }

    /// Spawn at most one drop at a uniformly random point inside.
    pub fn spawn_drops(&mut self, rng: &mut DeterministicRng, spawn_rate: f64) {
        if rng.chance(spawn_rate) {
            let x = self.position.x + rng.next_f64_range(0.0, self.size.x);
            let y = self.position.y + rng.next_f64_range(0.0, self.size.y);
            self.drops.push(Entity::drop_at(Vec2::new(x, y)));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 0;
    const E: usize = 1;
    const S: usize = 2;
    const W: usize = 3;

    fn sector(sides: [bool; 4]) -> Sector {
        Sector::new(SectorId(0), "s0", RoomId(0), Vec2::new(0.0, 0.0), Vec2::new(32.0, 32.0), sides)
    }

    fn sides_with(solid: &[usize]) -> [bool; 4] {
        let mut sides = [false; 4];
        for &i in solid {
            sides[i] = true;
        }
        sides
    }

    #[test]
    fn test_corners() {
        let s = Sector::new(SectorId(0), "s", RoomId(0), Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), [true; 4]);
        assert_eq!(s.corners(), [
            Vec2::new(10.0, 20.0),
            Vec2::new(10.0, 60.0),
            Vec2::new(40.0, 60.0),
            Vec2::new(40.0, 20.0),
        ]);
    }

    #[test]
    fn test_walls_face_inward() {
        let s = sector([true; 4]);
        assert_eq!(s.walls.len(), 4);
        let center = Vec2::new(16.0, 16.0);
        for wall in &s.walls {
            assert!(wall.faces(center), "wall {:?} faces away", wall.line());
            assert!(!wall.backface_visible);
        }
    }

    #[test]
    fn test_walls_only_on_solid_sides() {
        let s = sector(sides_with(&[N, S]));
        assert_eq!(s.walls.len(), 2);
        assert!(s.walls.iter().all(|w| w.pos_a.y == w.pos_b.y));
    }

    #[test]
    fn test_hit_wall_blocks_solid_edges() {
        let s = sector([true; 4]);
        let size = 12.0;
        // West: candidate left extent 3 - 12 < 0
        assert!(s.hit_wall(Vec2::new(3.0, 16.0), size, Vec2::new(-5.0, 0.0)));
        // East
        assert!(s.hit_wall(Vec2::new(29.0, 16.0), size, Vec2::new(5.0, 0.0)));
        // North
        assert!(s.hit_wall(Vec2::new(16.0, 3.0), size, Vec2::new(0.0, -5.0)));
        // South
        assert!(s.hit_wall(Vec2::new(16.0, 29.0), size, Vec2::new(0.0, 5.0)));
        // Inside with clearance
        assert!(!s.hit_wall(Vec2::new(16.0, 16.0), size, Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn test_hit_wall_allows_open_edges() {
        let s = sector([false; 4]);
        let size = 12.0;
        assert!(!s.hit_wall(Vec2::new(3.0, 16.0), size, Vec2::new(-5.0, 0.0)));
        assert!(!s.hit_wall(Vec2::new(29.0, 16.0), size, Vec2::new(5.0, 0.0)));
        assert!(!s.hit_wall(Vec2::new(16.0, 3.0), size, Vec2::new(0.0, -5.0)));
        assert!(!s.hit_wall(Vec2::new(16.0, 29.0), size, Vec2::new(0.0, 5.0)));
    }

    #[test]
    fn test_hit_wall_only_leading_side() {
        // Solid west only: moving east near the west wall never collides
        let s = sector(sides_with(&[W]));
        assert!(!s.hit_wall(Vec2::new(3.0, 16.0), 12.0, Vec2::new(1.0, 0.0)));
        // Zero velocity never collides
        assert!(!s.hit_wall(Vec2::new(3.0, 3.0), 12.0, Vec2::ZERO));
    }

    #[test]
    fn test_new_sector_inside_and_neighbors() {
        let mut s = sector(sides_with(&[N, S]));
        s.link(Edge::West, SectorId(1));
        s.link(Edge::East, SectorId(2));

        assert_eq!(s.new_sector(Vec2::new(16.0, 16.0)), Some(SectorId(0)));
        // Boundary is inclusive
        assert_eq!(s.new_sector(Vec2::new(32.0, 16.0)), Some(SectorId(0)));
        assert_eq!(s.new_sector(Vec2::new(-0.5, 16.0)), Some(SectorId(1)));
        assert_eq!(s.new_sector(Vec2::new(32.5, 16.0)), Some(SectorId(2)));
        // No north neighbor
        assert_eq!(s.new_sector(Vec2::new(16.0, -1.0)), None);
    }

    #[test]
    fn test_new_sector_priority() {
        let mut s = sector([false; 4]);
        s.link(Edge::West, SectorId(1));
        s.link(Edge::East, SectorId(2));
        s.link(Edge::North, SectorId(3));
        s.link(Edge::South, SectorId(4));

        // West beats north and south
        assert_eq!(s.new_sector(Vec2::new(-1.0, -1.0)), Some(SectorId(1)));
        assert_eq!(s.new_sector(Vec2::new(-1.0, 40.0)), Some(SectorId(1)));
        // East beats north and south
        assert_eq!(s.new_sector(Vec2::new(33.0, -1.0)), Some(SectorId(2)));
        assert_eq!(s.new_sector(Vec2::new(33.0, 40.0)), Some(SectorId(2)));
        // North beats south (only reachable with a degenerate y)
        assert_eq!(s.new_sector(Vec2::new(16.0, -1.0)), Some(SectorId(3)));
        assert_eq!(s.new_sector(Vec2::new(16.0, 33.0)), Some(SectorId(4)));
    }

    #[test]
    fn test_is_connected() {
        let mut s = sector(sides_with(&[N, E, S]));
        assert!(!s.is_connected());
        assert_eq!(s.unresolved_edges(), vec![Edge::West]);

        s.link(Edge::West, SectorId(9));
        assert!(s.is_connected());
        assert!(s.unresolved_edges().is_empty());
    }

    #[test]
    fn test_door_resolves_edge_but_not_connectivity() {
        let mut s = sector(sides_with(&[N, E, S]));
        s.attach_door(Edge::West, DoorId(0));
        assert!(s.unresolved_edges().is_empty());
        assert!(!s.is_connected());
        assert_eq!(s.door_on(Edge::West), Some(DoorId(0)));
    }

    #[test]
    fn test_contains_inclusive() {
        let s = sector([true; 4]);
        assert!(s.contains(Vec2::new(0.0, 0.0)));
        assert!(s.contains(Vec2::new(32.0, 32.0)));
        assert!(!s.contains(Vec2::new(32.1, 16.0)));
        assert!(!s.contains(Vec2::new(16.0, -0.1)));
    }

    #[test]
    fn test_spawn_drops_inside() {
        let mut rng = DeterministicRng::new(42);
        let mut s = sector([true; 4]);
        s.spawn_drops(&mut rng, 1.0);
        assert_eq!(s.drops.len(), 1);
        assert!(s.contains(s.drops[0].position()));

        let mut empty = sector([true; 4]);
        empty.spawn_drops(&mut rng, 0.0);
        assert!(empty.drops.is_empty());
    }

    #[test]
    fn test_edge_opposite() {
        for edge in Edge::ALL {
            assert_eq!(edge.opposite().opposite(), edge);
            assert_ne!(edge.opposite(), edge);
        }
    }
}
