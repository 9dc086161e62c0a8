//! Draw Lists
//!
//! Builds backend-agnostic draw commands for the two views of a world:
//! the first-person projection and the top-down map. Only the active
//! rooms are drawn. A door shared by two active rooms is emitted once.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::entity::Entity;
use crate::game::ids::{DoorId, SectorId};
use crate::game::wall::Wall;
use crate::game::world::World;
use crate::render::model::{Color, Material};
use crate::render::projection::{view_to_screen, view_to_screen_simple, Camera, ScreenPoint, Viewport};

/// Crosshair half length in pixels.
pub const CROSSHAIR_SIZE: i32 = 8;

/// Radius of the player marker on the map.
pub const PLAYER_MARKER_RADIUS: i32 = 6;

/// One primitive for the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Closed outline through every point, last joined to first
    Outline {
        /// Vertices in order
        points: Vec<ScreenPoint>,
        /// Stroke color
        color: Color,
    },
    /// Single line
    Line {
        /// Start
        a: ScreenPoint,
        /// End
        b: ScreenPoint,
        /// Stroke color
        color: Color,
    },
    /// Filled circle
    Disc {
        /// Centre
        center: ScreenPoint,
        /// Radius in pixels
        radius: i32,
        /// Fill color
        color: Color,
    },
}

/// Draw commands for one view, back to front in submission order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Commands in drawing order
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Number of commands with the given color.
    pub fn count_color(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| match c {
                DrawCommand::Outline { color: c, .. }
                | DrawCommand::Line { color: c, .. }
                | DrawCommand::Disc { color: c, .. } => *c == color,
            })
            .count()
    }
}

fn door_color(is_open: bool) -> Color {
    if is_open {
        Color::Cyan
    } else {
        Color::Yellow
    }
}

/// Hand the sectors and doors of each active room to `on_room`.
fn visit_active(
    world: &World,
    mut on_room: impl FnMut(&[SectorId], &[DoorId]),
) {
    for &room in world.active_rooms() {
        let room = world.room(room);
        on_room(&room.sectors, &room.doors);
    }
}

// =============================================================================
// FIRST PERSON
// =============================================================================

/// Project the active rooms from the player's eyes.
pub fn first_person(world: &World, viewport: &Viewport) -> Frame {
    let camera = Camera::from_player(&world.player);
    let mut frame = Frame::default();
    let mut drawn_doors: Vec<DoorId> = Vec::new();

    visit_active(world, |sectors, doors| {
        for &id in sectors {
            for wall in &world.sector(id).walls {
                draw_wall(&mut frame, wall, Color::Green, &camera, viewport);
            }
        }

        for &id in doors {
            if drawn_doors.contains(&id) {
                continue;
            }
            drawn_doors.push(id);
            let door = world.door(id);
            draw_wall(&mut frame, &door.wall, door_color(door.is_open), &camera, viewport);
        }

        for &id in sectors {
            for drop in &world.sector(id).drops {
                draw_entity(&mut frame, drop, &camera, viewport);
            }
        }
    });

    let c = viewport.center();
    let (cx, cy) = (c.x as i32, c.y as i32);
    frame.push(DrawCommand::Line {
        a: ScreenPoint::new(cx - CROSSHAIR_SIZE, cy),
        b: ScreenPoint::new(cx + CROSSHAIR_SIZE, cy),
        color: Color::White,
    });
    frame.push(DrawCommand::Line {
        a: ScreenPoint::new(cx, cy - CROSSHAIR_SIZE),
        b: ScreenPoint::new(cx, cy + CROSSHAIR_SIZE),
        color: Color::White,
    });

    frame
}

fn draw_wall(frame: &mut Frame, wall: &Wall, color: Color, camera: &Camera, viewport: &Viewport) {
    if !wall.faces(camera.position) {
        return;
    }

    let a = camera.to_view(wall.pos_a);
    let b = camera.to_view(wall.pos_b);
    if let Some(quad) = view_to_screen(a, b, wall.z, wall.top(), camera.eye_z, viewport) {
        frame.push(DrawCommand::Outline { points: quad.to_vec(), color });
    }
}

/// Draw the drake model at an entity, scaled by half its size.
///
/// Segments behind the camera are skipped one at a time.
fn draw_entity(frame: &mut Frame, entity: &Entity, camera: &Camera, viewport: &Viewport) {
    let pos = camera.to_view(entity.position());
    let s = entity.size() / 2.0;
    let base = entity.bottom();

    for material in Material::ALL {
        let mut outline = Vec::new();

        for &((ax, ay, az), (bx, by, bz)) in material.segments() {
            let a = Vec2::new(s * ax + pos.x, s * ay + pos.y);
            let b = Vec2::new(s * bx + pos.x, s * by + pos.y);
            let Some([pa, pb]) = view_to_screen_simple(a, b, base + s * az, base + s * bz, camera.eye_z, viewport)
            else {
                continue;
            };

            if material.single_outline() {
                outline.push(pa);
                outline.push(pb);
            } else {
                frame.push(DrawCommand::Line { a: pa, b: pb, color: material.color() });
            }
        }

        if !outline.is_empty() {
            frame.push(DrawCommand::Outline { points: outline, color: material.color() });
        }
    }
}

// =============================================================================
// TOP DOWN
// =============================================================================

/// Rotate the active rooms around the player, heading up, unprojected.
pub fn top_down(world: &World, viewport: &Viewport) -> Frame {
    let camera = Camera::from_player(&world.player);
    let mut frame = Frame::default();
    let mut drawn_doors: Vec<DoorId> = Vec::new();
    let to_screen = |p: Vec2| viewport.offset(camera.to_view(p));

    visit_active(world, |sectors, doors| {
        for &id in sectors {
            let color = if id == world.player.sector { Color::Red } else { Color::Green };
            for wall in &world.sector(id).walls {
                frame.push(DrawCommand::Line { a: to_screen(wall.pos_a), b: to_screen(wall.pos_b), color });
            }
        }

        for &id in doors {
            if drawn_doors.contains(&id) {
                continue;
            }
            drawn_doors.push(id);
            let door = world.door(id);
            frame.push(DrawCommand::Line {
                a: to_screen(door.pos_a()),
                b: to_screen(door.pos_b()),
                color: door_color(door.is_open),
            });
        }

        for &id in sectors {
            for drop in &world.sector(id).drops {
                frame.push(DrawCommand::Disc {
                    center: to_screen(drop.position()),
                    radius: (drop.size() / 2.0) as i32,
                    color: Color::Yellow,
                });
            }
        }
    });

    frame.push(DrawCommand::Disc {
        center: viewport.offset(Vec2::ZERO),
        radius: PLAYER_MARKER_RADIUS,
        color: Color::Red,
    });

    frame
}
