//! Map Loading
//!
//! Line-oriented map text format, one declaration per line. The first
//! character of the tag selects the kind; the full tag text names it.
//!
//! ```text
//! r_hall()                          room
//! s1(x, y, w, h, n, e, s, w, room)  sector, wall flags are 0/1
//! d1(xa, ya, xb, yb, lu, rd)        door between two rooms
//! p(x, y, direction, room)          player spawn
//! ```
//!
//! Coordinates are grid cells. A cell is 32 world units and y is flipped
//! around row 50, so `(x, y)` lands at `(32x, 32(50 - y))`. Blank lines and
//! lines with any other leading character are ignored.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::geometry::{near, near_point};
use crate::core::vec2::Vec2;
use crate::game::ids::RoomId;
use crate::game::world::{PlayerSpawn, World, WorldBuilder};

// =============================================================================
// CONFIG
// =============================================================================

/// Map loading configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
    /// World units per grid cell
    pub cell_size: f64,
    /// Grid row the y axis is flipped around
    pub flip_origin: f64,
    /// Probability that a sector spawns a drop
    pub drop_spawn_rate: f64,
    /// Seed for drop placement
    pub drop_seed: u64,
    /// Fail the load on open edges that lead nowhere
    pub strict_connectivity: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            cell_size: 32.0,
            flip_origin: 50.0,
            drop_spawn_rate: 1.0,
            drop_seed: 0x5EC7,
            strict_connectivity: false,
        }
    }
}

impl MapConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            drop_spawn_rate: std::env::var("SECTORCAST_SPAWN_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.drop_spawn_rate),
            drop_seed: std::env::var("SECTORCAST_SEED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.drop_seed),
            strict_connectivity: std::env::var("SECTORCAST_STRICT")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.strict_connectivity),
            ..defaults
        }
    }

    /// Grid cell to world position.
    pub fn grid_to_world(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(self.cell_size * x, self.cell_size * (self.flip_origin - y))
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Map loading errors.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Map file could not be read
    #[error("Failed to read map {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Declaration without a `(...)` parameter list
    #[error("Line {line}: malformed declaration `{text}`")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// Offending text
        text: String,
    },

    /// Wrong number of parameters
    #[error("Line {line}: `{tag}` takes {expected} parameters, got {found}")]
    ParamCount {
        /// 1-based line number
        line: usize,
        /// Declaration tag
        tag: String,
        /// Required count
        expected: usize,
        /// Actual count
        found: usize,
    },

    /// Parameter is not a finite number
    #[error("Line {line}: invalid number `{value}`")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// Offending parameter
        value: String,
    },

    /// Wall flag other than 0 or 1
    #[error("Line {line}: wall flag must be 0 or 1, got `{value}`")]
    InvalidFlag {
        /// 1-based line number
        line: usize,
        /// Offending parameter
        value: String,
    },

    /// Reference to a room not declared above
    #[error("Line {line}: unknown room `{room}`")]
    UnknownRoom {
        /// 1-based line number
        line: usize,
        /// Referenced tag
        room: String,
    },

    /// Room tag declared twice
    #[error("Line {line}: room `{room}` already declared")]
    DuplicateRoom {
        /// 1-based line number
        line: usize,
        /// Repeated tag
        room: String,
    },

    /// Sector with a non-positive width or height
    #[error("Line {line}: sector `{tag}` has non-positive size")]
    DegenerateSector {
        /// 1-based line number
        line: usize,
        /// Sector tag
        tag: String,
    },

    /// Door with coincident endpoints
    #[error("Line {line}: door `{tag}` has zero length")]
    DegenerateDoor {
        /// 1-based line number
        line: usize,
        /// Door tag
        tag: String,
    },

    /// Door that is neither horizontal nor vertical
    #[error("Line {line}: door `{tag}` is not axis-aligned")]
    SkewedDoor {
        /// 1-based line number
        line: usize,
        /// Door tag
        tag: String,
    },

    /// No `p(...)` line
    #[error("Map declares no player")]
    MissingPlayer,

    /// More than one `p(...)` line
    #[error("Line {line}: player already declared")]
    DuplicatePlayer {
        /// 1-based line number
        line: usize,
    },

    /// Spawn point not inside any sector of the spawn room
    #[error("Player spawn ({x}, {y}) is outside every sector of room `{room}`")]
    PlayerOutsideRoom {
        /// Spawn room tag
        room: String,
        /// World x
        x: f64,
        /// World y
        y: f64,
    },

    /// Open edges leading nowhere, in strict mode
    #[error("Unconnected sectors: {}", tags.join(", "))]
    UnconnectedSectors {
        /// Offending sector tags
        tags: Vec<String>,
    },
}

// =============================================================================
// PARSING
// =============================================================================

/// A parsed declaration, still in grid units.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    /// `r...()`
    Room {
        /// Full tag text
        tag: String,
    },
    /// `s...(x, y, w, h, n, e, s, w, room)`
    Sector {
        /// Full tag text
        tag: String,
        /// Grid position of corner A
        x: f64,
        /// Grid position of corner A
        y: f64,
        /// Width in cells
        width: f64,
        /// Height in cells
        height: f64,
        /// Wall flags: north, east, south, west
        sides: [bool; 4],
        /// Owning room tag
        room: String,
    },
    /// `d...(xa, ya, xb, yb, room_lu, room_rd)`
    Door {
        /// Full tag text
        tag: String,
        /// Grid endpoint A
        a: (f64, f64),
        /// Grid endpoint B
        b: (f64, f64),
        /// Low-side room tag
        room_lu: String,
        /// High-side room tag
        room_rd: String,
    },
    /// `p(x, y, direction, room)`
    Player {
        /// Grid position
        x: f64,
        /// Grid position
        y: f64,
        /// Heading in degrees
        direction: f64,
        /// Starting room tag
        room: String,
    },
}

/// A declaration with its 1-based source line.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLine {
    /// 1-based line number
    pub line: usize,
    /// The declaration
    pub decl: Declaration,
}

/// Parse map text into declarations, in source order.
pub fn parse_map(src: &str) -> Result<Vec<MapLine>, MapError> {
    let mut out = Vec::new();

    for (index, raw) in src.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();

        let kind = match text.chars().next() {
            Some(c @ ('r' | 's' | 'd' | 'p')) => c,
            Some(_) => {
                debug!("ignoring map line {}: `{}`", line, text);
                continue;
            }
            None => continue,
        };

        let malformed = || MapError::Malformed { line, text: text.to_string() };
        let (tag, rest) = text.split_once('(').ok_or_else(malformed)?;
        let (inner, _) = rest.split_once(')').ok_or_else(malformed)?;
        let tag = tag.trim().to_string();
        let params: Vec<&str> = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(str::trim).collect()
        };

        let decl = match kind {
            'r' => Declaration::Room { tag },
            's' => {
                expect_params(line, &tag, &params, 9)?;
                Declaration::Sector {
                    x: number(line, params[0])?,
                    y: number(line, params[1])?,
                    width: number(line, params[2])?,
                    height: number(line, params[3])?,
                    sides: [
                        flag(line, params[4])?,
                        flag(line, params[5])?,
                        flag(line, params[6])?,
                        flag(line, params[7])?,
                    ],
                    room: params[8].to_string(),
                    tag,
                }
            }
            'd' => {
                expect_params(line, &tag, &params, 6)?;
                Declaration::Door {
                    a: (number(line, params[0])?, number(line, params[1])?),
                    b: (number(line, params[2])?, number(line, params[3])?),
                    room_lu: params[4].to_string(),
                    room_rd: params[5].to_string(),
                    tag,
                }
            }
            _ => {
                expect_params(line, &tag, &params, 4)?;
                Declaration::Player {
                    x: number(line, params[0])?,
                    y: number(line, params[1])?,
                    direction: number(line, params[2])?,
                    room: params[3].to_string(),
                }
            }
        };

        out.push(MapLine { line, decl });
    }

    Ok(out)
}

fn expect_params(line: usize, tag: &str, params: &[&str], expected: usize) -> Result<(), MapError> {
    if params.len() != expected {
        return Err(MapError::ParamCount {
            line,
            tag: tag.to_string(),
            expected,
            found: params.len(),
        });
    }
    Ok(())
}

fn number(line: usize, value: &str) -> Result<f64, MapError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MapError::InvalidNumber { line, value: value.to_string() })
}

fn flag(line: usize, value: &str) -> Result<bool, MapError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(MapError::InvalidFlag { line, value: value.to_string() }),
    }
}

// =============================================================================
// LOADING
// =============================================================================

/// Build a world from map text.
pub fn load_world(src: &str, config: &MapConfig) -> Result<World, MapError> {
    let mut builder = WorldBuilder::new(config);
    let mut spawn: Option<PlayerSpawn> = None;

    for MapLine { line, decl } in parse_map(src)? {
        match decl {
            Declaration::Room { tag } => {
                if builder.find_room(&tag).is_some() {
                    return Err(MapError::DuplicateRoom { line, room: tag });
                }
                builder.add_room(&tag);
            }
            Declaration::Sector { tag, x, y, width, height, sides, room } => {
                let room = resolve_room(&builder, line, &room)?;
                if width <= 0.0 || height <= 0.0 {
                    return Err(MapError::DegenerateSector { line, tag });
                }
                let position = config.grid_to_world(x, y);
                let size = Vec2::new(width * config.cell_size, height * config.cell_size);
                builder.add_sector(&tag, room, position, size, sides);
            }
            Declaration::Door { tag, a, b, room_lu, room_rd } => {
                let room_lu = resolve_room(&builder, line, &room_lu)?;
                let room_rd = resolve_room(&builder, line, &room_rd)?;
                let pos_a = config.grid_to_world(a.0, a.1);
                let pos_b = config.grid_to_world(b.0, b.1);
                if near_point(pos_a, pos_b) {
                    return Err(MapError::DegenerateDoor { line, tag });
                }
                if !near(pos_a.x, pos_b.x) && !near(pos_a.y, pos_b.y) {
                    return Err(MapError::SkewedDoor { line, tag });
                }
                builder.add_door(&tag, pos_a, pos_b, room_lu, room_rd);
            }
            Declaration::Player { x, y, direction, room } => {
                if spawn.is_some() {
                    return Err(MapError::DuplicatePlayer { line });
                }
                spawn = Some(PlayerSpawn {
                    position: config.grid_to_world(x, y),
                    direction,
                    room: resolve_room(&builder, line, &room)?,
                });
            }
        }
    }

    builder.finish(spawn.ok_or(MapError::MissingPlayer)?)
}

/// Read and load a map file.
pub fn load_world_file(path: impl AsRef<Path>, config: &MapConfig) -> Result<World, MapError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loading map {}", path.display());
    load_world(&src, config)
}

fn resolve_room(builder: &WorldBuilder, line: usize, tag: &str) -> Result<RoomId, MapError> {
    builder
        .find_room(tag)
        .ok_or_else(|| MapError::UnknownRoom { line, room: tag.to_string() })
}

// =============================================================================
// TESTS
// =============================================================================
