//! Drake Line Model
//!
//! Local-space line segments for drop entities, grouped by material.
//! Coordinates are `(x, y, z)` in half-size units: x lateral, y depth,
//! z up from the entity's base.

use serde::{Serialize, Deserialize};

/// A model-space point.
pub type ModelPoint = (f64, f64, f64);

/// A model-space segment.
pub type ModelSegment = (ModelPoint, ModelPoint);

/// Drawing colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// Player marker, camera sector walls
    Red,
    /// Ordinary walls
    Green,
    /// Closed doors, drake body, top-down entities
    Yellow,
    /// Open doors
    Cyan,
    /// Drake face
    Brown,
    /// Drake details, crosshair
    White,
}

/// Part of the model sharing one color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    /// Body outline
    Body,
    /// Face outline
    Face,
    /// Eyes, mouth and legs
    Misc,
}

impl Material {
    /// Materials in drawing order.
    pub const ALL: [Material; 3] = [Material::Body, Material::Face, Material::Misc];

    /// Color of this material.
    pub const fn color(self) -> Color {
        match self {
            Material::Body => Color::Yellow,
            Material::Face => Color::Brown,
            Material::Misc => Color::White,
        }
    }

    /// Whether all segments join into one closed outline. Misc segments
    /// are each drawn on their own.
    pub const fn single_outline(self) -> bool {
        !matches!(self, Material::Misc)
    }

    /// Segments of this material.
    pub const fn segments(self) -> &'static [ModelSegment] {
        match self {
            Material::Body => DRAKE_BODY,
            Material::Face => DRAKE_FACE,
            Material::Misc => DRAKE_MISC,
        }
    }
}

/// Body outline.
pub const DRAKE_BODY: &[ModelSegment] = &[
    ((-1.5, 0.0, 9.0), (0.0, 0.0, 10.0)),
    ((0.0, 0.0, 10.0), (-0.5, 0.0, 9.0)),
    ((-0.5, 0.0, 9.0), (0.0, 0.0, 5.0)),
    ((0.0, 0.0, 5.0), (2.0, 0.0, 5.0)),
    ((2.0, 0.0, 5.0), (1.0, 0.0, 3.0)),
    ((1.0, 0.0, 3.0), (-1.5, 0.0, 5.0)),
    ((-1.5, 0.0, 5.0), (-1.5, 0.0, 9.0)),
];

/// Face outline.
pub const DRAKE_FACE: &[ModelSegment] = &[
    ((-1.25, 0.0, 8.0), (-0.75, 0.0, 8.1)),
    ((-0.75, 0.0, 8.1), (-0.75, 0.0, 7.0)),
    ((-0.75, 0.0, 7.0), (-1.25, 0.0, 6.9)),
];

/// Eyes, mouth, legs.
pub const DRAKE_MISC: &[ModelSegment] = &[
    ((-1.1, 0.0, 7.8), (-1.05, 0.0, 7.8)),
    ((-0.95, 0.0, 7.9), (-0.9, 0.0, 7.9)),
    ((-1.15, 0.0, 7.2), (-0.85, 0.0, 7.2)),
    ((-0.5, 0.0, 4.2), (-0.5, 0.0, 0.0)),
    ((0.5, 0.0, 3.4), (0.5, 0.0, 0.0)),
];
