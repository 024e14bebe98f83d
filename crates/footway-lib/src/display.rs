//! The map widget seam: styles and the attach/detach contract

use crate::{Grade, SegmentShape, WayId};
use std::sync::Arc;

/// Line width of an ordinary segment in pixels
pub const WAY_WEIGHT: f32 = 4.0;
/// Opacity of an ordinary segment
pub const WAY_OPACITY: f32 = 0.8;

/// RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const MAROON: Rgb = Rgb(128, 0, 0);
}

/// Dash pattern in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
    pub length: f32,
    pub gap: f32,
}

/// How a segment polyline is stroked
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub weight: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub dash: Option<Dash>,
}

impl Style {
    /// Regular style of a segment with the given grade
    pub fn for_grade(grade: Grade) -> Self {
        let solid = |color| Self {
            weight: WAY_WEIGHT,
            color,
            opacity: WAY_OPACITY,
            dash: None,
        };
        match grade {
            Grade::Green => solid(Rgb::GREEN),
            Grade::Blue => solid(Rgb::BLUE),
            Grade::Red => solid(Rgb::RED),
            Grade::Black => solid(Rgb::BLACK),
            Grade::Unknown => Self {
                dash: Some(Dash {
                    length: 4.0,
                    gap: 5.0,
                }),
                ..solid(Rgb::BLACK)
            },
        }
    }

    /// Style of the segment the user clicked on
    pub fn highlighted() -> Self {
        Self {
            weight: WAY_WEIGHT + 3.0,
            color: Rgb::MAROON,
            opacity: WAY_OPACITY / 2.0,
            dash: None,
        }
    }
}

/// Display side effects requested by the loader.
///
/// The display groups attached segments into one layer per grade (taken from
/// `shape.props.grade`). Ids passed to the other methods always refer to a
/// segment attached earlier.
pub trait SegmentDisplay {
    /// Start drawing `shape` with `style` in the layer of its grade
    fn attach(&mut self, shape: &Arc<SegmentShape>, style: Style);

    /// Stop drawing a segment and drop any decoration attached to it
    fn detach(&mut self, id: &WayId);

    /// Restyle an attached segment
    fn set_style(&mut self, id: &WayId, style: Style);

    /// Draw an attached segment above all others
    fn bring_to_front(&mut self, id: &WayId);

    /// Decorate a steep segment with arrows pointing along its point order
    fn attach_arrow(&mut self, _shape: &Arc<SegmentShape>) {}
}
