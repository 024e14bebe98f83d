//! Geographic bounding boxes and their fixed-point wire form

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// Scale between degrees and the integer coordinates used on the wire
pub const FIXED_POINT_SCALE: f64 = 1e7;

/// Axis-aligned box in WGS84 degrees.
///
/// Callers keep `west <= east` and `south <= north`; nothing here checks it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// Bounding box in degrees × 10^7, as the ways endpoint expects it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedBoundingBox {
    pub west: i64,
    pub south: i64,
    pub east: i64,
    pub north: i64,
}

/// Truncate degrees toward negative infinity into fixed-point units
#[inline]
pub fn to_fixed(degrees: f64) -> i64 {
    (degrees * FIXED_POINT_SCALE).floor() as i64
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Fixed-point form sent to the server
    pub fn to_fixed(&self) -> FixedBoundingBox {
        FixedBoundingBox {
            west: to_fixed(self.west),
            south: to_fixed(self.south),
            east: to_fixed(self.east),
            north: to_fixed(self.north),
        }
    }

    /// Whether `other` lies entirely within this box (edges included)
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.west <= other.west
            && self.south <= other.south
            && self.east >= other.east
            && self.north >= other.north
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

impl From<BoundingBox> for Rect<f64> {
    fn from(bbox: BoundingBox) -> Self {
        Rect::new(
            Coord {
                x: bbox.west,
                y: bbox.south,
            },
            Coord {
                x: bbox.east,
                y: bbox.north,
            },
        )
    }
}

impl From<Rect<f64>> for BoundingBox {
    /// `x` is longitude and `y` latitude, as in `geo`
    fn from(rect: Rect<f64>) -> Self {
        Self {
            west: rect.min().x,
            south: rect.min().y,
            east: rect.max().x,
            north: rect.max().y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_truncates_toward_negative_infinity() {
        assert_eq!(to_fixed(1.0), 10_000_000);
        assert_eq!(to_fixed(37.5), 375_000_000);
        assert_eq!(to_fixed(-0.00000001), -1);
        assert_eq!(to_fixed(-1.5), -15_000_000);
        assert_eq!(to_fixed(0.0), 0);
    }

    #[test]
    fn test_bbox_to_fixed() {
        let bbox = BoundingBox::new(-0.5, 55.0, 0.25, 56.0);
        assert_eq!(
            bbox.to_fixed(),
            FixedBoundingBox {
                west: -5_000_000,
                south: 550_000_000,
                east: 2_500_000,
                north: 560_000_000,
            }
        );
    }

    #[test]
    fn test_fixed_bbox_json_shape() {
        let json = serde_json::to_value(BoundingBox::new(1.0, 2.0, 3.0, 4.0).to_fixed()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "west": 10_000_000,
                "south": 20_000_000,
                "east": 30_000_000,
                "north": 40_000_000,
            })
        );
    }

    #[test]
    fn test_contains() {
        let outer = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains(&BoundingBox::new(2.0, 2.0, 8.0, 8.0)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&BoundingBox::new(5.0, 0.0, 15.0, 10.0)));
    }

    #[test]
    fn test_rect_conversion_keeps_edges() {
        let bbox = BoundingBox::new(37.5, 55.7, 37.7, 55.8);
        let rect: Rect<f64> = bbox.into();
        assert_eq!(rect.min().x, 37.5);
        assert_eq!(rect.max().y, 55.8);
        assert_eq!(BoundingBox::from(rect), bbox);
        assert!((bbox.width() - 0.2).abs() < 1e-12);
        assert!((bbox.height() - 0.1).abs() < 1e-12);
    }
}
