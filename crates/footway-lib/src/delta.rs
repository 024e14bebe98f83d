//! Newly exposed viewport area
//!
//! When the map moves, only the strips that were not inside the previously
//! fetched box need to be requested. Each expanded edge yields one strip
//! spanning the full current extent on the other axis. If the viewport jumped
//! far enough that the boxes no longer overlap on some axis, the whole
//! current viewport is fetched instead.

use crate::BoundingBox;
use smallvec::{SmallVec, smallvec};

/// At most one strip per edge
pub type Deltas = SmallVec<[BoundingBox; 4]>;

/// Regions of `current` that still need fetching, given the box fetched last.
///
/// Strips are produced in west, east, south, north order. Strips from adjacent
/// edges share their corner region.
pub fn compute_deltas(current: &BoundingBox, previous: Option<&BoundingBox>) -> Deltas {
    let Some(prev) = previous else {
        return smallvec![*current];
    };

    let whole: Deltas = smallvec![*current];
    let mut strips = Deltas::new();

    if current.west < prev.west {
        if current.east < prev.west {
            return whole;
        }
        strips.push(BoundingBox::new(
            current.west,
            current.south,
            prev.west,
            current.north,
        ));
    }
    if current.east > prev.east {
        if current.west > prev.east {
            return whole;
        }
        strips.push(BoundingBox::new(
            prev.east,
            current.south,
            current.east,
            current.north,
        ));
    }
    if current.south < prev.south {
        if current.north < prev.south {
            return whole;
        }
        strips.push(BoundingBox::new(
            current.west,
            current.south,
            current.east,
            prev.south,
        ));
    }
    if current.north > prev.north {
        if current.south > prev.north {
            return whole;
        }
        strips.push(BoundingBox::new(
            current.west,
            prev.north,
            current.east,
            current.north,
        ));
    }

    strips
}
