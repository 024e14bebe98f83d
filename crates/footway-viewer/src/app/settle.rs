//! Detects when the map stops moving
//!
//! A fetch cycle starts once per settled viewport: the box must be identical
//! on two consecutive frames with no pointer button held.

use footway_lib::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settle {
    /// The viewport changed this frame; another frame is needed to tell
    Moving,
    /// The viewport came to rest at a new box
    Settled(BoundingBox),
    /// Nothing new
    Idle,
}

#[derive(Debug, Default)]
pub struct SettleDetector {
    last_seen: Option<BoundingBox>,
    settled: Option<BoundingBox>,
}

impl SettleDetector {
    pub fn observe(&mut self, viewport: BoundingBox, interacting: bool) -> Settle {
        let moved = self.last_seen != Some(viewport);
        self.last_seen = Some(viewport);

        if moved || interacting {
            Settle::Moving
        } else if self.settled == Some(viewport) {
            Settle::Idle
        } else {
            self.settled = Some(viewport);
            Settle::Settled(viewport)
        }
    }

    /// Report the current viewport as settled again on the next frame
    pub fn reset(&mut self) {
        self.settled = None;
    }
}
