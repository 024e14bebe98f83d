//! Footway Library - Core of the Footway Difficulty Map
//!
//! Loads OSM footways for the visible part of a slippy map, grades them by
//! surface quality and keeps a bounded set of them on screen.
//!
//! # Architecture
//!
//! - **[`classify`]** / **[`analyze_incline`]**: Pure tag interpretation into a [`Grade`] and an [`Incline`]
//! - **[`compute_deltas`]**: Regions of the viewport that the previous fetch did not cover
//! - **[`SegmentCache`]**: LRU store with batch eviction down to a low-water mark
//! - **[`WayLoader`]**: Fetch cycles, rendering through a [`SegmentDisplay`] and highlighting
//! - **[`WaysTransport`]**: The network seam used by [`WayLoader::refresh`]
//!
//! The library draws nothing itself; the map widget implements
//! [`SegmentDisplay`] and the HTTP client implements [`WaysTransport`].

mod bbox;
mod cache;
mod delta;
mod display;
mod grade;
mod incline;
mod loader;
mod transport;
mod way;

// Public API exports
pub use bbox::{BoundingBox, FIXED_POINT_SCALE, FixedBoundingBox, to_fixed};
pub use cache::SegmentCache;
pub use delta::{Deltas, compute_deltas};
pub use display::{Dash, Rgb, SegmentDisplay, Style, WAY_OPACITY, WAY_WEIGHT};
pub use grade::{Grade, classify};
pub use incline::{Incline, analyze_incline, parse_percentage};
pub use loader::{CachedSegment, Config, FetchTicket, RenderSummary, WayLoader};
pub use transport::{TransportError, WaysTransport};
pub use way::{
    LatLon, STATUS_SUCCESS, SegmentShape, WayId, WayProps, WayRecord, WayTags, WaysPayload,
    WaysRequest, WaysResponse,
};

/// Error types of the library
#[derive(Debug, thiserror::Error)]
pub enum FootwayError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("server reported status {0:?}")]
    Status(String),

    #[error("successful response without a result")]
    MissingResult,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, FootwayError>;
