//! Application state management
//!
//! UI settings that can change at runtime, the fixed list of cities and the
//! statistics shown in the sidebar.

use crate::app::settings::Settings;
use footway_lib::{BoundingBox, Grade, RenderSummary};

/// Main application state (everything except the map and the loader)
pub struct AppState {
    /// Current UI settings
    pub ui_settings: UiSettings,

    /// Statistics about loading and rendering
    pub stats: Stats,

    /// City picked in the sidebar, applied on the next frame
    pub pending_city: Option<City>,

    /// Drop every loaded way and fetch the viewport again
    pub pending_reload: bool,
}

/// UI-specific settings that can be adjusted at runtime
#[derive(Clone, Debug)]
pub struct UiSettings {
    /// Width in pixels of an ordinary segment
    pub line_width: f32,

    /// Which grade layers are drawn
    pub visibility: GradeVisibility,

    /// Map tiles provider
    pub tiles_provider: TilesProvider,

    /// Whether sidebar is open
    pub sidebar_open: bool,
}

/// On/off switch per grade layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GradeVisibility([bool; Grade::ALL.len()]);

impl Default for GradeVisibility {
    fn default() -> Self {
        Self(Grade::ALL.map(Grade::visible_by_default))
    }
}

impl GradeVisibility {
    pub fn is_visible(&self, grade: Grade) -> bool {
        self.0[grade as usize]
    }

    pub fn set(&mut self, grade: Grade, visible: bool) {
        self.0[grade as usize] = visible;
    }

    /// Mutable flag, for checkboxes
    pub fn flag_mut(&mut self, grade: Grade) -> &mut bool {
        &mut self.0[grade as usize]
    }
}

/// Available map tile providers
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TilesProvider {
    #[value(name = "osm")]
    OpenStreetMap,
    #[value(name = "opentopomap")]
    OpenTopoMap,
}

impl TilesProvider {
    pub fn attribution(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "© OpenStreetMap contributors",
            Self::OpenTopoMap => "© OpenTopoMap (CC-BY-SA)",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::OpenStreetMap, Self::OpenTopoMap]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "OpenStreetMap",
            Self::OpenTopoMap => "OpenTopoMap",
        }
    }
}

/// Cities the map can jump to
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum City {
    Moscow,
    SaintPetersburg,
    Saratov,
    Tyumen,
}

impl City {
    pub const ALL: [City; 4] = [
        City::Moscow,
        City::SaintPetersburg,
        City::Saratov,
        City::Tyumen,
    ];

    /// Zoom used when jumping to a city
    pub const ZOOM: f64 = 17.0;

    pub fn name(&self) -> &'static str {
        match self {
            Self::Moscow => "Moscow",
            Self::SaintPetersburg => "Saint Petersburg",
            Self::Saratov => "Saratov",
            Self::Tyumen => "Tyumen",
        }
    }

    /// (lat, lon) of the city's point of interest
    pub fn lat_lon(&self) -> (f64, f64) {
        match self {
            Self::Moscow => (55.743, 37.610),
            Self::SaintPetersburg => (59.970860, 30.268775),
            Self::Saratov => (51.524958, 46.041146),
            Self::Tyumen => (57.151052, 65.537769),
        }
    }

    pub fn position(&self) -> walkers::Position {
        let (lat, lon) = self.lat_lon();
        walkers::lat_lon(lat, lon)
    }
}

/// Statistics about loaded data
#[derive(Default)]
pub struct Stats {
    /// Segments in the render cache
    pub cached_segments: usize,

    /// Attached segments per grade, indexed by `Grade as usize`
    pub drawn_per_grade: [usize; Grade::ALL.len()],

    /// Cycles that issued a request
    pub cycles: u64,

    /// Requests still waiting for an answer
    pub in_flight: usize,

    /// Outcome of the last applied response
    pub last_summary: Option<RenderSummary>,

    /// Error of the last failed response, cleared by the next success
    pub last_error: Option<String>,

    /// Current map zoom
    pub zoom: f64,

    /// Current viewport bounds
    pub viewport: Option<BoundingBox>,
}

impl Stats {
    pub fn drawn(&self, grade: Grade) -> usize {
        self.drawn_per_grade[grade as usize]
    }
}

impl AppState {
    /// Create new application state from CLI settings
    pub fn new(settings: &Settings) -> Self {
        let ui_settings = UiSettings {
            line_width: settings.line_width,
            visibility: GradeVisibility::default(),
            tiles_provider: settings.tiles,
            sidebar_open: true,
        };

        Self {
            ui_settings,
            stats: Stats::default(),
            pending_city: None,
            pending_reload: false,
        }
    }

    /// Record the outcome of applying a response
    pub fn record_outcome(&mut self, outcome: &footway_lib::Result<RenderSummary>) {
        self.stats.in_flight = self.stats.in_flight.saturating_sub(1);
        match outcome {
            Ok(summary) => {
                self.stats.last_summary = Some(*summary);
                self.stats.last_error = None;
            }
            Err(err) => self.stats.last_error = Some(err.to_string()),
        }
    }
}
