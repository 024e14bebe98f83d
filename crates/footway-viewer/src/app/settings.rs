use crate::app::state::{City, TilesProvider};
use clap::Parser;
use footway_lib::Config;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Footway Map - OSM footways colored by how hard they are to walk
pub struct Settings {
    /// Base URL of the ways server (the `/ways` endpoint is appended)
    #[clap(long, default_value = "http://localhost:8082")]
    pub server_url: String,

    /// Maximum number of segments kept in the render cache
    #[clap(long, default_value = "6000")]
    pub cache_capacity: usize,

    /// Fraction of the cache kept after an eviction sweep (0-1]
    #[clap(long, default_value = "0.9")]
    pub eviction_fraction: f64,

    /// Incline percentage above which a way is drawn with arrows
    #[clap(long, default_value = "10.0")]
    pub incline_threshold: f64,

    /// Ways are only loaded at this zoom or closer
    #[clap(long, default_value = "15.0")]
    pub min_fetch_zoom: f64,

    /// City to start at
    #[clap(long, value_enum, default_value = "moscow")]
    pub city: City,

    /// Start latitude, overrides --city
    #[clap(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Start longitude, overrides --city
    #[clap(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Start zoom
    #[clap(long, default_value = "17.0")]
    pub zoom: f64,

    /// Segment line width in pixels
    #[clap(long, default_value = "4.0")]
    pub line_width: f32,

    /// Do not draw direction arrows on steep segments
    #[clap(long)]
    pub no_incline_arrows: bool,

    /// Base map tiles
    #[clap(long, value_enum, default_value = "osm")]
    pub tiles: TilesProvider,
}

impl Settings {
    pub fn from_cli() -> Self {
        Settings::parse()
    }

    /// Loader tuning derived from the flags
    pub fn loader_config(&self) -> Config {
        Config {
            cache_capacity: self.cache_capacity,
            eviction_fraction: self.eviction_fraction,
            incline_threshold: self.incline_threshold,
            min_fetch_zoom: self.min_fetch_zoom,
            incline_arrows: !self.no_incline_arrows,
        }
    }

    /// Where the map opens
    pub fn start_position(&self) -> walkers::Position {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => walkers::lat_lon(lat, lon),
            _ => self.city.position(),
        }
    }
}
