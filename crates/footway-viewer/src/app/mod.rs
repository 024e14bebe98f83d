//! Application module
//!
//! Full-screen map with the footway layers on top, a toggleable sidebar and
//! a popup describing the highlighted footway. Fetches run on the tokio
//! runtime; their results come back over a channel and are applied on the UI
//! thread in arrival order.

mod layers;
mod plugin;
pub(crate) mod settings;
mod settle;
mod state;
mod transport;
mod ui_panels;

use crate::app::layers::LayerHandle;
use crate::app::plugin::{FootwayPlugin, MapClick, MapFeedback, SharedFeedback};
use crate::app::settings::Settings;
use crate::app::settle::{Settle, SettleDetector};
use crate::app::state::{AppState, City, TilesProvider};
use crate::app::transport::HttpTransport;
use eframe::egui;
use footway_lib::{
    BoundingBox, FetchTicket, Grade, TransportError, WayLoader, WaysResponse, WaysTransport,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use walkers::{
    HttpTiles, Map, MapMemory, TileId,
    sources::{Attribution, OpenStreetMap, TileSource},
};

/// Zoom range the map is kept in
const MIN_ZOOM: f64 = 13.0;
const MAX_ZOOM: f64 = 19.0;

/// OpenTopoMap tile source
pub struct OpenTopoMap;

impl TileSource for OpenTopoMap {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://tile.opentopomap.org/{}/{}/{}.png",
            tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenTopoMap (CC-BY-SA)",
            url: "https://opentopomap.org/",
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        17
    }
}

/// A finished fetch on its way back to the UI thread
type FetchOutcome = (FetchTicket, Result<WaysResponse, TransportError>);

/// Main application structure
pub struct FootwayViewerApp {
    state: AppState,

    /// Fetch cycles, render cache and highlight
    loader: WayLoader<LayerHandle>,

    transport: HttpTransport,

    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,

    tiles_osm: HttpTiles,
    tiles_otm: HttpTiles,

    /// Map state (camera position, zoom, etc.)
    map_memory: MapMemory,

    /// Where the map opened, used as the "my position" of the map widget
    home: walkers::Position,

    settle: SettleDetector,

    /// Written by the map plugin every frame
    feedback: SharedFeedback,
}

impl FootwayViewerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let loader = WayLoader::new(settings.loader_config(), LayerHandle::default())?;
        let transport = HttpTransport::new(&settings.server_url)?;
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let home = settings.start_position();
        let mut map_memory = MapMemory::default();
        map_memory.center_at(home);
        let _ = map_memory.set_zoom(settings.zoom.clamp(MIN_ZOOM, MAX_ZOOM));

        tracing::info!(
            server = transport.url(),
            capacity = loader.config().cache_capacity,
            "Footway viewer ready"
        );

        Ok(Self {
            state: AppState::new(&settings),
            loader,
            transport,
            outcome_tx,
            outcome_rx,
            tiles_osm: HttpTiles::new(OpenStreetMap, cc.egui_ctx.clone()),
            tiles_otm: HttpTiles::new(OpenTopoMap, cc.egui_ctx.clone()),
            map_memory,
            home,
            settle: SettleDetector::default(),
            feedback: Arc::new(Mutex::new(MapFeedback::default())),
        })
    }

    /// Start a cycle for a settled viewport and fetch in the background
    fn start_cycle(&mut self, ctx: &egui::Context, viewport: BoundingBox, zoom: f64) {
        let Some(ticket) = self.loader.begin_cycle(viewport, zoom) else {
            return;
        };

        self.state.stats.cycles += 1;
        self.state.stats.in_flight += 1;

        let transport = self.transport.clone();
        let outcome_tx = self.outcome_tx.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let result = transport.fetch_ways(&ticket.request).await;
            // The receiver only goes away on shutdown
            let _ = outcome_tx.send((ticket, result));
            ctx.request_repaint();
        });
    }

    /// Apply every response that arrived since the last frame
    fn drain_outcomes(&mut self) {
        while let Ok((ticket, result)) = self.outcome_rx.try_recv() {
            let outcome = self.loader.apply_response(&ticket, result);
            self.state.record_outcome(&outcome);
        }
    }

    fn apply_pending_actions(&mut self) {
        if let Some(city) = self.state.pending_city.take() {
            tracing::info!(city = city.name(), "Jumping to city");
            self.map_memory.center_at(city.position());
            let _ = self.map_memory.set_zoom(City::ZOOM);
        }

        if self.state.pending_reload {
            self.state.pending_reload = false;
            self.loader.clear();
            self.settle.reset();
        }
    }

    fn handle_click(&mut self, click: MapClick) {
        match click {
            MapClick::Segment(id) => {
                if let Some(props) = self.loader.toggle_highlight(&id) {
                    tracing::debug!(%id, grade = %props.grade, "Highlighted footway");
                }
            }
            MapClick::Empty => self.loader.reset_highlight(),
        }
    }

    fn refresh_stats(&mut self) {
        let stats = &mut self.state.stats;
        stats.cached_segments = self.loader.cached_segments();
        let layers = self.loader.display().read();
        for grade in Grade::ALL {
            stats.drawn_per_grade[grade as usize] = layers.count(grade);
        }
    }
}

impl eframe::App for FootwayViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::scope!("FootwayViewerApp::update");

        self.drain_outcomes();
        self.apply_pending_actions();

        ui_panels::render_sidebar(ctx, &mut self.state);

        let plugin = FootwayPlugin::new(
            self.loader.display().clone(),
            self.state.ui_settings.visibility,
            self.state.ui_settings.line_width,
            self.feedback.clone(),
        );
        let tiles_provider = self.state.ui_settings.tiles_provider;
        let attribution_text = tiles_provider.attribution();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                profiling::scope!("map_panel");

                let tiles: &mut HttpTiles = match tiles_provider {
                    TilesProvider::OpenStreetMap => &mut self.tiles_osm,
                    TilesProvider::OpenTopoMap => &mut self.tiles_otm,
                };

                let map = Map::new(Some(tiles), &mut self.map_memory, self.home).with_plugin(plugin);
                ui.add(map);

                let _ = ui_panels::sidebar_button(ui, &mut self.state);

                let screen_rect = ui.max_rect();
                ui.painter().text(
                    screen_rect.center_bottom() + egui::vec2(0.0, -5.0),
                    egui::Align2::CENTER_BOTTOM,
                    attribution_text,
                    egui::FontId::proportional(10.0),
                    egui::Color32::from_black_alpha(180),
                );
            });

        let zoom = self.map_memory.zoom();
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            let _ = self.map_memory.set_zoom(zoom.clamp(MIN_ZOOM, MAX_ZOOM));
        }

        let (viewport, click) = {
            let mut feedback = self.feedback.lock().unwrap_or_else(PoisonError::into_inner);
            self.state.stats.zoom = feedback.zoom;
            (feedback.viewport, feedback.click.take())
        };
        self.state.stats.viewport = viewport;

        if let Some(click) = click {
            self.handle_click(click);
        }

        if let Some(viewport) = viewport {
            let interacting = ctx.input(|i| i.pointer.any_down());
            match self.settle.observe(viewport, interacting) {
                Settle::Moving => ctx.request_repaint(),
                Settle::Settled(viewport) => self.start_cycle(ctx, viewport, zoom),
                Settle::Idle => {}
            }
        }

        if let Some(props) = self.loader.highlighted_props() {
            ui_panels::way_info_window(ctx, props);
        }

        self.refresh_stats();
    }
}
