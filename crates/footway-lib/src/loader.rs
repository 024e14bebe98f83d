//! WayLoader - drives fetch cycles and owns the render cache
//!
//! One cycle runs per settled viewport change:
//!
//! 1. [`WayLoader::begin_cycle`] computes the newly exposed regions, stores
//!    the viewport as the new baseline right away and hands back a
//!    [`FetchTicket`] carrying the request.
//! 2. The caller performs the request, possibly while further cycles start.
//! 3. [`WayLoader::apply_response`] renders the ways of a successful
//!    response, or forgets the baseline on failure so the next cycle fetches
//!    the whole viewport.
//!
//! Responses are applied in whatever order they arrive. A late response for
//! a viewport the user already left still lands in the cache and on the map.

use crate::{
    BoundingBox, Deltas, FootwayError, Result, SegmentCache, SegmentDisplay, SegmentShape, Style,
    TransportError, WayId, WayProps, WayRecord, WaysRequest, WaysResponse, WaysTransport,
    compute_deltas,
};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Tuning of the loader
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of cached segments
    pub cache_capacity: usize,
    /// Fraction of the capacity kept after an eviction sweep
    pub eviction_fraction: f64,
    /// Incline percentage above which a way counts as steep
    pub incline_threshold: f64,
    /// No fetching happens below this map zoom
    pub min_fetch_zoom: f64,
    /// Decorate steep segments with direction arrows
    pub incline_arrows: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 6000,
            eviction_fraction: 0.9,
            incline_threshold: 10.0,
            min_fetch_zoom: 15.0,
            incline_arrows: true,
        }
    }
}

impl Config {
    /// Check the configuration, returning the capacity as a non-zero value
    pub fn validate(&self) -> Result<NonZeroUsize> {
        let capacity = NonZeroUsize::new(self.cache_capacity).ok_or_else(|| {
            FootwayError::InvalidConfig("cache capacity must be at least 1".to_owned())
        })?;
        if !(self.incline_threshold.is_finite() && self.incline_threshold >= 0.0) {
            return Err(FootwayError::InvalidConfig(format!(
                "incline threshold must be a non-negative percentage, got {}",
                self.incline_threshold
            )));
        }
        if self.min_fetch_zoom.is_nan() {
            return Err(FootwayError::InvalidConfig(
                "minimum fetch zoom is not a number".to_owned(),
            ));
        }
        Ok(capacity)
    }
}

/// A cache entry: the shared renderable plus its attachment state
#[derive(Debug, Clone)]
pub struct CachedSegment {
    pub shape: Arc<SegmentShape>,
    /// Currently attached to the display
    pub drawn: bool,
}

/// An issued request, to be handed back to [`WayLoader::apply_response`]
#[derive(Debug, Clone)]
pub struct FetchTicket {
    /// Sequence number of the cycle, starting at 1
    pub cycle: u64,
    /// Viewport the regions were computed for
    pub viewport: BoundingBox,
    /// Newly exposed regions in degrees
    pub regions: Deltas,
    /// Request body for the transport
    pub request: WaysRequest,
}

/// What applying one response did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Segments attached to the display
    pub added: usize,
    /// Segments that were on the display already
    pub already_drawn: usize,
    /// Segments evicted from the cache
    pub evicted: usize,
}

/// Owner of the fetch baseline, the render cache and the highlight
pub struct WayLoader<D: SegmentDisplay> {
    config: Config,
    display: D,
    cache: SegmentCache<WayId, CachedSegment>,
    prev_bounds: Option<BoundingBox>,
    highlighted: Option<WayId>,
    last_cycle: u64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<D: SegmentDisplay> WayLoader<D> {
    /// Create a loader drawing onto `display`
    pub fn new(config: Config, display: D) -> Result<Self> {
        let capacity = config.validate()?;
        let cache = SegmentCache::new(capacity, config.eviction_fraction)?;
        Ok(Self {
            config,
            display,
            cache,
            prev_bounds: None,
            highlighted: None,
            last_cycle: 0,
        })
    }

    /// Start a cycle for the settled `viewport`.
    ///
    /// Returns `None` when the zoom is below the fetch threshold (the
    /// baseline is left alone) or when nothing new is exposed. Otherwise the
    /// viewport becomes the new baseline before any response arrives.
    pub fn begin_cycle(&mut self, viewport: BoundingBox, zoom: f64) -> Option<FetchTicket> {
        if zoom < self.config.min_fetch_zoom {
            tracing::debug!(
                zoom,
                min_zoom = self.config.min_fetch_zoom,
                "Not loading new ways below minimum zoom"
            );
            return None;
        }

        let regions = compute_deltas(&viewport, self.prev_bounds.as_ref());
        self.prev_bounds = Some(viewport);

        if regions.is_empty() {
            tracing::trace!("Viewport already covered by the previous fetch");
            return None;
        }

        self.last_cycle += 1;
        let request = WaysRequest {
            bboxes: regions.iter().map(BoundingBox::to_fixed).collect(),
        };
        tracing::debug!(
            cycle = self.last_cycle,
            regions = regions.len(),
            "Requesting ways for newly exposed regions"
        );

        Some(FetchTicket {
            cycle: self.last_cycle,
            viewport,
            regions,
            request,
        })
    }

    /// Apply the outcome of the request issued with `ticket`.
    ///
    /// Any failure, including a non-success status, clears the baseline and
    /// renders nothing. The error is returned for reporting only.
    pub fn apply_response(
        &mut self,
        ticket: &FetchTicket,
        response: std::result::Result<WaysResponse, TransportError>,
    ) -> Result<RenderSummary> {
        if ticket.cycle < self.last_cycle {
            tracing::debug!(
                cycle = ticket.cycle,
                latest = self.last_cycle,
                "Applying response of an older cycle"
            );
        }

        let ways = match response
            .map_err(FootwayError::from)
            .and_then(WaysResponse::into_ways)
        {
            Ok(ways) => ways,
            Err(err) => {
                tracing::warn!(
                    cycle = ticket.cycle,
                    error = %err,
                    "Failed to get ways data, next cycle fetches the whole viewport"
                );
                self.prev_bounds = None;
                return Err(err);
            }
        };

        Ok(self.render_ways(ways))
    }

    /// Run a full cycle, awaiting `transport` in between.
    ///
    /// `Ok(None)` means no request was needed.
    pub async fn refresh<T: WaysTransport>(
        &mut self,
        viewport: BoundingBox,
        zoom: f64,
        transport: &T,
    ) -> Result<Option<RenderSummary>> {
        let Some(ticket) = self.begin_cycle(viewport, zoom) else {
            return Ok(None);
        };
        let response = transport.fetch_ways(&ticket.request).await;
        self.apply_response(&ticket, response).map(Some)
    }

    /// Cache and draw every way of a response
    pub fn render_ways(&mut self, ways: BTreeMap<WayId, WayRecord>) -> RenderSummary {
        let mut summary = RenderSummary::default();

        for (id, record) in ways {
            if let Some(entry) = self.cache.get_mut(&id) {
                if entry.drawn {
                    summary.already_drawn += 1;
                } else {
                    Self::draw(&mut self.display, &self.config, entry);
                    summary.added += 1;
                }
                continue;
            }

            let shape = SegmentShape::from_record(id.clone(), record, self.config.incline_threshold);
            let entry = CachedSegment {
                shape: Arc::new(shape),
                drawn: false,
            };

            let display = &mut self.display;
            let highlighted = &mut self.highlighted;
            summary.evicted += self.cache.insert(id.clone(), entry, |key, removed| {
                if removed.drawn {
                    display.detach(&key);
                }
                if highlighted.as_ref() == Some(&key) {
                    *highlighted = None;
                }
            });

            if let Some(entry) = self.cache.get_mut(&id) {
                Self::draw(&mut self.display, &self.config, entry);
                summary.added += 1;
            }
        }

        tracing::info!(
            "Added {} way(s), {} already drawn",
            summary.added,
            summary.already_drawn
        );
        summary
    }

    fn draw(display: &mut D, config: &Config, entry: &mut CachedSegment) {
        display.attach(&entry.shape, Style::for_grade(entry.shape.props.grade));
        if config.incline_arrows && entry.shape.props.steep {
            display.attach_arrow(&entry.shape);
        }
        entry.drawn = true;
    }

    /// Highlight the clicked segment, or clear the highlight when it is
    /// already the highlighted one.
    ///
    /// Returns the properties of the newly highlighted segment.
    pub fn toggle_highlight(&mut self, id: &WayId) -> Option<&WayProps> {
        if self.highlighted.as_ref() == Some(id) {
            self.reset_highlight();
            return None;
        }
        self.reset_highlight();

        if !self.cache.peek(id).is_some_and(|entry| entry.drawn) {
            return None;
        }
        self.display.set_style(id, Style::highlighted());
        self.display.bring_to_front(id);
        self.highlighted = Some(id.clone());
        self.highlighted_props()
    }

    /// Restore the grade style of the highlighted segment, if any
    pub fn reset_highlight(&mut self) {
        let Some(id) = self.highlighted.take() else {
            return;
        };
        if let Some(entry) = self.cache.peek(&id) {
            self.display
                .set_style(&id, Style::for_grade(entry.shape.props.grade));
        }
    }

    pub fn highlighted(&self) -> Option<&WayId> {
        self.highlighted.as_ref()
    }

    /// Properties of the highlighted segment, for the info panel
    pub fn highlighted_props(&self) -> Option<&WayProps> {
        let id = self.highlighted.as_ref()?;
        self.cache.peek(id).map(|entry| &entry.shape.props)
    }

    /// Detach and drop every cached segment and forget the baseline
    pub fn clear(&mut self) {
        self.highlighted = None;
        self.prev_bounds = None;
        let display = &mut self.display;
        self.cache.clear(|key, removed| {
            if removed.drawn {
                display.detach(&key);
            }
        });
        tracing::info!("Cleared all cached ways");
    }

    /// Box of the last issued fetch, if the next cycle can build on it
    pub fn previous_bounds(&self) -> Option<&BoundingBox> {
        self.prev_bounds.as_ref()
    }

    /// Sequence number of the most recently issued cycle
    pub fn last_cycle(&self) -> u64 {
        self.last_cycle
    }

    pub fn cached_segments(&self) -> usize {
        self.cache.len()
    }

    /// Whether `id` is cached, without refreshing it
    pub fn is_cached(&self, id: &WayId) -> bool {
        self.cache.contains(id)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Grade, LatLon, WayTags};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Attach(WayId, Style),
        Detach(WayId),
        SetStyle(WayId, Style),
        Front(WayId),
        Arrow(WayId),
    }

    #[derive(Default)]
    struct RecordingDisplay {
        events: Vec<Event>,
    }

    impl RecordingDisplay {
        fn detached(&self) -> Vec<WayId> {
            self.events
                .iter()
                .filter_map(|event| match event {
                    Event::Detach(id) => Some(id.clone()),
                    _ => None,
                })
                .collect()
        }

        fn attached(&self) -> usize {
            self.events
                .iter()
                .filter(|event| matches!(event, Event::Attach(..)))
                .count()
        }
    }

    impl SegmentDisplay for RecordingDisplay {
        fn attach(&mut self, shape: &Arc<SegmentShape>, style: Style) {
            self.events.push(Event::Attach(shape.id.clone(), style));
        }

        fn detach(&mut self, id: &WayId) {
            self.events.push(Event::Detach(id.clone()));
        }

        fn set_style(&mut self, id: &WayId, style: Style) {
            self.events.push(Event::SetStyle(id.clone(), style));
        }

        fn bring_to_front(&mut self, id: &WayId) {
            self.events.push(Event::Front(id.clone()));
        }

        fn attach_arrow(&mut self, shape: &Arc<SegmentShape>) {
            self.events.push(Event::Arrow(shape.id.clone()));
        }
    }

    /// Answers requests from a queue of canned results, empty success when drained
    #[derive(Default)]
    struct FakeTransport {
        responses: Mutex<VecDeque<std::result::Result<WaysResponse, TransportError>>>,
        requests: Mutex<Vec<WaysRequest>>,
    }

    impl FakeTransport {
        fn push(&self, response: std::result::Result<WaysResponse, TransportError>) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn requests(&self) -> Vec<WaysRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl WaysTransport for FakeTransport {
        fn fetch_ways(
            &self,
            request: &WaysRequest,
        ) -> impl std::future::Future<Output = std::result::Result<WaysResponse, TransportError>> + Send
        {
            self.requests.lock().unwrap().push(request.clone());
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(WaysResponse::success(BTreeMap::new())));
            async move { next }
        }
    }

    fn bbox(w: f64, s: f64, e: f64, n: f64) -> BoundingBox {
        BoundingBox::new(w, s, e, n)
    }

    fn record(tags: &[(&str, &str)]) -> WayRecord {
        WayRecord {
            id: None,
            nodes: vec![LatLon::new(0.0, 0.0), LatLon::new(0.001, 0.001)],
            tags: tags.iter().copied().collect::<WayTags>(),
        }
    }

    fn ways(ids: impl IntoIterator<Item = u64>) -> BTreeMap<WayId, WayRecord> {
        ids.into_iter()
            .map(|id| (WayId::from(id), record(&[("surface", "asphalt")])))
            .collect()
    }

    fn loader(config: Config) -> WayLoader<RecordingDisplay> {
        WayLoader::new(config, RecordingDisplay::default()).unwrap()
    }

    const ZOOM: f64 = 17.0;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 6000);
        assert_eq!(config.eviction_fraction, 0.9);
        assert_eq!(config.min_fetch_zoom, 15.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let zero = Config {
            cache_capacity: 0,
            ..Config::default()
        };
        assert!(matches!(
            WayLoader::new(zero, RecordingDisplay::default()),
            Err(FootwayError::InvalidConfig(_))
        ));
        let negative = Config {
            incline_threshold: -1.0,
            ..Config::default()
        };
        assert!(negative.validate().is_err());
        let fraction = Config {
            eviction_fraction: 0.0,
            ..Config::default()
        };
        assert!(WayLoader::new(fraction, RecordingDisplay::default()).is_err());
    }

    #[test]
    fn test_first_cycle_requests_whole_viewport() {
        let mut loader = loader(Config::default());
        let ticket = loader.begin_cycle(bbox(0.0, 0.0, 10.0, 10.0), ZOOM).unwrap();
        assert_eq!(ticket.cycle, 1);
        assert_eq!(ticket.regions.as_slice(), &[bbox(0.0, 0.0, 10.0, 10.0)]);
        assert_eq!(
            ticket.request.bboxes,
            vec![bbox(0.0, 0.0, 10.0, 10.0).to_fixed()]
        );
        assert_eq!(loader.previous_bounds(), Some(&bbox(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_zoom_below_minimum_skips_cycle() {
        let mut loader = loader(Config::default());
        assert!(loader.begin_cycle(bbox(0.0, 0.0, 10.0, 10.0), 14.0).is_none());
        assert!(loader.previous_bounds().is_none());
        assert_eq!(loader.last_cycle(), 0);
    }

    #[test]
    fn test_covered_viewport_still_moves_baseline() {
        let mut loader = loader(Config::default());
        loader.begin_cycle(bbox(0.0, 0.0, 10.0, 10.0), ZOOM);
        assert!(loader.begin_cycle(bbox(2.0, 2.0, 8.0, 8.0), ZOOM).is_none());
        assert_eq!(loader.previous_bounds(), Some(&bbox(2.0, 2.0, 8.0, 8.0)));
        assert_eq!(loader.last_cycle(), 1);
    }

    #[tokio::test]
    async fn test_pan_fetches_only_new_strip() {
        let transport = FakeTransport::default();
        let mut loader = loader(Config::default());

        loader
            .refresh(bbox(0.0, 0.0, 10.0, 10.0), ZOOM, &transport)
            .await
            .unwrap();
        loader
            .refresh(bbox(5.0, 0.0, 15.0, 10.0), ZOOM, &transport)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].bboxes, vec![bbox(0.0, 0.0, 10.0, 10.0).to_fixed()]);
        assert_eq!(requests[1].bboxes, vec![bbox(10.0, 0.0, 15.0, 10.0).to_fixed()]);
    }

    #[tokio::test]
    async fn test_refresh_without_new_area_does_not_fetch() {
        let transport = FakeTransport::default();
        let mut loader = loader(Config::default());
        loader
            .refresh(bbox(0.0, 0.0, 10.0, 10.0), ZOOM, &transport)
            .await
            .unwrap();
        let outcome = loader
            .refresh(bbox(1.0, 1.0, 9.0, 9.0), ZOOM, &transport)
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_renders_ways_of_successful_response() {
        let transport = FakeTransport::default();
        let mut ways = ways([1, 2]);
        ways.insert(WayId::from(3u64), record(&[("smoothness", "bad"), ("incline", "up")]));
        transport.push(Ok(WaysResponse::success(ways)));

        let mut loader = loader(Config::default());
        let summary = loader
            .refresh(bbox(0.0, 0.0, 1.0, 1.0), ZOOM, &transport)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            summary,
            RenderSummary {
                added: 3,
                already_drawn: 0,
                evicted: 0
            }
        );
        assert_eq!(loader.cached_segments(), 3);
        let events = &loader.display().events;
        assert!(events.contains(&Event::Attach(
            WayId::from(1u64),
            Style::for_grade(Grade::Green)
        )));
        assert!(events.contains(&Event::Attach(
            WayId::from(3u64),
            Style::for_grade(Grade::Black)
        )));
        assert!(events.contains(&Event::Arrow(WayId::from(3u64))));
        assert!(!events.contains(&Event::Arrow(WayId::from(1u64))));
    }

    #[test]
    fn test_arrows_can_be_disabled() {
        let mut loader = loader(Config {
            incline_arrows: false,
            ..Config::default()
        });
        let mut steep = BTreeMap::new();
        steep.insert(WayId::from(1u64), record(&[("incline", "-30%")]));
        loader.render_ways(steep);
        assert!(
            !loader
                .display()
                .events
                .iter()
                .any(|event| matches!(event, Event::Arrow(_)))
        );
    }

    #[test]
    fn test_known_ways_are_not_attached_twice() {
        let mut loader = loader(Config::default());
        loader.render_ways(ways([1, 2]));
        let summary = loader.render_ways(ways([2, 3]));
        assert_eq!(summary.added, 1);
        assert_eq!(summary.already_drawn, 1);
        assert_eq!(loader.display().attached(), 3);
        assert_eq!(loader.cached_segments(), 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_resets_baseline() {
        let transport = FakeTransport::default();
        transport.push(Err(TransportError::HttpStatus(503)));
        let mut loader = loader(Config::default());

        let result = loader
            .refresh(bbox(0.0, 0.0, 10.0, 10.0), ZOOM, &transport)
            .await;
        assert!(matches!(
            result,
            Err(FootwayError::Transport(TransportError::HttpStatus(503)))
        ));
        assert!(loader.previous_bounds().is_none());
        assert_eq!(loader.display().attached(), 0);

        // The next cycle asks for everything again, even inside the old box
        loader
            .refresh(bbox(2.0, 2.0, 8.0, 8.0), ZOOM, &transport)
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[1].bboxes,
            vec![bbox(2.0, 2.0, 8.0, 8.0).to_fixed()]
        );
    }

    #[tokio::test]
    async fn test_error_status_resets_baseline() {
        let transport = FakeTransport::default();
        transport.push(Ok(WaysResponse {
            status: "error".to_owned(),
            ..Default::default()
        }));
        let mut loader = loader(Config::default());
        let result = loader
            .refresh(bbox(0.0, 0.0, 10.0, 10.0), ZOOM, &transport)
            .await;
        assert!(matches!(result, Err(FootwayError::Status(_))));
        assert!(loader.previous_bounds().is_none());
    }

    #[test]
    fn test_empty_area_keeps_baseline() {
        let mut loader = loader(Config::default());
        let ticket = loader.begin_cycle(bbox(0.0, 0.0, 10.0, 10.0), ZOOM).unwrap();
        let body = r#"{"status": "success", "params": "x", "result": {"ways": null}}"#;
        let response: WaysResponse = serde_json::from_str(body).unwrap();

        let summary = loader.apply_response(&ticket, Ok(response)).unwrap();
        assert_eq!(summary.added, 0);
        assert_eq!(loader.previous_bounds(), Some(&bbox(0.0, 0.0, 10.0, 10.0)));
        // A viewport inside the empty area needs nothing new
        assert!(loader.begin_cycle(bbox(2.0, 2.0, 8.0, 8.0), ZOOM).is_none());
    }

    #[test]
    fn test_stale_response_is_still_applied() {
        let mut loader = loader(Config::default());
        let first = loader.begin_cycle(bbox(0.0, 0.0, 10.0, 10.0), ZOOM).unwrap();
        let second = loader.begin_cycle(bbox(20.0, 0.0, 30.0, 10.0), ZOOM).unwrap();
        assert!(first.cycle < second.cycle);

        loader
            .apply_response(&second, Ok(WaysResponse::success(ways([2]))))
            .unwrap();
        let summary = loader
            .apply_response(&first, Ok(WaysResponse::success(ways([1]))))
            .unwrap();
        assert_eq!(summary.added, 1);
        assert!(loader.is_cached(&WayId::from(1u64)));
    }

    #[test]
    fn test_stale_failure_clears_newer_baseline() {
        let mut loader = loader(Config::default());
        let first = loader.begin_cycle(bbox(0.0, 0.0, 10.0, 10.0), ZOOM).unwrap();
        loader.begin_cycle(bbox(5.0, 0.0, 15.0, 10.0), ZOOM).unwrap();
        let _ = loader.apply_response(&first, Err(TransportError::Request("timeout".into())));
        assert!(loader.previous_bounds().is_none());
    }

    #[test]
    fn test_eviction_detaches_oldest_segments() {
        let mut loader = loader(Config {
            cache_capacity: 10,
            ..Config::default()
        });
        loader.render_ways(ways(0..10));
        let summary = loader.render_ways(ways([10]));

        assert_eq!(summary.evicted, 2);
        assert_eq!(loader.cached_segments(), 9);
        // "0" and "1" were inserted first
        assert_eq!(
            loader.display().detached(),
            vec![WayId::from(0u64), WayId::from(1u64)]
        );
    }

    #[test]
    fn test_revisited_ways_survive_eviction() {
        let mut loader = loader(Config {
            cache_capacity: 10,
            ..Config::default()
        });
        loader.render_ways(ways(0..10));
        // Seeing "0" again makes it the most recently used
        loader.render_ways(ways([0]));
        loader.render_ways(ways([10]));
        assert!(loader.is_cached(&WayId::from(0u64)));
        assert!(!loader.is_cached(&WayId::from(1u64)));
    }

    #[test]
    fn test_highlight_toggle() {
        let mut loader = loader(Config::default());
        loader.render_ways(ways([1, 2]));
        let one = WayId::from(1u64);
        let two = WayId::from(2u64);

        let props = loader.toggle_highlight(&one).cloned().unwrap();
        assert_eq!(props.surface.as_deref(), Some("asphalt"));
        assert_eq!(loader.highlighted(), Some(&one));

        // Switching restores the previous segment's style
        loader.toggle_highlight(&two);
        let events = &loader.display().events;
        let tail = &events[events.len() - 3..];
        assert_eq!(
            tail,
            &[
                Event::SetStyle(one.clone(), Style::for_grade(Grade::Green)),
                Event::SetStyle(two.clone(), Style::highlighted()),
                Event::Front(two.clone()),
            ]
        );

        // Clicking the highlighted segment again clears the highlight
        assert!(loader.toggle_highlight(&two).is_none());
        assert!(loader.highlighted().is_none());
        assert!(loader.highlighted_props().is_none());
    }

    #[test]
    fn test_highlight_unknown_way_is_ignored() {
        let mut loader = loader(Config::default());
        assert!(loader.toggle_highlight(&WayId::from("missing")).is_none());
        assert!(loader.display().events.is_empty());
    }

    #[test]
    fn test_evicting_highlighted_segment_drops_highlight() {
        let mut loader = loader(Config {
            cache_capacity: 10,
            ..Config::default()
        });
        loader.render_ways(ways(0..10));
        loader.toggle_highlight(&WayId::from(0u64));
        loader.render_ways(ways([10]));
        assert!(loader.highlighted().is_none());
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut loader = loader(Config::default());
        loader.begin_cycle(bbox(0.0, 0.0, 1.0, 1.0), ZOOM);
        loader.render_ways(ways([1, 2, 3]));
        loader.clear();
        assert_eq!(loader.cached_segments(), 0);
        assert_eq!(loader.display().detached().len(), 3);
        assert!(loader.previous_bounds().is_none());
    }
}
